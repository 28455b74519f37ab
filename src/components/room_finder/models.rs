use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Clock time encoded as `hour * 100 + minute` on a 24-hour scale.
///
/// Signed because the afternoon correction in the normalizer can push
/// malformed input below zero.
pub type TimeOfDay = i32;

/// Sentinel for "no further bookings today"
pub const END_OF_DAY: TimeOfDay = 2400;

/// Day abbreviations used by the class schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WeekdayTag {
    M,
    Tu,
    W,
    Th,
    F,
    Sa,
    Su,
}

impl WeekdayTag {
    pub const ALL: [WeekdayTag; 7] = [
        WeekdayTag::M,
        WeekdayTag::Tu,
        WeekdayTag::W,
        WeekdayTag::Th,
        WeekdayTag::F,
        WeekdayTag::Sa,
        WeekdayTag::Su,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WeekdayTag::M => "M",
            WeekdayTag::Tu => "Tu",
            WeekdayTag::W => "W",
            WeekdayTag::Th => "Th",
            WeekdayTag::F => "F",
            WeekdayTag::Sa => "Sa",
            WeekdayTag::Su => "Su",
        }
    }

    /// Match a user supplied day, ignoring case ("th", "TH" and "Th" are all Thursday)
    pub fn parse_loose(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(raw))
    }

    /// Comma separated list of every tag, for help messages
    pub fn list() -> String {
        Self::ALL
            .iter()
            .map(|tag| tag.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl From<chrono::Weekday> for WeekdayTag {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => WeekdayTag::M,
            chrono::Weekday::Tue => WeekdayTag::Tu,
            chrono::Weekday::Wed => WeekdayTag::W,
            chrono::Weekday::Thu => WeekdayTag::Th,
            chrono::Weekday::Fri => WeekdayTag::F,
            chrono::Weekday::Sat => WeekdayTag::Sa,
            chrono::Weekday::Sun => WeekdayTag::Su,
        }
    }
}

/// Exact, case-sensitive match as it appears in the schedule
impl FromStr for WeekdayTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| format!("Unknown day '{}'", s))
    }
}

impl fmt::Display for WeekdayTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A booked time range within one day, stored as `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(TimeOfDay, TimeOfDay)", into = "(TimeOfDay, TimeOfDay)")]
pub struct Interval {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl Interval {
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Self {
        Self { start, end }
    }

    /// Both ends are inclusive
    pub fn contains(&self, instant: TimeOfDay) -> bool {
        self.start <= instant && instant <= self.end
    }
}

impl From<(TimeOfDay, TimeOfDay)> for Interval {
    fn from((start, end): (TimeOfDay, TimeOfDay)) -> Self {
        Self { start, end }
    }
}

impl From<Interval> for (TimeOfDay, TimeOfDay) {
    fn from(interval: Interval) -> Self {
        (interval.start, interval.end)
    }
}

/// One weekly booking of a room, stored as `[day, [start, end]]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(WeekdayTag, Interval)", into = "(WeekdayTag, Interval)")]
pub struct Booking {
    pub day: WeekdayTag,
    pub interval: Interval,
}

impl Booking {
    pub fn new(day: WeekdayTag, interval: Interval) -> Self {
        Self { day, interval }
    }
}

impl From<(WeekdayTag, Interval)> for Booking {
    fn from((day, interval): (WeekdayTag, Interval)) -> Self {
        Self { day, interval }
    }
}

impl From<Booking> for (WeekdayTag, Interval) {
    fn from(booking: Booking) -> Self {
        (booking.day, booking.interval)
    }
}

/// A room and every booking scraped for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub location: String,
    #[serde(rename = "booked_times", default)]
    pub bookings: Vec<Booking>,
}

impl Room {
    /// Create a new room without bookings
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            bookings: Vec::new(),
        }
    }

    pub fn add_booking(&mut self, day: WeekdayTag, interval: Interval) {
        self.bookings.push(Booking::new(day, interval));
    }

    /// A room is open unless some booking on `day` covers `instant`
    pub fn is_open(&self, day: WeekdayTag, instant: TimeOfDay) -> bool {
        !self
            .bookings
            .iter()
            .any(|booking| booking.day == day && booking.interval.contains(instant))
    }

    /// Earliest booking start strictly after `instant` on `day`
    pub fn next_booking_start(&self, day: WeekdayTag, instant: TimeOfDay) -> TimeOfDay {
        self.bookings
            .iter()
            .filter(|booking| booking.day == day && booking.interval.start > instant)
            .map(|booking| booking.interval.start)
            .min()
            .unwrap_or(END_OF_DAY)
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.location)
    }
}

/// One (location, day, time) row produced by the timetable extractor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSlot {
    pub location: String,
    pub day: WeekdayTag,
    pub interval: Interval,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lecture_hall() -> Room {
        let mut room = Room::new("LA5-146");
        room.add_booking(WeekdayTag::M, Interval::new(900, 1050));
        room
    }

    #[test]
    fn test_is_open() {
        let room = lecture_hall();
        assert!(!room.is_open(WeekdayTag::M, 1000));
        assert!(room.is_open(WeekdayTag::M, 1100));
        assert!(room.is_open(WeekdayTag::Tu, 1000));

        // Interval ends are inclusive
        assert!(!room.is_open(WeekdayTag::M, 900));
        assert!(!room.is_open(WeekdayTag::M, 1050));
    }

    #[test]
    fn test_room_without_bookings_is_always_open() {
        let room = Room::new("VEC-115");
        for day in WeekdayTag::ALL {
            assert!(room.is_open(day, 0));
            assert!(room.is_open(day, 1200));
        }
    }

    #[test]
    fn test_next_booking_start_only_looks_at_same_day() {
        let mut room = lecture_hall();
        room.add_booking(WeekdayTag::Tu, Interval::new(1100, 1215));
        room.add_booking(WeekdayTag::M, Interval::new(1400, 1515));
        room.add_booking(WeekdayTag::M, Interval::new(1300, 1350));

        assert_eq!(room.next_booking_start(WeekdayTag::M, 1100), 1300);
        assert_eq!(room.next_booking_start(WeekdayTag::M, 1600), END_OF_DAY);
        assert_eq!(room.next_booking_start(WeekdayTag::W, 800), END_OF_DAY);
    }

    #[test]
    fn test_weekday_tag_parsing() {
        assert_eq!("Th".parse::<WeekdayTag>(), Ok(WeekdayTag::Th));
        assert!("TH".parse::<WeekdayTag>().is_err());
        assert_eq!(WeekdayTag::parse_loose("TH"), Some(WeekdayTag::Th));
        assert_eq!(WeekdayTag::parse_loose(" su "), Some(WeekdayTag::Su));
        assert_eq!(WeekdayTag::parse_loose("Monday"), None);
        assert_eq!(WeekdayTag::from(chrono::Weekday::Sat), WeekdayTag::Sa);
    }

    #[test]
    fn test_room_json_shape() {
        let json = serde_json::to_value(lecture_hall()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"location": "LA5-146", "booked_times": [["M", [900, 1050]]]})
        );
    }
}
