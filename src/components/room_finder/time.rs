use super::models::{Interval, TimeOfDay};
use crate::error::{invalid_time, BotResult};
use chrono::NaiveTime;

/// Marker the schedule uses for unscheduled sections
const UNSCHEDULED: [&str; 2] = ["TBA", "NA"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Meridiem {
    Am,
    Pm,
}

impl Meridiem {
    fn detect(raw: &str) -> Option<Self> {
        let lower = raw.to_lowercase();
        if lower.contains("am") {
            Some(Meridiem::Am)
        } else if lower.contains("pm") {
            Some(Meridiem::Pm)
        } else {
            None
        }
    }

    fn suffix(&self) -> &'static str {
        match self {
            Meridiem::Am => "am",
            Meridiem::Pm => "pm",
        }
    }
}

/// Returns true for the schedule's "no time / no days" markers
pub fn is_unscheduled(raw: &str) -> bool {
    UNSCHEDULED.contains(&raw)
}

/// Normalize a schedule time range such as `9:30-10:45am` to 24-hour `HHMM`.
///
/// A start without am/pm borrows the end's marker. If the start then lands
/// after the end it is taken to be twelve hours earlier, so `11-12:30pm`
/// becomes `1100..1230`. `TBA` and `NA` map to `(0, 0)`.
pub fn normalize_range(raw: &str) -> BotResult<Interval> {
    if is_unscheduled(raw) {
        return Ok(Interval::new(0, 0));
    }

    let mut parts = raw.split('-');
    let (start_raw, end_raw) = match (parts.next(), parts.next(), parts.next()) {
        (Some(start), Some(end), None) => (start, end),
        _ => return Err(invalid_time(raw)),
    };

    let start_raw = match (Meridiem::detect(start_raw), Meridiem::detect(end_raw)) {
        (None, Some(meridiem)) => format!("{}{}", start_raw, meridiem.suffix()),
        _ => start_raw.to_string(),
    };

    let mut start = time_to_24h(&start_raw)?;
    let end = time_to_24h(end_raw)?;

    if start > end {
        start -= 1200;
    }

    Ok(Interval::new(start, end))
}

/// Convert a single clock reading (`9`, `9:30am`, `12:15pm`) to `HHMM`.
///
/// Readings without a marker are treated as am. No range checks are made.
pub fn time_to_24h(raw: &str) -> BotResult<TimeOfDay> {
    let lower = raw.to_lowercase();
    let is_pm = lower.contains("pm");
    let digits = lower.replace("am", "").replace("pm", "");
    let digits = digits.trim();

    let (hours, minutes) = match digits.split_once(':') {
        Some((hours, minutes)) => (hours, minutes),
        None => (digits, "00"),
    };

    let mut hours = hours
        .trim()
        .parse::<u16>()
        .map_err(|_| invalid_time(raw))? as TimeOfDay;
    let minutes = minutes
        .trim()
        .parse::<u16>()
        .map_err(|_| invalid_time(raw))? as TimeOfDay;

    if is_pm && hours < 12 {
        hours += 12;
    } else if !is_pm && hours == 12 {
        hours = 0;
    }

    Ok(hours * 100 + minutes)
}

/// Parse a user supplied override time.
///
/// Without am/pm the value is 24-hour: `1430`, `930`, `14` or `12:30`.
/// With a marker it goes through [`time_to_24h`]. Readings outside a day
/// are rejected.
pub fn parse_clock_time(raw: &str) -> BotResult<TimeOfDay> {
    let raw = raw.trim();
    let time = if Meridiem::detect(raw).is_some() {
        time_to_24h(raw)?
    } else {
        parse_24h(raw).ok_or_else(|| invalid_time(raw))?
    };

    if time < 0 || time / 100 > 23 || time % 100 > 59 {
        return Err(invalid_time(raw));
    }

    Ok(time)
}

/// `H[H]:MM`, bare `H[H]` or `HHMM` as a 24-hour reading
fn parse_24h(raw: &str) -> Option<TimeOfDay> {
    let is_number = |part: &str| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit());

    match raw.split_once(':') {
        Some((hours, minutes))
            if is_number(hours) && hours.len() <= 2 && is_number(minutes) && minutes.len() == 2 =>
        {
            Some(hours.parse::<TimeOfDay>().ok()? * 100 + minutes.parse::<TimeOfDay>().ok()?)
        }
        Some(_) => None,
        // Bare hour
        None if is_number(raw) && raw.len() <= 2 => Some(raw.parse::<TimeOfDay>().ok()? * 100),
        None if is_number(raw) && raw.len() <= 4 => raw.parse::<TimeOfDay>().ok(),
        None => None,
    }
}

/// Render `HHMM` the way the bot replies, e.g. `1315` as `1:15pm`
pub fn format_time_of_day(time: TimeOfDay) -> String {
    let clock = u32::try_from(time)
        .ok()
        .and_then(|time| NaiveTime::from_hms_opt(time / 100, time % 100, 0));

    match clock {
        Some(clock) => clock.format("%-I:%M%P").to_string(),
        None => time.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unscheduled_ranges() {
        assert_eq!(normalize_range("TBA").unwrap(), Interval::new(0, 0));
        assert_eq!(normalize_range("NA").unwrap(), Interval::new(0, 0));
        // Markers are case sensitive
        assert!(normalize_range("tba").is_err());
    }

    #[test]
    fn test_start_borrows_end_meridiem() {
        assert_eq!(normalize_range("9-10:30am").unwrap(), Interval::new(900, 1030));
        assert_eq!(normalize_range("2-3:15pm").unwrap(), Interval::new(1400, 1515));
        assert_eq!(normalize_range("9:30-10:45AM").unwrap(), Interval::new(930, 1045));
    }

    #[test]
    fn test_start_crossing_noon() {
        // "11:50pm" parses to 2350, which is after 1315, so it moves back to 1150
        assert_eq!(normalize_range("11:50-1:15pm").unwrap(), Interval::new(1150, 1315));
        assert_eq!(normalize_range("11-12:30pm").unwrap(), Interval::new(1100, 1230));
        assert_eq!(normalize_range("12-1:15pm").unwrap(), Interval::new(1200, 1315));
    }

    #[test]
    fn test_explicit_markers_are_kept() {
        assert_eq!(normalize_range("11am-1pm").unwrap(), Interval::new(1100, 1300));
        assert_eq!(normalize_range("7pm-9:45pm").unwrap(), Interval::new(1900, 2145));
    }

    #[test]
    fn test_malformed_ranges() {
        assert!(normalize_range("garbage").is_err());
        assert!(normalize_range("9-10-11am").is_err());
        assert!(normalize_range("nine-ten").is_err());
    }

    #[test]
    fn test_time_to_24h() {
        assert_eq!(time_to_24h("9").unwrap(), 900);
        assert_eq!(time_to_24h("9:05am").unwrap(), 905);
        assert_eq!(time_to_24h("12am").unwrap(), 0);
        assert_eq!(time_to_24h("12:30am").unwrap(), 30);
        assert_eq!(time_to_24h("12pm").unwrap(), 1200);
        assert_eq!(time_to_24h("5:45PM").unwrap(), 1745);
        assert!(time_to_24h("noon").is_err());
    }

    #[test]
    fn test_parse_clock_time() {
        assert_eq!(parse_clock_time("1430").unwrap(), 1430);
        assert_eq!(parse_clock_time("930").unwrap(), 930);
        assert_eq!(parse_clock_time("0").unwrap(), 0);
        assert_eq!(parse_clock_time("14").unwrap(), 1400);
        assert_eq!(parse_clock_time("2:30pm").unwrap(), 1430);
        assert_eq!(parse_clock_time("9am").unwrap(), 900);
        assert_eq!(parse_clock_time("12:30").unwrap(), 1230);
        assert_eq!(parse_clock_time("12:00").unwrap(), 1200);
        assert_eq!(parse_clock_time("0:15").unwrap(), 15);
        assert_eq!(parse_clock_time("14:30").unwrap(), 1430);
        assert_eq!(parse_clock_time("12:30am").unwrap(), 30);

        assert!(parse_clock_time("2500").is_err());
        assert!(parse_clock_time("1275").is_err());
        assert!(parse_clock_time("14:75").is_err());
        assert!(parse_clock_time("later").is_err());
        assert!(parse_clock_time("").is_err());
    }

    #[test]
    fn test_format_time_of_day() {
        assert_eq!(format_time_of_day(1315), "1:15pm");
        assert_eq!(format_time_of_day(900), "9:00am");
        assert_eq!(format_time_of_day(0), "12:00am");
        assert_eq!(format_time_of_day(1200), "12:00pm");
        assert_eq!(format_time_of_day(2400), "2400");
    }
}
