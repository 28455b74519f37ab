use crate::components::room_finder::models::{TimeOfDay, WeekdayTag};
use crate::error::{config_error, BotResult};
use chrono::{DateTime, Datelike, NaiveDateTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

/// Parse time string in HH:MM format
pub fn parse_time(time_str: &str) -> Option<(u32, u32)> {
    let parts: Vec<&str> = time_str.split(':').collect();
    if parts.len() != 2 {
        return None;
    }
    let hour = parts[0].parse::<u32>().ok()?;
    let minute = parts[1].parse::<u32>().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    Some((hour, minute))
}

/// Parse a timezone name such as `America/Los_Angeles`
pub fn parse_timezone(name: &str) -> BotResult<Tz> {
    name.parse::<Tz>()
        .map_err(|_| config_error(&format!("Unknown timezone: {}", name)))
}

/// Schedule day and `HHMM` time of a moment
pub fn day_and_time<T: TimeZone>(moment: &DateTime<T>) -> (WeekdayTag, TimeOfDay) {
    let day = WeekdayTag::from(moment.weekday());
    let time = (moment.hour() * 100 + moment.minute()) as TimeOfDay;
    (day, time)
}

/// Current schedule day and time in `timezone`
pub fn current_day_and_time(timezone: &Tz) -> (WeekdayTag, TimeOfDay) {
    day_and_time(&Utc::now().with_timezone(timezone))
}

/// Next Monday at `time_str`, as wall-clock time in `current_time`'s zone
pub fn next_weekly_time<T: TimeZone>(
    current_time: &DateTime<T>,
    time_str: &str,
) -> Option<NaiveDateTime> {
    let (hour, minute) = parse_time(time_str)?;

    // Calculate days until next Monday
    let days_until_monday = (7 - current_time.weekday().num_days_from_monday()) % 7;

    // Create a datetime for the next Monday at the specified time
    let mut next_time = current_time
        .date_naive()
        .checked_add_signed(chrono::Duration::days(days_until_monday as i64))?
        .and_hms_opt(hour, minute, 0)?;

    // If today is Monday but the time has passed, schedule for next Monday
    if days_until_monday == 0 && current_time.naive_local() >= next_time {
        next_time = next_time.checked_add_signed(chrono::Duration::days(7))?;
    }

    Some(next_time)
}

/// Seconds from `now` until the wall-clock `next_time` in the same zone.
///
/// Falls back to wall-clock difference when `next_time` falls in a DST gap.
pub fn calculate_wait_duration<T: TimeZone>(
    now: &DateTime<T>,
    next_time: &NaiveDateTime,
) -> BotResult<i64> {
    let wait_duration = match now.timezone().from_local_datetime(next_time).earliest() {
        Some(target) => target.signed_duration_since(now.clone()),
        None => next_time.signed_duration_since(now.naive_local()),
    };
    let seconds = wait_duration.num_seconds();

    if seconds <= 0 {
        // Instead of returning an error, we'll set a minimum wait time (1 minute)
        // This handles cases where the time calculation is very close to the scheduled time
        return Ok(60);
    }

    Ok(seconds)
}
