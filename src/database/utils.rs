use chrono::{NaiveTime, Timelike};

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Parse a wall-clock "HH:MM" string into minutes since midnight.
pub fn parse_wall_clock(value: &str) -> Result<i64, String> {
    let time = NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| format!("Invalid time: {}", value))?;
    Ok(i64::from(time.hour()) * 60 + i64::from(time.minute()))
}

/// Duration of a shift in minutes. An end before the start is treated as
/// running past midnight (overnight shift), so 22:00-06:00 is 480 minutes.
/// An end equal to the start is a zero-length shift and invalid.
pub fn shift_duration_minutes(start: &str, end: &str) -> Result<i64, String> {
    let start_minutes = parse_wall_clock(start)?;
    let mut end_minutes = parse_wall_clock(end)?;
    if end_minutes < start_minutes {
        end_minutes += MINUTES_PER_DAY;
    }
    let duration = end_minutes - start_minutes;
    if duration == 0 {
        return Err("Invalid time range".to_string());
    }
    Ok(duration)
}

/// Timesheet hours: (end - start - break) / 60 on the same day. Timesheet
/// entries never wrap past midnight; a non-positive result is invalid input.
pub fn timesheet_total_hours(start: &str, end: &str, break_minutes: i64) -> Result<f64, String> {
    let start_minutes = parse_wall_clock(start)?;
    let end_minutes = parse_wall_clock(end)?;
    let worked = end_minutes - start_minutes - break_minutes;
    if worked <= 0 {
        return Err("Invalid time range".to_string());
    }
    Ok(worked as f64 / 60.0)
}
