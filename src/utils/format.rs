const MINUTES_PER_HOUR: f64 = 60.0;
const MINUTES_PER_DAY: f64 = 1440.0;

/// Render a predicted duration in minutes for display.
///
/// Below an hour the minutes are truncated, below a day hours and the
/// remaining minutes are truncated, and anything longer is shown in days
/// rounded to one decimal.
pub fn format_duration(minutes: f64) -> String {
    if minutes < MINUTES_PER_HOUR {
        format!("{} minutes", minutes as i64)
    } else if minutes < MINUTES_PER_DAY {
        let hours = (minutes / MINUTES_PER_HOUR).floor() as i64;
        let rest = (minutes % MINUTES_PER_HOUR) as i64;
        format!("{} hours {} minutes", hours, rest)
    } else {
        format!("{:.1} days", minutes / MINUTES_PER_DAY)
    }
}

pub fn format_km(distance_km: f64) -> String {
    format!("{:.2} km", distance_km)
}

pub fn format_minutes(minutes: f64) -> String {
    format!("{:.2} minutes", minutes)
}
