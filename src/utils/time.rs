use chrono::{NaiveDate, NaiveTime, TimeDelta};

/// Minutes from order to pickup, both anchored to the order date.
/// A pickup earlier than the order is taken to happen on the next day.
/// Fractional minutes keep microsecond resolution.
pub fn minutes_to_pickup(order_date: NaiveDate, order_time: NaiveTime, pickup_time: NaiveTime) -> f64 {
    let ordered_at = order_date.and_time(order_time);
    let picked_up_at = order_date.and_time(pickup_time);

    let mut elapsed = picked_up_at.signed_duration_since(ordered_at);
    if elapsed < TimeDelta::zero() {
        elapsed += TimeDelta::days(1);
    }

    match elapsed.num_microseconds() {
        Some(micros) => micros as f64 / 60_000_000.0,
        None => elapsed.num_seconds() as f64 / 60.0,
    }
}
