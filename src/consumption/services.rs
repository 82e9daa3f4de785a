use time::{Date, Duration, OffsetDateTime};

/// The calendar date used for "today". Timestamps are stored in UTC, so the
/// day boundary uses the same clock.
pub fn today_utc() -> Date {
    OffsetDateTime::now_utc().date()
}

/// Percentage of the daily limit, rounded to two decimals. A non-positive
/// limit maps to zero instead of dividing by it.
pub fn percentage_of_limit(total_mg: i64, limit_mg: i64) -> f64 {
    if limit_mg <= 0 {
        return 0.0;
    }
    let pct = total_mg as f64 / limit_mg as f64 * 100.0;
    (pct * 100.0).round() / 100.0
}

/// Milligrams left under the limit today, clamped at zero.
pub fn remaining_mg(limit_mg: i64, total_mg: i64) -> i64 {
    (limit_mg - total_mg).max(0)
}

/// The 7 calendar dates ending at `today` (inclusive), most recent first.
pub fn trailing_week(today: Date) -> Vec<Date> {
    (0..7).map(|i| today - Duration::days(i)).collect()
}
