//! duration helpers over calendar dates - everything clamps to >= 0

use chrono::NaiveDate;

/// fractional-month length used for tenure arithmetic
pub const AVG_DAYS_PER_MONTH: f64 = 30.4375;

/// fractional-year length used for age arithmetic
pub const DAYS_PER_YEAR: f64 = 365.25;

/// whole days from `start` to `end`, never negative
pub fn days_between(start: NaiveDate, end: NaiveDate) -> f64 {
    (end - start).num_days().max(0) as f64
}

/// fractional months (30.4375-day months) from `start` to `end`
pub fn months_between(start: NaiveDate, end: NaiveDate) -> f64 {
    days_between(start, end) / AVG_DAYS_PER_MONTH
}

/// fractional years (365.25-day years) from `start` to `end`
pub fn years_between(start: NaiveDate, end: NaiveDate) -> f64 {
    days_between(start, end) / DAYS_PER_YEAR
}

/// mean of a slice, 0 when empty
pub fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
