//! # attrition forecast
//!
//! attrition forecasting engine - per-person departure risk spread over a
//! monthly horizon, netted against planned facility openings
//!
//! ## what you get
//!
//! - risk features engineered from raw dates (tenure, age, improvement plans)
//! - a heuristic logistic scorer for "departs within the horizon"
//! - harmonic decay spreading of risk mass across forecast months
//! - a staffing-need calendar netting departures against planned openings
//! - a standalone cox proportional-hazards toolkit: partial-likelihood
//!   fitting, breslow baseline hazard, interpolation/extrapolation
//!
//! ## quick start
//!
//! ```rust
//! use attrition_forecast::{build_attrition_report, Person};
//! use chrono::NaiveDate;
//!
//! # fn main() {
//! let roster = vec![Person {
//!     id: 1,
//!     name: "Alex".into(),
//!     start_date: NaiveDate::from_ymd_opt(2023, 1, 10).unwrap(),
//!     end_date: None,
//!     birth_date: NaiveDate::from_ymd_opt(1990, 5, 2).unwrap(),
//!     location: "Omsk".into(),
//!     facility: "Central".into(),
//!     pip: None,
//! }];
//!
//! let reference = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
//! let report = build_attrition_report(&roster, reference, 12).unwrap();
//! assert_eq!(report.months.len(), 12);
//! assert!(report.leaders[0].cumulative_probability <= 1.0);
//! # }
//! ```
//!
//! everything is a pure function of its inputs plus one explicit reference
//! date - the engine never reads a wall clock

pub mod calendar;
pub mod dates;
pub mod error;
pub mod features;
pub mod metrics;
pub mod report;
pub mod scoring;
pub mod staff;
pub mod survival;

pub use calendar::{build_calendar_forecast, CalendarForecast, CalendarMonthForecast};
pub use error::{ForecastError, Result};
pub use features::{FeatureStats, FeatureVector, RawMetrics, FEATURE_NAMES};
pub use report::{build_attrition_report, AttritionReport, PersonInsight};
pub use scoring::{base_probability, centered_logistic, distribute_probability};
pub use staff::{resolve_horizon, Facility, PerformancePlan, Person, PipStatus};
pub use survival::{BaselinePoint, CoxModel, Sample, SurvivalData, TrainOptions};
