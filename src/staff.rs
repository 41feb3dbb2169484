//! input records supplied by the hosting service - read-only snapshots

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DEFAULT_HORIZON_MONTHS: u32 = 12;
pub const MIN_HORIZON_MONTHS: u32 = 1;
pub const MAX_HORIZON_MONTHS: u32 = 24;

/// clamp a requested forecast horizon into [1, 24]; absent means 12
pub fn resolve_horizon(requested: Option<i64>) -> u32 {
    match requested {
        Some(value) => {
            value.clamp(MIN_HORIZON_MONTHS as i64, MAX_HORIZON_MONTHS as i64) as u32
        }
        None => DEFAULT_HORIZON_MONTHS,
    }
}

/// performance-improvement plan attached to a person
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PerformancePlan {
    pub name: String,
    /// missing end date means the plan runs indefinitely
    pub end_date: Option<NaiveDate>,
    /// estimated success chance in percent, expected in [0, 100]
    pub success_chance: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PipStatus {
    None,
    Active,
    Overdue,
}

/// one staffing record - absent end date means still active
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: i64,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub birth_date: NaiveDate,
    pub location: String,
    pub facility: String,
    pub pip: Option<PerformancePlan>,
}

impl Person {
    pub fn is_active(&self) -> bool {
        self.end_date.is_none()
    }

    /// tenure runs to the end date for departed people, else to `now`
    pub fn tenure_reference(&self, now: NaiveDate) -> NaiveDate {
        self.end_date.unwrap_or(now)
    }

    /// a plan without an end date stays active, never overdue
    pub fn pip_status(&self, reference: NaiveDate) -> PipStatus {
        match &self.pip {
            None => PipStatus::None,
            Some(plan) => match plan.end_date {
                Some(end) if end < reference => PipStatus::Overdue,
                _ => PipStatus::Active,
            },
        }
    }

    pub fn pip_success_chance(&self) -> Option<f64> {
        self.pip.as_ref().and_then(|plan| plan.success_chance)
    }
}

/// a site that can host staff, possibly not yet open
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Facility {
    pub id: i64,
    pub name: String,
    pub location: String,
    pub opening_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn person_with_pip(end_date: Option<NaiveDate>) -> Person {
        Person {
            id: 1,
            name: "test".into(),
            start_date: ymd(2020, 1, 1),
            end_date: None,
            birth_date: ymd(1990, 1, 1),
            location: "A".into(),
            facility: "Central".into(),
            pip: Some(PerformancePlan {
                name: "plan".into(),
                end_date,
                success_chance: None,
            }),
        }
    }

    #[test]
    fn test_resolve_horizon() {
        assert_eq!(resolve_horizon(None), 12);
        assert_eq!(resolve_horizon(Some(6)), 6);
        assert_eq!(resolve_horizon(Some(0)), 1);
        assert_eq!(resolve_horizon(Some(-3)), 1);
        assert_eq!(resolve_horizon(Some(99)), 24);
    }

    #[test]
    fn test_pip_status_without_plan() {
        let mut person = person_with_pip(None);
        person.pip = None;
        assert_eq!(person.pip_status(ymd(2024, 1, 1)), PipStatus::None);
    }

    #[test]
    fn test_pip_without_end_date_never_goes_overdue() {
        let person = person_with_pip(None);
        assert_eq!(person.pip_status(ymd(2099, 1, 1)), PipStatus::Active);
    }

    #[test]
    fn test_pip_overdue_after_end_date() {
        let person = person_with_pip(Some(ymd(2024, 1, 1)));
        assert_eq!(person.pip_status(ymd(2024, 1, 2)), PipStatus::Overdue);
        // the end date itself is not yet overdue
        assert_eq!(person.pip_status(ymd(2024, 1, 1)), PipStatus::Active);
        assert_eq!(person.pip_status(ymd(2023, 12, 1)), PipStatus::Active);
    }

    #[test]
    fn test_tenure_reference_prefers_end_date() {
        let mut person = person_with_pip(None);
        person.end_date = Some(ymd(2023, 6, 1));
        assert_eq!(person.tenure_reference(ymd(2024, 1, 1)), ymd(2023, 6, 1));
        person.end_date = None;
        assert_eq!(person.tenure_reference(ymd(2024, 1, 1)), ymd(2024, 1, 1));
        assert!(person.is_active());
    }
}
