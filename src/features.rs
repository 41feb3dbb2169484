//! per-person risk features and the tenure baselines they are measured against

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::dates::{average, months_between, years_between};
use crate::staff::{Person, PipStatus};

/// feature order shared with any downstream model
pub const FEATURE_NAMES: [&str; 8] = [
    "ageYears",
    "tenureYears",
    "pipActive",
    "pipSeverity",
    "tenureVsCompany",
    "tenureVsActive",
    "tenureVsCity",
    "pipOverdue",
];

/// tenure baselines computed once per report over the whole roster
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeatureStats {
    pub company_average_tenure_months: f64,
    pub active_average_tenure_months: f64,
    pub city_average_tenure_months: BTreeMap<String, f64>,
}

impl FeatureStats {
    /// averages over *all* people - departed tenure runs to the end date,
    /// active tenure to `now`; a person's own record counts toward their
    /// location's average
    pub fn compute(persons: &[Person], now: NaiveDate) -> Self {
        let all_tenures: Vec<f64> = persons
            .iter()
            .map(|person| months_between(person.start_date, person.tenure_reference(now)))
            .collect();
        let active_tenures: Vec<f64> = persons
            .iter()
            .filter(|person| person.is_active())
            .map(|person| months_between(person.start_date, now))
            .collect();

        let company_average_tenure_months = average(&all_tenures);
        let active_average_tenure_months = if active_tenures.is_empty() {
            company_average_tenure_months
        } else {
            average(&active_tenures)
        };

        let mut city_totals: BTreeMap<String, (f64, usize)> = BTreeMap::new();
        for person in persons {
            let tenure = months_between(person.start_date, person.tenure_reference(now));
            let entry = city_totals.entry(person.location.clone()).or_insert((0.0, 0));
            entry.0 += tenure;
            entry.1 += 1;
        }
        let city_average_tenure_months = city_totals
            .into_iter()
            .map(|(city, (total, count))| (city, total / count as f64))
            .collect();

        Self {
            company_average_tenure_months,
            active_average_tenure_months,
            city_average_tenure_months,
        }
    }

    /// location average, falling back to the company-wide number for
    /// locations with no recorded tenure
    pub fn city_average(&self, location: &str) -> f64 {
        self.city_average_tenure_months
            .get(location)
            .copied()
            .unwrap_or(self.company_average_tenure_months)
    }
}

/// un-normalized person measurements backing the feature vector
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawMetrics {
    pub tenure_months: f64,
    pub tenure_vs_company_months: f64,
    pub tenure_vs_active_months: f64,
    pub tenure_vs_city_months: f64,
    pub age_years: f64,
    pub pip_success_chance: Option<f64>,
}

/// normalized features in [`FEATURE_NAMES`] order
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeatureVector {
    pub age_years: f64,
    pub tenure_years: f64,
    pub pip_active: f64,
    pub pip_severity: f64,
    pub tenure_vs_company: f64,
    pub tenure_vs_active: f64,
    pub tenure_vs_city: f64,
    pub pip_overdue: f64,
}

impl FeatureVector {
    pub fn as_array(&self) -> [f64; 8] {
        [
            self.age_years,
            self.tenure_years,
            self.pip_active,
            self.pip_severity,
            self.tenure_vs_company,
            self.tenure_vs_active,
            self.tenure_vs_city,
            self.pip_overdue,
        ]
    }
}

/// engineer one person's features against the precomputed baselines
pub fn build_features(
    person: &Person,
    stats: &FeatureStats,
    reference: NaiveDate,
) -> (FeatureVector, RawMetrics) {
    let tenure_months = months_between(person.start_date, reference);
    let tenure_vs_company_months = tenure_months - stats.company_average_tenure_months;
    let tenure_vs_active_months = tenure_months - stats.active_average_tenure_months;
    let tenure_vs_city_months = tenure_months - stats.city_average(&person.location);
    let age_years = years_between(person.birth_date, reference);

    let pip_active = person.pip.is_some();
    let pip_overdue = person.pip_status(reference) == PipStatus::Overdue;
    let pip_success_chance = person.pip_success_chance();
    let pip_severity = if !pip_active {
        0.0
    } else {
        match pip_success_chance {
            Some(chance) => ((100.0 - chance) / 100.0).clamp(0.0, 1.0),
            None => 0.5,
        }
    };

    let vector = FeatureVector {
        age_years: age_years / 10.0,
        tenure_years: tenure_months / 12.0,
        pip_active: if pip_active { 1.0 } else { 0.0 },
        pip_severity,
        tenure_vs_company: tenure_vs_company_months / 12.0,
        tenure_vs_active: tenure_vs_active_months / 12.0,
        tenure_vs_city: tenure_vs_city_months / 12.0,
        pip_overdue: if pip_overdue { 1.0 } else { 0.0 },
    };

    let raw = RawMetrics {
        tenure_months,
        tenure_vs_company_months,
        tenure_vs_active_months,
        tenure_vs_city_months,
        age_years,
        pip_success_chance,
    };

    (vector, raw)
}
