//! per-person attrition insights rolled up into a location/month report

use std::collections::BTreeMap;

use chrono::{Datelike, Months, NaiveDate};
use log::debug;
use serde::Serialize;

use crate::features::{build_features, FeatureStats, FeatureVector, RawMetrics, FEATURE_NAMES};
use crate::scoring::{base_probability, distribute_probability};
use crate::staff::{Person, PipStatus, MAX_HORIZON_MONTHS, MIN_HORIZON_MONTHS};

/// half-open [start, end) month window inside the forecast horizon
#[derive(Debug, Clone, PartialEq)]
pub struct MonthBucket {
    /// 1-based position in the horizon
    pub index: u32,
    /// "YYYY-MM"
    pub key: String,
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl MonthBucket {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }
}

/// consecutive month windows anchored at the first day of the reference month
pub fn build_month_buckets(reference: NaiveDate, horizon_months: u32) -> Vec<MonthBucket> {
    let start_of_current = reference.with_day(1).unwrap_or(reference);
    (0..horizon_months)
        .map(|i| {
            let start = start_of_current + Months::new(i);
            let end = start_of_current + Months::new(i + 1);
            MonthBucket {
                index: i + 1,
                key: format!("{:04}-{:02}", start.year(), start.month()),
                label: start.format("%b %Y").to_string(),
                start,
                end,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthSummary {
    pub month_index: u32,
    pub month_key: String,
    pub label: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthProbability {
    pub month_index: u32,
    pub month_key: String,
    pub label: String,
    pub probability: f64,
}

/// everything the report knows about one active person
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersonInsight {
    pub person_id: i64,
    pub name: String,
    pub location: String,
    pub facility: String,
    pub age_years: f64,
    pub current_tenure_months: f64,
    pub pip_status: PipStatus,
    pub pip_success_chance: Option<f64>,
    pub feature_values: FeatureVector,
    pub raw_metrics: RawMetrics,
    pub probabilities: Vec<MonthProbability>,
    /// the undistributed horizon-wide departure probability
    pub cumulative_probability: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExpectedAttritionEntry {
    pub location: String,
    pub month_index: u32,
    pub month_key: String,
    pub label: String,
    pub expected_departures: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AttritionReport {
    pub generated_at: NaiveDate,
    pub horizon_months: u32,
    pub feature_names: Vec<String>,
    pub stats: FeatureStats,
    pub months: Vec<MonthSummary>,
    pub leaders: Vec<PersonInsight>,
    pub expected_attritions: Vec<ExpectedAttritionEntry>,
}

/// run the whole per-person pipeline: baselines once, then features ->
/// base probability -> harmonic month spread for every active person.
/// None when there is nobody to score.
pub fn build_attrition_report(
    persons: &[Person],
    reference: NaiveDate,
    horizon_months: u32,
) -> Option<AttritionReport> {
    if persons.is_empty() {
        return None;
    }

    let horizon = horizon_months.clamp(MIN_HORIZON_MONTHS, MAX_HORIZON_MONTHS);
    let stats = FeatureStats::compute(persons, reference);
    let buckets = build_month_buckets(reference, horizon);

    let mut expected: BTreeMap<(String, String), f64> = BTreeMap::new();
    let mut leaders = Vec::new();

    for person in persons.iter().filter(|person| person.is_active()) {
        let (features, raw) = build_features(person, &stats, reference);
        let probability = base_probability(&raw, &stats, person, reference);
        let spread = distribute_probability(probability, buckets.len());

        let probabilities: Vec<MonthProbability> = buckets
            .iter()
            .zip(spread.iter())
            .map(|(bucket, &monthly)| {
                *expected
                    .entry((person.location.clone(), bucket.key.clone()))
                    .or_insert(0.0) += monthly;
                MonthProbability {
                    month_index: bucket.index,
                    month_key: bucket.key.clone(),
                    label: bucket.label.clone(),
                    probability: monthly,
                }
            })
            .collect();

        leaders.push(PersonInsight {
            person_id: person.id,
            name: person.name.clone(),
            location: person.location.clone(),
            facility: person.facility.clone(),
            age_years: raw.age_years,
            current_tenure_months: raw.tenure_months,
            pip_status: person.pip_status(reference),
            pip_success_chance: person.pip_success_chance(),
            feature_values: features,
            raw_metrics: raw,
            probabilities,
            cumulative_probability: probability,
        });
    }

    debug!(
        "scored {} active of {} total people over {} months",
        leaders.len(),
        persons.len(),
        horizon
    );

    let expected_attritions = build_expected_entries(persons, &buckets, &expected);

    Some(AttritionReport {
        generated_at: reference,
        horizon_months: horizon,
        feature_names: FEATURE_NAMES.iter().map(|name| name.to_string()).collect(),
        stats,
        months: buckets
            .iter()
            .map(|bucket| MonthSummary {
                month_index: bucket.index,
                month_key: bucket.key.clone(),
                label: bucket.label.clone(),
                start_date: bucket.start,
                end_date: bucket.end,
            })
            .collect(),
        leaders,
        expected_attritions,
    })
}

/// one row per (location, month) across every location on the roster,
/// zero-filled where no risk mass landed
fn build_expected_entries(
    persons: &[Person],
    buckets: &[MonthBucket],
    expected: &BTreeMap<(String, String), f64>,
) -> Vec<ExpectedAttritionEntry> {
    let mut locations: Vec<String> = persons.iter().map(|person| person.location.clone()).collect();
    locations.sort();
    locations.dedup();

    let mut entries = Vec::with_capacity(locations.len() * buckets.len());
    for location in &locations {
        for bucket in buckets {
            let key = (location.clone(), bucket.key.clone());
            entries.push(ExpectedAttritionEntry {
                location: location.clone(),
                month_index: bucket.index,
                month_key: bucket.key.clone(),
                label: bucket.label.clone(),
                expected_departures: expected.get(&key).copied().unwrap_or(0.0),
            });
        }
    }
    entries
}
