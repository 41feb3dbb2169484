//! net staffing-need calendar: expected departures vs planned openings

use std::collections::BTreeMap;

use chrono::NaiveDate;
use log::debug;
use serde::Serialize;

use crate::report::{build_attrition_report, MonthBucket};
use crate::staff::{Facility, Person};

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LocationBreakdown {
    pub location: String,
    pub expected_attritions: f64,
    pub planned_openings: u32,
    /// departures to backfill plus new sites to staff
    pub net_leaders_needed: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CalendarTotals {
    pub expected_attritions: f64,
    pub planned_openings: u32,
    pub net_leaders_needed: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarMonthForecast {
    pub month_index: u32,
    pub month_key: String,
    pub label: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub cities: Vec<LocationBreakdown>,
    pub totals: CalendarTotals,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarMetadata {
    pub cities: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarForecast {
    pub generated_at: NaiveDate,
    pub horizon_months: u32,
    pub months: Vec<CalendarMonthForecast>,
    pub metadata: CalendarMetadata,
}

/// merge the attrition report with planned facility openings into a
/// month-by-month staffing-need calendar. None when there is no roster.
pub fn build_calendar_forecast(
    persons: &[Person],
    facilities: &[Facility],
    reference: NaiveDate,
    horizon_months: u32,
) -> Option<CalendarForecast> {
    let report = build_attrition_report(persons, reference, horizon_months)?;

    let buckets: Vec<MonthBucket> = report
        .months
        .iter()
        .map(|month| MonthBucket {
            index: month.month_index,
            key: month.month_key.clone(),
            label: month.label.clone(),
            start: month.start_date,
            end: month.end_date,
        })
        .collect();

    let mut locations: Vec<String> = report
        .expected_attritions
        .iter()
        .map(|entry| entry.location.clone())
        .chain(facilities.iter().map(|facility| facility.location.clone()))
        .collect();
    locations.sort();
    locations.dedup();

    let mut expected: BTreeMap<(String, String), f64> = BTreeMap::new();
    for entry in &report.expected_attritions {
        expected.insert(
            (entry.location.clone(), entry.month_key.clone()),
            entry.expected_departures,
        );
    }

    let openings = aggregate_openings(facilities, &buckets);
    debug!(
        "calendar covers {} locations and {} planned openings",
        locations.len(),
        openings.values().sum::<u32>()
    );

    let months = buckets
        .iter()
        .map(|bucket| {
            let mut totals = CalendarTotals::default();
            let cities: Vec<LocationBreakdown> = locations
                .iter()
                .map(|location| {
                    let key = (location.clone(), bucket.key.clone());
                    let expected_attritions = expected.get(&key).copied().unwrap_or(0.0);
                    let planned_openings = openings.get(&key).copied().unwrap_or(0);
                    let net_leaders_needed = expected_attritions + planned_openings as f64;

                    totals.expected_attritions += expected_attritions;
                    totals.planned_openings += planned_openings;
                    totals.net_leaders_needed += net_leaders_needed;

                    LocationBreakdown {
                        location: location.clone(),
                        expected_attritions,
                        planned_openings,
                        net_leaders_needed,
                    }
                })
                .collect();

            CalendarMonthForecast {
                month_index: bucket.index,
                month_key: bucket.key.clone(),
                label: bucket.label.clone(),
                start_date: bucket.start,
                end_date: bucket.end,
                cities,
                totals,
            }
        })
        .collect();

    Some(CalendarForecast {
        generated_at: report.generated_at,
        horizon_months: report.horizon_months,
        months,
        metadata: CalendarMetadata { cities: locations },
    })
}

/// count planned openings per (location, month window); facilities with
/// no opening date or a date outside the horizon are ignored
fn aggregate_openings(
    facilities: &[Facility],
    buckets: &[MonthBucket],
) -> BTreeMap<(String, String), u32> {
    let mut openings = BTreeMap::new();
    for facility in facilities {
        let Some(opening_date) = facility.opening_date else {
            continue;
        };
        let Some(bucket) = buckets.iter().find(|bucket| bucket.contains(opening_date)) else {
            continue;
        };
        *openings
            .entry((facility.location.clone(), bucket.key.clone()))
            .or_insert(0) += 1;
    }
    openings
}
