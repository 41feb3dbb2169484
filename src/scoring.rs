//! heuristic departure scoring and the harmonic month spread

use chrono::NaiveDate;

use crate::features::{FeatureStats, RawMetrics};
use crate::staff::{Person, PipStatus};

/// squash into [0, 1]
pub fn clamp_probability(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// sigmoid(delta/scale) - 0.5, so sitting exactly on the average maps to 0;
/// range is (-0.5, 0.5), and a non-positive scale yields 0
pub fn centered_logistic(delta_months: f64, scale_months: f64) -> f64 {
    if scale_months <= 0.0 {
        return 0.0;
    }
    let normalized = delta_months / scale_months;
    1.0 / (1.0 + (-normalized).exp()) - 0.5
}

/// departure pressure contributed by an improvement plan
pub fn pip_risk_factor(person: &Person, reference: NaiveDate) -> f64 {
    let Some(plan) = &person.pip else {
        return 0.0;
    };

    if let Some(chance) = plan.success_chance {
        let inverse = 1.0 - chance.clamp(0.0, 100.0) / 100.0;
        if inverse <= 0.0 {
            return 0.0;
        }
        return 0.2 + 0.8 * inverse;
    }

    match person.pip_status(reference) {
        PipStatus::Overdue => 0.8,
        _ => 0.4,
    }
}

/// probability of departure at some point inside the forecast horizon
pub fn base_probability(
    raw: &RawMetrics,
    stats: &FeatureStats,
    person: &Person,
    reference: NaiveDate,
) -> f64 {
    let tenure_component = centered_logistic(
        raw.tenure_months - stats.company_average_tenure_months,
        (stats.company_average_tenure_months / 2.0).max(6.0),
    );
    let city_component = centered_logistic(raw.tenure_vs_city_months, 6.0);
    let active_component = centered_logistic(raw.tenure_vs_active_months, 6.0);
    let pip_component = pip_risk_factor(person, reference);

    let base_score = 0.5
        + 0.4 * tenure_component
        + 0.2 * city_component
        + 0.2 * active_component
        + 0.2 * pip_component;

    clamp_probability(base_score)
}

/// spread a horizon-wide probability over month buckets with harmonic
/// decay weights 1/(i+1); the pieces sum back to `total` exactly
pub fn distribute_probability(total: f64, bucket_count: usize) -> Vec<f64> {
    if bucket_count == 0 || total <= 0.0 {
        return vec![0.0; bucket_count];
    }
    let weights: Vec<f64> = (0..bucket_count).map(|i| 1.0 / (i as f64 + 1.0)).collect();
    let weight_sum: f64 = weights.iter().sum();
    weights
        .into_iter()
        .map(|weight| total * weight / weight_sum)
        .collect()
}
