//! evaluation metrics for fitted survival models

use ndarray::ArrayView1;

use crate::error::{ForecastError, Result};
use crate::survival::SurvivalData;

/// Harrell's concordance index - how often do higher risk scores pair
/// with shorter spells? ties in risk count for half
pub fn concordance_index(
    risk_scores: ArrayView1<'_, f64>,
    times: ArrayView1<'_, f64>,
    events: &[bool],
) -> Result<f64> {
    let n = risk_scores.len();
    if n != times.len() || n != events.len() {
        return Err(ForecastError::invalid_dimensions(
            "risk scores, times, and events must have same length",
        ));
    }

    let mut concordant = 0.0;
    let mut discordant = 0.0;
    let mut tied_risk = 0.0;

    for i in 0..n {
        if !events[i] {
            continue; // censored spells don't anchor comparisons
        }

        for j in 0..n {
            if i == j {
                continue;
            }

            // j is comparable to i if j outlasted i (departed or censored later)
            if times[j] > times[i] || (!events[j] && times[j] >= times[i]) {
                if risk_scores[i] > risk_scores[j] {
                    concordant += 1.0;
                } else if risk_scores[i] < risk_scores[j] {
                    discordant += 1.0;
                } else {
                    tied_risk += 1.0;
                }
            }
        }
    }

    let total_pairs = concordant + discordant + tied_risk;
    if total_pairs == 0.0 {
        return Err(ForecastError::numerical_error(
            "no comparable pairs for concordance calc",
        ));
    }

    Ok((concordant + 0.5 * tied_risk) / total_pairs)
}

/// Cox partial log-likelihood of precomputed risk scores, via a
/// numerically stable log-sum-exp over each risk set
pub fn log_partial_likelihood(
    data: &SurvivalData,
    risk_scores: ArrayView1<'_, f64>,
) -> Result<f64> {
    if risk_scores.len() != data.n_samples() {
        return Err(ForecastError::invalid_dimensions(
            "risk scores length must match number of samples",
        ));
    }

    let mut event_times: Vec<f64> = data
        .times()
        .iter()
        .zip(data.events().iter())
        .filter_map(|(time, event)| if *event { Some(*time) } else { None })
        .collect();
    event_times.sort_by(f64::total_cmp);
    event_times.dedup();

    let mut loglik = 0.0;

    for &event_time in &event_times {
        let events_at_time: Vec<usize> = (0..data.n_samples())
            .filter(|&i| data.times()[i] == event_time && data.events()[i])
            .collect();
        let risk_set: Vec<usize> = (0..data.n_samples())
            .filter(|&i| data.times()[i] >= event_time)
            .collect();
        if events_at_time.is_empty() || risk_set.is_empty() {
            continue;
        }

        let max_risk = risk_set
            .iter()
            .map(|&i| risk_scores[i])
            .fold(f64::NEG_INFINITY, f64::max);
        let log_sum_exp = max_risk
            + risk_set
                .iter()
                .map(|&i| (risk_scores[i] - max_risk).exp())
                .sum::<f64>()
                .ln();

        for &event_index in &events_at_time {
            loglik += risk_scores[event_index] - log_sum_exp;
        }
    }

    Ok(loglik)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survival::{CoxModel, Sample, TrainOptions};
    use approx::assert_relative_eq;
    use ndarray::Array1;

    fn build_data() -> (SurvivalData, Array1<f64>) {
        let samples = vec![
            Sample::new(30.0, true, vec![1.0, 0.5]),
            Sample::new(60.0, false, vec![0.0, 1.0]),
            Sample::new(90.0, true, vec![1.0, 0.0]),
            Sample::new(120.0, true, vec![-1.0, 1.0]),
            Sample::new(150.0, false, vec![0.0, -1.0]),
        ];
        let data = SurvivalData::from_samples(&samples).unwrap();
        let risk_scores = Array1::from(vec![0.5, -0.2, 0.8, -0.1, -0.5]);
        (data, risk_scores)
    }

    #[test]
    fn test_concordance_index_bounds() {
        let (data, risk_scores) = build_data();
        let c_index =
            concordance_index(risk_scores.view(), data.times(), data.events()).unwrap();
        assert!((0.0..=1.0).contains(&c_index));
    }

    #[test]
    fn test_perfect_concordance() {
        let times = Array1::from(vec![1.0, 2.0, 3.0, 4.0]);
        let events = vec![true, true, true, true];
        let risk_scores = Array1::from(vec![4.0, 3.0, 2.0, 1.0]);

        let c_index = concordance_index(risk_scores.view(), times.view(), &events).unwrap();
        assert_relative_eq!(c_index, 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_dimension_mismatch_error() {
        let risk_scores = Array1::from(vec![1.0, 2.0]);
        let times = Array1::from(vec![1.0, 2.0, 3.0]);
        let events = vec![true, false];

        assert!(concordance_index(risk_scores.view(), times.view(), &events).is_err());
    }

    #[test]
    fn test_no_comparable_pairs_error() {
        let times = Array1::from(vec![1.0, 2.0]);
        let events = vec![false, false];
        let risk_scores = Array1::from(vec![0.1, 0.2]);

        assert!(concordance_index(risk_scores.view(), times.view(), &events).is_err());
    }

    #[test]
    fn test_log_partial_likelihood_is_finite_and_nonpositive_at_fit() {
        let (data, _) = build_data();
        let model = CoxModel::train(&data, &TrainOptions::default()).unwrap();
        let risk_scores = model.risk_scores(data.covariates()).unwrap();

        let loglik = log_partial_likelihood(&data, risk_scores.view()).unwrap();
        assert!(loglik.is_finite());
        assert!(loglik <= 0.0);
    }

    #[test]
    fn test_log_partial_likelihood_length_check() {
        let (data, _) = build_data();
        let short = Array1::from(vec![0.1, 0.2]);
        assert!(log_partial_likelihood(&data, short.view()).is_err());
    }
}
