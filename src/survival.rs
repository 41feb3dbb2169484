//! cox proportional hazards toolkit - partial-likelihood fitting w/ a
//! breslow baseline, usable standalone or as a replacement for the
//! heuristic scorer once enough departure history exists

use log::debug;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use crate::error::{ForecastError, Result};

/// largest magnitude fed to exp() - keeps risk weights finite
pub const MAX_EXP_ARGUMENT: f64 = 40.0;

/// one observed spell: how long it ran, whether it ended, and the covariates
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub duration_days: f64,
    pub event: bool,
    pub features: Vec<f64>,
}

impl Sample {
    pub fn new(duration_days: f64, event: bool, features: Vec<f64>) -> Self {
        Self { duration_days, event, features }
    }
}

/// packed training set - durations, event flags, and a dense covariate matrix
#[derive(Debug, Clone)]
pub struct SurvivalData {
    times: Array1<f64>,
    events: Vec<bool>,
    covariates: Array2<f64>,
}

impl SurvivalData {
    /// pack raw samples, checking every feature vector has the same width
    /// and every duration is a real number
    pub fn from_samples(samples: &[Sample]) -> Result<Self> {
        let n_samples = samples.len();
        let n_features = samples.first().map_or(0, |sample| sample.features.len());

        for (index, sample) in samples.iter().enumerate() {
            if sample.features.len() != n_features {
                return Err(ForecastError::invalid_dimensions(format!(
                    "sample {} has {} features, expected {}",
                    index,
                    sample.features.len(),
                    n_features
                )));
            }
            if !sample.duration_days.is_finite() {
                return Err(ForecastError::invalid_survival_data(format!(
                    "sample {} has non-finite duration {}",
                    index, sample.duration_days
                )));
            }
        }

        let times = Array1::from_iter(samples.iter().map(|sample| sample.duration_days));
        let events: Vec<bool> = samples.iter().map(|sample| sample.event).collect();
        let mut covariates = Array2::zeros((n_samples, n_features));
        for (i, sample) in samples.iter().enumerate() {
            for (j, value) in sample.features.iter().enumerate() {
                covariates[[i, j]] = *value;
            }
        }

        Ok(Self { times, events, covariates })
    }

    /// how many spells
    pub fn n_samples(&self) -> usize {
        self.times.len()
    }

    /// how many features per spell
    pub fn n_features(&self) -> usize {
        self.covariates.ncols()
    }

    pub fn times(&self) -> ArrayView1<'_, f64> {
        self.times.view()
    }

    /// event indicators (true = departed, false = censored)
    pub fn events(&self) -> &[bool] {
        &self.events
    }

    pub fn covariates(&self) -> ArrayView2<'_, f64> {
        self.covariates.view()
    }

    /// indices of event samples, ordered by ascending duration
    fn event_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.n_samples()).filter(|&i| self.events[i]).collect();
        order.sort_by(|&a, &b| self.times[a].total_cmp(&self.times[b]));
        order
    }
}

/// knobs for the gradient fitter
#[derive(Debug, Clone)]
pub struct TrainOptions {
    pub max_iterations: usize,
    pub learning_rate: f64,
    pub tolerance: f64,
    pub l2_penalty: f64,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            max_iterations: 400,
            learning_rate: 0.01,
            tolerance: 1e-6,
            l2_penalty: 1e-3,
        }
    }
}

impl TrainOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// ridge shrinkage strength
    pub fn with_l2_penalty(mut self, penalty: f64) -> Self {
        self.l2_penalty = penalty.max(0.0);
        self
    }
}

/// one step of the breslow cumulative-hazard curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaselinePoint {
    pub time_days: f64,
    pub cumulative_hazard: f64,
}

/// fitted proportional-hazards model
#[derive(Debug, Clone)]
pub struct CoxModel {
    coefficients: Array1<f64>,
    baseline: Vec<BaselinePoint>,
    tail_hazard_rate: f64,
}

impl CoxModel {
    /// fit by batch gradient ascent on the ridge-penalized partial
    /// log-likelihood, then estimate the breslow baseline. returns None
    /// when there is nothing to fit: no samples, zero-width feature
    /// vectors, or no usable event times (e.g. everyone censored).
    ///
    /// each iteration walks every event's risk set, so the cost is
    /// O(events x average risk-set size) per round - quadratic in the
    /// worst case. acceptable at audit scale; revisit before feeding it
    /// tens of thousands of spells.
    pub fn train(data: &SurvivalData, options: &TrainOptions) -> Option<Self> {
        if data.n_samples() == 0 || data.n_features() == 0 {
            return None;
        }

        let mut coefficients: Array1<f64> = Array1::zeros(data.n_features());

        for iteration in 0..options.max_iterations {
            let (gradient, grad_norm) = compute_gradient(data, &coefficients, options.l2_penalty);
            coefficients = &coefficients + &(options.learning_rate * &gradient);
            if grad_norm < options.tolerance {
                debug!(
                    "cox fit converged after {} iterations (|grad| = {:.3e})",
                    iteration + 1,
                    grad_norm
                );
                break;
            }
        }

        let baseline = compute_baseline(data, &coefficients);
        if baseline.is_empty() {
            return None;
        }
        let tail_hazard_rate = compute_tail_hazard_rate(&baseline);

        Some(Self { coefficients, baseline, tail_hazard_rate })
    }

    /// fitted coefficients (betas)
    pub fn coefficients(&self) -> ArrayView1<'_, f64> {
        self.coefficients.view()
    }

    /// breslow step function, ascending in time with non-decreasing hazard
    pub fn baseline(&self) -> &[BaselinePoint] {
        &self.baseline
    }

    /// slope used to extrapolate past the last observed event time
    pub fn tail_hazard_rate(&self) -> f64 {
        self.tail_hazard_rate
    }

    /// baseline cumulative hazard at `duration_days`: scaled up to the
    /// first knot, interpolated between knots, extrapolated past the last
    pub fn cumulative_hazard(&self, duration_days: f64) -> f64 {
        let first = match self.baseline.first() {
            Some(point) => *point,
            None => return 0.0,
        };

        if duration_days <= first.time_days {
            if first.time_days == 0.0 {
                return first.cumulative_hazard;
            }
            let ratio = (duration_days / first.time_days).clamp(0.0, 1.0);
            return first.cumulative_hazard * ratio;
        }

        for i in (0..self.baseline.len()).rev() {
            let point = self.baseline[i];
            if duration_days < point.time_days {
                continue;
            }
            let next = match self.baseline.get(i + 1) {
                Some(next) => *next,
                None => {
                    let delta = duration_days - point.time_days;
                    return point.cumulative_hazard + delta * self.tail_hazard_rate;
                }
            };
            let interval = next.time_days - point.time_days;
            if interval <= 0.0 {
                return next.cumulative_hazard;
            }
            let ratio = (duration_days - point.time_days) / interval;
            return point.cumulative_hazard + ratio * (next.cumulative_hazard - point.cumulative_hazard);
        }

        self.baseline[self.baseline.len() - 1].cumulative_hazard
    }

    /// S(t | x) = exp(-H0(t) * exp(beta . x))
    pub fn survival_probability(&self, features: &[f64], duration_days: f64) -> f64 {
        let hazard = self.cumulative_hazard(duration_days.max(0.0));
        let linear_predictor = bounded_exp_argument(dot(self.coefficients.view(), features));
        (-hazard * linear_predictor.exp()).exp()
    }

    /// chance the departure lands inside [start, end), clamped into [0, 1];
    /// start is clamped to >= 0 and end to >= start
    pub fn probability_between(
        &self,
        features: &[f64],
        start_duration: f64,
        end_duration: f64,
    ) -> f64 {
        let from = start_duration.max(0.0);
        let to = end_duration.max(from);
        let probability =
            self.survival_probability(features, from) - self.survival_probability(features, to);
        probability.clamp(0.0, 1.0)
    }

    /// linear predictors (beta . x) per row - the ranking scores
    pub fn risk_scores(&self, covariates: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        if covariates.ncols() != self.coefficients.len() {
            return Err(ForecastError::invalid_dimensions(format!(
                "feature count mismatch: expected {}, got {}",
                self.coefficients.len(),
                covariates.ncols()
            )));
        }
        Ok(covariates.dot(&self.coefficients))
    }
}

fn bounded_exp_argument(value: f64) -> f64 {
    value.clamp(-MAX_EXP_ARGUMENT, MAX_EXP_ARGUMENT)
}

/// beta . x, where a short feature slice contributes zeros for the tail
fn dot(coefficients: ArrayView1<'_, f64>, features: &[f64]) -> f64 {
    coefficients
        .iter()
        .zip(features.iter())
        .map(|(coefficient, feature)| coefficient * feature)
        .sum()
}

/// exp(clamp(beta . x)) per sample
fn sample_risks(data: &SurvivalData, coefficients: &Array1<f64>) -> Vec<f64> {
    data.covariates()
        .rows()
        .into_iter()
        .map(|row| bounded_exp_argument(row.dot(coefficients)).exp())
        .collect()
}

fn compute_gradient(
    data: &SurvivalData,
    coefficients: &Array1<f64>,
    l2_penalty: f64,
) -> (Array1<f64>, f64) {
    let n_features = data.n_features();
    let risks = sample_risks(data, coefficients);
    let mut gradient: Array1<f64> = Array1::zeros(n_features);

    for &event_index in &data.event_order() {
        let event_time = data.times()[event_index];
        let risk_set: Vec<usize> = (0..data.n_samples())
            .filter(|&i| data.times()[i] >= event_time)
            .collect();
        let denominator: f64 = risk_set.iter().map(|&i| risks[i]).sum();
        if denominator == 0.0 {
            continue;
        }

        for j in 0..n_features {
            let weighted_feature_sum: f64 = risk_set
                .iter()
                .map(|&i| data.covariates()[[i, j]] * risks[i])
                .sum();
            gradient[j] += data.covariates()[[event_index, j]] - weighted_feature_sum / denominator;
        }
    }

    for j in 0..n_features {
        gradient[j] -= l2_penalty * coefficients[j];
    }

    let grad_norm = gradient.dot(&gradient).sqrt();
    (gradient, grad_norm)
}

/// breslow estimator: per distinct event time, events-at-time over the
/// risk-set weight, accumulated; zero denominators are skipped
fn compute_baseline(data: &SurvivalData, coefficients: &Array1<f64>) -> Vec<BaselinePoint> {
    let risks = sample_risks(data, coefficients);
    let event_order = data.event_order();
    let mut baseline = Vec::new();

    let mut cumulative_hazard = 0.0;
    let mut last_time = f64::NEG_INFINITY;
    for &event_index in &event_order {
        let time = data.times()[event_index];
        if time == last_time {
            continue;
        }
        last_time = time;

        let events_at_time = event_order
            .iter()
            .filter(|&&i| data.times()[i] == time)
            .count();
        let denominator: f64 = (0..data.n_samples())
            .filter(|&i| data.times()[i] >= time)
            .map(|i| risks[i])
            .sum();
        if denominator == 0.0 {
            continue;
        }

        cumulative_hazard += events_at_time as f64 / denominator;
        baseline.push(BaselinePoint { time_days: time, cumulative_hazard });
    }

    baseline
}

fn compute_tail_hazard_rate(baseline: &[BaselinePoint]) -> f64 {
    match baseline {
        [] => 0.0,
        [point] => {
            if point.time_days > 0.0 {
                point.cumulative_hazard / point.time_days
            } else {
                point.cumulative_hazard
            }
        }
        [.., prev, last] => {
            let delta_hazard = last.cumulative_hazard - prev.cumulative_hazard;
            let delta_time = (last.time_days - prev.time_days).max(1.0);
            delta_hazard / delta_time
        }
    }
}
