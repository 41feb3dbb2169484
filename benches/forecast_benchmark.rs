use attrition_forecast::{
    build_attrition_report, build_calendar_forecast, CoxModel, Facility, Person, Sample,
    SurvivalData, TrainOptions,
};
use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn generate_synthetic_samples(n_samples: usize, n_features: usize) -> Vec<Sample> {
    let mut rng = StdRng::seed_from_u64(42);

    let mut samples = Vec::with_capacity(n_samples);
    for _ in 0..n_samples {
        let features: Vec<f64> = (0..n_features).map(|_| rng.gen_range(-2.0..2.0)).collect();
        let linear_pred: f64 = features.iter().take(3).sum::<f64>() * 0.4;

        let hazard = linear_pred.exp();
        let duration = (rng.gen_range(0.5..2.0) * 120.0 / hazard).max(1.0);
        let censoring = rng.gen_range(30.0..400.0);

        if duration < censoring {
            samples.push(Sample::new(duration, true, features));
        } else {
            samples.push(Sample::new(censoring, false, features));
        }
    }
    samples
}

fn generate_roster(n_persons: usize) -> (Vec<Person>, Vec<Facility>) {
    let mut rng = StdRng::seed_from_u64(7);
    let locations = ["Omsk", "Moscow", "Kazan", "Samara"];

    let persons: Vec<Person> = (0..n_persons)
        .map(|i| {
            let start_offset = rng.gen_range(30i64..2000);
            Person {
                id: i as i64,
                name: format!("person-{i}"),
                start_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
                    - chrono::Days::new(start_offset as u64),
                end_date: None,
                birth_date: NaiveDate::from_ymd_opt(1985, 1, 1).unwrap(),
                location: locations[i % locations.len()].into(),
                facility: format!("facility-{}", i % 7),
                pip: None,
            }
        })
        .collect();

    let facilities: Vec<Facility> = (0..8)
        .map(|i| Facility {
            id: i,
            name: format!("new-facility-{i}"),
            location: locations[i as usize % locations.len()].into(),
            opening_date: NaiveDate::from_ymd_opt(2024, 6, 1)
                .unwrap()
                .checked_add_months(chrono::Months::new(i as u32 % 12)),
        })
        .collect();

    (persons, facilities)
}

fn benchmark_cox_fitting(c: &mut Criterion) {
    let mut group = c.benchmark_group("cox_fitting");

    for &n_samples in [50, 100, 200].iter() {
        for &n_features in [4, 8].iter() {
            group.bench_with_input(
                BenchmarkId::from_parameter(format!("{}x{}", n_samples, n_features)),
                &(n_samples, n_features),
                |b, &(n_samples, n_features)| {
                    let samples = generate_synthetic_samples(n_samples, n_features);
                    let data = SurvivalData::from_samples(&samples).unwrap();
                    let options = TrainOptions::default()
                        .with_max_iterations(100)
                        .with_tolerance(1e-4);
                    b.iter(|| CoxModel::train(black_box(&data), black_box(&options)));
                },
            );
        }
    }
    group.finish();
}

fn benchmark_hazard_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("hazard_queries");

    let samples = generate_synthetic_samples(200, 8);
    let data = SurvivalData::from_samples(&samples).unwrap();
    let model = CoxModel::train(&data, &TrainOptions::default()).unwrap();
    let features = vec![0.5, -0.2, 1.0, 0.0, 0.3, -1.0, 0.8, 0.1];

    group.bench_function("survival_probability", |b| {
        b.iter(|| model.survival_probability(black_box(&features), black_box(365.0)));
    });

    group.bench_function("probability_between", |b| {
        b.iter(|| model.probability_between(black_box(&features), 0.0, 365.0));
    });

    group.finish();
}

fn benchmark_report_building(c: &mut Criterion) {
    let mut group = c.benchmark_group("report_building");
    let reference = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();

    for &n_persons in [50, 200, 1000].iter() {
        let (persons, facilities) = generate_roster(n_persons);

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("attrition_{}_persons", n_persons)),
            &n_persons,
            |b, _| {
                b.iter(|| build_attrition_report(black_box(&persons), reference, 12));
            },
        );

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("calendar_{}_persons", n_persons)),
            &n_persons,
            |b, _| {
                b.iter(|| {
                    build_calendar_forecast(
                        black_box(&persons),
                        black_box(&facilities),
                        reference,
                        12,
                    )
                });
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    benchmark_cox_fitting,
    benchmark_hazard_queries,
    benchmark_report_building
);

criterion_main!(benches);
