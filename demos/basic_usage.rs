use attrition_forecast::{
    build_attrition_report, build_calendar_forecast, metrics, CoxModel, Facility,
    PerformancePlan, Person, Sample, SurvivalData, TrainOptions,
};
use chrono::NaiveDate;

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("Attrition Forecast - Basic Usage");
    println!("================================\n");

    let reference = ymd(2024, 6, 15);

    let roster = vec![
        Person {
            id: 1,
            name: "Alex".into(),
            start_date: ymd(2019, 3, 1),
            end_date: None,
            birth_date: ymd(1987, 11, 2),
            location: "Omsk".into(),
            facility: "Central".into(),
            pip: None,
        },
        Person {
            id: 2,
            name: "Marina".into(),
            start_date: ymd(2023, 9, 18),
            end_date: None,
            birth_date: ymd(1995, 4, 27),
            location: "Omsk".into(),
            facility: "Riverside".into(),
            pip: Some(PerformancePlan {
                name: "Q2 improvement".into(),
                end_date: Some(ymd(2024, 5, 31)),
                success_chance: Some(35.0),
            }),
        },
        Person {
            id: 3,
            name: "Pavel".into(),
            start_date: ymd(2021, 1, 11),
            end_date: Some(ymd(2023, 12, 1)),
            birth_date: ymd(1990, 7, 7),
            location: "Kazan".into(),
            facility: "Old Town".into(),
            pip: None,
        },
    ];

    let facilities = vec![Facility {
        id: 1,
        name: "North Gate".into(),
        location: "Kazan".into(),
        opening_date: Some(ymd(2024, 8, 10)),
    }];

    // Example 1: per-person attrition report
    println!("Example 1: Attrition Report");
    println!("---------------------------");

    let report = build_attrition_report(&roster, reference, 6).expect("roster is non-empty");
    println!(
        "company average tenure: {:.1} months",
        report.stats.company_average_tenure_months
    );
    for insight in &report.leaders {
        println!(
            "  {:<8} {:<6} tenure {:>5.1}m  pip {:?}  p(depart in 6m) = {:.3}",
            insight.name,
            insight.location,
            insight.current_tenure_months,
            insight.pip_status,
            insight.cumulative_probability
        );
    }
    println!();

    // Example 2: staffing-need calendar
    println!("Example 2: Staffing Calendar");
    println!("----------------------------");

    let forecast =
        build_calendar_forecast(&roster, &facilities, reference, 6).expect("roster is non-empty");
    for month in &forecast.months {
        println!(
            "  {:<10} attrition {:.3}  openings {}  net need {:.3}",
            month.label,
            month.totals.expected_attritions,
            month.totals.planned_openings,
            month.totals.net_leaders_needed
        );
    }
    println!();

    // Example 3: cox survival toolkit on departure spells
    println!("Example 3: Cox Survival Model");
    println!("-----------------------------");

    let spells = vec![
        Sample::new(120.0, true, vec![1.0, 0.2]),
        Sample::new(200.0, true, vec![0.8, -0.1]),
        Sample::new(250.0, false, vec![0.1, 0.4]),
        Sample::new(340.0, true, vec![0.3, 0.9]),
        Sample::new(420.0, false, vec![-0.5, 0.3]),
        Sample::new(500.0, true, vec![-0.8, -0.6]),
        Sample::new(640.0, false, vec![-1.0, 0.1]),
    ];
    let data = SurvivalData::from_samples(&spells)?;
    let model = CoxModel::train(&data, &TrainOptions::default().with_max_iterations(800))
        .expect("spells contain events");

    println!("coefficients: {:?}", model.coefficients().to_vec());
    for horizon_days in [90.0, 180.0, 365.0] {
        println!(
            "  p(depart within {:>3} days | high-risk profile) = {:.3}",
            horizon_days,
            model.probability_between(&[1.0, 0.5], 0.0, horizon_days)
        );
    }

    let risk_scores = model.risk_scores(data.covariates())?;
    let c_index = metrics::concordance_index(risk_scores.view(), data.times(), data.events())?;
    println!("c-index on training spells: {:.3}", c_index);

    Ok(())
}
