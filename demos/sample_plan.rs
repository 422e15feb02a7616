//! 水平計劃示例
//!
//! 執行：`RUST_LOG=debug cargo run --example sample_plan`

use horizon::{
    Calendar, CompletionEntry, ConstraintEntry, Decimal, ForecastEntry, Item, NaiveDate, Period,
    PlanRow, PlanningCalculator, PlanningConfig, PlanningDataSet, PlanningStrategy,
    RequirementEntry, Resource, Verbosity,
};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(false).init();

    println!("=== 水平計劃示例 ===\n");

    let dataset = sample_dataset()?;
    let config = PlanningConfig::default().with_verbosity(Verbosity::Verbose);
    let result = PlanningCalculator::new(config).calculate(&dataset)?;

    for plan in &result.horizontal_plans {
        println!("物料 {}", plan.item_id);
        print!("{:<22}", "");
        for period in &plan.periods {
            print!("{:>10}", period);
        }
        println!();
        for row in PlanRow::ALL {
            print!("{:<22}", row.label());
            for value in plan.row(row) {
                print!("{:>10}", value.round_dp(2));
            }
            println!();
        }
        println!();
    }

    println!("稼動率（RYG）:");
    println!("{}", serde_json::to_string_pretty(&result.utilization)?);

    for rec in &result.safety_stock {
        println!(
            "\n物料 {} 統計安全庫存建議: {}（z = {}）",
            rec.item_id,
            rec.recommended.round_dp(1),
            rec.z
        );
    }

    for warning in &result.warnings {
        println!("[{:?}] {}: {}", warning.severity, warning.item_id, warning.message);
    }

    Ok(())
}

fn sample_dataset() -> anyhow::Result<PlanningDataSet> {
    let months = ["2025-01", "2025-02", "2025-03", "2025-04", "2025-05", "2025-06"];
    let calendar = Calendar::new(months.iter().map(|m| Period::new(*m, 30)).collect())?;

    let forecast = [6000, 6500, 5900, 6800, 9000, 9400]
        .iter()
        .zip(months)
        .map(|(qty, month)| ForecastEntry::new("FG-100", month, Decimal::from(*qty)))
        .chain(
            [400, 420, 380, 410, 500, 450]
                .iter()
                .zip(months)
                .map(|(qty, month)| ForecastEntry::new("FG-200", month, Decimal::from(*qty))),
        )
        .collect();

    let constraints = months
        .iter()
        .map(|month| ConstraintEntry::new("PRESS-01", *month, Decimal::from(2400)))
        .collect();

    let completions = [(1, 3), (1, 4), (1, 12), (1, 19), (1, 27), (2, 3), (2, 10)]
        .iter()
        .filter_map(|(m, d)| NaiveDate::from_ymd_opt(2024, *m, *d))
        .map(|date| CompletionEntry::new("FG-200", date, Decimal::from(120)))
        .collect();

    Ok(PlanningDataSet::new(calendar)
        .with_items(vec![
            Item::new("FG-100", PlanningStrategy::ReactiveFast)
                .with_description("成品 100")
                .with_fixed_order_qty(Decimal::from(2772))
                .with_on_hand_qty(Decimal::from(13000)),
            Item::new("FG-200", PlanningStrategy::ReactiveSlow)
                .with_description("成品 200")
                .with_fixed_order_qty(Decimal::from(300))
                .with_on_hand_qty(Decimal::from(-40)),
        ])
        .with_resources(vec![
            Resource::new("PRESS-01").with_description("沖壓線"),
            Resource::new("PACK-01").with_description("包裝線"),
        ])
        .with_forecast(forecast)
        .with_requirements(vec![
            RequirementEntry::new("PRESS-01", "FG-100", Decimal::new(25, 2)),
            RequirementEntry::new("PRESS-01", "FG-200", Decimal::new(150, 2)),
            RequirementEntry::new("PACK-01", "FG-100", Decimal::new(5, 2)),
        ])
        .with_constraints(constraints)
        .with_completions(completions))
}
