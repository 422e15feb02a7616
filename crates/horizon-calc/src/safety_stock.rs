//! 統計安全庫存
//!
//! 供給端（績效週期時間）與需求端（逐期預測量）各自取分佈摘要後合併：
//!
//! - 供給項 = 平均需求 × 週期時間標準差
//! - 需求項 = sqrt(平均週期時間 × 需求標準差²)
//! - 建議安全庫存 = z × sqrt(需求項² + 供給項²)，z = norm_inverse(服務水準)
//!
//! 有異常值時一律採用修剪後的平均與標準差。

use chrono::NaiveDate;
use horizon_core::{PlanError, PlanningConfig, PlanningDataSet, Result};
use horizon_stats::{keyed_cycle_times, norm_inverse, summarize, StatisticalSummary};
use rust_decimal::{Decimal, MathematicalOps};
use serde::Serialize;
use std::collections::HashMap;

/// 單一物料的安全庫存建議
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SafetyStockRecommendation {
    pub item_id: String,

    /// 服務水準對應的 z 值
    pub z: Decimal,

    pub supply_component: Decimal,
    pub demand_component: Decimal,

    /// 建議安全庫存（未取整）
    pub recommended: Decimal,

    /// 需求端摘要（逐期預測量）
    pub demand: StatisticalSummary,

    /// 供給端摘要（績效週期時間，天）
    pub supply: StatisticalSummary,
}

/// 統計安全庫存計算器
pub struct SafetyStockCalculator<'a> {
    config: &'a PlanningConfig,
}

impl<'a> SafetyStockCalculator<'a> {
    pub fn new(config: &'a PlanningConfig) -> Self {
        Self { config }
    }

    /// 由兩端摘要推算建議安全庫存
    pub fn recommend(
        item_id: impl Into<String>,
        demand: StatisticalSummary,
        supply: StatisticalSummary,
        service_level: Decimal,
    ) -> Result<SafetyStockRecommendation> {
        let z = norm_inverse(service_level)?;

        let average_demand = demand.effective_average();
        let demand_std_dev = demand.effective_std_dev()?;
        let average_supply = supply.effective_average();
        let supply_std_dev = supply.effective_std_dev()?;

        let supply_component = product(average_demand, supply_std_dev)?;
        let demand_variance = product(average_supply, product(demand_std_dev, demand_std_dev)?)?;
        let demand_component = sqrt(demand_variance)?;
        let combined = product(demand_component, demand_component)?
            .checked_add(product(supply_component, supply_component)?)
            .ok_or_else(|| PlanError::UndefinedStatistic("合併變異數超出數值範圍".to_string()))?;
        let recommended = product(z, sqrt(combined)?)?;

        Ok(SafetyStockRecommendation {
            item_id: item_id.into(),
            z,
            supply_component,
            demand_component,
            recommended,
            demand,
            supply,
        })
    }

    /// 單一物料：由完工日期與逐期預測推算
    pub fn for_item(
        &self,
        item_id: &str,
        completions: &[NaiveDate],
        demand: &[(String, Decimal)],
    ) -> Result<SafetyStockRecommendation> {
        let cycles = keyed_cycle_times(completions, self.config.min_cycle_gap_days);
        if cycles.is_empty() {
            return Err(PlanError::UndefinedStatistic(format!(
                "物料 {} 沒有績效週期樣本（完工 {} 筆）",
                item_id,
                completions.len()
            )));
        }

        let supply = summarize(&cycles, self.config.outlier_z)?;
        let demand = summarize(demand, self.config.outlier_z)?;
        Self::recommend(item_id, demand, supply, self.config.service_level)
    }

    /// 有完工紀錄的全部物料（資料集物料順序）
    ///
    /// 每個物料各自成功或失敗，由呼叫端決定失敗如何回報。
    pub fn calculate(&self, dataset: &PlanningDataSet) -> Vec<(String, Result<SafetyStockRecommendation>)> {
        let forecast = dataset.forecast_by_item();

        dataset
            .items
            .iter()
            .filter_map(|item| {
                let completions = dataset.completion_dates(&item.item_id);
                if completions.is_empty() {
                    return None;
                }
                let demand = forecast
                    .get(&item.item_id)
                    .map(Vec::as_slice)
                    .unwrap_or(&[]);
                Some((
                    item.item_id.clone(),
                    self.for_item(&item.item_id, &completions, demand),
                ))
            })
            .collect()
    }

    /// 成功的建議量，依物料索引
    pub fn recommended_levels(recommendations: &[SafetyStockRecommendation]) -> HashMap<String, Decimal> {
        recommendations
            .iter()
            .map(|r| (r.item_id.clone(), r.recommended))
            .collect()
    }
}

fn product(a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_mul(b)
        .ok_or_else(|| PlanError::UndefinedStatistic(format!("{} × {} 超出數值範圍", a, b)))
}

fn sqrt(value: Decimal) -> Result<Decimal> {
    value
        .sqrt()
        .ok_or_else(|| PlanError::UndefinedStatistic(format!("無法對 {} 開根號", value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_core::{Calendar, CompletionEntry, ForecastEntry, Item, Period, PlanningStrategy};

    fn d(value: i64) -> Decimal {
        Decimal::from(value)
    }

    fn keyed(values: &[i64]) -> Vec<(String, Decimal)> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| (format!("k{}", i), d(*v)))
            .collect()
    }

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, n).unwrap()
    }

    fn close_to(actual: Decimal, expected: Decimal) -> bool {
        (actual - expected).abs() < Decimal::new(1, 2)
    }

    #[test]
    fn test_recommend_combined_uncertainty() {
        let demand = summarize(&keyed(&[100, 120, 80, 100]), d(3)).unwrap();
        let supply = summarize(&keyed(&[5, 7, 6]), d(3)).unwrap();

        let rec = SafetyStockCalculator::recommend("FG", demand, supply, Decimal::new(985, 3)).unwrap();

        // 供給項 100 × 1；需求項 sqrt(6 × 800/3) = 40
        assert_eq!(rec.z, Decimal::new(217, 2));
        assert!(close_to(rec.supply_component, d(100)));
        assert!(close_to(rec.demand_component, d(40)));
        // 2.17 × sqrt(11600) ≈ 233.72
        assert!(close_to(rec.recommended, Decimal::new(23372, 2)));
    }

    #[test]
    fn test_recommend_out_of_range() {
        // 平均需求 10^15 × 供給標準差 1 → 平方超出 Decimal 上限
        let base = 1_000_000_000_000_000;
        let demand = summarize(&keyed(&[base, base + 2, base - 2, base]), d(3)).unwrap();
        let supply = summarize(&keyed(&[5, 7, 6]), d(3)).unwrap();

        let result = SafetyStockCalculator::recommend("FG", demand, supply, Decimal::new(985, 3));

        assert!(matches!(result, Err(PlanError::UndefinedStatistic(_))));
    }

    #[test]
    fn test_min_cycle_gap_override() {
        // 間隔 2、7、2、8
        let completions = [day(1), day(3), day(10), day(12), day(20)];
        let demand = keyed(&[100, 120, 80, 100]);

        let default_config = PlanningConfig::default();
        let rec = SafetyStockCalculator::new(&default_config)
            .for_item("FG", &completions, &demand)
            .unwrap();
        assert_eq!(rec.supply.count, 4);
        assert_eq!(rec.supply.average, Decimal::new(475, 2));

        // 2 天的間隔改視為同一週期的延續
        let config = PlanningConfig::default().with_min_cycle_gap_days(2);
        let rec = SafetyStockCalculator::new(&config)
            .for_item("FG", &completions, &demand)
            .unwrap();
        assert_eq!(rec.supply.count, 2);
        assert_eq!(rec.supply.average, Decimal::new(75, 1));
    }

    #[test]
    fn test_single_cycle_is_undefined() {
        let config = PlanningConfig::default();
        let calculator = SafetyStockCalculator::new(&config);

        // 只有一個週期 → 樣本標準差未定義
        let result = calculator.for_item("FG", &[day(1), day(8)], &keyed(&[10, 20, 30]));

        assert!(matches!(result, Err(PlanError::UndefinedStatistic(_))));
    }

    #[test]
    fn test_no_cycles() {
        let config = PlanningConfig::default();
        let calculator = SafetyStockCalculator::new(&config);

        let result = calculator.for_item("FG", &[day(1), day(2)], &keyed(&[10, 20]));

        assert!(matches!(result, Err(PlanError::UndefinedStatistic(_))));
    }

    #[test]
    fn test_calculate_from_dataset() {
        let calendar = Calendar::new(
            (1..=4).map(|i| Period::new(format!("M{}", i), 30)).collect(),
        )
        .unwrap();
        let dataset = PlanningDataSet::new(calendar)
            .with_items(vec![
                Item::new("FG", PlanningStrategy::ReactiveFast),
                Item::new("NO-HISTORY", PlanningStrategy::ReactiveFast),
            ])
            .with_forecast(vec![
                ForecastEntry::new("FG", "M1", d(100)),
                ForecastEntry::new("FG", "M2", d(120)),
                ForecastEntry::new("FG", "M3", d(80)),
                ForecastEntry::new("FG", "M4", d(100)),
            ])
            .with_completions(
                // 間隔 5、1（延續）、7、6
                [1, 6, 7, 14, 20]
                    .iter()
                    .map(|n| CompletionEntry::new("FG", day(*n), d(50)))
                    .collect(),
            );

        let config = PlanningConfig::default();
        let results = SafetyStockCalculator::new(&config).calculate(&dataset);

        assert_eq!(results.len(), 1);
        let (item_id, rec) = &results[0];
        assert_eq!(item_id, "FG");
        let rec = rec.as_ref().unwrap();
        assert_eq!(rec.supply.count, 3);
        assert_eq!(rec.demand.count, 4);
        assert!(close_to(rec.recommended, Decimal::new(23372, 2)));

        let levels = SafetyStockCalculator::recommended_levels(&[rec.clone()]);
        assert_eq!(levels.get("FG"), Some(&rec.recommended));
    }
}
