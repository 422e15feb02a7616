//! 計劃資料集與矩陣轉接
//!
//! 匯入端交付的扁平紀錄在此驗證，並轉成各計劃元件需要的矩陣。

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::calendar::Calendar;
use crate::demand::{CompletionEntry, ForecastEntry};
use crate::item::Item;
use crate::matrix::Matrix;
use crate::record::{to_records, Record};
use crate::resource::{ConstraintEntry, RequirementEntry, Resource};
use crate::{PlanError, Result};

/// 計劃資料集（一次計劃執行期間唯讀）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanningDataSet {
    pub items: Vec<Item>,
    pub resources: Vec<Resource>,
    pub calendar: Calendar,
    pub forecast: Vec<ForecastEntry>,
    pub requirements: Vec<RequirementEntry>,
    pub constraints: Vec<ConstraintEntry>,
    pub completions: Vec<CompletionEntry>,
}

impl PlanningDataSet {
    pub fn new(calendar: Calendar) -> Self {
        Self {
            calendar,
            ..Self::default()
        }
    }

    /// 建構器模式：設置物料
    pub fn with_items(mut self, items: Vec<Item>) -> Self {
        self.items = items;
        self
    }

    /// 建構器模式：設置資源
    pub fn with_resources(mut self, resources: Vec<Resource>) -> Self {
        self.resources = resources;
        self
    }

    /// 建構器模式：設置銷售預測
    pub fn with_forecast(mut self, forecast: Vec<ForecastEntry>) -> Self {
        self.forecast = forecast;
        self
    }

    /// 建構器模式：設置資源需求
    pub fn with_requirements(mut self, requirements: Vec<RequirementEntry>) -> Self {
        self.requirements = requirements;
        self
    }

    /// 建構器模式：設置產能約束
    pub fn with_constraints(mut self, constraints: Vec<ConstraintEntry>) -> Self {
        self.constraints = constraints;
        self
    }

    /// 建構器模式：設置完工紀錄
    pub fn with_completions(mut self, completions: Vec<CompletionEntry>) -> Self {
        self.completions = completions;
        self
    }

    /// 驗證識別碼唯一性、參照完整性與數值範圍
    pub fn validate(&self) -> Result<()> {
        let item_ids = unique_ids("物料", self.items.iter().map(|i| i.item_id.as_str()))?;
        let resource_ids =
            unique_ids("資源", self.resources.iter().map(|r| r.resource_id.as_str()))?;
        unique_ids(
            "期間",
            self.calendar.periods().iter().map(|p| p.period_id.as_str()),
        )?;

        for item in &self.items {
            if item.fixed_order_qty < Decimal::ZERO {
                return Err(PlanError::InvalidValue(format!(
                    "物料 {} 的固定訂購量不可為負: {}",
                    item.item_id, item.fixed_order_qty
                )));
            }
        }

        for period in self.calendar.periods() {
            if period.days == 0 {
                return Err(PlanError::InvalidValue(format!(
                    "期間 {} 的天數必須大於 0",
                    period.period_id
                )));
            }
        }

        for entry in &self.forecast {
            require(&item_ids, "物料", &entry.item_id)?;
            self.require_period(&entry.period_id)?;
        }

        for entry in &self.requirements {
            require(&resource_ids, "資源", &entry.resource_id)?;
            require(&item_ids, "物料", &entry.item_id)?;
            if entry.hours_per_unit < Decimal::ZERO {
                return Err(PlanError::InvalidValue(format!(
                    "資源需求 {}/{} 的單位工時不可為負",
                    entry.resource_id, entry.item_id
                )));
            }
        }

        for entry in &self.constraints {
            require(&resource_ids, "資源", &entry.resource_id)?;
            self.require_period(&entry.period_id)?;
            if entry.available_hours < Decimal::ZERO {
                return Err(PlanError::InvalidValue(format!(
                    "產能約束 {}/{} 的可用工時不可為負",
                    entry.resource_id, entry.period_id
                )));
            }
        }

        for entry in &self.completions {
            require(&item_ids, "物料", &entry.item_id)?;
        }

        Ok(())
    }

    fn require_period(&self, period_id: &str) -> Result<()> {
        if self.calendar.contains(period_id) {
            Ok(())
        } else {
            Err(PlanError::unknown("期間", period_id))
        }
    }

    pub fn item(&self, item_id: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.item_id == item_id)
    }

    pub fn forecast_records(&self) -> Vec<Record> {
        to_records(&self.forecast)
    }

    pub fn requirement_records(&self) -> Vec<Record> {
        to_records(&self.requirements)
    }

    pub fn constraint_records(&self) -> Vec<Record> {
        to_records(&self.constraints)
    }

    /// 銷售預測矩陣：物料 × 期間
    ///
    /// 列為全部物料（資料集順序），欄為日曆期間（時間順序）。
    pub fn forecast_matrix(&self) -> Result<Matrix> {
        Matrix::zeros(
            self.items.iter().map(|i| i.item_id.clone()),
            self.calendar.period_ids(),
        )
        .accumulate(&self.forecast_records(), "item", "period", "quantity")
    }

    /// 資源需求矩陣：資源 × 物料
    ///
    /// 欄先宣告 `items`，需求紀錄中出現的其他物料接在後面。
    pub fn requirements_matrix(&self, items: &[String]) -> Result<Matrix> {
        Matrix::zeros(Vec::<String>::new(), items.iter().cloned()).accumulate(
            &self.requirement_records(),
            "resource",
            "item",
            "hours",
        )
    }

    /// 產能矩陣：受約束資源 × 期間
    ///
    /// 欄為全部日曆期間；沒有約束紀錄的期間產能為 0。
    pub fn constraints_matrix(&self) -> Result<Matrix> {
        Matrix::zeros(Vec::<String>::new(), self.calendar.period_ids()).accumulate(
            &self.constraint_records(),
            "resource",
            "period",
            "hours",
        )
    }

    /// 受約束的資源（首次出現順序）
    pub fn constrained_resources(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.constraints
            .iter()
            .filter(|c| seen.insert(c.resource_id.as_str()))
            .map(|c| c.resource_id.clone())
            .collect()
    }

    /// 物料的完工日期（依資料順序）
    pub fn completion_dates(&self, item_id: &str) -> Vec<NaiveDate> {
        self.completions
            .iter()
            .filter(|c| c.item_id == item_id)
            .map(|c| c.completed_on)
            .collect()
    }

    /// 依物料分組的逐期預測（日曆順序，缺漏期間為 0）
    pub fn forecast_by_item(&self) -> HashMap<String, Vec<(String, Decimal)>> {
        let mut grouped: HashMap<String, HashMap<&str, Decimal>> = HashMap::new();
        for entry in &self.forecast {
            *grouped
                .entry(entry.item_id.clone())
                .or_default()
                .entry(entry.period_id.as_str())
                .or_insert(Decimal::ZERO) += entry.quantity;
        }

        grouped
            .into_iter()
            .map(|(item_id, by_period)| {
                let series = self
                    .calendar
                    .periods()
                    .iter()
                    .map(|p| {
                        let qty = by_period
                            .get(p.period_id.as_str())
                            .copied()
                            .unwrap_or(Decimal::ZERO);
                        (p.period_id.clone(), qty)
                    })
                    .collect();
                (item_id, series)
            })
            .collect()
    }
}

fn unique_ids<'a>(kind: &str, ids: impl Iterator<Item = &'a str>) -> Result<HashSet<&'a str>> {
    let mut set = HashSet::new();
    for id in ids {
        if !set.insert(id) {
            return Err(PlanError::DuplicateKey {
                kind: kind.to_string(),
                key: id.to_string(),
            });
        }
    }
    Ok(set)
}

fn require(ids: &HashSet<&str>, kind: &str, key: &str) -> Result<()> {
    if ids.contains(key) {
        Ok(())
    } else {
        Err(PlanError::unknown(kind, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::Period;
    use crate::item::PlanningStrategy;

    fn d(value: i64) -> Decimal {
        Decimal::from(value)
    }

    fn sample() -> PlanningDataSet {
        let calendar = Calendar::new(vec![
            Period::new("P1", 30),
            Period::new("P2", 30),
            Period::new("P3", 30),
        ])
        .unwrap();

        PlanningDataSet::new(calendar)
            .with_items(vec![
                Item::new("A", PlanningStrategy::ReactiveFast),
                Item::new("B", PlanningStrategy::None),
            ])
            .with_resources(vec![Resource::new("R1"), Resource::new("R2")])
            .with_forecast(vec![
                ForecastEntry::new("A", "P2", d(100)),
                ForecastEntry::new("A", "P2", d(20)),
                ForecastEntry::new("B", "P1", d(50)),
            ])
            .with_requirements(vec![
                RequirementEntry::new("R1", "A", d(2)),
                RequirementEntry::new("R2", "B", d(1)),
            ])
            .with_constraints(vec![
                ConstraintEntry::new("R1", "P1", d(100)),
                ConstraintEntry::new("R1", "P3", d(80)),
            ])
    }

    #[test]
    fn test_validate_ok() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_validate_unknown_references() {
        let mut dataset = sample();
        dataset.forecast.push(ForecastEntry::new("Z", "P1", d(1)));
        assert!(matches!(
            dataset.validate(),
            Err(PlanError::UnknownReference { .. })
        ));

        let mut dataset = sample();
        dataset.constraints.push(ConstraintEntry::new("R1", "P9", d(1)));
        assert!(matches!(
            dataset.validate(),
            Err(PlanError::UnknownReference { .. })
        ));
    }

    #[test]
    fn test_validate_duplicates_and_values() {
        let mut dataset = sample();
        dataset.items.push(Item::new("A", PlanningStrategy::None));
        assert!(matches!(dataset.validate(), Err(PlanError::DuplicateKey { .. })));

        let mut dataset = sample();
        dataset.items[0].fixed_order_qty = d(-1);
        assert!(matches!(dataset.validate(), Err(PlanError::InvalidValue(_))));

        let dataset = PlanningDataSet::new(Calendar::new(vec![Period::new("P0", 0)]).unwrap());
        assert!(matches!(dataset.validate(), Err(PlanError::InvalidValue(_))));
    }

    #[test]
    fn test_deserialize_rejects_duplicate_periods() {
        let mut value = serde_json::to_value(sample()).unwrap();
        let periods = value["calendar"]["periods"].as_array_mut().unwrap();
        let first = periods[0].clone();
        periods.push(first);

        let err = serde_json::from_value::<PlanningDataSet>(value).unwrap_err();
        assert!(err.to_string().contains("P1"));

        let dataset: PlanningDataSet =
            serde_json::from_value(serde_json::to_value(sample()).unwrap()).unwrap();
        assert!(dataset.validate().is_ok());
        assert_eq!(dataset.calendar.position("P3"), Some(2));
    }

    #[test]
    fn test_forecast_matrix_is_complete() {
        let matrix = sample().forecast_matrix().unwrap();

        assert_eq!(matrix.rows(), ["A", "B"]);
        assert_eq!(matrix.columns(), ["P1", "P2", "P3"]);
        assert!(matrix.is_complete());
        assert_eq!(matrix.get("A", "P2"), Some(d(120)));
        assert_eq!(matrix.get("A", "P1"), Some(Decimal::ZERO));
        assert_eq!(matrix.total().unwrap(), d(170));
    }

    #[test]
    fn test_requirements_matrix_declares_items() {
        let matrix = sample()
            .requirements_matrix(&["B".to_string(), "A".to_string()])
            .unwrap();

        assert_eq!(matrix.rows(), ["R1", "R2"]);
        assert_eq!(matrix.columns(), ["B", "A"]);
        assert_eq!(matrix.get("R1", "A"), Some(d(2)));
        assert_eq!(matrix.get("R1", "B"), Some(Decimal::ZERO));
    }

    #[test]
    fn test_constraints_matrix_spans_calendar() {
        let dataset = sample();
        let matrix = dataset.constraints_matrix().unwrap();

        assert_eq!(matrix.rows(), ["R1"]);
        assert_eq!(matrix.columns(), ["P1", "P2", "P3"]);
        assert_eq!(matrix.get("R1", "P2"), Some(Decimal::ZERO));
        assert_eq!(dataset.constrained_resources(), vec!["R1"]);
    }

    #[test]
    fn test_forecast_by_item() {
        let grouped = sample().forecast_by_item();

        assert_eq!(
            grouped["A"],
            vec![
                ("P1".to_string(), Decimal::ZERO),
                ("P2".to_string(), d(120)),
                ("P3".to_string(), Decimal::ZERO),
            ]
        );
        assert!(!grouped.contains_key("C"));
    }
}
