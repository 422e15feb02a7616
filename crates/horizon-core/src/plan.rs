//! 水平計劃模型（計算結果）

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::matrix::Matrix;

/// 水平計劃的固定八列（宣告順序即顯示順序）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlanRow {
    SafetyStockPlan,
    CycleStockPlan,
    /// 預留給平準化邏輯，目前固定為 0
    LevelLoadPlan,
    TotalInventoryPlan,
    BeginningInventory,
    SalesForecast,
    ProductionPlan,
    EndingInventory,
}

impl PlanRow {
    pub const ALL: [PlanRow; 8] = [
        PlanRow::SafetyStockPlan,
        PlanRow::CycleStockPlan,
        PlanRow::LevelLoadPlan,
        PlanRow::TotalInventoryPlan,
        PlanRow::BeginningInventory,
        PlanRow::SalesForecast,
        PlanRow::ProductionPlan,
        PlanRow::EndingInventory,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PlanRow::SafetyStockPlan => "Safety Stock Plan",
            PlanRow::CycleStockPlan => "Cycle Stock Plan",
            PlanRow::LevelLoadPlan => "Level Load Plan",
            PlanRow::TotalInventoryPlan => "Total Inventory Plan",
            PlanRow::BeginningInventory => "Beginning Inventory",
            PlanRow::SalesForecast => "Sales Forecast",
            PlanRow::ProductionPlan => "Production Plan",
            PlanRow::EndingInventory => "Ending Inventory",
        }
    }
}

impl fmt::Display for PlanRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 單一物料的水平計劃：指標列 × 期間欄
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HorizontalPlan {
    /// 物料ID
    pub item_id: String,

    /// 期間ID（日曆順序）
    pub periods: Vec<String>,

    /// 各指標列，長度與 `periods` 相同
    pub rows: BTreeMap<PlanRow, Vec<Decimal>>,
}

impl HorizontalPlan {
    /// 創建全為 0 的計劃
    pub fn new(item_id: impl Into<String>, periods: Vec<String>) -> Self {
        let rows = PlanRow::ALL
            .iter()
            .map(|row| (*row, vec![Decimal::ZERO; periods.len()]))
            .collect();
        Self {
            item_id: item_id.into(),
            periods,
            rows,
        }
    }

    pub fn row(&self, row: PlanRow) -> &[Decimal] {
        self.rows.get(&row).map(Vec::as_slice).unwrap_or(&[])
    }

    /// 取某指標在某期間的值
    pub fn value(&self, row: PlanRow, period_id: &str) -> Option<Decimal> {
        let position = self.periods.iter().position(|p| p == period_id)?;
        self.row(row).get(position).copied()
    }

    pub(crate) fn set(&mut self, row: PlanRow, position: usize, value: Decimal) {
        if let Some(cell) = self.rows.get_mut(&row).and_then(|v| v.get_mut(position)) {
            *cell = value;
        }
    }

    /// 整段期間的總生產量
    pub fn total_production(&self) -> Decimal {
        self.row(PlanRow::ProductionPlan).iter().copied().sum()
    }

    /// 以矩陣形式輸出（列為指標名稱，欄為期間）
    pub fn to_matrix(&self) -> Matrix {
        let mut matrix = Matrix::zeros(
            PlanRow::ALL.iter().map(PlanRow::label),
            self.periods.iter().cloned(),
        );
        for (row, values) in &self.rows {
            for (period, value) in self.periods.iter().zip(values) {
                matrix.set(row.label(), period.clone(), *value);
            }
        }
        matrix
    }
}

/// 逐期推算時寫入計劃的一期數值
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodRecord {
    pub safety_stock: Decimal,
    pub cycle_stock: Decimal,
    pub level_load: Decimal,
    pub total_inventory: Decimal,
    pub beginning_inventory: Decimal,
    pub sales_forecast: Decimal,
    pub production: Decimal,
    pub ending_inventory: Decimal,
}

impl HorizontalPlan {
    /// 寫入第 `position` 期
    pub fn record_period(&mut self, position: usize, period: &PeriodRecord) {
        self.set(PlanRow::SafetyStockPlan, position, period.safety_stock);
        self.set(PlanRow::CycleStockPlan, position, period.cycle_stock);
        self.set(PlanRow::LevelLoadPlan, position, period.level_load);
        self.set(PlanRow::TotalInventoryPlan, position, period.total_inventory);
        self.set(PlanRow::BeginningInventory, position, period.beginning_inventory);
        self.set(PlanRow::SalesForecast, position, period.sales_forecast);
        self.set(PlanRow::ProductionPlan, position, period.production);
        self.set(PlanRow::EndingInventory, position, period.ending_inventory);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn periods() -> Vec<String> {
        vec!["P1".to_string(), "P2".to_string()]
    }

    #[test]
    fn test_new_plan_has_all_rows() {
        let plan = HorizontalPlan::new("FG-100", periods());

        assert_eq!(plan.rows.len(), 8);
        for row in PlanRow::ALL {
            assert_eq!(plan.row(row), &[Decimal::ZERO, Decimal::ZERO]);
        }
    }

    #[test]
    fn test_record_period() {
        let mut plan = HorizontalPlan::new("FG-100", periods());
        plan.record_period(
            1,
            &PeriodRecord {
                safety_stock: Decimal::from(10),
                cycle_stock: Decimal::from(5),
                level_load: Decimal::ZERO,
                total_inventory: Decimal::from(15),
                beginning_inventory: Decimal::from(20),
                sales_forecast: Decimal::from(30),
                production: Decimal::from(25),
                ending_inventory: Decimal::from(15),
            },
        );

        assert_eq!(plan.value(PlanRow::ProductionPlan, "P2"), Some(Decimal::from(25)));
        assert_eq!(plan.value(PlanRow::ProductionPlan, "P1"), Some(Decimal::ZERO));
        assert_eq!(plan.value(PlanRow::ProductionPlan, "P9"), None);
        assert_eq!(plan.total_production(), Decimal::from(25));
    }

    #[test]
    fn test_row_order_and_labels() {
        let labels: Vec<&str> = PlanRow::ALL.iter().map(PlanRow::label).collect();

        assert_eq!(labels[0], "Safety Stock Plan");
        assert_eq!(labels[7], "Ending Inventory");
        assert!(PlanRow::SafetyStockPlan < PlanRow::EndingInventory);
    }

    #[test]
    fn test_to_matrix() {
        let mut plan = HorizontalPlan::new("FG-100", periods());
        plan.set(PlanRow::SalesForecast, 0, Decimal::from(40));

        let matrix = plan.to_matrix();

        assert_eq!(matrix.rows().len(), 8);
        assert_eq!(matrix.get("Sales Forecast", "P1"), Some(Decimal::from(40)));
        assert_eq!(matrix.get("Sales Forecast", "P2"), Some(Decimal::ZERO));
    }
}
