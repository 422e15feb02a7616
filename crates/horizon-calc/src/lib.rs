//! # Horizon Calculation Engine
//!
//! 水平計劃、資源負荷、稼動率（RYG）與安全庫存計算

pub mod aggregate;
pub mod calculator;
pub mod horizontal;
pub mod safety_stock;
pub mod utilization;

// Re-export 主要類型
pub use aggregate::AggregateRequirementsCalculator;
pub use calculator::PlanningCalculator;
pub use horizontal::{HorizontalPlanGenerator, StockLevels};
pub use safety_stock::{SafetyStockCalculator, SafetyStockRecommendation};
pub use utilization::UtilizationCalculator;

use horizon_core::{HorizontalPlan, Matrix};
use serde::Serialize;

/// 計劃計算結果
#[derive(Debug, Clone, Serialize)]
pub struct PlanResult {
    /// 本次執行ID
    pub run_id: uuid::Uuid,

    /// 各物料水平計劃（資料集物料順序）
    pub horizontal_plans: Vec<HorizontalPlan>,

    /// 資源負荷：資源 × 期間（工時）
    pub aggregate_requirements: Matrix,

    /// 稼動率：受約束資源 × 期間（1.0 = 剛好滿載）
    pub utilization: Matrix,

    /// 統計安全庫存建議（有完工紀錄的物料）
    pub safety_stock: Vec<SafetyStockRecommendation>,

    /// 警告信息
    pub warnings: Vec<PlanWarning>,

    /// 計算耗時（毫秒）
    pub calculation_time_ms: Option<u128>,
}

impl PlanResult {
    /// 創建空的計算結果
    pub fn empty() -> Self {
        Self {
            run_id: uuid::Uuid::new_v4(),
            horizontal_plans: Vec::new(),
            aggregate_requirements: Matrix::default(),
            utilization: Matrix::default(),
            safety_stock: Vec::new(),
            warnings: Vec::new(),
            calculation_time_ms: None,
        }
    }

    /// 添加警告
    pub fn add_warning(&mut self, warning: PlanWarning) {
        self.warnings.push(warning);
    }

    pub fn plan(&self, item_id: &str) -> Option<&HorizontalPlan> {
        self.horizontal_plans.iter().find(|p| p.item_id == item_id)
    }

    pub fn recommendation(&self, item_id: &str) -> Option<&SafetyStockRecommendation> {
        self.safety_stock.iter().find(|r| r.item_id == item_id)
    }

    /// 是否有錯誤等級的警告
    pub fn has_errors(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| w.severity == WarningSeverity::Error)
    }
}

/// 計劃警告
#[derive(Debug, Clone, Serialize)]
pub struct PlanWarning {
    /// 物料ID；稼動率警告則為資源ID
    pub item_id: String,
    pub message: String,
    pub severity: WarningSeverity,
}

impl PlanWarning {
    pub fn new(item_id: String, message: String, severity: WarningSeverity) -> Self {
        Self {
            item_id,
            message,
            severity,
        }
    }

    pub fn warning(item_id: String, message: String) -> Self {
        Self::new(item_id, message, WarningSeverity::Warning)
    }

    pub fn error(item_id: String, message: String) -> Self {
        Self::new(item_id, message, WarningSeverity::Error)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WarningSeverity {
    Warning,
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warnings_and_errors() {
        let mut result = PlanResult::empty();
        assert!(!result.has_errors());

        result.add_warning(PlanWarning::warning("FG-1".to_string(), "樣本不足".to_string()));
        assert!(!result.has_errors());

        result.add_warning(PlanWarning::error("FG-2".to_string(), "缺少統計樣本".to_string()));
        assert!(result.has_errors());
        assert_eq!(result.warnings.len(), 2);
    }

    #[test]
    fn test_result_serializes_to_json() {
        let mut result = PlanResult::empty();
        result
            .horizontal_plans
            .push(HorizontalPlan::new("FG-1", vec!["W1".to_string()]));

        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["run_id"], serde_json::json!(result.run_id.to_string()));
        assert_eq!(json["horizontal_plans"][0]["item_id"], "FG-1");
        assert!(json["horizontal_plans"][0]["rows"]["ProductionPlan"].is_array());
        assert!(json["warnings"].as_array().unwrap().is_empty());
    }
}
