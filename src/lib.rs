//! # Horizon
//!
//! 水平生產計劃引擎：由物料、資源、銷售預測、資源需求、產能約束與日曆
//! 推算逐期庫存與生產計劃、資源負荷與稼動率（RYG），並提供統計安全庫存建議。
//!
//! ```no_run
//! use horizon::{Calendar, Period, PlanningCalculator, PlanningConfig, PlanningDataSet};
//!
//! let calendar = Calendar::new(vec![Period::new("2025-W01", 7)])?;
//! let dataset = PlanningDataSet::new(calendar);
//! let result = PlanningCalculator::new(PlanningConfig::default()).calculate(&dataset)?;
//! println!("{} 個物料完成計劃", result.horizontal_plans.len());
//! # Ok::<(), horizon::PlanError>(())
//! ```

pub use horizon_calc::{
    AggregateRequirementsCalculator, HorizontalPlanGenerator, PlanResult, PlanWarning,
    PlanningCalculator, SafetyStockCalculator, SafetyStockRecommendation, StockLevels,
    UtilizationCalculator, WarningSeverity,
};
pub use horizon_core::*;
pub use horizon_stats::{
    keyed_cycle_times, norm_inverse, performance_cycle_times, summarize, summarize_records,
    StatisticalSummary,
};

pub use chrono::NaiveDate;
pub use rust_decimal::Decimal;
