//! # Horizon Core
//!
//! 核心資料模型、矩陣運算與類型定義

pub mod calendar;
pub mod config;
pub mod dataset;
pub mod demand;
pub mod item;
pub mod matrix;
pub mod observer;
pub mod plan;
pub mod record;
pub mod resource;

// Re-export 主要類型
pub use calendar::{Calendar, Period};
pub use config::{PlanningConfig, SafetyStockPolicy, Verbosity};
pub use dataset::PlanningDataSet;
pub use demand::{CompletionEntry, ForecastEntry};
pub use item::{Item, PlanningStrategy};
pub use matrix::Matrix;
pub use observer::{PlanEvent, PlanObserver, RecordingObserver, SilentObserver, TracingObserver};
pub use plan::{HorizontalPlan, PeriodRecord, PlanRow};
pub use record::{project, select, AsRecord, FieldValue, Predicate, Record};
pub use resource::{ConstraintEntry, RequirementEntry, Resource};

/// 計劃引擎錯誤類型
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlanError {
    #[error("矩陣維度不符（{operation}）: {detail}")]
    DimensionMismatch { operation: String, detail: String },

    #[error("統計量未定義: {0}")]
    UndefinedStatistic(String),

    #[error("不支援的篩選運算子: {0}")]
    UnsupportedPredicate(String),

    #[error("找不到{kind}: {key}")]
    UnknownReference { kind: String, key: String },

    #[error("重複的{kind}: {key}")]
    DuplicateKey { kind: String, key: String },

    #[error("無效的數值: {0}")]
    InvalidValue(String),

    #[error("缺少統計樣本: {0}")]
    StatisticsNotFound(String),
}

impl PlanError {
    pub fn dimension(operation: &str, detail: impl Into<String>) -> Self {
        PlanError::DimensionMismatch {
            operation: operation.to_string(),
            detail: detail.into(),
        }
    }

    pub fn unknown(kind: &str, key: &str) -> Self {
        PlanError::UnknownReference {
            kind: kind.to_string(),
            key: key.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PlanError>;
