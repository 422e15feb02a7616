//! 計劃參數配置

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{PlanError, Result};

/// 安全庫存政策
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SafetyStockPolicy {
    /// 以最高預測期間的日產出率乘上覆蓋天數（依策略 8 或 20 天）
    #[default]
    RunRate,
    /// 以供需雙重不確定性公式推算（需要完工與預測樣本）
    Statistical,
}

/// 進度回報的詳細程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum Verbosity {
    Silent,
    #[default]
    Concise,
    Verbose,
}

/// 計劃參數
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanningConfig {
    /// 服務水準（統計安全庫存用）
    pub service_level: Decimal,

    /// 異常值判定的 z 值
    pub outlier_z: Decimal,

    /// ReactiveFast 的安全庫存覆蓋天數
    pub fast_coverage_days: Decimal,

    /// ReactiveSlow 的安全庫存覆蓋天數
    pub slow_coverage_days: Decimal,

    /// 週期庫存 = FOQ × 此係數
    pub cycle_stock_factor: Decimal,

    /// 完工間隔不超過此天數視為同一績效週期
    pub min_cycle_gap_days: i64,

    /// 安全庫存政策
    pub safety_stock_policy: SafetyStockPolicy,

    /// 回報詳細程度
    pub verbosity: Verbosity,

    /// 是否以多執行緒逐物料推算
    pub parallel: bool,
}

impl PlanningConfig {
    /// 創建預設配置
    pub fn new() -> Self {
        Self {
            service_level: Decimal::new(985, 3),
            outlier_z: Decimal::from(3),
            fast_coverage_days: Decimal::from(8),
            slow_coverage_days: Decimal::from(20),
            cycle_stock_factor: Decimal::new(5, 1),
            min_cycle_gap_days: 1,
            safety_stock_policy: SafetyStockPolicy::RunRate,
            verbosity: Verbosity::Concise,
            parallel: false,
        }
    }

    /// 建構器模式：設置服務水準
    pub fn with_service_level(mut self, service_level: Decimal) -> Self {
        self.service_level = service_level;
        self
    }

    /// 建構器模式：設置異常值 z 值
    pub fn with_outlier_z(mut self, z: Decimal) -> Self {
        self.outlier_z = z;
        self
    }

    /// 建構器模式：設置覆蓋天數（fast, slow）
    pub fn with_coverage_days(mut self, fast: Decimal, slow: Decimal) -> Self {
        self.fast_coverage_days = fast;
        self.slow_coverage_days = slow;
        self
    }

    /// 建構器模式：設置週期庫存係數
    pub fn with_cycle_stock_factor(mut self, factor: Decimal) -> Self {
        self.cycle_stock_factor = factor;
        self
    }

    /// 建構器模式：設置績效週期的最小間隔
    pub fn with_min_cycle_gap_days(mut self, days: i64) -> Self {
        self.min_cycle_gap_days = days;
        self
    }

    /// 建構器模式：設置安全庫存政策
    pub fn with_safety_stock_policy(mut self, policy: SafetyStockPolicy) -> Self {
        self.safety_stock_policy = policy;
        self
    }

    /// 建構器模式：設置回報詳細程度
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// 建構器模式：設置是否並行
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// 檢查參數
    pub fn validate(&self) -> Result<()> {
        if self.service_level <= Decimal::ZERO || self.service_level >= Decimal::ONE {
            return Err(PlanError::InvalidValue(format!(
                "服務水準必須介於 0 與 1 之間: {}",
                self.service_level
            )));
        }
        if self.outlier_z <= Decimal::ZERO {
            return Err(PlanError::InvalidValue(format!(
                "異常值 z 值必須為正: {}",
                self.outlier_z
            )));
        }
        if self.cycle_stock_factor < Decimal::ZERO {
            return Err(PlanError::InvalidValue(format!(
                "週期庫存係數不可為負: {}",
                self.cycle_stock_factor
            )));
        }
        Ok(())
    }
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PlanningConfig::default();

        assert_eq!(config.service_level, Decimal::new(985, 3));
        assert_eq!(config.outlier_z, Decimal::from(3));
        assert_eq!(config.safety_stock_policy, SafetyStockPolicy::RunRate);
        assert_eq!(config.verbosity, Verbosity::Concise);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = PlanningConfig::new()
            .with_service_level(Decimal::new(95, 2))
            .with_coverage_days(Decimal::from(5), Decimal::from(15))
            .with_safety_stock_policy(SafetyStockPolicy::Statistical)
            .with_verbosity(Verbosity::Verbose)
            .with_parallel(true);

        assert_eq!(config.service_level, Decimal::new(95, 2));
        assert_eq!(config.fast_coverage_days, Decimal::from(5));
        assert_eq!(config.slow_coverage_days, Decimal::from(15));
        assert_eq!(config.safety_stock_policy, SafetyStockPolicy::Statistical);
        assert!(config.parallel);
    }

    #[test]
    fn test_invalid_service_level() {
        let config = PlanningConfig::new().with_service_level(Decimal::ONE);
        assert!(matches!(config.validate(), Err(PlanError::InvalidValue(_))));

        let config = PlanningConfig::new().with_outlier_z(Decimal::ZERO);
        assert!(config.validate().is_err());
    }
}
