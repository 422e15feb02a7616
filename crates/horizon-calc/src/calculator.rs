//! 計劃主計算器
//!
//! 水平計劃 → 資源負荷 → 稼動率，另附統計安全庫存建議。
//! 單一物料失敗只會記成警告並略過該物料（其資源需求也不計入負荷）；
//! 單一資源的稼動率無法計算時同樣只略過該資源。其餘矩陣階段失敗則中止整次計算。

use horizon_core::{
    PlanEvent, PlanObserver, PlanningConfig, PlanningDataSet, Result, SafetyStockPolicy,
    TracingObserver,
};
use std::sync::Arc;

use crate::aggregate::AggregateRequirementsCalculator;
use crate::horizontal::HorizontalPlanGenerator;
use crate::safety_stock::SafetyStockCalculator;
use crate::utilization::UtilizationCalculator;
use crate::{PlanResult, PlanWarning};

/// 計劃計算器
pub struct PlanningCalculator {
    /// 計劃參數
    config: PlanningConfig,

    /// 進度觀察者
    observer: Arc<dyn PlanObserver>,
}

impl PlanningCalculator {
    /// 創建計算器；預設把進度轉送到 tracing
    pub fn new(config: PlanningConfig) -> Self {
        let observer = Arc::new(TracingObserver::new(config.verbosity));
        Self { config, observer }
    }

    /// 建構器模式：設置觀察者
    pub fn with_observer(mut self, observer: Arc<dyn PlanObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &PlanningConfig {
        &self.config
    }

    /// 主計算入口
    ///
    /// 資料集不會被修改；所有計算結果都放在回傳的 [`PlanResult`]。
    pub fn calculate(&self, dataset: &PlanningDataSet) -> Result<PlanResult> {
        self.config.validate()?;
        dataset.validate()?;

        let start_time = std::time::Instant::now();
        self.observer.notify(&PlanEvent::RunStarted {
            items: dataset.items.len(),
            periods: dataset.calendar.len(),
            resources: dataset.resources.len(),
        });

        let mut result = PlanResult::empty();
        let mut failed_items = Vec::new();

        // Step 1: 統計安全庫存建議（有完工紀錄的物料）
        for (item_id, recommendation) in SafetyStockCalculator::new(&self.config).calculate(dataset) {
            match recommendation {
                Ok(rec) => result.safety_stock.push(rec),
                Err(e) => result.add_warning(PlanWarning::warning(
                    item_id,
                    format!("無法推算統計安全庫存: {}", e),
                )),
            }
        }
        let statistical = match self.config.safety_stock_policy {
            SafetyStockPolicy::Statistical => {
                SafetyStockCalculator::recommended_levels(&result.safety_stock)
            }
            SafetyStockPolicy::RunRate => Default::default(),
        };

        // Step 2: 逐物料水平計劃
        let forecast = dataset.forecast_matrix()?;
        let generator = HorizontalPlanGenerator::new(&self.config);
        let generated = generator.generate_all(&dataset.items, &dataset.calendar, &forecast, &statistical);

        for (item_id, outcome) in generated {
            match outcome {
                Ok((plan, levels)) => {
                    self.observer.notify(&PlanEvent::ItemPlanned {
                        item_id: item_id.clone(),
                        safety_stock: levels.safety_stock,
                        cycle_stock: levels.cycle_stock,
                        total_production: plan.total_production(),
                    });
                    result.horizontal_plans.push(plan);
                }
                Err(e) => {
                    failed_items.push(item_id.clone());
                    self.observer.notify(&PlanEvent::ItemFailed {
                        item_id: item_id.clone(),
                        reason: e.to_string(),
                    });
                    result.add_warning(PlanWarning::error(item_id, e.to_string()));
                }
            }
        }

        // Step 3: 資源負荷
        result.aggregate_requirements =
            AggregateRequirementsCalculator::calculate_excluding(
                dataset,
                &result.horizontal_plans,
                &failed_items,
            )?;
        self.stage_completed("aggregate_requirements", &result.aggregate_requirements);

        // Step 4: 稼動率（逐資源）
        let (utilization, skipped) =
            UtilizationCalculator::calculate_partial(dataset, &result.aggregate_requirements)?;
        for (resource_id, e) in skipped {
            self.observer.notify(&PlanEvent::ResourceSkipped {
                resource_id: resource_id.clone(),
                reason: e.to_string(),
            });
            result.add_warning(PlanWarning::error(
                resource_id,
                format!("無法計算稼動率: {}", e),
            ));
        }
        result.utilization = utilization;
        self.stage_completed("utilization", &result.utilization);

        let elapsed = start_time.elapsed().as_millis();
        result.calculation_time_ms = Some(elapsed);

        self.observer.notify(&PlanEvent::RunFinished {
            planned_items: result.horizontal_plans.len(),
            failed_items: failed_items.len(),
            elapsed_ms: elapsed,
        });

        Ok(result)
    }

    fn stage_completed(&self, stage: &str, matrix: &horizon_core::Matrix) {
        self.observer.notify(&PlanEvent::StageCompleted {
            stage: stage.to_string(),
            rows: matrix.rows().len(),
            columns: matrix.columns().len(),
        });
    }
}
