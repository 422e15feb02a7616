//! 資源負荷計算
//!
//! 負荷（資源 × 期間）= 需求矩陣（資源 × 物料）× 生產矩陣（物料 × 期間）

use horizon_core::{
    Calendar, FieldValue, HorizontalPlan, Matrix, PlanRow, PlanningDataSet, Predicate, Record,
    Result,
};

/// 資源負荷計算器
pub struct AggregateRequirementsCalculator;

impl AggregateRequirementsCalculator {
    /// 生產矩陣：各水平計劃的 Production Plan 列
    pub fn production_matrix(plans: &[HorizontalPlan], calendar: &Calendar) -> Matrix {
        let mut production = Matrix::zeros(
            plans.iter().map(|p| p.item_id.clone()),
            calendar.period_ids(),
        );
        for plan in plans {
            for period in calendar.period_ids() {
                if let Some(qty) = plan.value(PlanRow::ProductionPlan, &period) {
                    production.set(&plan.item_id, period, qty);
                }
            }
        }
        production
    }

    /// 計算資源負荷（工時）
    ///
    /// 需求紀錄中的物料若沒有對應的生產計劃列，回報 `DimensionMismatch`。
    pub fn calculate(dataset: &PlanningDataSet, plans: &[HorizontalPlan]) -> Result<Matrix> {
        let production = Self::production_matrix(plans, &dataset.calendar);
        let requirements = dataset.requirements_matrix(production.rows())?;

        requirements.multiply(&production)
    }

    /// 計算資源負荷，但略過 `excluded` 物料的需求紀錄
    ///
    /// 計劃失敗而被略過的物料沒有生產列，它們的需求不計入負荷。
    pub fn calculate_excluding(
        dataset: &PlanningDataSet,
        plans: &[HorizontalPlan],
        excluded: &[String],
    ) -> Result<Matrix> {
        if excluded.is_empty() {
            return Self::calculate(dataset, plans);
        }

        let production = Self::production_matrix(plans, &dataset.calendar);
        let skip = Predicate::is_in("item", excluded.iter().map(FieldValue::text).collect());
        let records: Vec<Record> = dataset
            .requirement_records()
            .into_iter()
            .filter(|r| !skip.matches(r))
            .collect();
        let requirements = Matrix::zeros(Vec::<String>::new(), production.rows().iter().cloned())
            .accumulate(&records, "resource", "item", "hours")?;

        requirements.multiply(&production)
    }
}
