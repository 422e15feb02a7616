//! 稼動率（RYG）計算
//!
//! 比值 = 資源負荷 ÷ 可用產能，只涵蓋有約束紀錄的資源。
//! 1.0 代表剛好滿載；顏色分級屬於呈現層，不在此處理。

use horizon_core::{Matrix, PlanError, PlanningDataSet, Result};

/// 稼動率計算器
pub struct UtilizationCalculator;

impl UtilizationCalculator {
    /// 計算受約束資源的稼動率
    ///
    /// 沒有負荷的受約束資源整列為 0；約束期間缺漏視為產能 0，
    /// 任一資源出現產能為 0 的格子就回報 `UndefinedStatistic`。
    pub fn calculate(dataset: &PlanningDataSet, aggregate: &Matrix) -> Result<Matrix> {
        let (ryg, failures) = Self::calculate_partial(dataset, aggregate)?;
        match failures.into_iter().next() {
            Some((_, error)) => Err(error),
            None => Ok(ryg),
        }
    }

    /// 逐資源計算稼動率
    ///
    /// 每個受約束資源各自相除；失敗的資源不進入結果矩陣，
    /// 連同原因一起回傳，其餘資源照常計算。
    pub fn calculate_partial(
        dataset: &PlanningDataSet,
        aggregate: &Matrix,
    ) -> Result<(Matrix, Vec<(String, PlanError)>)> {
        let constraints = dataset.constraints_matrix()?;
        let mut ryg = Matrix::zeros(Vec::<String>::new(), constraints.columns().iter().cloned());
        let mut failures = Vec::new();

        for resource in constraints.rows() {
            let selected = std::slice::from_ref(resource);
            let capacity = constraints.restrict_rows(selected);
            match aggregate.restrict_rows(selected).elementwise_divide(&capacity) {
                Ok(ratios) => {
                    for period in ratios.columns() {
                        if let Some(value) = ratios.get(resource, period) {
                            ryg.set(resource, period.clone(), value);
                        }
                    }
                }
                Err(e) => failures.push((resource.clone(), e)),
            }
        }

        Ok((ryg, failures))
    }
}
