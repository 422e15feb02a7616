//! 分佈摘要與異常值修剪

use horizon_core::{Matrix, PlanError, Record, Result};
use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};

/// 分佈摘要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticalSummary {
    pub count: usize,
    pub average: Decimal,
    pub median: Decimal,
    pub max: Decimal,
    pub min: Decimal,

    /// 樣本標準差（n − 1）；樣本數 ≤ 1 時未定義
    pub sample_std_dev: Option<Decimal>,

    /// 母體標準差（n）
    pub population_std_dev: Decimal,

    /// 管制下限 = 平均 − z × 樣本標準差
    pub lower_control_limit: Option<Decimal>,

    /// 管制上限 = 平均 + z × 樣本標準差
    pub upper_control_limit: Option<Decimal>,

    /// 落在管制界限外的紀錄（紀錄鍵, 值）
    pub outliers: Vec<(String, Decimal)>,

    /// 排除異常值後的平均（僅在有異常值時）
    pub adjusted_average: Option<Decimal>,

    /// 排除異常值後的樣本標準差（僅在有異常值且剩餘樣本數 > 1 時）
    pub adjusted_std_dev: Option<Decimal>,
}

impl StatisticalSummary {
    pub fn has_outliers(&self) -> bool {
        !self.outliers.is_empty()
    }

    /// 樣本標準差；未定義時回報錯誤
    pub fn require_sample_std_dev(&self) -> Result<Decimal> {
        self.sample_std_dev.ok_or_else(|| {
            PlanError::UndefinedStatistic(format!(
                "樣本數 {} 無法計算樣本標準差",
                self.count
            ))
        })
    }

    /// 有異常值時取修剪後平均，否則取原始平均
    pub fn effective_average(&self) -> Decimal {
        self.adjusted_average.unwrap_or(self.average)
    }

    /// 有異常值時取修剪後標準差，否則取原始樣本標準差
    pub fn effective_std_dev(&self) -> Result<Decimal> {
        if self.has_outliers() {
            self.adjusted_std_dev.ok_or_else(|| {
                PlanError::UndefinedStatistic(format!(
                    "修剪後樣本數 {} 無法計算標準差",
                    self.count - self.outliers.len()
                ))
            })
        } else {
            self.require_sample_std_dev()
        }
    }
}

/// 計算分佈摘要
///
/// `values` 為（紀錄鍵, 值）；異常值以紀錄鍵回報。修剪只做一次，不反覆迭代。
/// 中間值超出 `Decimal` 範圍時回報 `UndefinedStatistic`。
pub fn summarize(values: &[(String, Decimal)], z: Decimal) -> Result<StatisticalSummary> {
    if values.is_empty() {
        return Err(PlanError::UndefinedStatistic("空樣本無法計算統計量".to_string()));
    }

    let numbers: Vec<Decimal> = values.iter().map(|(_, v)| *v).collect();
    let count = numbers.len();
    let average = mean(&numbers)?;
    let squared = sum_of_squares(&numbers, average)?;

    let sample_std_dev = if count > 1 {
        Some(sqrt(squared / Decimal::from(count - 1))?)
    } else {
        None
    };
    let population_std_dev = sqrt(squared / Decimal::from(count))?;

    let limits = sample_std_dev.map(|sd| control_limits(average, z, sd)).transpose()?;
    let outliers: Vec<(String, Decimal)> = match limits {
        Some((lcl, ucl)) => values
            .iter()
            .filter(|(_, v)| *v < lcl || *v > ucl)
            .cloned()
            .collect(),
        None => Vec::new(),
    };

    let (adjusted_average, adjusted_std_dev) = match limits {
        Some((lcl, ucl)) if !outliers.is_empty() => {
            let trimmed: Vec<Decimal> = numbers
                .iter()
                .copied()
                .filter(|v| *v >= lcl && *v <= ucl)
                .collect();
            adjusted(&trimmed)?
        }
        _ => (None, None),
    };

    Ok(StatisticalSummary {
        count,
        average,
        median: median(&numbers)?,
        max: numbers.iter().copied().max().unwrap_or(Decimal::ZERO),
        min: numbers.iter().copied().min().unwrap_or(Decimal::ZERO),
        sample_std_dev,
        population_std_dev,
        lower_control_limit: limits.map(|(lcl, _)| lcl),
        upper_control_limit: limits.map(|(_, ucl)| ucl),
        outliers,
        adjusted_average,
        adjusted_std_dev,
    })
}

/// 對紀錄集合的某一數值欄位計算分佈摘要
///
/// 同一紀錄鍵出現多次時先加總；總和經由欄加總取得。
pub fn summarize_records(records: &[Record], value_field: &str, z: Decimal) -> Result<StatisticalSummary> {
    let mut matrix = Matrix::zeros(Vec::<String>::new(), [value_field]);
    for record in records {
        let value = record.number(value_field).ok_or_else(|| {
            PlanError::InvalidValue(format!(
                "紀錄 {} 缺少數值欄位 {}",
                record.key, value_field
            ))
        })?;
        let current = matrix.get(&record.key, value_field).unwrap_or(Decimal::ZERO);
        let summed = current
            .checked_add(value)
            .ok_or_else(|| out_of_range(&format!("紀錄 {} 的加總", record.key)))?;
        matrix.set(&record.key, value_field, summed);
    }

    let values: Vec<(String, Decimal)> = matrix
        .rows()
        .iter()
        .map(|key| {
            let value = matrix.get(key, value_field).unwrap_or(Decimal::ZERO);
            (key.clone(), value)
        })
        .collect();

    let mut summary = summarize(&values, z)?;
    // 平均以欄加總重新計算，與逐筆加總一致
    let totals = matrix
        .sum_columns()
        .map_err(|e| PlanError::UndefinedStatistic(e.to_string()))?;
    if let Some(total) = totals.get(Matrix::TOTAL_ROW, value_field) {
        summary.average = total / Decimal::from(summary.count);
    }
    Ok(summary)
}

fn out_of_range(what: &str) -> PlanError {
    PlanError::UndefinedStatistic(format!("{}超出數值範圍", what))
}

fn mean(values: &[Decimal]) -> Result<Decimal> {
    let sum = values
        .iter()
        .try_fold(Decimal::ZERO, |sum, v| sum.checked_add(*v))
        .ok_or_else(|| out_of_range("樣本總和"))?;
    Ok(sum / Decimal::from(values.len()))
}

fn sum_of_squares(values: &[Decimal], average: Decimal) -> Result<Decimal> {
    values
        .iter()
        .try_fold(Decimal::ZERO, |sum, v| {
            let diff = v.checked_sub(average)?;
            sum.checked_add(diff.checked_mul(diff)?)
        })
        .ok_or_else(|| out_of_range("離差平方和"))
}

fn control_limits(average: Decimal, z: Decimal, sd: Decimal) -> Result<(Decimal, Decimal)> {
    let spread = z.checked_mul(sd).ok_or_else(|| out_of_range("管制界限"))?;
    let lcl = average.checked_sub(spread).ok_or_else(|| out_of_range("管制下限"))?;
    let ucl = average.checked_add(spread).ok_or_else(|| out_of_range("管制上限"))?;
    Ok((lcl, ucl))
}

fn median(values: &[Decimal]) -> Result<Decimal> {
    let mut sorted = values.to_vec();
    sorted.sort();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        let pair = sorted[mid - 1]
            .checked_add(sorted[mid])
            .ok_or_else(|| out_of_range("中位數"))?;
        Ok(pair / Decimal::TWO)
    } else {
        Ok(sorted[mid])
    }
}

fn sqrt(value: Decimal) -> Result<Decimal> {
    value
        .sqrt()
        .ok_or_else(|| PlanError::UndefinedStatistic(format!("無法對 {} 開根號", value)))
}

fn adjusted(trimmed: &[Decimal]) -> Result<(Option<Decimal>, Option<Decimal>)> {
    if trimmed.is_empty() {
        return Ok((None, None));
    }
    let average = mean(trimmed)?;
    let std_dev = if trimmed.len() > 1 {
        let squared = sum_of_squares(trimmed, average)?;
        Some(sqrt(squared / Decimal::from(trimmed.len() - 1))?)
    } else {
        None
    };
    Ok((Some(average), std_dev))
}
