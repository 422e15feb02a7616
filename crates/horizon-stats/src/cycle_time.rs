//! 績效週期時間
//!
//! 同一物料相鄰兩次完工的間隔天數。間隔不超過 `min_gap_days`
//! （預設 1 天）視為同一週期的延續，不列入樣本。

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// 由完工日期推算績效週期時間（天）
pub fn performance_cycle_times(completions: &[NaiveDate], min_gap_days: i64) -> Vec<Decimal> {
    keyed_cycle_times(completions, min_gap_days)
        .into_iter()
        .map(|(_, gap)| gap)
        .collect()
}

/// 帶紀錄鍵的週期時間樣本，鍵為週期結束日期
pub fn keyed_cycle_times(completions: &[NaiveDate], min_gap_days: i64) -> Vec<(String, Decimal)> {
    let mut dates = completions.to_vec();
    dates.sort();

    dates
        .windows(2)
        .filter_map(|pair| {
            let gap = (pair[1] - pair[0]).num_days();
            (gap > min_gap_days).then(|| (pair[1].format("%Y-%m-%d").to_string(), Decimal::from(gap)))
        })
        .collect()
}
