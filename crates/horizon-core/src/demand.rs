//! 需求預測與完工紀錄模型

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::record::{AsRecord, FieldValue, Record};

/// 銷售預測：（物料, 期間）→ 預測數量
///
/// 同一（物料, 期間）出現多筆時以加總處理。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// 物料ID
    pub item_id: String,

    /// 期間ID
    pub period_id: String,

    /// 預測數量
    pub quantity: Decimal,
}

impl ForecastEntry {
    pub fn new(item_id: impl Into<String>, period_id: impl Into<String>, quantity: Decimal) -> Self {
        Self {
            item_id: item_id.into(),
            period_id: period_id.into(),
            quantity,
        }
    }
}

impl AsRecord for ForecastEntry {
    fn to_record(&self) -> Record {
        Record::new(format!("{}/{}", self.item_id, self.period_id))
            .with("item", FieldValue::text(&self.item_id))
            .with("period", FieldValue::text(&self.period_id))
            .with("quantity", FieldValue::Number(self.quantity))
    }
}

/// 完工紀錄（供應端歷史），用於推算績效週期時間
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionEntry {
    /// 物料ID
    pub item_id: String,

    /// 完工日期
    pub completed_on: NaiveDate,

    /// 完工數量
    pub quantity: Decimal,
}

impl CompletionEntry {
    pub fn new(item_id: impl Into<String>, completed_on: NaiveDate, quantity: Decimal) -> Self {
        Self {
            item_id: item_id.into(),
            completed_on,
            quantity,
        }
    }
}

impl AsRecord for CompletionEntry {
    fn to_record(&self) -> Record {
        Record::new(format!("{}@{}", self.item_id, self.completed_on))
            .with("item", FieldValue::text(&self.item_id))
            .with("completed_on", FieldValue::Date(self.completed_on))
            .with("quantity", FieldValue::Number(self.quantity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forecast_record() {
        let record = ForecastEntry::new("FG-100", "2025-M01", Decimal::from(6000)).to_record();

        assert_eq!(record.key, "FG-100/2025-M01");
        assert_eq!(record.number("quantity"), Some(Decimal::from(6000)));
    }

    #[test]
    fn test_completion_record() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let record = CompletionEntry::new("FG-100", date, Decimal::from(250)).to_record();

        assert_eq!(record.key, "FG-100@2025-03-14");
        assert_eq!(record.get("completed_on"), Some(&FieldValue::Date(date)));
    }
}
