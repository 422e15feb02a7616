//! 計劃日曆模型

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::record::{AsRecord, FieldValue, Record};
use crate::{PlanError, Result};

/// 計劃期間
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    /// 期間ID（不透明字串，順序由日曆決定）
    pub period_id: String,

    /// 期間天數
    pub days: u32,
}

impl Period {
    pub fn new(period_id: impl Into<String>, days: u32) -> Self {
        Self {
            period_id: period_id.into(),
            days,
        }
    }

    /// 以起訖日期建立期間（含起日，不含迄日）
    pub fn spanning(period_id: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Result<Self> {
        let period_id = period_id.into();
        let days = (end - start).num_days();
        if days <= 0 {
            return Err(PlanError::InvalidValue(format!(
                "期間 {} 的迄日 {} 必須晚於起日 {}",
                period_id, end, start
            )));
        }
        let days = u32::try_from(days)
            .map_err(|_| PlanError::InvalidValue(format!("期間 {} 天數過大", period_id)))?;
        Ok(Self { period_id, days })
    }
}

impl AsRecord for Period {
    fn to_record(&self) -> Record {
        Record::new(self.period_id.clone())
            .with("period", FieldValue::text(&self.period_id))
            .with("days", FieldValue::Number(self.days.into()))
    }
}

/// 計劃日曆
///
/// 期間順序即時間順序，由呼叫端保證；日曆本身不推斷先後。
/// 反序列化一律經過 [`Calendar::new`]，重複的期間會被拒絕。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "CalendarData")]
pub struct Calendar {
    periods: Vec<Period>,

    #[serde(skip)]
    index: HashMap<String, usize>,
}

/// 日曆的序列化形式
#[derive(Deserialize)]
struct CalendarData {
    periods: Vec<Period>,
}

impl TryFrom<CalendarData> for Calendar {
    type Error = PlanError;

    fn try_from(data: CalendarData) -> Result<Self> {
        Calendar::new(data.periods)
    }
}

impl Calendar {
    /// 以既定順序建立日曆
    pub fn new(periods: Vec<Period>) -> Result<Self> {
        let mut index = HashMap::with_capacity(periods.len());
        for (position, period) in periods.iter().enumerate() {
            if index.insert(period.period_id.clone(), position).is_some() {
                return Err(PlanError::DuplicateKey {
                    kind: "期間".to_string(),
                    key: period.period_id.clone(),
                });
            }
        }
        Ok(Self { periods, index })
    }

    /// 依時間順序列出期間
    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    /// 依時間順序列出期間ID
    pub fn period_ids(&self) -> Vec<String> {
        self.periods.iter().map(|p| p.period_id.clone()).collect()
    }

    pub fn get(&self, period_id: &str) -> Option<&Period> {
        self.position(period_id).map(|i| &self.periods[i])
    }

    /// 期間在日曆中的位置
    pub fn position(&self, period_id: &str) -> Option<usize> {
        self.index.get(period_id).copied()
    }

    pub fn contains(&self, period_id: &str) -> bool {
        self.position(period_id).is_some()
    }

    /// 期間天數
    pub fn days(&self, period_id: &str) -> Result<u32> {
        self.get(period_id)
            .map(|p| p.days)
            .ok_or_else(|| PlanError::unknown("期間", period_id))
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }
}
