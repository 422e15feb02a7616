//! 通用關聯紀錄與篩選/投影運算
//!
//! 匯入端交付的是以識別碼為鍵的扁平紀錄；計劃元件以 `select`、`project`
//! 與 [`crate::Matrix::build`] 組合這些紀錄。

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use crate::{PlanError, Result};

/// 欄位值
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldValue {
    Text(String),
    Number(Decimal),
    Date(NaiveDate),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn as_number(&self) -> Option<Decimal> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// 同型別值的比較；型別不同時無法比較
    pub fn compare(&self, other: &FieldValue) -> Option<Ordering> {
        match (self, other) {
            (FieldValue::Text(a), FieldValue::Text(b)) => Some(a.cmp(b)),
            (FieldValue::Number(a), FieldValue::Number(b)) => Some(a.cmp(b)),
            (FieldValue::Date(a), FieldValue::Date(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// 作為矩陣列/欄鍵使用的字串形式
    pub fn as_key(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(n) => n.normalize().to_string(),
            FieldValue::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_key())
    }
}

/// 一筆紀錄：識別碼 + 欄位
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// 紀錄識別碼
    pub key: String,

    /// 欄位
    pub fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            fields: BTreeMap::new(),
        }
    }

    /// 建構器模式：設置欄位
    pub fn with(mut self, field: &str, value: FieldValue) -> Self {
        self.fields.insert(field.to_string(), value);
        self
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn number(&self, field: &str) -> Option<Decimal> {
        self.get(field).and_then(FieldValue::as_number)
    }
}

/// 可轉為通用紀錄的實體
pub trait AsRecord {
    fn to_record(&self) -> Record;
}

/// 將一組實體轉為紀錄集合
pub fn to_records<T: AsRecord>(entities: &[T]) -> Vec<Record> {
    entities.iter().map(AsRecord::to_record).collect()
}

/// 比較方式
#[derive(Debug, Clone, PartialEq)]
pub enum Comparison {
    Equal(FieldValue),
    GreaterThan(FieldValue),
    LessThan(FieldValue),
    In(Vec<FieldValue>),
}

/// 單一欄位的篩選條件
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub field: String,
    pub comparison: Comparison,
}

impl Predicate {
    pub fn equals(field: &str, value: FieldValue) -> Self {
        Self::new(field, Comparison::Equal(value))
    }

    pub fn greater_than(field: &str, value: FieldValue) -> Self {
        Self::new(field, Comparison::GreaterThan(value))
    }

    pub fn less_than(field: &str, value: FieldValue) -> Self {
        Self::new(field, Comparison::LessThan(value))
    }

    pub fn is_in(field: &str, values: Vec<FieldValue>) -> Self {
        Self::new(field, Comparison::In(values))
    }

    fn new(field: &str, comparison: Comparison) -> Self {
        Self {
            field: field.to_string(),
            comparison,
        }
    }

    /// 由運算子字串建立條件
    ///
    /// 支援 `=`、`==`、`>`、`<`、`in`；`=`/`>`/`<` 只取第一個值。
    pub fn parse(field: &str, operator: &str, mut values: Vec<FieldValue>) -> Result<Self> {
        let single = |values: &mut Vec<FieldValue>| -> Result<FieldValue> {
            if values.is_empty() {
                return Err(PlanError::InvalidValue(format!(
                    "運算子 {} 需要一個比較值",
                    operator
                )));
            }
            Ok(values.swap_remove(0))
        };

        let comparison = match operator.trim().to_ascii_lowercase().as_str() {
            "=" | "==" => Comparison::Equal(single(&mut values)?),
            ">" => Comparison::GreaterThan(single(&mut values)?),
            "<" => Comparison::LessThan(single(&mut values)?),
            "in" => Comparison::In(values),
            other => return Err(PlanError::UnsupportedPredicate(other.to_string())),
        };

        Ok(Self::new(field, comparison))
    }

    /// 紀錄是否符合條件（欄位缺漏或型別不同一律不符合）
    pub fn matches(&self, record: &Record) -> bool {
        let Some(value) = record.get(&self.field) else {
            return false;
        };

        match &self.comparison {
            Comparison::Equal(expected) => value == expected,
            Comparison::GreaterThan(bound) => value.compare(bound) == Some(Ordering::Greater),
            Comparison::LessThan(bound) => value.compare(bound) == Some(Ordering::Less),
            Comparison::In(set) => set.contains(value),
        }
    }
}

/// 篩選符合條件的紀錄（保留原順序）
pub fn select(records: &[Record], predicate: &Predicate) -> Vec<Record> {
    records
        .iter()
        .filter(|r| predicate.matches(r))
        .cloned()
        .collect()
}

/// 只保留指定欄位（識別碼保留）
pub fn project(records: &[Record], fields: &[&str]) -> Vec<Record> {
    records
        .iter()
        .map(|r| Record {
            key: r.key.clone(),
            fields: r
                .fields
                .iter()
                .filter(|(name, _)| fields.contains(&name.as_str()))
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
        })
        .collect()
}
