//! 資源、資源需求與產能約束模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::record::{AsRecord, FieldValue, Record};

/// 資源（工作中心、機台、人力等）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    /// 資源ID
    pub resource_id: String,

    /// 描述
    pub description: String,
}

impl Resource {
    pub fn new(resource_id: impl Into<String>) -> Self {
        Self {
            resource_id: resource_id.into(),
            description: String::new(),
        }
    }

    /// 建構器模式：設置描述
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl AsRecord for Resource {
    fn to_record(&self) -> Record {
        Record::new(self.resource_id.clone())
            .with("resource", FieldValue::text(&self.resource_id))
            .with("description", FieldValue::text(&self.description))
    }
}

/// 資源需求：每生產一單位物料所消耗的資源工時
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequirementEntry {
    /// 資源ID
    pub resource_id: String,

    /// 物料ID
    pub item_id: String,

    /// 單位工時
    pub hours_per_unit: Decimal,

    /// 製程版本（僅供參考）
    pub routing_version: Option<String>,
}

impl RequirementEntry {
    pub fn new(
        resource_id: impl Into<String>,
        item_id: impl Into<String>,
        hours_per_unit: Decimal,
    ) -> Self {
        Self {
            resource_id: resource_id.into(),
            item_id: item_id.into(),
            hours_per_unit,
            routing_version: None,
        }
    }

    /// 建構器模式：設置製程版本
    pub fn with_routing_version(mut self, version: impl Into<String>) -> Self {
        self.routing_version = Some(version.into());
        self
    }
}

impl AsRecord for RequirementEntry {
    fn to_record(&self) -> Record {
        let mut record = Record::new(format!("{}/{}", self.resource_id, self.item_id))
            .with("resource", FieldValue::text(&self.resource_id))
            .with("item", FieldValue::text(&self.item_id))
            .with("hours", FieldValue::Number(self.hours_per_unit));
        if let Some(version) = &self.routing_version {
            record = record.with("version", FieldValue::text(version));
        }
        record
    }
}

/// 產能約束：資源在某期間的可用工時
///
/// 未出現在約束集合中的資源視為無限產能，不參與稼動率分析。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstraintEntry {
    /// 資源ID
    pub resource_id: String,

    /// 期間ID
    pub period_id: String,

    /// 可用工時
    pub available_hours: Decimal,
}

impl ConstraintEntry {
    pub fn new(
        resource_id: impl Into<String>,
        period_id: impl Into<String>,
        available_hours: Decimal,
    ) -> Self {
        Self {
            resource_id: resource_id.into(),
            period_id: period_id.into(),
            available_hours,
        }
    }
}

impl AsRecord for ConstraintEntry {
    fn to_record(&self) -> Record {
        Record::new(format!("{}/{}", self.resource_id, self.period_id))
            .with("resource", FieldValue::text(&self.resource_id))
            .with("period", FieldValue::text(&self.period_id))
            .with("hours", FieldValue::Number(self.available_hours))
    }
}
