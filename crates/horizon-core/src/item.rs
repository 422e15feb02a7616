//! 物料模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::record::{AsRecord, FieldValue, Record};

/// 計劃策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PlanningStrategy {
    /// 不保留緩衝庫存
    #[default]
    None,
    /// 快速回應（安全庫存覆蓋 8 天）
    ReactiveFast,
    /// 慢速回應（安全庫存覆蓋 20 天）
    ReactiveSlow,
}

impl PlanningStrategy {
    /// 是否為回應型策略（需要安全庫存與週期庫存）
    pub fn is_reactive(&self) -> bool {
        matches!(self, PlanningStrategy::ReactiveFast | PlanningStrategy::ReactiveSlow)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanningStrategy::None => "None",
            PlanningStrategy::ReactiveFast => "ReactiveFast",
            PlanningStrategy::ReactiveSlow => "ReactiveSlow",
        }
    }
}

/// 物料
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// 物料ID
    pub item_id: String,

    /// 描述
    pub description: String,

    /// 計劃策略
    pub strategy: PlanningStrategy,

    /// 固定訂購量（FOQ）
    pub fixed_order_qty: Decimal,

    /// 現有庫存（負值代表欠貨）
    pub on_hand_qty: Decimal,
}

impl Item {
    /// 創建新的物料
    pub fn new(item_id: impl Into<String>, strategy: PlanningStrategy) -> Self {
        Self {
            item_id: item_id.into(),
            description: String::new(),
            strategy,
            fixed_order_qty: Decimal::ZERO,
            on_hand_qty: Decimal::ZERO,
        }
    }

    /// 建構器模式：設置描述
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// 建構器模式：設置固定訂購量
    pub fn with_fixed_order_qty(mut self, qty: Decimal) -> Self {
        self.fixed_order_qty = qty;
        self
    }

    /// 建構器模式：設置現有庫存
    pub fn with_on_hand_qty(mut self, qty: Decimal) -> Self {
        self.on_hand_qty = qty;
        self
    }

    /// 是否處於欠貨狀態
    pub fn is_backordered(&self) -> bool {
        self.on_hand_qty < Decimal::ZERO
    }
}

impl AsRecord for Item {
    fn to_record(&self) -> Record {
        Record::new(self.item_id.clone())
            .with("item", FieldValue::text(&self.item_id))
            .with("description", FieldValue::text(&self.description))
            .with("strategy", FieldValue::text(self.strategy.as_str()))
            .with("foq", FieldValue::Number(self.fixed_order_qty))
            .with("on_hand", FieldValue::Number(self.on_hand_qty))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_item() {
        let item = Item::new("FG-100", PlanningStrategy::ReactiveFast)
            .with_description("成品 100")
            .with_fixed_order_qty(Decimal::from(2772))
            .with_on_hand_qty(Decimal::from(13000));

        assert_eq!(item.item_id, "FG-100");
        assert_eq!(item.fixed_order_qty, Decimal::from(2772));
        assert!(item.strategy.is_reactive());
        assert!(!item.is_backordered());
    }

    #[test]
    fn test_backordered_item() {
        let item = Item::new("FG-200", PlanningStrategy::None).with_on_hand_qty(Decimal::from(-40));

        assert!(item.is_backordered());
        assert!(!item.strategy.is_reactive());
    }

    #[test]
    fn test_item_record_fields() {
        let record = Item::new("FG-300", PlanningStrategy::ReactiveSlow)
            .with_fixed_order_qty(Decimal::from(500))
            .to_record();

        assert_eq!(record.key, "FG-300");
        assert_eq!(record.get("strategy"), Some(&FieldValue::text("ReactiveSlow")));
        assert_eq!(record.number("foq"), Some(Decimal::from(500)));
    }
}
