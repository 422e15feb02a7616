//! 進度回報
//!
//! 計算元件不直接寫日誌，而是把事件交給注入的 [`PlanObserver`]。
//! 觀察者只做回報，永遠不影響計算結果。

use rust_decimal::Decimal;
use std::sync::Mutex;

use crate::config::Verbosity;

/// 計算過程中的事件
#[derive(Debug, Clone, PartialEq)]
pub enum PlanEvent {
    /// 開始計算
    RunStarted {
        items: usize,
        periods: usize,
        resources: usize,
    },

    /// 單一物料完成水平計劃
    ItemPlanned {
        item_id: String,
        safety_stock: Decimal,
        cycle_stock: Decimal,
        total_production: Decimal,
    },

    /// 單一物料計算失敗（該物料被略過）
    ItemFailed { item_id: String, reason: String },

    /// 單一資源無法計算稼動率（該資源不列入 RYG）
    ResourceSkipped { resource_id: String, reason: String },

    /// 矩陣階段完成
    StageCompleted {
        stage: String,
        rows: usize,
        columns: usize,
    },

    /// 計算結束
    RunFinished {
        planned_items: usize,
        failed_items: usize,
        elapsed_ms: u128,
    },
}

impl PlanEvent {
    /// 事件需要的最低詳細程度
    pub fn verbosity(&self) -> Verbosity {
        match self {
            PlanEvent::ItemPlanned { .. } | PlanEvent::StageCompleted { .. } => Verbosity::Verbose,
            _ => Verbosity::Concise,
        }
    }
}

/// 進度觀察者
pub trait PlanObserver: Send + Sync {
    fn notify(&self, event: &PlanEvent);
}

/// 不回報任何事件
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentObserver;

impl PlanObserver for SilentObserver {
    fn notify(&self, _event: &PlanEvent) {}
}

/// 轉送到 tracing
#[derive(Debug, Clone, Copy)]
pub struct TracingObserver {
    verbosity: Verbosity,
}

impl TracingObserver {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new(Verbosity::Concise)
    }
}

impl PlanObserver for TracingObserver {
    fn notify(&self, event: &PlanEvent) {
        if self.verbosity == Verbosity::Silent || event.verbosity() > self.verbosity {
            return;
        }

        match event {
            PlanEvent::RunStarted {
                items,
                periods,
                resources,
            } => {
                tracing::info!(
                    "開始計劃計算：物料 {} 筆，期間 {} 個，資源 {} 個",
                    items,
                    periods,
                    resources
                );
            }
            PlanEvent::ItemPlanned {
                item_id,
                safety_stock,
                cycle_stock,
                total_production,
            } => {
                tracing::debug!(
                    "物料 {} 安全庫存 {}，週期庫存 {}，總生產量 {}",
                    item_id,
                    safety_stock,
                    cycle_stock,
                    total_production
                );
            }
            PlanEvent::ItemFailed { item_id, reason } => {
                tracing::warn!("物料 {} 計算失敗: {}", item_id, reason);
            }
            PlanEvent::ResourceSkipped {
                resource_id,
                reason,
            } => {
                tracing::warn!("資源 {} 無法計算稼動率: {}", resource_id, reason);
            }
            PlanEvent::StageCompleted {
                stage,
                rows,
                columns,
            } => {
                tracing::debug!("{} 完成：{} 列 × {} 欄", stage, rows, columns);
            }
            PlanEvent::RunFinished {
                planned_items,
                failed_items,
                elapsed_ms,
            } => {
                tracing::info!(
                    "計劃計算完成，耗時 {} ms；成功 {} 筆，失敗 {} 筆",
                    elapsed_ms,
                    planned_items,
                    failed_items
                );
            }
        }
    }
}

/// 把事件保存在記憶體（測試與嵌入端使用）
#[derive(Debug, Default)]
pub struct RecordingObserver {
    verbosity: Verbosity,
    events: Mutex<Vec<PlanEvent>>,
}

impl RecordingObserver {
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            events: Mutex::new(Vec::new()),
        }
    }

    /// 目前收到的事件
    pub fn events(&self) -> Vec<PlanEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl PlanObserver for RecordingObserver {
    fn notify(&self, event: &PlanEvent) {
        if self.verbosity == Verbosity::Silent || event.verbosity() > self.verbosity {
            return;
        }
        let mut events = match self.events.lock() {
            Ok(events) => events,
            Err(poisoned) => poisoned.into_inner(),
        };
        events.push(event.clone());
    }
}
