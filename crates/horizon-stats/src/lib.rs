//! # Horizon Stats
//!
//! 統計引擎：分佈摘要、異常值修剪、常態反函數與績效週期時間

pub mod cycle_time;
pub mod norm;
pub mod summary;

// Re-export 主要類型
pub use cycle_time::{keyed_cycle_times, performance_cycle_times};
pub use norm::norm_inverse;
pub use summary::{summarize, summarize_records, StatisticalSummary};
