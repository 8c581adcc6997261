//! # 批量处理模块
//!
//! 批处理驱动：枚举掩码匹配的文件，并行调用变换引擎，汇总结果并发出事件。
//!
//! ## 功能
//! - 枚举输入目录中匹配掩码的普通文件
//! - 冲突安全的输出命名
//! - 并行处理与协作式取消
//! - 生命周期事件与统计
//!
//! ## 依赖关系
//! - 被 `commands/run.rs` 使用
//! - 使用 `rayon` 进行并行处理
//! - 使用 `transform/` 处理单个文件

pub mod collector;
pub mod events;
pub mod naming;
pub mod runner;

pub use events::BatchEvent;
pub use runner::{BatchResult, BatchRunner, ProcessResult};
