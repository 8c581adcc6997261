//! # 变换引擎模块
//!
//! 单文件的缓冲 XOR 流式处理。
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 使用
//! - 子模块: engine

pub mod engine;

pub use engine::{TransformEngine, TransformOutcome};
