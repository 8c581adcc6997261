//! # 取消令牌
//!
//! 在所有并发任务间共享的一次性取消标志。写入一次（停止请求），
//! 各任务在每个分块边界读取；不会中断正在进行的阻塞读写。
//!
//! ## 依赖关系
//! - 被 `transform/`, `batch/runner.rs`, `commands/run.rs` 使用

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// 可克隆的取消令牌
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// 请求取消
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// 新一轮运行开始前清除标志
    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
