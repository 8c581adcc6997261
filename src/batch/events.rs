//! # 批处理事件
//!
//! 核心向任意监听者发出的类型化事件，不依赖任何 UI。
//! 回调在工作线程中被调用，不同文件的事件之间没有顺序保证。
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 发出
//! - 被 `commands/run.rs` 消费

/// 批处理事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    /// 枚举完成，即将处理 `total` 个文件
    Started { total: usize },
    /// 当前文件的处理进度 (0–100)
    Progress { file: String, percent: u8 },
    /// 文件处理成功
    FileProcessed { file: String },
    /// 单文件错误，不影响其他文件
    Error { message: String },
    /// 所有任务进入终止状态，每次运行恰好一次
    Finished { summary: BatchSummary },
}

/// `Finished` 事件携带的计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub failed: usize,
    pub cancelled: usize,
}

/// 事件回调类型
///
/// 监听方可以借用调用方栈上的状态，只要求在 `run` 返回前有效
pub type EventCallback<'a> = dyn Fn(&BatchEvent) + Send + Sync + 'a;
