//! # 统一错误处理模块
//!
//! 定义 xorbatch 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 错误分层
//! - `ConfigError`: 配置错误，在任何文件 I/O 之前被拒绝
//! - 文件级错误 (`OpenInput` / `OpenOutput` / `ReadError` / `WriteError` /
//!   `SameFile` / `SizeMismatch`): 只影响单个文件，批处理继续
//! - 运行级错误: 目录缺失、重入、设置文件读写
//!
//! 取消不是错误，见 `transform::TransformOutcome::Cancelled`。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// xorbatch 统一错误类型
#[derive(Error, Debug)]
pub enum XorBatchError {
    // ─────────────────────────────────────────────────────────────
    // 配置错误
    // ─────────────────────────────────────────────────────────────
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    // ─────────────────────────────────────────────────────────────
    // 单文件 I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Cannot open input file: {path}")]
    OpenInput {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot create output file: {path}")]
    OpenOutput {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Error reading file: {path}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Error writing to file: {path}")]
    WriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Output would overwrite its own input: {path}")]
    SameFile { path: String },

    #[error("Input size changed while processing {path}: expected {expected} bytes, processed {actual}")]
    SizeMismatch {
        path: String,
        expected: u64,
        actual: u64,
    },

    // ─────────────────────────────────────────────────────────────
    // 运行级错误
    // ─────────────────────────────────────────────────────────────
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("A batch run is already in progress")]
    RunInProgress,

    // ─────────────────────────────────────────────────────────────
    // 设置文件错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read settings: {path}")]
    SettingsRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write settings: {path}")]
    SettingsWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed settings file: {0}")]
    SettingsParse(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // CSV 错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// 配置错误，在运行开始前由边界层检出
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("XOR key must be exactly 8 bytes, got {found}")]
    KeyLength { found: usize },

    #[error("Invalid hex byte in XOR key: '{token}'")]
    InvalidKeyToken { token: String },

    #[error("{field} must not be empty")]
    EmptyPath { field: &'static str },

    #[error("Invalid file mask '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Repeat interval must be greater than zero")]
    ZeroInterval,
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, XorBatchError>;
