//! # 流式 XOR 引擎
//!
//! 以固定大小分块流式处理单个文件。
//!
//! ## 行为
//! - 每次读取分块前检查取消标志，取消后立即停止并保留已写出的部分输出
//! - 密钥按文件全局字节偏移循环，与分块大小无关
//! - 每个分块后报告 0–100 的进度百分比，单文件内单调不减
//! - 成功要求：未取消，且处理字节数等于打开时的输入大小
//! - 输出路径指向输入文件本身时拒绝处理，不截断源文件
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 调用
//! - 使用 `models/key.rs`, `cancel.rs`

use crate::cancel::CancelToken;
use crate::error::{Result, XorBatchError};
use crate::models::XorKey;

use std::fs::{self, File};
use std::io::{ErrorKind, Read, Write};
use std::path::Path;

/// 默认分块大小 (1 MiB)
pub const DEFAULT_CHUNK_SIZE: usize = 1024 * 1024;

/// 单文件处理的终止状态（错误通过 `Err` 返回）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformOutcome {
    /// 完整处理
    Completed { bytes: u64 },
    /// 在分块边界被取消，输出文件不完整
    Cancelled { bytes: u64 },
}

/// 单次变换的参数：密钥、取消令牌，以及错误消息中使用的路径
#[derive(Debug, Clone, Copy)]
pub struct StreamContext<'a> {
    pub key: &'a XorKey,
    pub cancel: &'a CancelToken,
    pub input: &'a Path,
    pub output: &'a Path,
}

/// XOR 变换引擎
#[derive(Debug, Clone, Copy)]
pub struct TransformEngine {
    chunk_size: usize,
}

impl Default for TransformEngine {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}

impl TransformEngine {
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    /// 变换 `input` 并写入 `output`（创建或截断）
    pub fn transform_file<F>(
        &self,
        input: &Path,
        output: &Path,
        key: &XorKey,
        cancel: &CancelToken,
        on_progress: F,
    ) -> Result<TransformOutcome>
    where
        F: FnMut(u8),
    {
        let reader = File::open(input).map_err(|e| XorBatchError::OpenInput {
            path: input.display().to_string(),
            source: e,
        })?;

        let total = reader
            .metadata()
            .map_err(|e| XorBatchError::OpenInput {
                path: input.display().to_string(),
                source: e,
            })?
            .len();

        // File::create 会先截断输出，必须在此之前拦截
        if is_same_file(input, output) {
            return Err(XorBatchError::SameFile {
                path: output.display().to_string(),
            });
        }

        let writer = File::create(output).map_err(|e| XorBatchError::OpenOutput {
            path: output.display().to_string(),
            source: e,
        })?;

        let ctx = StreamContext {
            key,
            cancel,
            input,
            output,
        };
        self.transform_stream(reader, writer, total, &ctx, on_progress)
    }

    /// 核心循环，与具体 I/O 类型无关
    pub fn transform_stream<R, W, F>(
        &self,
        mut reader: R,
        mut writer: W,
        total: u64,
        ctx: &StreamContext<'_>,
        mut on_progress: F,
    ) -> Result<TransformOutcome>
    where
        R: Read,
        W: Write,
        F: FnMut(u8),
    {
        let mut buffer = vec![0u8; self.chunk_size];
        let mut processed: u64 = 0;

        loop {
            if ctx.cancel.is_cancelled() {
                tracing::debug!(
                    file = %ctx.input.display(),
                    processed,
                    "transform cancelled"
                );
                return Ok(TransformOutcome::Cancelled { bytes: processed });
            }

            let n = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(XorBatchError::ReadError {
                        path: ctx.input.display().to_string(),
                        source: e,
                    })
                }
            };

            let chunk = &mut buffer[..n];
            ctx.key.apply(chunk, processed);

            writer
                .write_all(chunk)
                .map_err(|e| XorBatchError::WriteError {
                    path: ctx.output.display().to_string(),
                    source: e,
                })?;

            processed += n as u64;
            on_progress(percent(processed, total));
        }

        writer.flush().map_err(|e| XorBatchError::WriteError {
            path: ctx.output.display().to_string(),
            source: e,
        })?;

        if processed != total {
            return Err(XorBatchError::SizeMismatch {
                path: ctx.input.display().to_string(),
                expected: total,
                actual: processed,
            });
        }

        Ok(TransformOutcome::Completed { bytes: processed })
    }
}

/// 两个路径是否解析到同一文件（输出尚不存在时为 false）
fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// 进度百分比，文件在处理中变大时截断到 100
fn percent(processed: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    (processed.saturating_mul(100) / total).min(100) as u8
}
