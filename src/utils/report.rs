//! # 批处理报告导出
//!
//! 将每个文件的处理结果导出为 CSV：
//! `file,output,outcome,bytes,message`
//!
//! ## 依赖关系
//! - 被 `commands/run.rs` 调用
//! - 使用 `batch/runner.rs` 的 BatchResult 结构
//! - 使用 `csv` 库写入 CSV 文件

use crate::batch::{BatchResult, ProcessResult};
use crate::error::{Result, XorBatchError};

use std::path::Path;

/// 导出批处理结果为 CSV 格式
pub fn to_csv(result: &BatchResult, output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    wtr.write_record(["file", "output", "outcome", "bytes", "message"])?;

    let mut rows: Vec<&ProcessResult> = result.results.iter().collect();
    rows.sort_by(|a, b| a.file().cmp(b.file()));

    for row in rows {
        let record = match row {
            ProcessResult::Processed {
                file,
                output,
                bytes,
            } => [
                file.clone(),
                output.display().to_string(),
                "processed".to_string(),
                bytes.to_string(),
                String::new(),
            ],
            ProcessResult::Failed {
                file,
                output,
                message,
            } => [
                file.clone(),
                display_opt(output.as_deref()),
                "failed".to_string(),
                String::new(),
                message.clone(),
            ],
            ProcessResult::Cancelled {
                file,
                output,
                bytes,
            } => [
                file.clone(),
                display_opt(output.as_deref()),
                "cancelled".to_string(),
                bytes.to_string(),
                String::new(),
            ],
        };
        wtr.write_record(&record)?;
    }

    wtr.flush().map_err(|e| XorBatchError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

fn display_opt(path: Option<&Path>) -> String {
    path.map(|p| p.display().to_string()).unwrap_or_default()
}
