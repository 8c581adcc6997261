//! # 输出路径解析
//!
//! 不覆盖模式下，若目标文件已存在则在扩展名前追加 `_N`
//! (N 从 1 递增) 直到不冲突：`out.txt` -> `out_1.txt` -> `out_2.txt`。
//!
//! 同一次运行内的并发任务通过共享的保留集合串行化查找，
//! 已被其他任务选中的名字视为已存在。其他进程的并发写入不在保护范围内。
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 调用

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// 一次运行内的输出路径分配器
#[derive(Debug, Default)]
pub struct OutputNamer {
    reserved: Mutex<HashSet<PathBuf>>,
}

impl OutputNamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 为 `file_name` 在 `output_dir` 中分配输出路径
    pub fn resolve(&self, output_dir: &Path, file_name: &str, overwrite: bool) -> PathBuf {
        let naive = output_dir.join(file_name);
        if overwrite {
            return naive;
        }

        let mut reserved = match self.reserved.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let taken = |p: &Path| p.exists() || reserved.contains(p);

        let mut candidate = naive.clone();
        let mut counter: u32 = 1;
        while taken(&candidate) {
            candidate = output_dir.join(numbered_name(file_name, counter));
            counter += 1;
        }

        reserved.insert(candidate.clone());
        candidate
    }
}

/// `name.ext` -> `name_N.ext`，无扩展名时 `name` -> `name_N`
fn numbered_name(file_name: &str, n: u32) -> String {
    let path = Path::new(file_name);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}_{}.{}", stem, n, ext),
        None => format!("{}_{}", stem, n),
    }
}
