//! # 文件收集器
//!
//! 根据输入掩码收集待处理文件列表。
//!
//! ## 功能
//! - 只扫描掩码目录本身，不递归
//! - 只收集普通文件（跟随指向普通文件的符号链接）
//! - 单一 glob 模式匹配文件名
//! - 结果在枚举时一次性快照，运行中新增/删除的文件不会被感知
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 调用
//! - 使用 `walkdir` 遍历目录

use crate::error::{Result, XorBatchError};
use crate::models::InputMask;

use std::path::PathBuf;
use walkdir::WalkDir;

/// 文件收集器
pub struct FileCollector<'a> {
    mask: &'a InputMask,
}

impl<'a> FileCollector<'a> {
    /// 创建新的文件收集器
    pub fn new(mask: &'a InputMask) -> Self {
        Self { mask }
    }

    /// 收集所有匹配的文件（按路径排序）
    pub fn collect(&self) -> Result<Vec<PathBuf>> {
        let dir = self.mask.dir();
        if !dir.is_dir() {
            return Err(XorBatchError::DirectoryNotFound {
                path: dir.display().to_string(),
            });
        }

        let mut files: Vec<PathBuf> = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| {
                e.file_name()
                    .to_str()
                    .map(|name| self.mask.matches(name))
                    .unwrap_or(false)
            })
            .map(|e| e.into_path())
            .collect();

        files.sort();
        Ok(files)
    }
}
