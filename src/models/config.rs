//! # 批处理配置记录
//!
//! 一次批处理运行期间不可变的配置：输入掩码（目录 + 单一文件名模式）、
//! 输出目录、删除源文件、覆盖输出、XOR 密钥。
//!
//! 所有校验都在这里完成，核心模块拿到的 `BatchConfig` 一定是合法的。
//!
//! ## 依赖关系
//! - 被 `batch/`, `commands/run.rs` 使用
//! - 使用 `models/key.rs`
//! - 使用 `glob` 校验文件名模式

use super::key::XorKey;
use crate::error::ConfigError;

use std::path::{Path, PathBuf};

/// 输入掩码：目录 + 文件名通配模式（如 `*.*`, `*.txt`, `data_??.bin`）
#[derive(Debug, Clone)]
pub struct InputMask {
    dir: PathBuf,
    pattern: glob::Pattern,
}

impl InputMask {
    /// 由目录和文件名模式构造
    pub fn new(dir: impl Into<PathBuf>, pattern: &str) -> Result<Self, ConfigError> {
        let dir = dir.into();
        if dir.as_os_str().is_empty() {
            return Err(ConfigError::EmptyPath {
                field: "input directory",
            });
        }
        if pattern.is_empty() {
            return Err(ConfigError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: "mask is empty".to_string(),
            });
        }
        if pattern.contains('/') || pattern.contains(std::path::MAIN_SEPARATOR) {
            return Err(ConfigError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: "mask must be a file name pattern, not a path".to_string(),
            });
        }
        let pattern = glob::Pattern::new(pattern).map_err(|e| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { dir, pattern })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// 文件名是否匹配模式
    pub fn matches(&self, file_name: &str) -> bool {
        self.pattern.matches(file_name)
    }
}

/// 批处理配置
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub input: InputMask,
    pub output_dir: PathBuf,
    pub delete_input: bool,
    pub overwrite: bool,
    pub key: XorKey,
}

impl BatchConfig {
    pub fn new(
        input: InputMask,
        output_dir: impl Into<PathBuf>,
        delete_input: bool,
        overwrite: bool,
        key: XorKey,
    ) -> Result<Self, ConfigError> {
        let output_dir = output_dir.into();
        if output_dir.as_os_str().is_empty() {
            return Err(ConfigError::EmptyPath {
                field: "output directory",
            });
        }
        Ok(Self {
            input,
            output_dir,
            delete_input,
            overwrite,
            key,
        })
    }
}
