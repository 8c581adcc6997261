//! # 持久化设置
//!
//! 启动时读取、保存时写回的用户设置，JSON 格式。
//! 缺失的文件或字段使用默认值：掩码 `*.*`、覆盖输出、不删除源文件、
//! 定时器关闭、间隔 60 秒、密钥全 0。
//!
//! ## 依赖关系
//! - 被 `commands/run.rs`, `commands/settings.rs` 使用
//! - 使用 `serde` / `serde_json`

use super::config::{BatchConfig, InputMask};
use super::key::XorKey;
use crate::error::{ConfigError, Result, XorBatchError};

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

/// 用户设置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub input_dir: String,
    pub output_dir: String,
    pub file_mask: String,
    pub delete_input: bool,
    pub overwrite: bool,
    pub timer_enabled: bool,
    pub timer_interval_secs: u64,
    /// 空格分隔的十六进制字节
    pub xor_key: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            input_dir: String::new(),
            output_dir: String::new(),
            file_mask: "*.*".to_string(),
            delete_input: false,
            overwrite: true,
            timer_enabled: false,
            timer_interval_secs: 60,
            xor_key: XorKey::default().to_string(),
        }
    }
}

impl Settings {
    /// 读取设置文件，文件不存在时返回默认值
    pub fn load(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "settings file absent, using defaults");
                return Ok(Settings::default());
            }
            Err(e) => {
                return Err(XorBatchError::SettingsRead {
                    path: path.display().to_string(),
                    source: e,
                })
            }
        };
        Ok(serde_json::from_str(&text)?)
    }

    /// 写回设置文件
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text).map_err(|e| XorBatchError::SettingsWrite {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// 校验并构造批处理配置
    pub fn to_batch_config(&self) -> std::result::Result<BatchConfig, ConfigError> {
        let key: XorKey = self.xor_key.parse()?;
        let input = InputMask::new(self.input_dir.trim(), self.file_mask.trim())?;
        BatchConfig::new(
            input,
            self.output_dir.trim(),
            self.delete_input,
            self.overwrite,
            key,
        )
    }

    /// 重复模式的间隔；定时器关闭时为 `None`
    pub fn repeat_interval(&self) -> std::result::Result<Option<Duration>, ConfigError> {
        if !self.timer_enabled {
            return Ok(None);
        }
        if self.timer_interval_secs == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(Some(Duration::from_secs(self.timer_interval_secs)))
    }
}
