//! # settings 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/settings.rs`

use clap::Args;

/// settings 子命令参数
#[derive(Args, Debug)]
pub struct SettingsArgs {
    /// Reset the settings file to defaults
    #[arg(long, default_value_t = false)]
    pub reset: bool,
}
