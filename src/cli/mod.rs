//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `run`: 执行批量 XOR 变换（可定时重复）
//! - `settings`: 查看或重置持久化设置
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: run, settings

pub mod run;
pub mod settings;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// xorbatch - 批量 XOR 文件变换工具
#[derive(Parser)]
#[command(name = "xorbatch")]
#[command(version)]
#[command(about = "Batch XOR transform of files matching a mask", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path of the persisted settings file
    #[arg(long, global = true, env = "XORBATCH_SETTINGS", default_value = "xorbatch.json")]
    pub settings: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Transform all files matching the mask (optionally on a repeat timer)
    Run(run::RunArgs),

    /// Show or reset the persisted settings
    Settings(settings::SettingsArgs),
}
