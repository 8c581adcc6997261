//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `batch/`, `models/`, `utils/`
//! - 子模块: run, settings

pub mod run;
pub mod settings;

use crate::cli::Cli;
use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run(args) => run::execute(args, &cli.settings),
        Commands::Settings(args) => settings::execute(args, &cli.settings),
    }
}
