//! # xorbatch - 批量 XOR 文件变换工具
//!
//! 将输入目录中匹配掩码的文件逐字节与 8 字节循环密钥异或后写入输出目录。
//! XOR 是自逆的：用同一密钥再处理一次即可还原。这只是混淆，不是加密。
//!
//! ## 子命令
//! - `run`      - 执行批处理（可选定时重复）
//! - `settings` - 查看或重置持久化设置
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── batch/     (批处理驱动)
//!   │     ├── transform/ (流式 XOR 引擎)
//!   │     └── models/    (配置、密钥、设置)
//!   ├── cancel.rs   (取消令牌)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cancel;
mod cli;
mod commands;
mod error;
mod models;
mod transform;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
