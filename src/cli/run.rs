//! # run 子命令 CLI 定义
//!
//! 每个选项覆盖设置文件中的对应字段，未给出的字段沿用设置文件。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/run.rs`

use crate::models::Settings;

use clap::Args;
use std::path::PathBuf;

/// run 子命令参数
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Directory containing the input files
    #[arg(short, long)]
    pub input_dir: Option<String>,

    /// Directory receiving the transformed files
    #[arg(short, long)]
    pub output_dir: Option<String>,

    /// File name mask, e.g. "*.*" or "*.bin"
    #[arg(short, long)]
    pub mask: Option<String>,

    /// XOR key as 8 space-separated hex bytes, e.g. "DE AD BE EF 00 11 22 33"
    #[arg(short, long)]
    pub key: Option<String>,

    /// Delete each input file after it was transformed successfully
    #[arg(long)]
    pub delete_input: Option<bool>,

    /// Overwrite existing output files instead of appending _N to the name
    #[arg(long)]
    pub overwrite: Option<bool>,

    /// Repeat the batch on a fixed interval until interrupted
    #[arg(long)]
    pub timer: Option<bool>,

    /// Repeat interval in seconds
    #[arg(long)]
    pub interval: Option<u64>,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,

    /// Read/write buffer size per file in KiB
    #[arg(long, default_value_t = 1024)]
    pub buffer_kib: usize,

    /// Write a per-file CSV report after each batch
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Persist the effective settings before running
    #[arg(long, default_value_t = false)]
    pub save: bool,
}

impl RunArgs {
    /// 将命令行覆盖合并到设置上
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(v) = &self.input_dir {
            settings.input_dir = v.clone();
        }
        if let Some(v) = &self.output_dir {
            settings.output_dir = v.clone();
        }
        if let Some(v) = &self.mask {
            settings.file_mask = v.clone();
        }
        if let Some(v) = &self.key {
            settings.xor_key = v.clone();
        }
        if let Some(v) = self.delete_input {
            settings.delete_input = v;
        }
        if let Some(v) = self.overwrite {
            settings.overwrite = v;
        }
        if let Some(v) = self.timer {
            settings.timer_enabled = v;
        }
        if let Some(v) = self.interval {
            settings.timer_interval_secs = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    #[test]
    fn test_overrides_only_given_fields() {
        let mut settings = Settings {
            input_dir: "saved_in".to_string(),
            output_dir: "saved_out".to_string(),
            ..Settings::default()
        };
        let args = RunArgs {
            input_dir: None,
            output_dir: Some("cli_out".to_string()),
            mask: None,
            key: None,
            delete_input: None,
            overwrite: Some(false),
            timer: None,
            interval: None,
            jobs: 0,
            buffer_kib: 1024,
            report: None,
            save: false,
        };
        args.apply_to(&mut settings);

        assert_eq!(settings.input_dir, "saved_in");
        assert_eq!(settings.output_dir, "cli_out");
        assert!(!settings.overwrite);
        assert_eq!(settings.file_mask, "*.*");
    }

    #[test]
    fn test_parse_run_command() {
        let cli = Cli::parse_from([
            "xorbatch",
            "run",
            "-i",
            "in",
            "-o",
            "out",
            "--key",
            "01 02 03 04 05 06 07 08",
            "--delete-input",
            "true",
            "--jobs",
            "4",
        ]);
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.input_dir.as_deref(), Some("in"));
                assert_eq!(args.delete_input, Some(true));
                assert_eq!(args.overwrite, None);
                assert_eq!(args.jobs, 4);
                assert_eq!(args.buffer_kib, 1024);
            }
            _ => panic!("expected run command"),
        }
    }
}
