//! # run 命令实现
//!
//! 合并设置文件与命令行覆盖，校验配置后执行批处理。
//!
//! ## 功能
//! - 设置文件 + 命令行覆盖 -> 校验后的 `BatchConfig`
//! - 进度条显示当前文件及百分比
//! - Ctrl-C 请求取消当前批次并结束重复模式
//! - 重复模式：按固定间隔重新枚举并处理
//! - 可选 CSV 报告
//!
//! ## 依赖关系
//! - 使用 `cli/run.rs` 定义的参数
//! - 使用 `batch/`, `models/`
//! - 使用 `utils/output.rs`, `utils/progress.rs`, `utils/report.rs`

use crate::batch::events::BatchSummary;
use crate::batch::{BatchEvent, BatchResult, BatchRunner};
use crate::cancel::CancelToken;
use crate::cli::run::RunArgs;
use crate::error::{Result, XorBatchError};
use crate::models::{BatchConfig, Settings};
use crate::transform::TransformEngine;
use crate::utils::{output, progress, report};

use std::fs;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

/// 重复模式等待期间检查 Ctrl-C 的间隔
const WAIT_POLL: Duration = Duration::from_millis(200);

/// 执行 run 命令
pub fn execute(args: RunArgs, settings_path: &Path) -> Result<()> {
    output::print_header("XOR Batch Transform");

    let mut settings = Settings::load(settings_path)?;
    args.apply_to(&mut settings);

    let config = settings.to_batch_config()?;
    let interval = settings.repeat_interval()?;

    if args.save {
        settings.save(settings_path)?;
        output::print_info(&format!("Settings saved to '{}'", settings_path.display()));
    }

    // 验证输入目录
    if !config.input.dir().is_dir() {
        return Err(XorBatchError::DirectoryNotFound {
            path: config.input.dir().display().to_string(),
        });
    }

    // 创建输出目录
    fs::create_dir_all(&config.output_dir).map_err(|e| XorBatchError::FileWriteError {
        path: config.output_dir.display().to_string(),
        source: e,
    })?;

    let runner = BatchRunner::new(args.jobs)
        .with_engine(TransformEngine::new(args.buffer_kib.saturating_mul(1024)));
    output::print_info(&format!(
        "Input: '{}' (mask '{}') -> output: '{}'",
        config.input.dir().display(),
        config.input.pattern(),
        config.output_dir.display()
    ));
    output::print_info(&format!(
        "Key: {} | overwrite: {} | delete input: {} | jobs: {}",
        config.key,
        config.overwrite,
        config.delete_input,
        runner.jobs()
    ));

    let shutdown = CancelToken::new();
    install_interrupt_handler(runner.cancel_token(), shutdown.clone())?;

    let Some(interval) = interval else {
        run_once(&runner, &config, args.report.as_deref(), &shutdown)?;
        return Ok(());
    };

    output::print_info(&format!(
        "Repeat mode: every {}s, press Ctrl-C to stop",
        interval.as_secs()
    ));

    // 重复模式下单次批处理的错误不终止循环
    while !shutdown.is_cancelled() {
        if let Err(e) = run_once(&runner, &config, args.report.as_deref(), &shutdown) {
            output::print_error(&e.to_string());
        }
        wait_for_next_run(interval, &shutdown);
    }

    output::print_done("Repeat mode stopped");
    Ok(())
}

/// Ctrl-C：取消进行中的批次并结束重复模式
fn install_interrupt_handler(batch_cancel: CancelToken, shutdown: CancelToken) -> Result<()> {
    ctrlc::set_handler(move || {
        shutdown.cancel();
        batch_cancel.cancel();
    })
    .map_err(|e| XorBatchError::Other(format!("Failed to install Ctrl-C handler: {}", e)))
}

/// 执行一次批处理并打印统计
fn run_once(
    runner: &BatchRunner,
    config: &BatchConfig,
    report_path: Option<&Path>,
    shutdown: &CancelToken,
) -> Result<BatchResult> {
    let pb = progress::create_progress_bar(0, "Scanning");
    let batch_cancel = runner.cancel_token();

    let on_event = |event: &BatchEvent| match event {
        BatchEvent::Started { total } => {
            pb.set_length(*total as u64);
            // run() 在开始时清除取消标志，这里补上期间到达的 Ctrl-C
            if shutdown.is_cancelled() {
                batch_cancel.cancel();
            }
        }
        BatchEvent::Progress { file, percent } => {
            pb.set_message(progress::file_message(file, *percent));
        }
        BatchEvent::FileProcessed { file } => {
            pb.inc(1);
            pb.suspend(|| output::print_success(file));
        }
        BatchEvent::Error { message } => {
            pb.inc(1);
            pb.suspend(|| output::print_error(message));
        }
        BatchEvent::Finished { .. } => pb.finish_and_clear(),
    };

    let result = runner.run(config, &on_event)?;
    print_summary(&result.summary(), &result.failures, config);

    if let Some(path) = report_path {
        report::to_csv(&result, path)?;
        output::print_info(&format!("Report written to '{}'", path.display()));
    }

    Ok(result)
}

/// 打印批处理统计
fn print_summary(summary: &BatchSummary, failures: &[(String, String)], config: &BatchConfig) {
    if summary.processed + summary.failed + summary.cancelled == 0 {
        output::print_warning(&format!(
            "No files matched '{}' under {}",
            config.input.pattern(),
            config.input.dir().display()
        ));
        return;
    }

    output::print_separator();
    output::print_done(&format!(
        "Batch complete: {} processed, {} failed, {} cancelled",
        summary.processed, summary.failed, summary.cancelled
    ));

    if !failures.is_empty() {
        output::print_warning("Failed files:");
        for (file, err) in failures.iter().take(10) {
            output::print_error(&format!("  {}: {}", file, err));
        }
        if failures.len() > 10 {
            output::print_warning(&format!("  ... and {} more", failures.len() - 10));
        }
    }
}

/// 等待下一轮，Ctrl-C 时提前返回
fn wait_for_next_run(interval: Duration, shutdown: &CancelToken) {
    if shutdown.is_cancelled() {
        return;
    }

    let spinner = progress::create_spinner(&format!(
        "Next run in {}s (Ctrl-C to stop)",
        interval.as_secs()
    ));
    let deadline = Instant::now() + interval;

    while !shutdown.is_cancelled() {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        thread::sleep(WAIT_POLL.min(deadline - now));
    }

    spinner.finish_and_clear();
}
