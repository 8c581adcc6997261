//! # 批量执行器
//!
//! 并行驱动 XOR 变换引擎处理掩码匹配的全部文件。
//!
//! ## 功能
//! - 基于 rayon 的有界线程池并行处理
//! - 冲突安全的输出命名
//! - 成功后可选删除源文件（失败静默忽略）
//! - 协作式取消，作用于下一个分块边界
//! - 生命周期事件：Started / Progress / FileProcessed / Error / Finished
//! - 运行中再次调用 `run` 返回 `RunInProgress`
//!
//! ## 依赖关系
//! - 被 `commands/run.rs` 调用
//! - 使用 `batch/collector.rs`, `batch/naming.rs`, `transform/`
//! - 使用 `rayon` 进行并行计算

use super::collector::FileCollector;
use super::events::{BatchEvent, BatchSummary, EventCallback};
use super::naming::OutputNamer;
use crate::cancel::CancelToken;
use crate::error::{Result, XorBatchError};
use crate::models::BatchConfig;
use crate::transform::{TransformEngine, TransformOutcome};

use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

/// 单个文件处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessResult {
    /// 处理成功
    Processed {
        file: String,
        output: PathBuf,
        bytes: u64,
    },
    /// 处理失败（错误已通过事件上报）
    Failed {
        file: String,
        output: Option<PathBuf>,
        message: String,
    },
    /// 被取消，输出可能不完整
    Cancelled {
        file: String,
        output: Option<PathBuf>,
        bytes: u64,
    },
}

impl ProcessResult {
    pub fn file(&self) -> &str {
        match self {
            ProcessResult::Processed { file, .. }
            | ProcessResult::Failed { file, .. }
            | ProcessResult::Cancelled { file, .. } => file,
        }
    }
}

/// 批量处理结果统计
#[derive(Debug, Default)]
pub struct BatchResult {
    /// 成功数量
    pub processed: usize,
    /// 失败数量
    pub failed: usize,
    /// 取消数量
    pub cancelled: usize,
    /// 失败详情 (文件名, 错误信息)
    pub failures: Vec<(String, String)>,
    /// 全部单文件结果
    pub results: Vec<ProcessResult>,
}

impl BatchResult {
    /// 合并处理结果
    pub fn merge(&mut self, result: ProcessResult) {
        match &result {
            ProcessResult::Processed { .. } => self.processed += 1,
            ProcessResult::Cancelled { .. } => self.cancelled += 1,
            ProcessResult::Failed { file, message, .. } => {
                self.failed += 1;
                self.failures.push((file.clone(), message.clone()));
            }
        }
        self.results.push(result);
    }

    pub fn summary(&self) -> BatchSummary {
        BatchSummary {
            processed: self.processed,
            failed: self.failed,
            cancelled: self.cancelled,
        }
    }
}

/// 运行期间保持 `running` 标志，离开作用域时清除
struct RunGuard<'a>(&'a AtomicBool);

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// 批量执行器
pub struct BatchRunner {
    /// 并行作业数
    jobs: usize,
    engine: TransformEngine,
    cancel: CancelToken,
    running: AtomicBool,
}

impl BatchRunner {
    /// 创建新的批量执行器，`jobs == 0` 时使用 CPU 核数
    pub fn new(jobs: usize) -> Self {
        let jobs = if jobs == 0 { num_cpus::get() } else { jobs };
        Self {
            jobs,
            engine: TransformEngine::default(),
            cancel: CancelToken::new(),
            running: AtomicBool::new(false),
        }
    }

    /// 替换变换引擎（例如使用不同的分块大小）
    pub fn with_engine(mut self, engine: TransformEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// 共享的取消令牌
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// 执行一次批处理。
    ///
    /// 通过枚举阶段的运行恰好发出一次 `Finished`；枚举失败时先发出
    /// `Error` 和空的 `Finished`，再返回错误。
    pub fn run(&self, config: &BatchConfig, on_event: &EventCallback<'_>) -> Result<BatchResult> {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(XorBatchError::RunInProgress);
        }
        let _guard = RunGuard(&self.running);
        self.cancel.reset();

        // 配置 rayon 线程池
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .build()
            .map_err(|e| XorBatchError::Other(format!("Failed to build thread pool: {}", e)))?;

        let files = match FileCollector::new(&config.input).collect() {
            Ok(files) => files,
            Err(e) => {
                on_event(&BatchEvent::Error {
                    message: describe(&e),
                });
                on_event(&BatchEvent::Finished {
                    summary: BatchSummary::default(),
                });
                return Err(e);
            }
        };

        tracing::debug!(
            dir = %config.input.dir().display(),
            pattern = config.input.pattern(),
            count = files.len(),
            "enumerated input files"
        );
        on_event(&BatchEvent::Started { total: files.len() });

        let mut batch_result = BatchResult::default();
        if files.is_empty() {
            on_event(&BatchEvent::Finished {
                summary: batch_result.summary(),
            });
            return Ok(batch_result);
        }

        let namer = OutputNamer::new();
        let results: Vec<ProcessResult> = pool.install(|| {
            files
                .par_iter()
                .map(|file| self.process_file(file, config, &namer, on_event))
                .collect()
        });

        // 汇总结果
        for result in results {
            batch_result.merge(result);
        }

        tracing::info!(
            processed = batch_result.processed,
            failed = batch_result.failed,
            cancelled = batch_result.cancelled,
            "batch finished"
        );
        on_event(&BatchEvent::Finished {
            summary: batch_result.summary(),
        });

        Ok(batch_result)
    }

    /// 处理单个文件
    fn process_file(
        &self,
        input: &Path,
        config: &BatchConfig,
        namer: &OutputNamer,
        on_event: &EventCallback<'_>,
    ) -> ProcessResult {
        let file = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| input.display().to_string());

        if self.cancel.is_cancelled() {
            return ProcessResult::Cancelled {
                file,
                output: None,
                bytes: 0,
            };
        }

        let output = namer.resolve(&config.output_dir, &file, config.overwrite);
        tracing::debug!(input = %input.display(), output = %output.display(), "processing");

        let outcome = self
            .engine
            .transform_file(input, &output, &config.key, &self.cancel, |percent| {
                on_event(&BatchEvent::Progress {
                    file: file.clone(),
                    percent,
                })
            });

        match outcome {
            Ok(TransformOutcome::Completed { bytes }) => {
                if config.delete_input {
                    if let Err(e) = fs::remove_file(input) {
                        tracing::debug!(file = %input.display(), error = %e, "failed to delete input");
                    }
                }
                on_event(&BatchEvent::FileProcessed { file: file.clone() });
                ProcessResult::Processed {
                    file,
                    output,
                    bytes,
                }
            }
            Ok(TransformOutcome::Cancelled { bytes }) => ProcessResult::Cancelled {
                file,
                output: Some(output),
                bytes,
            },
            Err(e) => {
                let message = describe(&e);
                tracing::warn!(file = %file, error = %message, "file failed");
                on_event(&BatchEvent::Error {
                    message: message.clone(),
                });
                ProcessResult::Failed {
                    file,
                    output: Some(output),
                    message,
                }
            }
        }
    }
}

/// 错误及其底层原因的单行描述
fn describe(err: &XorBatchError) -> String {
    match std::error::Error::source(err) {
        Some(source) => format!("{} ({})", err, source),
        None => err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InputMask, XorKey};
    use std::sync::Mutex;
    use tempfile::TempDir;

    const KEY: XorKey = XorKey::new([9, 8, 7, 6, 5, 4, 3, 2]);

    struct Fixture {
        _dir: TempDir,
        input: PathBuf,
        output: PathBuf,
    }

    fn fixture(files: &[(&str, &str)]) -> Fixture {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in");
        let output = dir.path().join("out");
        fs::create_dir(&input).unwrap();
        fs::create_dir(&output).unwrap();
        for (name, data) in files {
            fs::write(input.join(name), data).unwrap();
        }
        Fixture {
            _dir: dir,
            input,
            output,
        }
    }

    fn config(fx: &Fixture, pattern: &str, delete_input: bool, overwrite: bool) -> BatchConfig {
        let mask = InputMask::new(&fx.input, pattern).unwrap();
        BatchConfig::new(mask, &fx.output, delete_input, overwrite, KEY).unwrap()
    }

    fn run_collecting(
        runner: &BatchRunner,
        config: &BatchConfig,
    ) -> (Result<BatchResult>, Vec<BatchEvent>) {
        let events = Mutex::new(Vec::new());
        let result = runner.run(config, &|e: &BatchEvent| events.lock().unwrap().push(e.clone()));
        (result, events.into_inner().unwrap())
    }

    fn count<F: Fn(&BatchEvent) -> bool>(events: &[BatchEvent], f: F) -> usize {
        events.iter().filter(|e| f(e)).count()
    }

    #[test]
    fn test_empty_batch_finishes_once() {
        let fx = fixture(&[("notes", "no extension")]);
        let runner = BatchRunner::new(2);
        let (result, events) = run_collecting(&runner, &config(&fx, "*.*", false, true));

        let result = result.unwrap();
        assert!(result.results.is_empty());
        assert_eq!(
            events,
            vec![
                BatchEvent::Started { total: 0 },
                BatchEvent::Finished {
                    summary: BatchSummary::default()
                }
            ]
        );
    }

    #[test]
    fn test_batch_processes_all_files() {
        let fx = fixture(&[
            ("a.dat", "alpha"),
            ("b.dat", "bravo bravo"),
            ("c.dat", ""),
            ("skip.txt", "not matched"),
        ]);
        let runner = BatchRunner::new(3);
        let (result, events) = run_collecting(&runner, &config(&fx, "*.dat", false, true));

        let result = result.unwrap();
        assert_eq!(result.processed, 3);
        assert_eq!(result.failed, 0);
        assert_eq!(
            count(&events, |e| matches!(e, BatchEvent::FileProcessed { .. })),
            3
        );
        assert_eq!(
            count(&events, |e| matches!(e, BatchEvent::Finished { .. })),
            1
        );
        assert!(matches!(events.last(), Some(BatchEvent::Finished { .. })));

        let encoded = fs::read(fx.output.join("a.dat")).unwrap();
        let expected: Vec<u8> = b"alpha"
            .iter()
            .enumerate()
            .map(|(i, b)| b ^ KEY.as_bytes()[i % 8])
            .collect();
        assert_eq!(encoded, expected);
        assert!(!fx.output.join("skip.txt").exists());
        assert!(fx.input.join("a.dat").exists());
    }

    #[test]
    fn test_delete_input_after_success() {
        let fx = fixture(&[("a.bin", "payload")]);
        let runner = BatchRunner::new(1);
        let (result, _) = run_collecting(&runner, &config(&fx, "*.bin", true, true));

        assert_eq!(result.unwrap().processed, 1);
        assert!(!fx.input.join("a.bin").exists());
        assert!(fx.output.join("a.bin").exists());
    }

    #[test]
    fn test_failure_keeps_source() {
        let fx = fixture(&[("a.bin", "payload"), ("b.bin", "more")]);
        let mask = InputMask::new(&fx.input, "*.bin").unwrap();
        let cfg = BatchConfig::new(mask, fx.output.join("missing"), true, true, KEY).unwrap();

        let runner = BatchRunner::new(2);
        let (result, events) = run_collecting(&runner, &cfg);

        let result = result.unwrap();
        assert_eq!(result.failed, 2);
        assert_eq!(result.failures.len(), 2);
        assert_eq!(count(&events, |e| matches!(e, BatchEvent::Error { .. })), 2);
        assert_eq!(
            count(&events, |e| matches!(e, BatchEvent::Finished { .. })),
            1
        );
        assert!(fx.input.join("a.bin").exists());
        assert!(fx.input.join("b.bin").exists());
    }

    #[test]
    fn test_delete_failure_is_ignored() {
        let fx = fixture(&[("a.bin", "payload")]);
        let cfg = config(&fx, "*.bin", true, true);
        let source = fx.input.join("a.bin");
        let events = Mutex::new(Vec::new());

        // 源文件在变换结束时已被外部删除，随后的删除必然失败
        let result = BatchRunner::new(1)
            .run(&cfg, &|e: &BatchEvent| {
                if let BatchEvent::Progress { percent: 100, .. } = e {
                    fs::remove_file(&source).unwrap();
                }
                events.lock().unwrap().push(e.clone());
            })
            .unwrap();

        let events = events.into_inner().unwrap();
        assert_eq!(result.processed, 1);
        assert_eq!(result.failed, 0);
        assert!(matches!(&result.results[0], ProcessResult::Processed { .. }));
        assert_eq!(
            count(&events, |e| matches!(e, BatchEvent::FileProcessed { .. })),
            1
        );
        assert_eq!(count(&events, |e| matches!(e, BatchEvent::Error { .. })), 0);
        assert!(fx.output.join("a.bin").exists());
    }

    #[test]
    fn test_output_dir_same_as_input_keeps_sources() {
        let fx = fixture(&[("a.bin", "thirteen byte")]);
        let mask = InputMask::new(&fx.input, "*.bin").unwrap();
        let cfg = BatchConfig::new(mask, &fx.input, true, true, KEY).unwrap();

        let (result, events) = run_collecting(&BatchRunner::new(1), &cfg);

        let result = result.unwrap();
        assert_eq!(result.failed, 1);
        assert_eq!(result.processed, 0);
        assert!(matches!(
            &result.results[0],
            ProcessResult::Failed { message, .. } if message.contains("overwrite its own input")
        ));
        assert_eq!(count(&events, |e| matches!(e, BatchEvent::Error { .. })), 1);
        assert_eq!(fs::read(fx.input.join("a.bin")).unwrap(), b"thirteen byte");
    }

    #[test]
    fn test_output_dir_same_as_input_without_overwrite() {
        let fx = fixture(&[("a.bin", "payload")]);
        let mask = InputMask::new(&fx.input, "*.bin").unwrap();
        let cfg = BatchConfig::new(mask, &fx.input, false, false, KEY).unwrap();

        let (result, _) = run_collecting(&BatchRunner::new(1), &cfg);

        assert_eq!(result.unwrap().processed, 1);
        assert_eq!(fs::read(fx.input.join("a.bin")).unwrap(), b"payload");
        assert!(fx.input.join("a_1.bin").exists());
    }

    #[test]
    fn test_collision_avoidance() {
        let fx = fixture(&[("out.txt", "new")]);
        fs::write(fx.output.join("out.txt"), b"old").unwrap();
        fs::write(fx.output.join("out_1.txt"), b"old1").unwrap();

        let runner = BatchRunner::new(1);
        let (result, _) = run_collecting(&runner, &config(&fx, "*.txt", false, false));

        let result = result.unwrap();
        assert_eq!(result.processed, 1);
        assert_eq!(fs::read(fx.output.join("out.txt")).unwrap(), b"old");
        assert_eq!(fs::read(fx.output.join("out_1.txt")).unwrap(), b"old1");
        assert!(fx.output.join("out_2.txt").exists());
        assert!(matches!(
            &result.results[0],
            ProcessResult::Processed { output, .. } if output == &fx.output.join("out_2.txt")
        ));
    }

    #[test]
    fn test_cancel_skips_everything() {
        let fx = fixture(&[("a.bin", "1234"), ("b.bin", "5678")]);
        let runner = BatchRunner::new(2);
        let cancel = runner.cancel_token();
        let events = Mutex::new(Vec::new());

        let result = runner
            .run(&config(&fx, "*.bin", true, true), &|e: &BatchEvent| {
                if matches!(e, BatchEvent::Started { .. }) {
                    cancel.cancel();
                }
                events.lock().unwrap().push(e.clone());
            })
            .unwrap();

        let events = events.into_inner().unwrap();
        assert_eq!(result.cancelled, 2);
        assert_eq!(result.processed, 0);
        assert_eq!(
            count(&events, |e| matches!(e, BatchEvent::FileProcessed { .. })),
            0
        );
        assert_eq!(
            count(&events, |e| matches!(e, BatchEvent::Finished { .. })),
            1
        );
        assert!(fx.input.join("a.bin").exists());
        assert!(fx.input.join("b.bin").exists());
    }

    #[test]
    fn test_run_resets_cancellation() {
        let fx = fixture(&[("a.bin", "1234")]);
        let runner = BatchRunner::new(1);
        runner.cancel_token().cancel();

        let (result, _) = run_collecting(&runner, &config(&fx, "*.bin", false, true));
        assert_eq!(result.unwrap().processed, 1);
    }

    #[test]
    fn test_reentrant_run_rejected() {
        let fx = fixture(&[("a.bin", "1234")]);
        let cfg = config(&fx, "*.bin", false, true);
        let runner = BatchRunner::new(1);
        let nested = Mutex::new(None);

        runner
            .run(&cfg, &|e: &BatchEvent| {
                if matches!(e, BatchEvent::Started { .. }) {
                    let r = runner.run(&cfg, &|_: &BatchEvent| {});
                    *nested.lock().unwrap() = Some(matches!(r, Err(XorBatchError::RunInProgress)));
                }
            })
            .unwrap();

        assert_eq!(nested.into_inner().unwrap(), Some(true));

        // 上一次运行结束后可以再次运行
        let (again, _) = run_collecting(&runner, &cfg);
        assert_eq!(again.unwrap().processed, 1);
    }

    #[test]
    fn test_missing_input_dir_reports_and_finishes() {
        let fx = fixture(&[]);
        let mask = InputMask::new(fx.input.join("gone"), "*").unwrap();
        let cfg = BatchConfig::new(mask, &fx.output, false, true, KEY).unwrap();

        let runner = BatchRunner::new(1);
        let (result, events) = run_collecting(&runner, &cfg);

        assert!(matches!(result, Err(XorBatchError::DirectoryNotFound { .. })));
        assert_eq!(count(&events, |e| matches!(e, BatchEvent::Error { .. })), 1);
        assert_eq!(
            count(&events, |e| matches!(e, BatchEvent::Finished { .. })),
            1
        );
    }

    #[test]
    fn test_progress_reported_per_file() {
        let data = "x".repeat(100);
        let fx = fixture(&[("big.bin", data.as_str())]);
        let runner = BatchRunner::new(1).with_engine(TransformEngine::new(25));
        let (_, events) = run_collecting(&runner, &config(&fx, "*.bin", false, true));

        let percents: Vec<u8> = events
            .iter()
            .filter_map(|e| match e {
                BatchEvent::Progress { percent, .. } => Some(*percent),
                _ => None,
            })
            .collect();
        assert_eq!(percents, vec![25, 50, 75, 100]);
    }
}
