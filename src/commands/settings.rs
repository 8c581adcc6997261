//! # settings 命令实现
//!
//! 以表格显示当前持久化设置，或重置为默认值。
//!
//! ## 依赖关系
//! - 使用 `cli/settings.rs` 定义的参数
//! - 使用 `models/settings.rs`
//! - 使用 `utils/output.rs`

use crate::cli::settings::SettingsArgs;
use crate::error::Result;
use crate::models::Settings;
use crate::utils::output;

use std::path::Path;
use tabled::{Table, Tabled};

/// 设置表格行
#[derive(Debug, Clone, Tabled)]
struct SettingRow {
    #[tabled(rename = "Setting")]
    name: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

/// 执行 settings 命令
pub fn execute(args: SettingsArgs, settings_path: &Path) -> Result<()> {
    output::print_header("Settings");

    if args.reset {
        Settings::default().save(settings_path)?;
        output::print_success(&format!(
            "Settings reset to defaults in '{}'",
            settings_path.display()
        ));
        return Ok(());
    }

    if !settings_path.exists() {
        output::print_info(&format!(
            "'{}' does not exist, showing defaults",
            settings_path.display()
        ));
    }

    let settings = Settings::load(settings_path)?;
    println!("{}", Table::new(setting_rows(&settings)));

    // 无效的设置在这里提前提示，run 时会被拒绝
    if let Err(e) = settings.to_batch_config() {
        output::print_warning(&format!("Settings are not runnable yet: {}", e));
    }
    if let Err(e) = settings.repeat_interval() {
        output::print_warning(&e.to_string());
    }

    Ok(())
}

fn setting_rows(settings: &Settings) -> Vec<SettingRow> {
    let row = |name, value: String| SettingRow { name, value };
    vec![
        row("input_dir", settings.input_dir.clone()),
        row("output_dir", settings.output_dir.clone()),
        row("file_mask", settings.file_mask.clone()),
        row("delete_input", settings.delete_input.to_string()),
        row("overwrite", settings.overwrite.to_string()),
        row("timer_enabled", settings.timer_enabled.to_string()),
        row("timer_interval_secs", settings.timer_interval_secs.to_string()),
        row("xor_key", settings.xor_key.clone()),
    ]
}
