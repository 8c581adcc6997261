//! # 数据模型模块
//!
//! 定义批处理配置、XOR 密钥和持久化设置。
//!
//! ## 依赖关系
//! - 被 `batch/`, `transform/` 和 `commands/` 使用
//! - 子模块: key, config, settings

pub mod config;
pub mod key;
pub mod settings;

pub use config::{BatchConfig, InputMask};
pub use key::XorKey;
pub use settings::Settings;
