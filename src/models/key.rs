//! # XOR 密钥
//!
//! 固定 8 字节的 XOR 密钥，以及与设置文件相同的十六进制字符串格式
//! (`"00 1F A0 ..."`) 的解析与输出。
//!
//! ## 依赖关系
//! - 被 `models/config.rs`, `models/settings.rs`, `transform/` 使用
//! - 无外部模块依赖

use crate::error::ConfigError;

use std::fmt;
use std::str::FromStr;

/// 密钥长度（字节）
pub const KEY_LEN: usize = 8;

/// 8 字节循环 XOR 密钥
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct XorKey([u8; KEY_LEN]);

impl XorKey {
    pub const fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// 从任意长度切片构造，长度不为 8 时报错（不做循环补齐）
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ConfigError> {
        let arr: [u8; KEY_LEN] = bytes
            .try_into()
            .map_err(|_| ConfigError::KeyLength { found: bytes.len() })?;
        Ok(Self::new(arr))
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    /// 对缓冲区原地做 XOR。
    ///
    /// `offset` 是 `buf[0]` 在整个文件中的字节偏移，密钥按全局偏移
    /// 循环，因此分块大小不会影响结果。
    pub fn apply(&self, buf: &mut [u8], offset: u64) {
        let start = (offset % KEY_LEN as u64) as usize;
        for (i, byte) in buf.iter_mut().enumerate() {
            *byte ^= self.0[(start + i) % KEY_LEN];
        }
    }
}

impl FromStr for XorKey {
    type Err = ConfigError;

    /// 解析空白分隔的十六进制字节，例如 `"DE AD BE EF 00 01 02 03"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s
            .split_whitespace()
            .map(parse_hex_byte)
            .collect::<Result<Vec<u8>, _>>()?;
        Self::from_slice(&bytes)
    }
}

fn parse_hex_byte(token: &str) -> Result<u8, ConfigError> {
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);

    if digits.is_empty() || digits.len() > 2 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ConfigError::InvalidKeyToken {
            token: token.to_string(),
        });
    }

    u8::from_str_radix(digits, 16).map_err(|_| ConfigError::InvalidKeyToken {
        token: token.to_string(),
    })
}

impl fmt::Display for XorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, b) in self.as_bytes().iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{:02X}", b)?;
        }
        Ok(())
    }
}
