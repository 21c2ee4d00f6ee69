//! # 解析器模块
//!
//! 提供 Quantum ESPRESSO 后处理输出格式的解析器。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: table, dos, pdos, bands, scf_log

pub mod bands;
pub mod dos;
pub mod pdos;
pub mod scf_log;
pub mod table;

use crate::error::{QeplotError, Result};
use std::fs;
use std::path::Path;

/// 读取整个文件，不存在时返回 FileNotFound
pub fn read_to_string(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(QeplotError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    fs::read_to_string(path).map_err(|e| QeplotError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })
}
