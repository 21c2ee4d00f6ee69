//! # bands.x 输出解析器
//!
//! 解析 `<prefix>.bands.gnu` 以及 bands.x 标准输出中的高对称点位置。
//!
//! ## .bands.gnu 格式
//! ```text
//!     0.0000  -5.1234
//!     0.0500  -5.1002
//!     ...
//!
//!     0.0000   1.2345     <- 下一条能带，k 回到起点
//! ```
//!
//! 自旋极化计算的 spin-down 能带默认取 `<prefix>_fixed_dw.bands.gnu`
//! （修正路径）或 `<prefix>_dw.bands.gnu`（原始路径）。
//!
//! ## 依赖关系
//! - 被 `commands/bands.rs`, `commands/analyze.rs` 使用
//! - 使用 `models/bands.rs`

use crate::error::{QeplotError, Result};
use crate::models::BandTable;
use crate::parsers::table::parse_number;

use regex::Regex;
use std::path::{Path, PathBuf};

const FORMAT: &str = "bands.gnu";

/// 能带文件来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandsSource {
    /// 修正路径后重新计算的 `<prefix>_fixed.bands.gnu`
    Corrected,
    /// 原始 `<prefix>.bands.gnu`
    Original,
}

impl BandsSource {
    /// 用于图表标题的后缀
    pub fn title_suffix(self) -> &'static str {
        match self {
            BandsSource::Corrected => "(Corrected Path)",
            BandsSource::Original => "(Original Path)",
        }
    }
}

/// 修正版能带文件路径
pub fn corrected_bands_path(dir: &Path, prefix: &str) -> PathBuf {
    dir.join(format!("{}_fixed.bands.gnu", prefix))
}

/// 原始能带文件路径
pub fn original_bands_path(dir: &Path, prefix: &str) -> PathBuf {
    dir.join(format!("{}.bands.gnu", prefix))
}

/// 与 spin-up 文件同一路径方案的 spin-down 能带文件
pub fn spin_down_bands_path(dir: &Path, prefix: &str, source: BandsSource) -> PathBuf {
    match source {
        BandsSource::Corrected => dir.join(format!("{}_fixed_dw.bands.gnu", prefix)),
        BandsSource::Original => dir.join(format!("{}_dw.bands.gnu", prefix)),
    }
}

/// 优先使用修正版，不存在时回退到原始文件
pub fn resolve_bands_file(dir: &Path, prefix: &str) -> Result<(PathBuf, BandsSource)> {
    let corrected = corrected_bands_path(dir, prefix);
    if corrected.is_file() {
        return Ok((corrected, BandsSource::Corrected));
    }

    let original = original_bands_path(dir, prefix);
    if original.is_file() {
        return Ok((original, BandsSource::Original));
    }

    Err(QeplotError::FileNotFound {
        path: format!("{} or {}", corrected.display(), original.display()),
    })
}

/// 读取能带文件
pub fn parse_bands_file(path: &Path) -> Result<BandTable> {
    let content = super::read_to_string(path)?;
    parse_bands_content(&content, &path.display().to_string())
}

/// 从字符串内容解析能带表
///
/// 只取前两列；少于两列的行忽略；空行记为分段位置。
pub fn parse_bands_content(content: &str, source: &str) -> Result<BandTable> {
    let mut table = BandTable::default();
    let mut pending_break = false;

    for (lineno, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            pending_break = !table.points.is_empty();
            continue;
        }
        if line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 2 {
            continue;
        }

        let parse = |token: &str| {
            parse_number(token).ok_or_else(|| {
                QeplotError::parse(
                    FORMAT,
                    source,
                    format!("line {}: invalid number '{}'", lineno + 1, token),
                )
            })
        };
        let k = parse(parts[0])?;
        let e = parse(parts[1])?;

        if pending_break {
            table.blank_breaks.push(table.points.len());
            pending_break = false;
        }
        table.points.push((k, e));
    }

    if table.points.is_empty() {
        return Err(QeplotError::parse(FORMAT, source, "no band data"));
    }

    Ok(table)
}

/// 从 bands.x 标准输出读取高对称点的 k 路径坐标
///
/// ```text
///      high-symmetry point:  0.0000 0.0000 0.0000   x coordinate   0.0000
/// ```
pub fn parse_high_symmetry_points(log: &str) -> Vec<f64> {
    let re = Regex::new(r"high-symmetry point:.*x coordinate\s+([-+0-9.EeDd]+)").unwrap();

    log.lines()
        .filter_map(|line| re.captures(line))
        .filter_map(|caps| parse_number(&caps[1]))
        .collect()
}
