//! # bands 子命令 CLI 定义
//!
//! 读取 `<prefix>_fixed.bands.gnu`（或 `<prefix>.bands.gnu`）并绘制能带
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/bands.rs`

use super::{InputArgs, PlotArgs};
use crate::models::KPathPreset;

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 能带图表类型
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum BandsFigure {
    /// Segmented bands along the corrected k-path
    Corrected,
    /// Full view next to a zoom around the Fermi level
    Detailed,
    /// Original file next to the corrected file
    Comparison,
    /// All of the above
    All,
}

impl BandsFigure {
    /// 展开 `All` 为具体图表
    pub fn expand(self) -> Vec<BandsFigure> {
        match self {
            BandsFigure::All => vec![
                BandsFigure::Corrected,
                BandsFigure::Detailed,
                BandsFigure::Comparison,
            ],
            other => vec![other],
        }
    }

    /// 输出文件名中的图表名
    pub fn file_stem(self) -> &'static str {
        match self {
            BandsFigure::Corrected => "bands_corrected",
            BandsFigure::Detailed => "bands_detailed",
            BandsFigure::Comparison => "bands_comparison",
            BandsFigure::All => "bands",
        }
    }

    /// 未指定 k 路径时的默认估计
    pub fn default_kpath(self) -> KPathPreset {
        match self {
            BandsFigure::Corrected | BandsFigure::All => KPathPreset::FccExtended,
            BandsFigure::Detailed | BandsFigure::Comparison => KPathPreset::FccShort,
        }
    }
}

/// 高对称点位置估计方案
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum KPathArg {
    /// Γ-X-W-L-Γ at 0, 0.33, 0.66, 0.83, 0.95 of the path
    FccExtended,
    /// Γ-X-L-Γ-X at 0, 0.33, 0.66, 0.85, 1.0 of the path
    FccShort,
}

impl From<KPathArg> for KPathPreset {
    fn from(arg: KPathArg) -> Self {
        match arg {
            KPathArg::FccExtended => KPathPreset::FccExtended,
            KPathArg::FccShort => KPathPreset::FccShort,
        }
    }
}

/// 能带图选项：k 路径与 spin-down 能带文件
#[derive(Args, Debug, Clone, Default)]
pub struct BandOptions {
    /// bands.x output containing "high-symmetry point" lines (exact marker positions)
    #[arg(long)]
    pub bands_log: Option<PathBuf>,

    /// Comma-separated high-symmetry labels, e.g. "G,X,W,L,G"
    #[arg(long)]
    pub labels: Option<String>,

    /// Fractional marker preset used when no bands.x output is given
    #[arg(long, value_enum)]
    pub kpath: Option<KPathArg>,

    /// Spin-down bands.gnu of an LSDA run (default: <prefix>_fixed_dw.bands.gnu
    /// or <prefix>_dw.bands.gnu when present)
    #[arg(long)]
    pub spin_down_file: Option<PathBuf>,
}

/// bands 子命令参数
#[derive(Args, Debug)]
pub struct BandsArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub plot: PlotArgs,

    #[command(flatten)]
    pub bands: BandOptions,

    /// Which figure to render
    #[arg(long, value_enum, default_value = "all")]
    pub figure: BandsFigure,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_kpath() {
        assert_eq!(
            BandsFigure::Corrected.default_kpath(),
            KPathPreset::FccExtended
        );
        assert_eq!(BandsFigure::Detailed.default_kpath(), KPathPreset::FccShort);
        assert_eq!(BandsFigure::All.expand().len(), 3);
    }
}
