//! # pdos 子命令 CLI 定义
//!
//! 读取 `<prefix>.pdos_atm#N(X)_wfc#M(l)` 文件并绘制投影态密度
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/pdos.rs`

use super::{InputArgs, PlotArgs};
use clap::{Args, ValueEnum};

/// PDOS 图表类型
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum PdosFigure {
    /// d-orbital PDOS of every atom on a grid
    Atomic,
    /// s + d orbital contributions of every atom on a grid
    Detailed,
    /// Spin-up d-orbital PDOS of all atoms on one axis
    Comparison,
    /// Total DOS above atomic d-orbital PDOS
    Combined,
    /// All of the above
    All,
}

impl PdosFigure {
    /// 展开 `All` 为具体图表
    pub fn expand(self) -> Vec<PdosFigure> {
        match self {
            PdosFigure::All => vec![
                PdosFigure::Atomic,
                PdosFigure::Detailed,
                PdosFigure::Comparison,
                PdosFigure::Combined,
            ],
            other => vec![other],
        }
    }

    /// 输出文件名中的图表名
    pub fn file_stem(self) -> &'static str {
        match self {
            PdosFigure::Atomic => "atomic_pdos",
            PdosFigure::Detailed => "detailed_pdos",
            PdosFigure::Comparison => "d_orbital_comparison",
            PdosFigure::Combined => "combined_dos_pdos",
            PdosFigure::All => "pdos",
        }
    }
}

/// pdos 子命令参数
#[derive(Args, Debug)]
pub struct PdosArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub plot: PlotArgs,

    /// Which figure to render
    #[arg(long, value_enum, default_value = "all")]
    pub figure: PdosFigure,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_all() {
        let figures = PdosFigure::All.expand();
        assert_eq!(figures.len(), 4);
        assert!(!figures.contains(&PdosFigure::All));
        assert_eq!(PdosFigure::Comparison.expand(), vec![PdosFigure::Comparison]);
        assert_eq!(PdosFigure::Comparison.file_stem(), "d_orbital_comparison");
    }
}
