//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `dos`: 总 DOS 图
//! - `pdos`: PDOS 图（原子 d 轨道 / s+d 详细 / 对比 / 组合）
//! - `bands`: 能带图（修正路径 / 详细 / 对比）
//! - `analyze`: 终端报告（能带、DOS、磁性）
//! - `all`: 并行生成全部图表并输出报告
//!
//! 输入目录、前缀、输出目录可通过环境变量 `QEPLOT_DIR`, `QEPLOT_PREFIX`,
//! `QEPLOT_OUTPUT_DIR` 设置。
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: dos, pdos, bands, analyze, all

pub mod all;
pub mod analyze;
pub mod bands;
pub mod dos;
pub mod pdos;

use crate::error::{QeplotError, Result};
use crate::plot::{ImageFormat, PlotConfig};

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// qeplot - Quantum ESPRESSO DOS / PDOS / 能带后处理工具
#[derive(Parser)]
#[command(name = "qeplot")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Plot DOS, PDOS and band structures from Quantum ESPRESSO output", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Plot the spin-resolved total density of states
    Dos(dos::DosArgs),

    /// Plot atom- and orbital-projected DOS
    Pdos(pdos::PdosArgs),

    /// Plot the band structure
    Bands(bands::BandsArgs),

    /// Print band, DOS and magnetic analysis reports
    Analyze(analyze::AnalyzeArgs),

    /// Render every figure in parallel and print the reports
    All(all::AllArgs),
}

// ─────────────────────────────────────────────────────────────
// 公共参数
// ─────────────────────────────────────────────────────────────

/// 输入 / 输出位置
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Directory containing the Quantum ESPRESSO output files
    #[arg(long, env = "QEPLOT_DIR", default_value = ".")]
    pub dir: PathBuf,

    /// Calculation prefix (file name stem of <prefix>.dos, <prefix>.bands.gnu, ...)
    #[arg(long, env = "QEPLOT_PREFIX", default_value = "CoFeMnTi")]
    pub prefix: String,

    /// Directory for generated figures and data files
    #[arg(long, env = "QEPLOT_OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Fermi energy in eV (default: read from the <prefix>.dos header)
    #[arg(long, allow_hyphen_values = true)]
    pub fermi: Option<f64>,
}

/// 输出格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// PNG image
    Png,
    /// SVG vector image
    Svg,
    /// CSV data file (dos and bands only)
    Csv,
}

impl OutputFormat {
    /// 对应的图像格式，CSV 返回 None
    pub fn image_format(self) -> Option<ImageFormat> {
        match self {
            OutputFormat::Png => Some(ImageFormat::Png),
            OutputFormat::Svg => Some(ImageFormat::Svg),
            OutputFormat::Csv => None,
        }
    }
}

/// 绘图参数
#[derive(Args, Debug, Clone)]
pub struct PlotArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "png")]
    pub format: OutputFormat,

    /// Figure width in pixels (for PNG) or points (for SVG)
    #[arg(long, default_value_t = 1200)]
    pub width: u32,

    /// Figure height in pixels (for PNG) or points (for SVG)
    #[arg(long, default_value_t = 800)]
    pub height: u32,

    /// Energy range of DOS / PDOS plots relative to E_F (e.g., "-8:8")
    #[arg(long, default_value = "-8:8", allow_hyphen_values = true)]
    pub energy_range: String,

    /// Energy range of band plots relative to E_F (e.g., "-6:6")
    #[arg(long, default_value = "-6:6", allow_hyphen_values = true)]
    pub band_range: String,
}

impl PlotArgs {
    /// 构造 PlotConfig；CSV 格式下图像格式退回 PNG
    pub fn to_config(&self) -> Result<PlotConfig> {
        if self.width == 0 || self.height == 0 {
            return Err(QeplotError::InvalidArgument(format!(
                "Figure size must be positive, got {}x{}",
                self.width, self.height
            )));
        }

        Ok(PlotConfig {
            width: self.width,
            height: self.height,
            format: self.format.image_format().unwrap_or(ImageFormat::Png),
            energy_window: parse_range(&self.energy_range)?,
            band_window: parse_range(&self.band_range)?,
            ..PlotConfig::default()
        })
    }
}

/// 解析 "min:max" 形式的能量范围
pub fn parse_range(input: &str) -> Result<(f64, f64)> {
    let invalid = || {
        QeplotError::InvalidArgument(format!(
            "Invalid range '{}'. Expected 'min:max', e.g. '-8:8'",
            input
        ))
    };

    let (lo, hi) = input.split_once(':').ok_or_else(invalid)?;
    let lo: f64 = lo.trim().parse().map_err(|_| invalid())?;
    let hi: f64 = hi.trim().parse().map_err(|_| invalid())?;

    if !lo.is_finite() || !hi.is_finite() || lo >= hi {
        return Err(invalid());
    }
    Ok((lo, hi))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_range() {
        assert_eq!(parse_range("-8:8").unwrap(), (-8.0, 8.0));
        assert_eq!(parse_range(" -3.5 : 2 ").unwrap(), (-3.5, 2.0));
        assert!(parse_range("8:-8").is_err());
        assert!(parse_range("-8").is_err());
        assert!(parse_range("a:b").is_err());
        assert!(parse_range("-inf:8").is_err());
        assert!(parse_range("nan:1").is_err());
        assert!(parse_range("0:inf").is_err());
    }

    #[test]
    fn test_cli_env_defaults() {
        let cli = Cli::try_parse_from(["qeplot", "dos", "--prefix", "Fe", "--format", "svg"]).unwrap();
        match cli.command {
            Commands::Dos(args) => {
                assert_eq!(args.input.prefix, "Fe");
                assert_eq!(args.plot.format, OutputFormat::Svg);
                let config = args.plot.to_config().unwrap();
                assert_eq!(config.format, ImageFormat::Svg);
                assert_eq!(config.energy_window, (-8.0, 8.0));
            }
            _ => panic!("expected dos command"),
        }
    }

    #[test]
    fn test_cli_negative_range() {
        let cli = Cli::try_parse_from([
            "qeplot",
            "bands",
            "--band-range",
            "-2:2",
            "--figure",
            "detailed",
            "--spin-down-file",
            "Fe_dw.bands.gnu",
        ])
        .unwrap();
        match cli.command {
            Commands::Bands(args) => {
                assert_eq!(args.plot.to_config().unwrap().band_window, (-2.0, 2.0));
                assert_eq!(args.figure, bands::BandsFigure::Detailed);
                assert_eq!(
                    args.bands.spin_down_file,
                    Some(PathBuf::from("Fe_dw.bands.gnu"))
                );
            }
            _ => panic!("expected bands command"),
        }
    }
}
