//! # bands 命令实现
//!
//! 读取能带数据，确定高对称点位置，绘制能带图或导出 CSV。
//!
//! ## 高对称点来源（按优先级）
//! 1. `--bands-log` 指定的 bands.x 输出中的 "high-symmetry point" 行
//! 2. 按 k 路径比例估计（`--kpath`，或按图表类型选默认方案）
//!
//! `--labels` 在两种来源下都会替换对应位置的标签。
//!
//! ## 自旋
//! `--spin-down-file` 给出的文件，或与 spin-up 文件同名方案的
//! `<prefix>[_fixed]_dw.bands.gnu`，作为 spin-down 通道叠加绘制。
//! 显式给出的 `--bands-log` / `--spin-down-file` 缺失时报错而不是跳过。
//!
//! ## 依赖关系
//! - 使用 `cli/bands.rs` 定义的 BandsArgs
//! - 使用 `parsers/bands.rs`, `plot/bands.rs`, `export.rs`

use super::{explicit_input, Workspace};
use crate::cli::bands::{BandOptions, BandsArgs, BandsFigure};
use crate::cli::OutputFormat;
use crate::error::{QeplotError, Result};
use crate::export;
use crate::models::bands::{label_positions, normalize_label};
use crate::models::{KPathPreset, SpinBands, SymmetryMarker};
use crate::parsers;
use crate::parsers::bands::{
    corrected_bands_path, original_bands_path, parse_bands_file, resolve_bands_file,
    spin_down_bands_path, BandsSource,
};
use crate::plot::{self, PlotConfig};
use crate::utils::output;

use std::path::{Path, PathBuf};

/// 执行 bands 命令
pub fn execute(args: BandsArgs) -> Result<()> {
    output::print_header("Band Structure");

    let ws = Workspace::from_args(&args.input);
    ws.prepare_output_dir()?;

    let (bands_path, source) = resolve_bands_file(&ws.dir, &ws.prefix)?;
    output::print_info(&format!(
        "Using '{}' {}",
        bands_path.display(),
        source.title_suffix()
    ));

    if args.plot.format == OutputFormat::Csv {
        let bands = load_spin_bands(&ws, &bands_path, source, &args.bands)?;
        let path = ws.data_path("bands", "csv");
        export::bands_to_csv(&bands, ws.fermi_energy()?, &path)?;
        output::print_success(&format!("Band data saved to '{}'", path.display()));
        return Ok(());
    }

    let config = args.plot.to_config()?;
    for figure in args.figure.expand() {
        let path = render(&ws, &config, &args.bands, figure)?;
        output::print_success(&format!("Band plot saved to '{}'", path.display()));
    }
    Ok(())
}

/// 绘制一张能带图，返回输出路径
pub fn render(
    ws: &Workspace,
    config: &PlotConfig,
    options: &BandOptions,
    figure: BandsFigure,
) -> Result<PathBuf> {
    let fermi = ws.fermi_energy()?;
    let path = config.output_path(&ws.output_dir, &ws.prefix, figure.file_stem());
    let preset = options.kpath.map(KPathPreset::from).unwrap_or(figure.default_kpath());

    match figure {
        BandsFigure::Corrected => {
            let (bands_path, source) = resolve_bands_file(&ws.dir, &ws.prefix)?;
            let bands = load_spin_bands(ws, &bands_path, source, options)?;
            let markers = load_markers(options, preset, bands.k_max())?;
            let title = format!("Band Structure - {} (Corrected)", ws.prefix);
            plot::bands::plot_bands(&bands, fermi, &markers, config, &title, &path)?;
        }
        BandsFigure::Detailed => {
            let (bands_path, source) = resolve_bands_file(&ws.dir, &ws.prefix)?;
            let bands = load_spin_bands(ws, &bands_path, source, options)?;
            let markers = load_markers(options, preset, bands.k_max())?;
            let title = format!("Band Structure {}", source.title_suffix());
            plot::bands::plot_bands_detailed(&bands, fermi, &markers, config, &title, &path)?;
        }
        BandsFigure::Comparison => {
            let original_path = original_bands_path(&ws.dir, &ws.prefix);
            let corrected_path = corrected_bands_path(&ws.dir, &ws.prefix);
            let original = parse_bands_file(&original_path).ok();
            let corrected = parse_bands_file(&corrected_path).ok();

            if original.is_none() && corrected.is_none() {
                return Err(QeplotError::FileNotFound {
                    path: format!(
                        "{} or {}",
                        corrected_path.display(),
                        original_path.display()
                    ),
                });
            }

            let k_max = corrected.as_ref().and_then(|t| t.k_max());
            let markers = load_markers(options, preset, k_max)?;
            plot::bands::plot_bands_comparison(
                original.as_ref(),
                corrected.as_ref(),
                fermi,
                &markers,
                config,
                &path,
            )?;
        }
        BandsFigure::All => {
            return Err(QeplotError::InvalidArgument(
                "'all' must be expanded before rendering".to_string(),
            ))
        }
    }

    Ok(path)
}

/// 读取 spin-up 能带及（若存在）spin-down 能带
pub fn load_spin_bands(
    ws: &Workspace,
    bands_path: &Path,
    source: BandsSource,
    options: &BandOptions,
) -> Result<SpinBands> {
    let up = parse_bands_file(bands_path)?;
    let down = match &options.spin_down_file {
        Some(path) => Some(explicit_input("--spin-down-file", parse_bands_file(path))?),
        None => {
            let path = spin_down_bands_path(&ws.dir, &ws.prefix, source);
            if path.is_file() {
                Some(parse_bands_file(&path)?)
            } else {
                None
            }
        }
    };
    Ok(SpinBands::new(up, down))
}

/// 读取 bands.x 输出（若给出）并确定高对称点
fn load_markers(
    options: &BandOptions,
    preset: KPathPreset,
    k_max: Option<f64>,
) -> Result<Vec<SymmetryMarker>> {
    let positions = match &options.bands_log {
        Some(path) => {
            let log = explicit_input("--bands-log", parsers::read_to_string(path))?;
            parsers::bands::parse_high_symmetry_points(&log)
        }
        None => Vec::new(),
    };
    let labels = split_labels(options.labels.as_deref());

    Ok(resolve_markers(&positions, &labels, preset, k_max))
}

/// 解析逗号分隔的标签，G / Gamma 规范化为 Γ
pub fn split_labels(input: Option<&str>) -> Vec<String> {
    match input {
        Some(text) if !text.trim().is_empty() => text.split(',').map(normalize_label).collect(),
        _ => Vec::new(),
    }
}

/// 确定高对称点标记
///
/// 有 bands.x 位置时使用精确位置；否则按预设比例估计，
/// 用户标签依次替换预设标签。
pub fn resolve_markers(
    positions: &[f64],
    labels: &[String],
    preset: KPathPreset,
    k_max: Option<f64>,
) -> Vec<SymmetryMarker> {
    if !positions.is_empty() {
        return label_positions(positions, labels);
    }

    let Some(k_max) = k_max else {
        return Vec::new();
    };

    let mut markers = preset.estimate(k_max);
    for (marker, label) in markers.iter_mut().zip(labels) {
        marker.label = label.clone();
    }
    markers
}
