//! # 能带图表
//!
//! - 分段能带图（高对称点竖线 + 费米能水平线，spin-down 为红色虚线）
//! - 全范围 / 费米能附近放大的左右双图
//! - 原始路径与修正路径的对比图
//!
//! ## 依赖关系
//! - 被 `commands/bands.rs` 调用
//! - 使用 `plot/chart.rs`, `plot/style.rs`, `analysis/bands.rs`

use crate::analysis::{segment_near_fermi, NEAR_FERMI_WINDOW};
use crate::error::Result;
use crate::models::{BandTable, SpinBands, SymmetryMarker};
use crate::plot::chart::{self, Axes, EnergyChart};
use crate::plot::style::{LineKind, BAND_LINE, SPIN_DOWN};
use crate::plot::{plot_err, PlotConfig};

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::HPos;
use std::path::Path;

const K_DESC: &str = "k-path";
const ENERGY_DESC: &str = "Energy - E_F (eV)";

/// 绘制分段能带图
pub fn plot_bands(
    bands: &SpinBands,
    fermi_energy: f64,
    markers: &[SymmetryMarker],
    config: &PlotConfig,
    title: &str,
    output: &Path,
) -> Result<()> {
    render_to_file!(
        config,
        output,
        draw_bands,
        bands,
        fermi_energy,
        markers,
        config,
        title
    );
    Ok(())
}

/// 左：全范围能带；右：费米能附近放大
pub fn plot_bands_detailed(
    bands: &SpinBands,
    fermi_energy: f64,
    markers: &[SymmetryMarker],
    config: &PlotConfig,
    title: &str,
    output: &Path,
) -> Result<()> {
    render_to_file!(
        config,
        output,
        draw_detailed,
        bands,
        fermi_energy,
        markers,
        config,
        title
    );
    Ok(())
}

/// 左：原始文件按单条折线绘制；右：修正文件分段绘制
///
/// 任一侧数据缺失时在对应面板显示提示文字。
pub fn plot_bands_comparison(
    original: Option<&BandTable>,
    corrected: Option<&BandTable>,
    fermi_energy: f64,
    markers: &[SymmetryMarker],
    config: &PlotConfig,
    output: &Path,
) -> Result<()> {
    render_to_file!(
        config,
        output,
        draw_comparison,
        original,
        corrected,
        fermi_energy,
        markers,
        config
    );
    Ok(())
}

fn draw_bands<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    bands: &SpinBands,
    fermi_energy: f64,
    markers: &[SymmetryMarker],
    config: &PlotConfig,
    title: &str,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).map_err(plot_err)?;
    draw_band_panel(
        root,
        bands,
        fermi_energy,
        markers,
        title,
        config.band_window,
        false,
    )
}

fn draw_detailed<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    bands: &SpinBands,
    fermi_energy: f64,
    markers: &[SymmetryMarker],
    config: &PlotConfig,
    title: &str,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).map_err(plot_err)?;
    let (width, _) = root.dim_in_pixel();
    let (left, right) = root.split_horizontally(width / 2);

    draw_band_panel(
        &left,
        bands,
        fermi_energy,
        markers,
        title,
        config.band_window,
        false,
    )?;
    draw_band_panel(
        &right,
        bands,
        fermi_energy,
        markers,
        "Bands near Fermi Level",
        config.zoom_window,
        true,
    )
}

fn draw_comparison<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    original: Option<&BandTable>,
    corrected: Option<&BandTable>,
    fermi_energy: f64,
    markers: &[SymmetryMarker],
    config: &PlotConfig,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).map_err(plot_err)?;
    let (width, _) = root.dim_in_pixel();
    let (left, right) = root.split_horizontally(width / 2);

    match original {
        Some(table) if !table.is_empty() => {
            draw_raw_panel(&left, table, fermi_energy, config.band_window)?
        }
        _ => chart::draw_message(&left, "Original data not found")?,
    }

    match corrected {
        Some(table) if !table.is_empty() => draw_band_panel(
            &right,
            &SpinBands::new(table.clone(), None),
            fermi_energy,
            markers,
            "Corrected Band Structure",
            config.band_window,
            false,
        )?,
        _ => chart::draw_message(&right, "Corrected data not found")?,
    }
    Ok(())
}

/// 分段绘制能带；`near_fermi_only` 时只画费米能 ±3 eV 内有点的段
///
/// spin-down 通道以红色虚线绘制。
fn draw_band_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    bands: &SpinBands,
    fermi_energy: f64,
    markers: &[SymmetryMarker],
    caption: &str,
    y_range: (f64, f64),
    near_fermi_only: bool,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let k_max = match bands.k_max() {
        Some(k) if k > 0.0 => k,
        _ => return chart::draw_message(area, "No band data"),
    };

    let mut chart = chart::build_chart(
        area,
        &Axes {
            caption,
            x_desc: K_DESC,
            y_desc: ENERGY_DESC,
            x_range: (0.0, k_max),
            y_range,
        },
    )?;

    let (width, stroke) = if near_fermi_only { (2, 1.0) } else { (1, 0.8) };
    let polarized = bands.is_spin_polarized();
    draw_channel(
        &mut chart,
        &bands.up,
        fermi_energy,
        BAND_LINE.mix(stroke).stroke_width(width),
        LineKind::Solid,
        polarized.then_some("Spin Up"),
        near_fermi_only,
    )?;
    if let Some(down) = &bands.down {
        draw_channel(
            &mut chart,
            down,
            fermi_energy,
            SPIN_DOWN.mix(stroke).stroke_width(width),
            LineKind::Dashed,
            Some("Spin Down"),
            near_fermi_only,
        )?;
    }

    draw_fermi_and_markers(&mut chart, markers, y_range)
}

/// 绘制一个自旋通道的全部能带段，图例只挂在第一段可见的能带上
fn draw_channel<DB: DrawingBackend>(
    chart: &mut EnergyChart<'_, DB>,
    table: &BandTable,
    fermi_energy: f64,
    style: ShapeStyle,
    kind: LineKind,
    mut label: Option<&str>,
    near_fermi_only: bool,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let x = chart.x_range();
    let y = chart.y_range();

    for segment in table.drawable_segments() {
        if near_fermi_only && !segment_near_fermi(table, segment, fermi_energy, NEAR_FERMI_WINDOW)
        {
            continue;
        }
        let points = table.shifted_segment(segment, fermi_energy);
        let visible = !chart::clip_polyline(&points, (x.start, x.end), (y.start, y.end)).is_empty();
        let segment_label = if visible { label.take() } else { None };
        chart::draw_curve(chart, &points, style, kind, segment_label)?;
    }
    Ok(())
}

/// 原始文件不分段，按文件顺序连成一条折线
fn draw_raw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    table: &BandTable,
    fermi_energy: f64,
    y_range: (f64, f64),
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let k_max = table.k_max().filter(|k| *k > 0.0).unwrap_or(1.0);

    let mut chart = chart::build_chart(
        area,
        &Axes {
            caption: "Original Band Structure",
            x_desc: K_DESC,
            y_desc: ENERGY_DESC,
            x_range: (0.0, k_max),
            y_range,
        },
    )?;

    let points: Vec<(f64, f64)> = table
        .points
        .iter()
        .map(|(k, e)| (*k, e - fermi_energy))
        .collect();
    chart::draw_curve(
        &mut chart,
        &points,
        RED.mix(0.6).stroke_width(1),
        LineKind::Solid,
        None,
    )?;

    chart::draw_hline(
        &mut chart,
        0.0,
        BLACK.mix(0.8).stroke_width(1),
        LineKind::Dashed,
        None,
    )
}

fn draw_fermi_and_markers<'a, DB: DrawingBackend + 'a>(
    chart: &mut EnergyChart<'a, DB>,
    markers: &[SymmetryMarker],
    y_range: (f64, f64),
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    chart::draw_hline(
        chart,
        0.0,
        RED.stroke_width(2),
        LineKind::Dashed,
        Some("Fermi Level"),
    )?;

    let x = chart.x_range();
    let label_y = label_height(y_range);
    for marker in markers {
        if marker.position < x.start || marker.position > x.end {
            continue;
        }
        chart::draw_vline(
            chart,
            marker.position,
            BLACK.mix(0.7).stroke_width(1),
            LineKind::Dotted,
            None,
        )?;
        if !marker.label.is_empty() {
            let anchor = label_anchor(marker.position, (x.start, x.end));
            chart::draw_label(chart, &marker.label, (marker.position, label_y), 18, anchor)?;
        }
    }

    chart::draw_legend(chart)
}

/// 高对称点标签的纵坐标：顶部下方 5% 处
fn label_height(y_range: (f64, f64)) -> f64 {
    y_range.1 - 0.05 * (y_range.1 - y_range.0)
}

/// 靠近左右边界的标签向内对齐，避免被绘图区裁掉一半
fn label_anchor(position: f64, x_range: (f64, f64)) -> HPos {
    let edge = 0.02 * (x_range.1 - x_range.0);
    if position - x_range.0 <= edge {
        HPos::Left
    } else if x_range.1 - position <= edge {
        HPos::Right
    } else {
        HPos::Center
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::KPathPreset;
    use crate::plot::ImageFormat;
    use std::fs;
    use tempdir::TempDir;

    /// 两条能带，其中一条穿过 E_F = 10 eV
    fn table(shift: f64) -> BandTable {
        BandTable {
            points: vec![
                (0.0, 6.0 + shift),
                (0.5, 7.0 + shift),
                (1.0, 6.5 + shift),
                (0.0, 9.5 + shift),
                (0.5, 10.5 + shift),
                (1.0, 11.0 + shift),
            ],
            blank_breaks: vec![],
        }
    }

    fn svg_config() -> PlotConfig {
        PlotConfig {
            width: 800,
            height: 600,
            format: ImageFormat::Svg,
            ..PlotConfig::default()
        }
    }

    #[test]
    fn test_label_height() {
        assert!((label_height((-6.0, 6.0)) - 5.4).abs() < 1e-12);
        assert!((label_height((-3.0, 3.0)) - 2.7).abs() < 1e-12);
    }

    #[test]
    fn test_render_spin_resolved_bands() {
        let tmp = TempDir::new("qeplot_bands").unwrap();
        let bands = SpinBands::new(table(0.0), Some(table(0.3)));
        let markers = KPathPreset::FccShort.estimate(1.0);

        let path = tmp.path().join("bands.svg");
        plot_bands(&bands, 10.0, &markers, &svg_config(), "Band Structure", &path).unwrap();
        let svg = fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Spin Down"));
        assert!(svg.contains("Fermi Level"));

        let path = tmp.path().join("detailed.svg");
        plot_bands_detailed(&bands, 10.0, &markers, &svg_config(), "Band Structure", &path)
            .unwrap();
        let svg = fs::read_to_string(&path).unwrap();
        assert!(svg.contains("Bands near Fermi Level"));
    }

    #[test]
    fn test_unpolarized_bands_have_no_spin_legend() {
        let tmp = TempDir::new("qeplot_bands").unwrap();
        let path = tmp.path().join("bands.svg");
        let bands = SpinBands::new(table(0.0), None);
        plot_bands(&bands, 10.0, &[], &svg_config(), "Band Structure", &path).unwrap();
        let svg = fs::read_to_string(&path).unwrap();
        assert!(!svg.contains("Spin Down"));
        assert!(!svg.contains("Spin Up"));
    }

    #[test]
    fn test_comparison_with_one_side_missing() {
        let tmp = TempDir::new("qeplot_bands").unwrap();
        let original = table(0.0);

        let path = tmp.path().join("original_only.svg");
        plot_bands_comparison(Some(&original), None, 10.0, &[], &svg_config(), &path).unwrap();
        let svg = fs::read_to_string(&path).unwrap();
        assert!(svg.contains("Original Band Structure"));
        assert!(svg.contains("Corrected data not found"));

        let path = tmp.path().join("corrected_only.svg");
        plot_bands_comparison(None, Some(&original), 10.0, &[], &svg_config(), &path).unwrap();
        let svg = fs::read_to_string(&path).unwrap();
        assert!(svg.contains("Original data not found"));
        assert!(svg.contains("Corrected Band Structure"));
    }

    #[test]
    fn test_edge_labels_anchor_inward() {
        assert!(matches!(label_anchor(0.0, (0.0, 2.0)), HPos::Left));
        assert!(matches!(label_anchor(2.0, (0.0, 2.0)), HPos::Right));
        assert!(matches!(label_anchor(1.0, (0.0, 2.0)), HPos::Center));
    }
}
