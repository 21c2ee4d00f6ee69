//! # 通用绘图辅助
//!
//! 坐标系构建、曲线/填充/参考线绘制，以及在绘制前按坐标范围裁剪折线。
//!
//! ## 依赖关系
//! - 被 `plot/dos.rs`, `plot/pdos.rs`, `plot/bands.rs` 使用
//! - 使用 `plot/style.rs`

use crate::error::Result;
use crate::plot::plot_err;
use crate::plot::style::{LineKind, FONT};

use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::element::DashedPathElement;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

pub type EnergyChart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// 坐标轴描述
pub struct Axes<'t> {
    /// 空字符串表示不绘制标题
    pub caption: &'t str,
    pub x_desc: &'t str,
    pub y_desc: &'t str,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
}

/// 在绘图区域上建立笛卡尔坐标系并绘制网格
pub fn build_chart<'a, DB: DrawingBackend>(
    area: &'a DrawingArea<DB, Shift>,
    axes: &Axes,
) -> Result<EnergyChart<'a, DB>>
where
    DB::ErrorType: 'static,
{
    let mut builder = ChartBuilder::on(area);
    builder
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60);
    if !axes.caption.is_empty() {
        builder.caption(axes.caption, (FONT, 24).into_font());
    }

    let mut chart = builder
        .build_cartesian_2d(
            axes.x_range.0..axes.x_range.1,
            axes.y_range.0..axes.y_range.1,
        )
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc(axes.x_desc)
        .y_desc(axes.y_desc)
        .x_label_style((FONT, 16))
        .y_label_style((FONT, 16))
        .axis_desc_style((FONT, 18))
        .light_line_style(BLACK.mix(0.05))
        .bold_line_style(BLACK.mix(0.15))
        .draw()
        .map_err(plot_err)?;

    Ok(chart)
}

/// 绘制一条曲线（自动裁剪到坐标范围内）
pub fn draw_curve<DB: DrawingBackend>(
    chart: &mut EnergyChart<'_, DB>,
    points: &[(f64, f64)],
    style: ShapeStyle,
    kind: LineKind,
    label: Option<&str>,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let x = chart.x_range();
    let y = chart.y_range();
    let runs = clip_polyline(points, (x.start, x.end), (y.start, y.end));

    for (i, run) in runs.into_iter().enumerate() {
        let anno = match kind {
            LineKind::Solid => chart.draw_series(LineSeries::new(run, style)),
            LineKind::Dashed => chart.draw_series(DashedLineSeries::new(run, 8, 5, style)),
            LineKind::Dotted => chart.draw_series(DashedLineSeries::new(run, 2, 4, style)),
        }
        .map_err(plot_err)?;

        if i == 0 {
            if let Some(label) = label {
                let anno = anno.label(label);
                match kind {
                    LineKind::Solid => anno.legend(move |(x, y)| {
                        PathElement::new(vec![(x, y), (x + 20, y)], style)
                    }),
                    LineKind::Dashed => anno.legend(move |(x, y)| {
                        DashedPathElement::new(vec![(x, y), (x + 20, y)], 6, 3, style)
                    }),
                    LineKind::Dotted => anno.legend(move |(x, y)| {
                        DashedPathElement::new(vec![(x, y), (x + 20, y)], 2, 3, style)
                    }),
                };
            }
        }
    }

    Ok(())
}

/// 填充曲线与 y = 0 之间的区域
pub fn draw_fill<DB: DrawingBackend>(
    chart: &mut EnergyChart<'_, DB>,
    points: &[(f64, f64)],
    color: RGBAColor,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let x = chart.x_range();
    let inside: Vec<(f64, f64)> = points
        .iter()
        .copied()
        .filter(|(px, _)| *px >= x.start && *px <= x.end)
        .collect();
    if inside.len() < 2 {
        return Ok(());
    }

    chart
        .draw_series(AreaSeries::new(inside, 0.0, color.filled()))
        .map_err(plot_err)?;
    Ok(())
}

/// 竖直参考线，贯穿整个纵轴
pub fn draw_vline<DB: DrawingBackend>(
    chart: &mut EnergyChart<'_, DB>,
    x: f64,
    style: ShapeStyle,
    kind: LineKind,
    label: Option<&str>,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let y = chart.y_range();
    draw_curve(chart, &[(x, y.start), (x, y.end)], style, kind, label)
}

/// 水平参考线，贯穿整个横轴
pub fn draw_hline<DB: DrawingBackend>(
    chart: &mut EnergyChart<'_, DB>,
    y: f64,
    style: ShapeStyle,
    kind: LineKind,
    label: Option<&str>,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let x = chart.x_range();
    draw_curve(chart, &[(x.start, y), (x.end, y)], style, kind, label)
}

/// 在数据坐标处绘制文字，`anchor` 为文字相对该点的水平对齐方式
pub fn draw_label<DB: DrawingBackend>(
    chart: &mut EnergyChart<'_, DB>,
    text: &str,
    at: (f64, f64),
    size: i32,
    anchor: HPos,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let style = (FONT, size)
        .into_font()
        .style(FontStyle::Bold)
        .color(&BLACK)
        .pos(Pos::new(anchor, VPos::Bottom));

    chart
        .draw_series(std::iter::once(Text::new(text.to_string(), at, style)))
        .map_err(plot_err)?;
    Ok(())
}

/// 绘制图例
pub fn draw_legend<'a, DB: DrawingBackend + 'a>(chart: &mut EnergyChart<'a, DB>) -> Result<()>
where
    DB::ErrorType: 'static,
{
    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK.mix(0.5))
        .label_font((FONT, 14))
        .draw()
        .map_err(plot_err)
}

/// 在区域中央显示提示文字（数据缺失时代替图表）
pub fn draw_message<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, message: &str) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let (w, h) = area.dim_in_pixel();
    let style = (FONT, 20)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));

    area.draw(&Text::new(
        message,
        ((w / 2) as i32, (h / 2) as i32),
        style,
    ))
    .map_err(plot_err)?;
    Ok(())
}

/// (E - E_F, value) 点列，`sign` 为 -1 时取负
pub fn curve(energy: &[f64], values: &[f64], sign: f64) -> Vec<(f64, f64)> {
    energy
        .iter()
        .zip(values)
        .map(|(e, v)| (*e, sign * v))
        .collect()
}

/// spin-up 点列与取负后的 spin-down 点列
pub fn spin_curves(
    energy: &[f64],
    up: &[f64],
    down: Option<&[f64]>,
) -> (Vec<(f64, f64)>, Option<Vec<(f64, f64)>>) {
    (curve(energy, up, 1.0), down.map(|d| curve(energy, d, -1.0)))
}

/// DOS 纵轴范围：有 spin-down 时上下对称留白，否则从 0 开始
pub fn dos_y_range(max_up: f64, max_down: Option<f64>) -> (f64, f64) {
    let pad = |v: f64| if v > 0.0 { v * 1.1 } else { 1.0 };
    match max_down {
        Some(down) => (-pad(down), pad(max_up)),
        None => (0.0, pad(max_up)),
    }
}

/// 横坐标落在窗口内的点中 |y| 的最大值
pub fn window_max(x: &[f64], y: &[f64], window: (f64, f64)) -> f64 {
    x.iter()
        .zip(y)
        .filter(|(px, _)| **px >= window.0 && **px <= window.1)
        .map(|(_, py)| py.abs())
        .fold(0.0_f64, f64::max)
}

/// 将折线裁剪到矩形内，返回若干连续的折线段
pub fn clip_polyline(
    points: &[(f64, f64)],
    x: (f64, f64),
    y: (f64, f64),
) -> Vec<Vec<(f64, f64)>> {
    let mut runs = Vec::new();
    let mut current: Vec<(f64, f64)> = Vec::new();

    for pair in points.windows(2) {
        match clip_segment(pair[0], pair[1], x, y) {
            Some((start, end)) => {
                if current.last() != Some(&start) {
                    if current.len() > 1 {
                        runs.push(std::mem::take(&mut current));
                    }
                    current = vec![start];
                }
                current.push(end);
            }
            None => {
                if current.len() > 1 {
                    runs.push(std::mem::take(&mut current));
                }
                current.clear();
            }
        }
    }

    if current.len() > 1 {
        runs.push(current);
    }
    runs
}

/// Liang-Barsky 线段裁剪
fn clip_segment(
    a: (f64, f64),
    b: (f64, f64),
    x: (f64, f64),
    y: (f64, f64),
) -> Option<((f64, f64), (f64, f64))> {
    let dx = b.0 - a.0;
    let dy = b.1 - a.1;
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;

    for (p, q) in [
        (-dx, a.0 - x.0),
        (dx, x.1 - a.0),
        (-dy, a.1 - y.0),
        (dy, y.1 - a.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return None;
                }
                t1 = t1.min(r);
            }
        }
    }

    let start = if t0 == 0.0 {
        a
    } else {
        (a.0 + t0 * dx, a.1 + t0 * dy)
    };
    let end = if t1 == 1.0 {
        b
    } else {
        (a.0 + t1 * dx, a.1 + t1 * dy)
    };
    Some((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_inside_is_untouched() {
        let pts = vec![(0.0, 0.0), (1.0, 1.0), (2.0, 0.5)];
        let runs = clip_polyline(&pts, (0.0, 2.0), (-1.0, 1.0));
        assert_eq!(runs, vec![pts]);
    }

    #[test]
    fn test_clip_exits_and_reenters() {
        // 中间点越过上边界
        let pts = vec![(0.0, 0.0), (1.0, 4.0), (2.0, 0.0)];
        let runs = clip_polyline(&pts, (0.0, 2.0), (-1.0, 1.0));
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0][0], (0.0, 0.0));
        assert!((runs[0][1].0 - 0.25).abs() < 1e-12);
        assert!((runs[0][1].1 - 1.0).abs() < 1e-12);
        assert!((runs[1][0].0 - 1.75).abs() < 1e-12);
        assert_eq!(runs[1][1], (2.0, 0.0));
    }

    #[test]
    fn test_clip_fully_outside() {
        let pts = vec![(0.0, 10.0), (1.0, 12.0)];
        assert!(clip_polyline(&pts, (0.0, 1.0), (-6.0, 6.0)).is_empty());
    }

    #[test]
    fn test_vertical_line_on_boundary() {
        let pts = vec![(2.0, -1.0), (2.0, 1.0)];
        let runs = clip_polyline(&pts, (0.0, 2.0), (-1.0, 1.0));
        assert_eq!(runs, vec![pts]);
    }

    #[test]
    fn test_curve_sign() {
        let points = curve(&[1.0, 2.0], &[3.0, 4.0], -1.0);
        assert_eq!(points, vec![(1.0, -3.0), (2.0, -4.0)]);
    }

    #[test]
    fn test_spin_down_drawn_negative() {
        let (up, down) = spin_curves(&[-1.0, 0.0], &[1.0, 2.0], Some(&[0.5, 0.0]));
        assert_eq!(up, vec![(-1.0, 1.0), (0.0, 2.0)]);
        assert_eq!(down, Some(vec![(-1.0, -0.5), (0.0, -0.0)]));

        let (_, none) = spin_curves(&[0.0], &[1.0], None);
        assert!(none.is_none());
    }

    #[test]
    fn test_dos_y_range() {
        assert_eq!(dos_y_range(10.0, Some(5.0)), (-5.5, 11.0));
        assert_eq!(dos_y_range(0.0, None), (0.0, 1.0));
    }

    #[test]
    fn test_window_max() {
        let x = [-10.0, -1.0, 0.0, 1.0, 10.0];
        let y = [100.0, 2.0, -3.0, 1.0, 100.0];
        assert_eq!(window_max(&x, &y, (-8.0, 8.0)), 3.0);
    }
}
