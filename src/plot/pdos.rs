//! # PDOS 图表
//!
//! - 各原子 d 轨道 PDOS 网格图
//! - 各原子 s + d 轨道详细网格图
//! - 所有原子 d 轨道 spin-up 对比图
//!
//! ## 依赖关系
//! - 被 `commands/pdos.rs` 调用
//! - 使用 `plot/chart.rs`, `plot/style.rs`

use crate::error::Result;
use crate::models::{AtomPdos, OrbitalKind, PdosTable};
use crate::plot::chart::{self, curve, Axes, EnergyChart};
use crate::plot::style::{atom_color, pastel_color, LineKind};
use crate::plot::{plot_err, PlotConfig};

use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

const ENERGY_DESC: &str = "Energy - E_F (eV)";
const PDOS_DESC: &str = "PDOS (states/eV)";

/// 网格面板内容
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PanelKind {
    /// 仅 d 轨道
    DOrbital,
    /// d 轨道 + s 轨道
    Detailed,
}

/// 绘制各原子 d 轨道 PDOS 网格图
pub fn plot_atomic_pdos(
    atoms: &[AtomPdos],
    fermi_energy: f64,
    config: &PlotConfig,
    output: &Path,
) -> Result<()> {
    render_to_file!(
        config,
        output,
        draw_grid,
        atoms,
        fermi_energy,
        config,
        PanelKind::DOrbital
    );
    Ok(())
}

/// 绘制各原子 s + d 轨道详细网格图
pub fn plot_detailed_pdos(
    atoms: &[AtomPdos],
    fermi_energy: f64,
    config: &PlotConfig,
    output: &Path,
) -> Result<()> {
    render_to_file!(
        config,
        output,
        draw_grid,
        atoms,
        fermi_energy,
        config,
        PanelKind::Detailed
    );
    Ok(())
}

/// 绘制所有原子 d 轨道 spin-up 对比图
pub fn plot_orbital_comparison(
    atoms: &[AtomPdos],
    fermi_energy: f64,
    config: &PlotConfig,
    title: &str,
    output: &Path,
) -> Result<()> {
    render_to_file!(
        config,
        output,
        draw_comparison,
        atoms,
        fermi_energy,
        config,
        title
    );
    Ok(())
}

/// 网格行列数：两列，行数随原子数增加
pub fn grid_shape(n_atoms: usize) -> (usize, usize) {
    let cols = if n_atoms <= 1 { 1 } else { 2 };
    let rows = n_atoms.div_ceil(cols).max(1);
    (rows, cols)
}

fn draw_grid<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    atoms: &[AtomPdos],
    fermi_energy: f64,
    config: &PlotConfig,
    kind: PanelKind,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).map_err(plot_err)?;

    let panels = root.split_evenly(grid_shape(atoms.len()));
    for (i, (atom, area)) in atoms.iter().zip(panels.iter()).enumerate() {
        draw_atom_panel(area, atom, i, fermi_energy, config, kind)?;
    }
    Ok(())
}

fn draw_atom_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    atom: &AtomPdos,
    index: usize,
    fermi_energy: f64,
    config: &PlotConfig,
    kind: PanelKind,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let d = atom.orbital(OrbitalKind::D);
    let s = match kind {
        PanelKind::Detailed => atom.orbital(OrbitalKind::S),
        PanelKind::DOrbital => None,
    };

    if d.is_none() && s.is_none() {
        return chart::draw_message(area, &format!("No orbital data for {} (atom {})", atom.species, atom.atom_index));
    }

    let window = config.energy_window;
    let (max_up, max_down) = [d, s]
        .iter()
        .flatten()
        .map(|t| table_extent(t, fermi_energy, window))
        .fold((0.0_f64, None::<f64>), |(up, down), (u, dn)| {
            let down = match (down, dn) {
                (Some(a), Some(b)) => Some(a.max(b)),
                (a, b) => a.or(b),
            };
            (up.max(u), down)
        });

    let caption = match kind {
        PanelKind::DOrbital => format!("{} d-orbitals PDOS", atom.species),
        PanelKind::Detailed => format!("{} Orbital Contributions", atom.species),
    };

    let mut chart = chart::build_chart(
        area,
        &Axes {
            caption: &caption,
            x_desc: ENERGY_DESC,
            y_desc: PDOS_DESC,
            x_range: window,
            y_range: chart::dos_y_range(max_up, max_down),
        },
    )?;

    let color = atom_color(index);
    if let Some(table) = d {
        let width = match kind {
            PanelKind::DOrbital => 1,
            PanelKind::Detailed => 2,
        };
        draw_spin_pair(
            &mut chart,
            table,
            fermi_energy,
            &atom.species,
            OrbitalKind::D,
            color,
            width,
            LineKind::Dashed,
            true,
        )?;
    }
    if let Some(table) = s {
        draw_spin_pair(
            &mut chart,
            table,
            fermi_energy,
            &atom.species,
            OrbitalKind::S,
            pastel_color(index),
            1,
            LineKind::Dotted,
            false,
        )?;
    }

    chart::draw_vline(
        &mut chart,
        0.0,
        BLACK.mix(0.7).stroke_width(1),
        LineKind::Solid,
        None,
    )?;
    chart::draw_legend(&mut chart)
}

/// 绘制一个轨道的 spin-up（实线）与 spin-down（取负，`down_kind` 线型）
#[allow(clippy::too_many_arguments)]
fn draw_spin_pair<DB: DrawingBackend>(
    chart: &mut EnergyChart<'_, DB>,
    table: &PdosTable,
    fermi_energy: f64,
    species: &str,
    orbital: OrbitalKind,
    color: RGBColor,
    width: u32,
    down_kind: LineKind,
    fill: bool,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let energy = table.shifted_energy(fermi_energy);
    let (up, down) = chart::spin_curves(&energy, &table.up, table.down.as_deref());

    if fill {
        chart::draw_fill(chart, &up, color.mix(0.3))?;
    }
    let up_label = match table.down {
        Some(_) => format!("{} {}-up", species, orbital),
        None => format!("{} {}", species, orbital),
    };
    chart::draw_curve(
        chart,
        &up,
        color.stroke_width(width),
        LineKind::Solid,
        Some(up_label.as_str()),
    )?;

    if let Some(down) = down {
        if fill {
            chart::draw_fill(chart, &down, color.mix(0.3))?;
        }
        let down_label = format!("{} {}-down", species, orbital);
        chart::draw_curve(
            chart,
            &down,
            color.stroke_width(width),
            down_kind,
            Some(down_label.as_str()),
        )?;
    }
    Ok(())
}

/// (窗口内 spin-up 最大值, 窗口内 spin-down 最大值)
fn table_extent(table: &PdosTable, fermi_energy: f64, window: (f64, f64)) -> (f64, Option<f64>) {
    let energy = table.shifted_energy(fermi_energy);
    let up = chart::window_max(&energy, &table.up, window);
    let down = table
        .down
        .as_ref()
        .map(|d| chart::window_max(&energy, d, window));
    (up, down)
}

fn draw_comparison<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    atoms: &[AtomPdos],
    fermi_energy: f64,
    config: &PlotConfig,
    title: &str,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).map_err(plot_err)?;

    let window = config.energy_window;
    let max_up = atoms
        .iter()
        .filter_map(|a| a.orbital(OrbitalKind::D))
        .map(|t| table_extent(t, fermi_energy, window).0)
        .fold(0.0_f64, f64::max);

    let mut chart = chart::build_chart(
        root,
        &Axes {
            caption: title,
            x_desc: ENERGY_DESC,
            y_desc: PDOS_DESC,
            x_range: window,
            y_range: chart::dos_y_range(max_up, None),
        },
    )?;

    for (i, atom) in atoms.iter().enumerate() {
        let Some(table) = atom.orbital(OrbitalKind::D) else {
            continue;
        };
        let color = atom_color(i);
        let points = curve(&table.shifted_energy(fermi_energy), &table.up, 1.0);
        let label = format!("{} d-up", atom.species);
        chart::draw_fill(&mut chart, &points, color.mix(0.2))?;
        chart::draw_curve(
            &mut chart,
            &points,
            color.stroke_width(2),
            LineKind::Solid,
            Some(label.as_str()),
        )?;
    }

    chart::draw_vline(
        &mut chart,
        0.0,
        BLACK.mix(0.8).stroke_width(2),
        LineKind::Dashed,
        Some("Fermi Level"),
    )?;
    chart::draw_legend(&mut chart)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plot::ImageFormat;
    use std::fs;
    use tempdir::TempDir;

    fn atom(index: usize, species: &str) -> AtomPdos {
        let table = |scale: f64| PdosTable {
            energy: vec![8.0, 9.0, 10.0, 11.0, 12.0],
            up: vec![0.1, 0.5, 1.0, 0.5, 0.1].iter().map(|v| v * scale).collect(),
            down: Some(vec![0.2, 0.3, 0.4, 0.9, 0.2].iter().map(|v| v * scale).collect()),
        };
        AtomPdos {
            atom_index: index,
            species: species.to_string(),
            orbitals: vec![(OrbitalKind::S, table(0.1)), (OrbitalKind::D, table(1.0))],
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
    fn test_render_pdos_figures() {
        let tmp = TempDir::new("qeplot_pdos").unwrap();
        let atoms = vec![atom(1, "Co"), atom(2, "Fe"), atom(3, "Mn")];
        let config = svg_config();

        let path = tmp.path().join("atomic.svg");
        plot_atomic_pdos(&atoms, 10.0, &config, &path).unwrap();
        let svg = fs::read_to_string(&path).unwrap();
        assert!(svg.contains("Mn d-down"));

        let path = tmp.path().join("detailed.svg");
        plot_detailed_pdos(&atoms, 10.0, &config, &path).unwrap();
        let svg = fs::read_to_string(&path).unwrap();
        assert!(svg.contains("Co s-up"));
        assert!(svg.contains("Co d-down"));

        let path = tmp.path().join("comparison.svg");
        plot_orbital_comparison(&atoms, 10.0, &config, "d comparison", &path).unwrap();
        let svg = fs::read_to_string(&path).unwrap();
        assert!(svg.contains("d comparison"));
        assert!(svg.contains("Fe d-up"));
    }

    #[test]
    fn test_grid_shape() {
        assert_eq!(grid_shape(0), (1, 1));
        assert_eq!(grid_shape(1), (1, 1));
        assert_eq!(grid_shape(4), (2, 2));
        assert_eq!(grid_shape(5), (3, 2));
    }

    #[test]
    fn test_table_extent() {
        let table = PdosTable {
            energy: vec![9.0, 10.0, 11.0, 30.0],
            up: vec![1.0, 4.0, 2.0, 50.0],
            down: Some(vec![0.5, 1.0, 3.0, 50.0]),
        };
        let (up, down) = table_extent(&table, 10.0, (-8.0, 8.0));
        assert_eq!(up, 4.0);
        assert_eq!(down, Some(3.0));
    }
}
