//! # DOS 图表
//!
//! - 总 DOS（自旋分辨，spin-down 取负）
//! - 总 DOS 与各原子 d 轨道 PDOS 的上下组合图
//!
//! ## 依赖关系
//! - 被 `commands/dos.rs`, `commands/pdos.rs` 调用
//! - 使用 `plot/chart.rs`, `plot/style.rs`

use crate::error::Result;
use crate::models::{AtomPdos, DosTable, OrbitalKind};
use crate::plot::chart::{self, curve, Axes};
use crate::plot::style::{atom_color, LineKind, GRAY, SPIN_DOWN, SPIN_UP};
use crate::plot::PlotConfig;

use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

const ENERGY_DESC: &str = "Energy - E_F (eV)";

/// 绘制总 DOS
pub fn plot_total_dos(dos: &DosTable, config: &PlotConfig, title: &str, output: &Path) -> Result<()> {
    render_to_file!(config, output, draw_total_dos, dos, config, title);
    Ok(())
}

/// 绘制总 DOS + 原子 d 轨道 PDOS 组合图
pub fn plot_combined_dos_pdos(
    dos: &DosTable,
    atoms: &[AtomPdos],
    config: &PlotConfig,
    title: &str,
    output: &Path,
) -> Result<()> {
    render_to_file!(config, output, draw_combined, dos, atoms, config, title);
    Ok(())
}

fn draw_total_dos<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    dos: &DosTable,
    config: &PlotConfig,
    title: &str,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).map_err(crate::plot::plot_err)?;

    let energy = dos.shifted_energy();
    let window = config.energy_window;
    let max_up = chart::window_max(&energy, dos.up(), window);
    let max_down = dos.down().map(|d| chart::window_max(&energy, d, window));

    let mut chart = chart::build_chart(
        root,
        &Axes {
            caption: title,
            x_desc: ENERGY_DESC,
            y_desc: "DOS (states/eV)",
            x_range: window,
            y_range: chart::dos_y_range(max_up, max_down),
        },
    )?;

    let (up, down) = chart::spin_curves(&energy, dos.up(), dos.down());
    let up_label = if dos.is_spin_polarized() {
        "Spin Up"
    } else {
        "Total DOS"
    };
    chart::draw_fill(&mut chart, &up, SPIN_UP.mix(0.3))?;
    chart::draw_curve(
        &mut chart,
        &up,
        SPIN_UP.stroke_width(2),
        LineKind::Solid,
        Some(up_label),
    )?;

    if let Some(down) = down {
        chart::draw_fill(&mut chart, &down, SPIN_DOWN.mix(0.3))?;
        chart::draw_curve(
            &mut chart,
            &down,
            SPIN_DOWN.stroke_width(2),
            LineKind::Solid,
            Some("Spin Down"),
        )?;
    }

    chart::draw_vline(
        &mut chart,
        0.0,
        BLACK.mix(0.7).stroke_width(1),
        LineKind::Dashed,
        Some("Fermi Level"),
    )?;
    chart::draw_legend(&mut chart)
}

fn draw_combined<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    dos: &DosTable,
    atoms: &[AtomPdos],
    config: &PlotConfig,
    title: &str,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).map_err(crate::plot::plot_err)?;
    let (_, height) = root.dim_in_pixel();
    let (upper, lower) = root.split_vertically(height / 2);

    let window = config.energy_window;
    let fermi = dos.fermi_energy;

    // 上图：总 DOS
    let energy = dos.shifted_energy();
    let max_up = chart::window_max(&energy, dos.up(), window);
    let max_down = dos.down().map(|d| chart::window_max(&energy, d, window));

    let mut top = chart::build_chart(
        &upper,
        &Axes {
            caption: title,
            x_desc: "",
            y_desc: "Total DOS (states/eV)",
            x_range: window,
            y_range: chart::dos_y_range(max_up, max_down),
        },
    )?;

    let (up, down) = chart::spin_curves(&energy, dos.up(), dos.down());
    chart::draw_fill(&mut top, &up, BLACK.mix(0.2))?;
    chart::draw_curve(
        &mut top,
        &up,
        BLACK.stroke_width(2),
        LineKind::Solid,
        Some("Total Spin Up"),
    )?;
    if let Some(down) = down {
        chart::draw_fill(&mut top, &down, BLACK.mix(0.2))?;
        chart::draw_curve(
            &mut top,
            &down,
            BLACK.stroke_width(2),
            LineKind::Dashed,
            Some("Total Spin Down"),
        )?;
    }
    chart::draw_vline(
        &mut top,
        0.0,
        GRAY.mix(0.8).stroke_width(1),
        LineKind::Solid,
        None,
    )?;
    chart::draw_legend(&mut top)?;

    // 下图：各原子 d 轨道 spin-up
    let d_tables: Vec<_> = atoms
        .iter()
        .enumerate()
        .filter_map(|(i, a)| a.orbital(OrbitalKind::D).map(|t| (i, a, t)))
        .collect();

    let max_pdos = d_tables
        .iter()
        .map(|(_, _, t)| chart::window_max(&t.shifted_energy(fermi), &t.up, window))
        .fold(0.0_f64, f64::max);

    let mut bottom = chart::build_chart(
        &lower,
        &Axes {
            caption: "",
            x_desc: ENERGY_DESC,
            y_desc: "PDOS (states/eV)",
            x_range: window,
            y_range: chart::dos_y_range(max_pdos, None),
        },
    )?;

    for (i, atom, table) in d_tables {
        let color = atom_color(i);
        let points = curve(&table.shifted_energy(fermi), &table.up, 1.0);
        let label = format!("{} d-up", atom.species);
        chart::draw_fill(&mut bottom, &points, color.mix(0.3))?;
        chart::draw_curve(
            &mut bottom,
            &points,
            color.stroke_width(2),
            LineKind::Solid,
            Some(label.as_str()),
        )?;
    }
    chart::draw_vline(
        &mut bottom,
        0.0,
        GRAY.mix(0.8).stroke_width(1),
        LineKind::Solid,
        None,
    )?;
    chart::draw_legend(&mut bottom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DosChannels, PdosTable};
    use crate::plot::ImageFormat;
    use std::fs;
    use tempdir::TempDir;

    fn spin_dos() -> DosTable {
        DosTable {
            energy: vec![8.0, 9.0, 10.0, 11.0, 12.0],
            channels: DosChannels::Polarized {
                up: vec![0.5, 1.0, 2.0, 1.0, 0.5],
                down: vec![0.2, 0.4, 0.1, 0.8, 0.3],
            },
            integrated: vec![0.0, 1.0, 2.0, 3.0, 4.0],
            fermi_energy: 10.0,
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
    fn test_render_total_dos() {
        let tmp = TempDir::new("qeplot_dos").unwrap();
        let path = tmp.path().join("total_dos.svg");
        plot_total_dos(&spin_dos(), &svg_config(), "Total DOS - Fe", &path).unwrap();

        let svg = fs::read_to_string(&path).unwrap();
        assert!(svg.contains("Total DOS - Fe"));
        assert!(svg.contains("Spin Up"));
        assert!(svg.contains("Spin Down"));
    }

    #[test]
    fn test_render_combined() {
        let tmp = TempDir::new("qeplot_dos").unwrap();
        let path = tmp.path().join("combined.svg");
        let atoms = vec![AtomPdos {
            atom_index: 1,
            species: "Fe".to_string(),
            orbitals: vec![(
                OrbitalKind::D,
                PdosTable {
                    energy: vec![9.0, 10.0, 11.0],
                    up: vec![0.3, 1.2, 0.4],
                    down: Some(vec![0.1, 0.2, 0.6]),
                },
            )],
        }];
        plot_combined_dos_pdos(&spin_dos(), &atoms, &svg_config(), "Fe combined", &path).unwrap();

        let svg = fs::read_to_string(&path).unwrap();
        assert!(svg.contains("Total Spin Down"));
        assert!(svg.contains("Fe d-up"));
    }
}
