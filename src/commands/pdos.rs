//! # pdos 命令实现
//!
//! 发现 `<prefix>.pdos_atm#*` 文件，按原子分组后绘制 PDOS 图表。
//!
//! ## 依赖关系
//! - 使用 `cli/pdos.rs` 定义的 PdosArgs
//! - 使用 `parsers/pdos.rs`, `plot/pdos.rs`, `plot/dos.rs`

use super::{dos, Workspace};
use crate::cli::pdos::{PdosArgs, PdosFigure};
use crate::cli::OutputFormat;
use crate::error::{QeplotError, Result};
use crate::models::OrbitalKind;
use crate::parsers::pdos::{discover_pdos_files, group_by_atom, load_atom_pdos};
use crate::plot::{self, PlotConfig};
use crate::utils::output;

use std::path::PathBuf;

/// 执行 pdos 命令
pub fn execute(args: PdosArgs) -> Result<()> {
    output::print_header("Projected Density of States");

    if args.plot.format == OutputFormat::Csv {
        return Err(QeplotError::InvalidArgument(
            "CSV export is only available for 'dos' and 'bands'".to_string(),
        ));
    }

    let ws = Workspace::from_args(&args.input);
    ws.prepare_output_dir()?;
    let config = args.plot.to_config()?;

    let files = discover_pdos_files(&ws.dir, &ws.prefix)?;
    let atoms = group_by_atom(&files);
    output::print_info(&format!(
        "Found {} PDOS files for {} atoms: {}",
        files.len(),
        atoms.len(),
        atoms
            .iter()
            .map(|(idx, species, _)| format!("{}#{}", species, idx))
            .collect::<Vec<_>>()
            .join(", ")
    ));

    for figure in args.figure.expand() {
        let path = render(&ws, &config, figure)?;
        output::print_success(&format!("PDOS plot saved to '{}'", path.display()));
    }
    Ok(())
}

/// 绘制一张 PDOS 图表，返回输出路径
pub fn render(ws: &Workspace, config: &PlotConfig, figure: PdosFigure) -> Result<PathBuf> {
    let files = discover_pdos_files(&ws.dir, &ws.prefix)?;
    let fermi = ws.fermi_energy()?;
    let path = config.output_path(&ws.output_dir, &ws.prefix, figure.file_stem());

    match figure {
        PdosFigure::Atomic => {
            let atoms = load_atom_pdos(&files, &[OrbitalKind::D])?;
            plot::pdos::plot_atomic_pdos(&atoms, fermi, config, &path)?;
        }
        PdosFigure::Detailed => {
            let atoms = load_atom_pdos(&files, &[OrbitalKind::S, OrbitalKind::D])?;
            plot::pdos::plot_detailed_pdos(&atoms, fermi, config, &path)?;
        }
        PdosFigure::Comparison => {
            let atoms = load_atom_pdos(&files, &[OrbitalKind::D])?;
            let title = format!("d-orbital Contributions Comparison - {} (Spin Up)", ws.prefix);
            plot::pdos::plot_orbital_comparison(&atoms, fermi, config, &title, &path)?;
        }
        PdosFigure::Combined => {
            let dos = dos::load_dos(ws)?;
            let atoms = load_atom_pdos(&files, &[OrbitalKind::D])?;
            let title = format!("{} - Total DOS and Atomic d-orbital PDOS", ws.prefix);
            plot::dos::plot_combined_dos_pdos(&dos, &atoms, config, &title, &path)?;
        }
        PdosFigure::All => {
            return Err(QeplotError::InvalidArgument(
                "'all' must be expanded before rendering".to_string(),
            ))
        }
    }

    Ok(path)
}
