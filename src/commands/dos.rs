//! # dos 命令实现
//!
//! 读取 `<prefix>.dos`，绘制总 DOS 或导出 CSV。
//!
//! ## 依赖关系
//! - 使用 `cli/dos.rs` 定义的 DosArgs
//! - 使用 `parsers/dos.rs`, `plot/dos.rs`, `export.rs`

use super::Workspace;
use crate::cli::dos::DosArgs;
use crate::cli::OutputFormat;
use crate::error::Result;
use crate::export;
use crate::models::DosTable;
use crate::parsers;
use crate::plot::{self, PlotConfig};
use crate::utils::output;

use std::path::PathBuf;

/// 输出文件名中的图表名
pub const FILE_STEM: &str = "total_dos";

/// 执行 dos 命令
pub fn execute(args: DosArgs) -> Result<()> {
    output::print_header("Total Density of States");

    let ws = Workspace::from_args(&args.input);
    ws.prepare_output_dir()?;

    let dos = load_dos(&ws)?;
    output::print_info(&format!(
        "Read {} points from '{}' (E_F = {:.4} eV, {})",
        dos.len(),
        ws.dos_path().display(),
        dos.fermi_energy,
        if dos.is_spin_polarized() {
            "spin-polarized"
        } else {
            "non-polarized"
        }
    ));

    let path = match args.plot.format {
        OutputFormat::Csv => {
            let path = ws.data_path(FILE_STEM, "csv");
            export::dos_to_csv(&dos, &path)?;
            path
        }
        OutputFormat::Png | OutputFormat::Svg => {
            let config = args.plot.to_config()?;
            render_table(&dos, &ws, &config, args.title.as_deref())?
        }
    };

    output::print_success(&format!("Total DOS saved to '{}'", path.display()));
    Ok(())
}

/// 读取 DOS 表，命令行给出费米能时覆盖文件头中的值
pub fn load_dos(ws: &Workspace) -> Result<DosTable> {
    let mut dos = parsers::dos::parse_dos_file(&ws.dos_path())?;
    if let Some(fermi) = ws.fermi_override() {
        dos.fermi_energy = fermi;
    }
    Ok(dos)
}

/// 读取并绘制总 DOS，返回输出路径
pub fn render(ws: &Workspace, config: &PlotConfig) -> Result<PathBuf> {
    let dos = load_dos(ws)?;
    render_table(&dos, ws, config, None)
}

fn render_table(
    dos: &DosTable,
    ws: &Workspace,
    config: &PlotConfig,
    title: Option<&str>,
) -> Result<PathBuf> {
    let path = config.output_path(&ws.output_dir, &ws.prefix, FILE_STEM);
    let title = title
        .map(str::to_string)
        .unwrap_or_else(|| format!("Total Density of States - {}", ws.prefix));

    plot::dos::plot_total_dos(dos, config, &title, &path)?;
    Ok(path)
}
