//! # analyze 命令实现
//!
//! 输出三部分终端报告：
//! - 能带：点数、能量范围、费米能附近的点数与金属性判断
//! - DOS：费米能处各自旋通道的 DOS、自旋极化率、投影完备度
//! - 磁性：SCF 输出中的位点磁矩与磁有序类型
//!
//! 缺少某一部分的输入文件时给出警告并跳过该部分。
//!
//! ## 依赖关系
//! - 使用 `cli/analyze.rs` 定义的 AnalyzeArgs
//! - 使用 `parsers/`, `analysis/`
//! - 被 `commands/all.rs` 复用

use super::{dos, Workspace};
use crate::analysis::{analyze_bands, analyze_magnetism, dos_report, BandReport, DosReport, MagneticReport};
use crate::cli::analyze::AnalyzeArgs;
use crate::error::{QeplotError, Result};
use crate::models::{MagneticSummary, SiteMoment};
use crate::parsers;
use crate::utils::output;

use std::path::Path;
use tabled::{Table, Tabled};

/// 报告中的一行 "量 - 值"
#[derive(Debug, Clone, Tabled)]
struct QuantityRow {
    #[tabled(rename = "Quantity")]
    quantity: String,
    #[tabled(rename = "Value")]
    value: String,
}

impl QuantityRow {
    fn new(quantity: &str, value: String) -> Self {
        QuantityRow {
            quantity: quantity.to_string(),
            value,
        }
    }
}

/// 位点磁矩行
#[derive(Debug, Clone, Tabled)]
struct SiteRow {
    #[tabled(rename = "Atom")]
    atom: usize,
    #[tabled(rename = "Species")]
    species: String,
    #[tabled(rename = "Charge")]
    charge: String,
    #[tabled(rename = "Moment (μB)")]
    moment: String,
}

/// 执行 analyze 命令
pub fn execute(args: AnalyzeArgs) -> Result<()> {
    let ws = Workspace::from_args(&args.input);
    print_reports(&ws, args.scf_log.as_deref())
}

/// 输出全部报告，没有任何可用输入时返回错误
pub fn print_reports(ws: &Workspace, scf_log: Option<&Path>) -> Result<()> {
    let mut printed = 0;

    match band_section(ws) {
        Ok(report) => {
            print_band_report(&report);
            printed += 1;
        }
        Err(e) => output::print_warning(&format!("Band analysis skipped: {}", e)),
    }

    match dos_section(ws) {
        Ok(report) => {
            print_dos_report(&report);
            printed += 1;
        }
        Err(e) => output::print_warning(&format!("DOS analysis skipped: {}", e)),
    }

    match magnetic_section(ws, scf_log) {
        Ok((summary, report)) => {
            print_magnetic_report(&summary, &report);
            printed += 1;
        }
        Err(e) => output::print_warning(&format!("Magnetic analysis skipped: {}", e)),
    }

    if printed == 0 {
        return Err(QeplotError::Other(format!(
            "No analyzable output for prefix '{}' in {}",
            ws.prefix,
            ws.dir.display()
        )));
    }
    Ok(())
}

fn band_section(ws: &Workspace) -> Result<BandReport> {
    let fermi = ws.fermi_energy()?;
    let (path, _) = parsers::bands::resolve_bands_file(&ws.dir, &ws.prefix)?;
    let table = parsers::bands::parse_bands_file(&path)?;
    Ok(analyze_bands(&table, fermi))
}

fn dos_section(ws: &Workspace) -> Result<DosReport> {
    let dos = dos::load_dos(ws)?;
    let tot_path = parsers::pdos::pdos_tot_path(&ws.dir, &ws.prefix);
    let pdos_total = if tot_path.is_file() {
        Some(parsers::pdos::parse_pdos_tot_file(&tot_path)?)
    } else {
        None
    };
    Ok(dos_report(&dos, pdos_total.as_ref()))
}

fn magnetic_section(ws: &Workspace, scf_log: Option<&Path>) -> Result<(MagneticSummary, MagneticReport)> {
    let mut summary = parsers::scf_log::parse_scf_log_file(&ws.scf_log_path(scf_log))?;
    if summary.sites.is_empty() && summary.total_magnetization.is_none() {
        return Err(QeplotError::Other(
            "SCF output contains no magnetization data".to_string(),
        ));
    }

    // 日志中的位点不带元素符号，从 PDOS 文件名补全
    if let Ok(files) = parsers::pdos::discover_pdos_files(&ws.dir, &ws.prefix) {
        let species: Vec<(usize, String)> = parsers::pdos::group_by_atom(&files)
            .into_iter()
            .map(|(idx, species, _)| (idx, species))
            .collect();
        summary.assign_species(&species);
    }

    let report = analyze_magnetism(&summary);
    Ok((summary, report))
}

fn print_band_report(report: &BandReport) {
    output::print_header("Band Structure Analysis");

    let rows = vec![
        QuantityRow::new("Fermi energy", format!("{:.3} eV", report.fermi_energy)),
        QuantityRow::new("k-points", report.num_points.to_string()),
        QuantityRow::new("Band segments", report.num_segments.to_string()),
        QuantityRow::new(
            "Energy range (E - E_F)",
            format!("{:.2} to {:.2} eV", report.energy_min, report.energy_max),
        ),
        QuantityRow::new(
            "Points within 0.1 eV of E_F",
            report.fermi_crossings.to_string(),
        ),
    ];
    println!("{}", Table::new(&rows));
    output::print_info(report.verdict());
}

fn print_dos_report(report: &DosReport) {
    output::print_header("Density of States at the Fermi Level");

    let fmt = |v: Option<f64>| v.map(|x| format!("{:.4}", x)).unwrap_or_else(|| "-".to_string());

    let mut rows = vec![QuantityRow::new(
        "Fermi energy",
        format!("{:.3} eV", report.fermi_energy),
    )];
    match report.down_at_fermi {
        Some(down) => {
            rows.push(QuantityRow::new("N↑(E_F) (states/eV)", fmt(report.up_at_fermi)));
            rows.push(QuantityRow::new("N↓(E_F) (states/eV)", format!("{:.4}", down)));
            rows.push(QuantityRow::new(
                "Spin polarization",
                report
                    .polarization
                    .map(|p| format!("{:.1} %", p * 100.0))
                    .unwrap_or_else(|| "-".to_string()),
            ));
        }
        None => {
            rows.push(QuantityRow::new("N(E_F) (states/eV)", fmt(report.up_at_fermi)));
        }
    }
    if let Some(p) = report.projectability {
        rows.push(QuantityRow::new(
            "Projectability (occupied)",
            format!("{:.1} %", p * 100.0),
        ));
    }
    println!("{}", Table::new(&rows));

    if report.up_at_fermi.is_none() {
        output::print_warning("Fermi energy lies outside the DOS energy grid");
    }
    if report.is_half_metal_candidate() {
        output::print_info("Nearly full spin polarization at E_F: half-metal candidate");
    }
}

fn print_magnetic_report(summary: &MagneticSummary, report: &MagneticReport) {
    output::print_header("Magnetic Analysis");

    let species = |s: &SiteMoment| s.species.clone().unwrap_or_else(|| "-".to_string());

    if !summary.sites.is_empty() {
        let rows: Vec<SiteRow> = summary
            .sites
            .iter()
            .map(|s| SiteRow {
                atom: s.atom_index,
                species: species(s),
                charge: format!("{:.4}", s.charge),
                moment: format!("{:+.2}", s.magnetization),
            })
            .collect();
        println!("{}", Table::new(&rows));
    }

    let mut rows = Vec::new();
    match (summary.fermi_energy, summary.fermi_energy_down) {
        (Some(up), Some(down)) => rows.push(QuantityRow::new(
            "SCF Fermi energy (up/down)",
            format!("{:.3} / {:.3} eV", up, down),
        )),
        (Some(fermi), None) => {
            rows.push(QuantityRow::new("SCF Fermi energy", format!("{:.3} eV", fermi)))
        }
        _ => {}
    }
    rows.push(QuantityRow::new(
        "Total magnetization",
        format!("{:+.2} μB/cell", report.total_moment),
    ));
    if let Some(abs) = summary.absolute_magnetization {
        rows.push(QuantityRow::new(
            "Absolute magnetization",
            format!("{:.2} μB/cell", abs),
        ));
    }
    rows.push(QuantityRow::new("Magnetic order", report.order.to_string()));
    if let Some(dominant) = &report.dominant {
        rows.push(QuantityRow::new(
            "Largest moment",
            format!("{} ({:+.2} μB)", species(dominant), dominant.magnetization),
        ));
    }
    if !report.antiparallel.is_empty() {
        rows.push(QuantityRow::new(
            "Antiparallel sites",
            report
                .antiparallel
                .iter()
                .map(|s| format!("{} ({:+.2} μB)", species(s), s.magnetization))
                .collect::<Vec<_>>()
                .join(", "),
        ));
    }
    println!("{}", Table::new(&rows));

    if !summary.converged {
        output::print_warning("SCF output does not report convergence");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempdir::TempDir;

    fn workspace(dir: &Path) -> Workspace {
        let args = crate::cli::InputArgs {
            dir: dir.to_path_buf(),
            prefix: "X".to_string(),
            output_dir: dir.to_path_buf(),
            fermi: None,
        };
        Workspace::from_args(&args)
    }

    #[test]
    fn test_sections_from_files() {
        let tmp = TempDir::new("qeplot_analyze").unwrap();
        fs::write(
            tmp.path().join("X.dos"),
            "#  E (eV)   dosup(E)   dosdw(E)  Int dos(E) EFermi =   1.000 eV\n\
             0.0 1.0 1.0 0.0\n\
             1.0 2.0 0.0 1.0\n\
             2.0 3.0 1.0 2.0\n",
        )
        .unwrap();
        fs::write(
            tmp.path().join("X.bands.gnu"),
            "0.0 -2.0\n1.0 -1.0\n\n0.0 1.05\n1.0 3.0\n",
        )
        .unwrap();

        let ws = workspace(tmp.path());
        let bands = band_section(&ws).unwrap();
        assert_eq!(bands.num_points, 4);
        assert_eq!(bands.fermi_crossings, 1);

        let dos = dos_section(&ws).unwrap();
        assert_eq!(dos.up_at_fermi, Some(2.0));
        assert_eq!(dos.polarization, Some(1.0));
        assert_eq!(dos.projectability, None);

        assert!(magnetic_section(&ws, None).is_err());
        assert!(print_reports(&ws, None).is_ok());
    }

    #[test]
    fn test_no_inputs_is_an_error() {
        let tmp = TempDir::new("qeplot_analyze_empty").unwrap();
        assert!(print_reports(&workspace(tmp.path()), None).is_err());
    }
}
