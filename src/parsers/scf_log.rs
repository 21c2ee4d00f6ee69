//! # pw.x SCF 输出解析器
//!
//! 从 SCF 标准输出中提取费米能、总/绝对磁化强度和各位点磁矩。
//!
//! ## 支持的位点磁矩格式
//! ```text
//! (QE ≤ 6.x)  atom:    1    charge:   14.1234    magn:    1.0900    constr:    0.0000
//! (QE ≥ 7.0)  atom    1 (R=0.190)  charge= 14.1234  magn=  1.0900
//! ```
//! 每次迭代都会打印一组位点磁矩，只保留最后一组。
//!
//! 固定总磁矩 (`tot_magnetization`) 的计算中两个自旋通道各有一个费米能：
//! ```text
//!      the spin up/dw Fermi energies are    16.4321   15.9876 ev
//! ```
//!
//! ## 依赖关系
//! - 被 `commands/analyze.rs` 使用
//! - 使用 `models/magnetic.rs`

use crate::models::{MagneticSummary, SiteMoment};
use crate::parsers::table::parse_number;

use regex::Regex;
use std::path::Path;

use crate::error::Result;

/// 读取 SCF 输出文件
pub fn parse_scf_log_file(path: &Path) -> Result<MagneticSummary> {
    let content = super::read_to_string(path)?;
    Ok(parse_scf_log(&content))
}

/// 解析 SCF 输出文本
pub fn parse_scf_log(content: &str) -> MagneticSummary {
    let site_old =
        Regex::new(r"atom:\s*(\d+)\s+charge:\s*(\S+)\s+magn:\s*(\S+)").unwrap();
    let site_new =
        Regex::new(r"atom\s+(\d+)\s+\(R=[^)]*\)\s+charge=\s*(\S+)\s+magn=\s*(\S+)").unwrap();

    let mut summary = MagneticSummary::default();
    let mut current: Vec<SiteMoment> = Vec::new();
    let mut in_block = false;

    for line in content.lines() {
        if line.contains("Magnetic moment per site") {
            in_block = true;
            current.clear();
            continue;
        }

        if in_block {
            let caps = site_old.captures(line).or_else(|| site_new.captures(line));
            match caps {
                Some(caps) => {
                    let site = (
                        caps[1].parse::<usize>().ok(),
                        parse_number(&caps[2]),
                        parse_number(&caps[3]),
                    );
                    if let (Some(atom_index), Some(charge), Some(magnetization)) = site {
                        current.push(SiteMoment {
                            atom_index,
                            species: None,
                            charge,
                            magnetization,
                        });
                    }
                    continue;
                }
                None => {
                    in_block = false;
                    if !current.is_empty() {
                        summary.sites = std::mem::take(&mut current);
                    }
                }
            }
        }

        if line.contains("the Fermi energy is") {
            summary.fermi_energy = value_after(line, "the Fermi energy is");
            summary.fermi_energy_down = None;
        } else if line.contains("Fermi energies are") {
            let (up, down) = values_after(line, "Fermi energies are");
            summary.fermi_energy = up;
            summary.fermi_energy_down = down;
        } else if line.contains("total magnetization") {
            summary.total_magnetization = value_after(line, "=");
        } else if line.contains("absolute magnetization") {
            summary.absolute_magnetization = value_after(line, "=");
        } else if line.contains("convergence has been achieved") {
            summary.converged = true;
        }
    }

    if !current.is_empty() {
        summary.sites = current;
    }

    summary
}

/// 提取标记之后的第一个数字
fn value_after(line: &str, marker: &str) -> Option<f64> {
    let (_, rest) = line.split_once(marker)?;
    rest.split_whitespace().next().and_then(parse_number)
}

/// 提取标记之后的前两个数字
fn values_after(line: &str, marker: &str) -> (Option<f64>, Option<f64>) {
    let Some((_, rest)) = line.split_once(marker) else {
        return (None, None);
    };
    let mut values = rest.split_whitespace().map(parse_number);
    (values.next().flatten(), values.next().flatten())
}
