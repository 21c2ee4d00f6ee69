//! # projwfc.x PDOS 输出解析器
//!
//! 解析 `<prefix>.pdos_atm#N(X)_wfc#M(l)` 与 `<prefix>.pdos_tot` 文件。
//!
//! ## 列布局
//! ```text
//! 自旋极化:   E  ldos↑ ldos↓  pdos1↑ pdos1↓  pdos2↑ pdos2↓ ...   (3 + 2m 列)
//! 非自旋极化: E  ldos  pdos1  pdos2 ...                           (2 + m 列)
//! ```
//! m = 2l+1 为磁量子数分量数；轨道 PDOS 由 m 分量求和得到。
//!
//! ## 依赖关系
//! - 被 `commands/pdos.rs` 使用
//! - 使用 `parsers/table.rs`, `models/pdos.rs`
//! - 使用 `glob` 查找文件, `regex` 解析文件名

use crate::error::{QeplotError, Result};
use crate::models::{AtomPdos, OrbitalKind, PdosFileInfo, PdosTable, PdosTotal};
use crate::parsers::table::parse_numeric_table;

use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

const FORMAT: &str = "PDOS";

fn filename_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(?P<prefix>.+)\.pdos_atm#(?P<atom>\d+)\((?P<species>[^)]+)\)_wfc#(?P<wfc>\d+)\((?P<orb>[spdfSPDF])(?:_j(?P<j>[0-9.]+))?\)$",
        )
        .expect("valid PDOS filename regex")
    })
}

/// 从文件名解析原子、元素、轨道信息
pub fn parse_pdos_filename(path: &Path) -> Option<PdosFileInfo> {
    let name = path.file_name()?.to_str()?;
    let caps = filename_regex().captures(name)?;

    Some(PdosFileInfo {
        path: path.to_path_buf(),
        atom_index: caps["atom"].parse().ok()?,
        species: caps["species"].to_string(),
        wfc_index: caps["wfc"].parse().ok()?,
        orbital: OrbitalKind::from_letter(&caps["orb"])?,
        j: caps.name("j").and_then(|m| m.as_str().parse().ok()),
    })
}

/// 读取轨道 PDOS 文件
pub fn parse_pdos_file(info: &PdosFileInfo) -> Result<PdosTable> {
    let content = super::read_to_string(&info.path)?;
    parse_pdos_content(&content, info.components(), &info.path.display().to_string())
}

/// 从字符串内容解析轨道 PDOS，按 m 分量求和
pub fn parse_pdos_content(content: &str, components: usize, source: &str) -> Result<PdosTable> {
    let table = parse_numeric_table(content, FORMAT, source)?;
    let ncols = table.ncols();
    let m = components;

    if ncols == 3 + 2 * m {
        let up_cols = (3..ncols).step_by(2);
        let down_cols = (4..ncols).step_by(2);
        Ok(PdosTable {
            energy: table.column(0),
            up: table.sum_columns(up_cols),
            down: Some(table.sum_columns(down_cols)),
        })
    } else if ncols == 2 + m {
        Ok(PdosTable {
            energy: table.column(0),
            up: table.sum_columns(2..ncols),
            down: None,
        })
    } else {
        Err(QeplotError::parse(
            FORMAT,
            source,
            format!(
                "{} columns do not match {} components (expected {} or {})",
                ncols,
                m,
                3 + 2 * m,
                2 + m
            ),
        ))
    }
}

/// 读取 `<prefix>.pdos_tot`
pub fn parse_pdos_tot_file(path: &Path) -> Result<PdosTotal> {
    let content = super::read_to_string(path)?;
    parse_pdos_tot_content(&content, &path.display().to_string())
}

/// 解析 `.pdos_tot`：(E, dos↑, dos↓, pdos↑, pdos↓) 或 (E, dos, pdos)
pub fn parse_pdos_tot_content(content: &str, source: &str) -> Result<PdosTotal> {
    let table = parse_numeric_table(content, "PDOS total", source)?;

    match table.ncols() {
        5 => Ok(PdosTotal {
            energy: table.column(0),
            dos_up: table.column(1),
            dos_down: Some(table.column(2)),
            pdos_up: table.column(3),
            pdos_down: Some(table.column(4)),
        }),
        3 => Ok(PdosTotal {
            energy: table.column(0),
            dos_up: table.column(1),
            dos_down: None,
            pdos_up: table.column(2),
            pdos_down: None,
        }),
        n => Err(QeplotError::parse(
            "PDOS total",
            source,
            format!("expected 3 or 5 columns, found {}", n),
        )),
    }
}

/// 查找目录中某前缀的所有轨道 PDOS 文件
///
/// 结果按原子序号、波函数序号排序。
pub fn discover_pdos_files(dir: &Path, prefix: &str) -> Result<Vec<PdosFileInfo>> {
    let pattern = format!(
        "{}/{}.pdos_atm#*",
        glob::Pattern::escape(&dir.display().to_string()),
        glob::Pattern::escape(prefix)
    );

    let paths = glob::glob(&pattern)
        .map_err(|e| QeplotError::InvalidArgument(format!("bad glob '{}': {}", pattern, e)))?;

    let mut files: Vec<PdosFileInfo> = paths
        .filter_map(|p| p.ok())
        .filter_map(|p| parse_pdos_filename(&p))
        .collect();

    if files.is_empty() {
        return Err(QeplotError::NoPdosFiles {
            prefix: prefix.to_string(),
            dir: dir.display().to_string(),
        });
    }

    files.sort_by_key(|f| (f.atom_index, f.wfc_index));
    Ok(files)
}

/// 按原子分组，每个原子每种轨道只保留首个文件
pub fn group_by_atom(files: &[PdosFileInfo]) -> Vec<(usize, String, Vec<PdosFileInfo>)> {
    let mut groups: BTreeMap<usize, (String, Vec<PdosFileInfo>)> = BTreeMap::new();

    for file in files {
        let entry = groups
            .entry(file.atom_index)
            .or_insert_with(|| (file.species.clone(), Vec::new()));
        if !entry.1.iter().any(|f| f.orbital == file.orbital) {
            entry.1.push(file.clone());
        }
    }

    groups
        .into_iter()
        .map(|(idx, (species, files))| (idx, species, files))
        .collect()
}

/// 载入每个原子的指定轨道 PDOS
pub fn load_atom_pdos(files: &[PdosFileInfo], orbitals: &[OrbitalKind]) -> Result<Vec<AtomPdos>> {
    let mut atoms = Vec::new();

    for (atom_index, species, atom_files) in group_by_atom(files) {
        let mut loaded = Vec::new();
        for file in atom_files.iter().filter(|f| orbitals.contains(&f.orbital)) {
            loaded.push((file.orbital, parse_pdos_file(file)?));
        }
        atoms.push(AtomPdos {
            atom_index,
            species,
            orbitals: loaded,
        });
    }

    Ok(atoms)
}

/// `<prefix>.pdos_tot` 的路径
pub fn pdos_tot_path(dir: &Path, prefix: &str) -> PathBuf {
    dir.join(format!("{}.pdos_tot", prefix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn d_spin_row(e: f64, base: f64) -> String {
        // E, ldos↑, ldos↓, 5 × (pdos↑, pdos↓)
        let mut cols = vec![e, 5.0 * base, 5.0 * base * 2.0];
        for _ in 0..5 {
            cols.push(base);
            cols.push(base * 2.0);
        }
        cols.iter()
            .map(|c| format!("{:.3}", c))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_parse_filename() {
        let info = parse_pdos_filename(Path::new("/tmp/CoFeMnTi.pdos_atm#3(Mn)_wfc#2(d)")).unwrap();
        assert_eq!(info.atom_index, 3);
        assert_eq!(info.species, "Mn");
        assert_eq!(info.wfc_index, 2);
        assert_eq!(info.orbital, OrbitalKind::D);
        assert_eq!(info.j, None);
        assert_eq!(info.components(), 5);
    }

    #[test]
    fn test_parse_filename_with_j() {
        let info = parse_pdos_filename(Path::new("Fe.pdos_atm#1(Fe)_wfc#3(d_j2.5)")).unwrap();
        assert_eq!(info.j, Some(2.5));
        assert_eq!(info.components(), 6);
    }

    #[test]
    fn test_parse_filename_rejects_tot() {
        assert!(parse_pdos_filename(Path::new("CoFeMnTi.pdos_tot")).is_none());
    }

    #[test]
    fn test_parse_d_spin_polarized_sums_components() {
        let content = format!(
            "# E (eV)  ldosup(E)  ldosdw(E) pdos1up(E) ...\n{}\n{}\n",
            d_spin_row(-1.0, 0.1),
            d_spin_row(0.0, 0.2)
        );
        let table = parse_pdos_content(&content, 5, "mem").unwrap();
        assert_eq!(table.energy.len(), 2);
        assert!((table.up[0] - 0.5).abs() < 1e-9);
        assert!((table.down.as_ref().unwrap()[1] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_s_spin_polarized() {
        let content = "# E ldosup ldosdw pdosup pdosdw\n-1.0 0.3 0.4 0.3 0.4\n0.0 0.5 0.6 0.5 0.6\n";
        let table = parse_pdos_content(content, 1, "mem").unwrap();
        assert_eq!(table.up, vec![0.3, 0.5]);
        assert_eq!(table.down.unwrap(), vec![0.4, 0.6]);
    }

    #[test]
    fn test_parse_unpolarized_p() {
        let content = "# E ldos pz px py\n0.0 0.6 0.1 0.2 0.3\n";
        let table = parse_pdos_content(content, 3, "mem").unwrap();
        assert!(table.down.is_none());
        assert!((table.up[0] - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_parse_wrong_width() {
        let content = "0.0 1.0 2.0 3.0\n";
        assert!(parse_pdos_content(content, 5, "mem").is_err());
    }

    #[test]
    fn test_parse_pdos_tot() {
        let content = "# E dosup dosdw pdosup pdosdw\n0.0 1.0 2.0 0.9 1.8\n";
        let tot = parse_pdos_tot_content(content, "mem").unwrap();
        assert_eq!(tot.dos_down.unwrap(), vec![2.0]);
        assert_eq!(tot.pdos_up, vec![0.9]);
    }

    #[test]
    fn test_discover_and_group() {
        let dir = tempdir::TempDir::new("qeplot").unwrap();
        let row = d_spin_row(0.0, 0.1);
        let s_row = "0.0 0.3 0.4 0.3 0.4";
        for (name, body) in [
            ("CoFeMnTi.pdos_atm#2(Co)_wfc#2(d)", row.as_str()),
            ("CoFeMnTi.pdos_atm#1(Fe)_wfc#1(s)", s_row),
            ("CoFeMnTi.pdos_atm#1(Fe)_wfc#2(d)", row.as_str()),
            ("CoFeMnTi.pdos_tot", "0.0 1.0 2.0 0.9 1.8"),
            ("Other.pdos_atm#1(Fe)_wfc#1(s)", s_row),
        ] {
            fs::write(dir.path().join(name), body).unwrap();
        }

        let files = discover_pdos_files(dir.path(), "CoFeMnTi").unwrap();
        assert_eq!(files.len(), 3);
        assert_eq!(files[0].atom_index, 1);
        assert_eq!(files[0].orbital, OrbitalKind::S);

        let groups = group_by_atom(&files);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].1, "Fe");
        assert_eq!(groups[1].1, "Co");

        let atoms = load_atom_pdos(&files, &[OrbitalKind::D]).unwrap();
        assert_eq!(atoms.len(), 2);
        assert!(atoms[0].orbital(OrbitalKind::D).is_some());
        assert!(atoms[0].orbital(OrbitalKind::S).is_none());
    }

    #[test]
    fn test_discover_none() {
        let dir = tempdir::TempDir::new("qeplot").unwrap();
        let err = discover_pdos_files(dir.path(), "CoFeMnTi").unwrap_err();
        assert!(matches!(err, QeplotError::NoPdosFiles { .. }));
    }
}
