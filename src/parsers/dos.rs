//! # dos.x 输出解析器
//!
//! 解析 `<prefix>.dos` 文件。
//!
//! ## 格式说明
//! ```text
//! #  E (eV)   dosup(E)   dosdw(E)  Int dos(E) EFermi =   16.432 eV
//!   -9.000  0.1234E-03  0.1100E-03  0.2334E-05
//! ...
//! ```
//! 非自旋极化时为三列 (E, dos, Int dos)。
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `parsers/table.rs`, `models/dos.rs`

use crate::error::{QeplotError, Result};
use crate::models::{DosChannels, DosTable};
use crate::parsers::table::{parse_number, parse_numeric_table};

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

const FORMAT: &str = "DOS";

/// 读取 DOS 文件
pub fn parse_dos_file(path: &Path) -> Result<DosTable> {
    let content = super::read_to_string(path)?;
    parse_dos_content(&content, &path.display().to_string())
}

/// 只读取首行获取费米能
pub fn read_fermi_energy(path: &Path) -> Result<f64> {
    if !path.exists() {
        return Err(QeplotError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let file = File::open(path).map_err(|e| QeplotError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    let mut header = String::new();
    BufReader::new(file)
        .read_line(&mut header)
        .map_err(|e| QeplotError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;

    parse_fermi_energy(&header)
}

/// 从首行提取 `EFermi = X eV`
pub fn parse_fermi_energy(header: &str) -> Result<f64> {
    let missing = || QeplotError::MissingFermiEnergy(header.trim().to_string());

    let (_, after) = header.split_once("EFermi =").ok_or_else(missing)?;
    let value = after.split("eV").next().ok_or_else(missing)?.trim();
    parse_number(value).ok_or_else(missing)
}

/// 从字符串内容解析 DOS 表
pub fn parse_dos_content(content: &str, source: &str) -> Result<DosTable> {
    let header = content.lines().next().unwrap_or_default();
    let fermi_energy = parse_fermi_energy(header)?;

    let table = parse_numeric_table(content, FORMAT, source)?;

    let channels = match table.ncols() {
        3 => DosChannels::Unpolarized(table.column(1)),
        n if n >= 4 => DosChannels::Polarized {
            up: table.column(1),
            down: table.column(2),
        },
        n => {
            return Err(QeplotError::parse(
                FORMAT,
                source,
                format!("expected 3 or 4 columns, found {}", n),
            ))
        }
    };
    let integrated = table.column(table.ncols() - 1);

    Ok(DosTable {
        energy: table.column(0),
        channels,
        integrated,
        fermi_energy,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPIN_DOS: &str = "\
#  E (eV)   dosup(E)   dosdw(E)  Int dos(E) EFermi =   16.432 eV
  -9.000  0.1000E+00  0.2000E+00  0.0000E+00
  -8.990  0.3000E+00  0.4000E+00  0.1000E-01
  -8.980  0.5000E+00  0.6000E+00  0.2000E-01
";

    #[test]
    fn test_parse_fermi_energy() {
        let ef = parse_fermi_energy(SPIN_DOS.lines().next().unwrap()).unwrap();
        assert!((ef - 16.432).abs() < 1e-9);
    }

    #[test]
    fn test_missing_fermi_energy() {
        let err = parse_fermi_energy("#  E (eV)   dos(E)     Int dos(E)").unwrap_err();
        assert!(matches!(err, QeplotError::MissingFermiEnergy(_)));
    }

    #[test]
    fn test_parse_spin_polarized() {
        let dos = parse_dos_content(SPIN_DOS, "test.dos").unwrap();
        assert!(dos.is_spin_polarized());
        assert_eq!(dos.len(), 3);
        assert_eq!(dos.up(), &[0.1, 0.3, 0.5]);
        assert_eq!(dos.down().unwrap(), &[0.2, 0.4, 0.6]);
        assert!((dos.integrated[2] - 0.02).abs() < 1e-12);
    }

    #[test]
    fn test_parse_unpolarized() {
        let content = "\
#  E (eV)   dos(E)     Int dos(E) EFermi =    5.000 eV
   4.000  0.1000E+01  0.0000E+00
   5.000  0.2000E+01  0.1000E+01
";
        let dos = parse_dos_content(content, "test.dos").unwrap();
        assert!(!dos.is_spin_polarized());
        assert_eq!(dos.up(), &[1.0, 2.0]);
        assert_eq!(dos.shifted_energy(), vec![-1.0, 0.0]);
    }

    #[test]
    fn test_read_fermi_energy_from_file() {
        let dir = tempdir::TempDir::new("qeplot").unwrap();
        let path = dir.path().join("CoFeMnTi.dos");
        std::fs::write(&path, SPIN_DOS).unwrap();
        let ef = read_fermi_energy(&path).unwrap();
        assert!((ef - 16.432).abs() < 1e-9);
    }
}
