//! # 通用数值表解析
//!
//! 解析以空白分隔的数值列文本，`#` 开头的行视为注释。
//! 支持 Fortran 风格的 `D` 指数 (如 `1.0D-03`)。
//!
//! ## 依赖关系
//! - 被 `parsers/dos.rs`, `parsers/pdos.rs` 使用

use crate::error::{QeplotError, Result};

/// 逐行读取的数值表
#[derive(Debug, Clone, Default)]
pub struct NumericTable {
    pub rows: Vec<Vec<f64>>,
}

impl NumericTable {
    /// 列数（空表为 0）
    pub fn ncols(&self) -> usize {
        self.rows.first().map(|r| r.len()).unwrap_or(0)
    }

    /// 取出第 `idx` 列
    pub fn column(&self, idx: usize) -> Vec<f64> {
        self.rows.iter().map(|r| r[idx]).collect()
    }

    /// 对多列逐行求和
    pub fn sum_columns(&self, indices: impl Iterator<Item = usize> + Clone) -> Vec<f64> {
        self.rows
            .iter()
            .map(|r| indices.clone().map(|i| r[i]).sum())
            .collect()
    }
}

/// 解析单个数值，兼容 Fortran `D` 指数
pub fn parse_number(token: &str) -> Option<f64> {
    token
        .parse::<f64>()
        .ok()
        .or_else(|| token.replace(['D', 'd'], "E").parse::<f64>().ok())
}

/// 解析整张表：跳过空行和注释行，所有数据行列数必须一致
pub fn parse_numeric_table(content: &str, format: &str, source: &str) -> Result<NumericTable> {
    let mut table = NumericTable::default();

    for (lineno, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut row = Vec::new();
        for token in line.split_whitespace() {
            let value = parse_number(token).ok_or_else(|| {
                QeplotError::parse(
                    format,
                    source,
                    format!("line {}: invalid number '{}'", lineno + 1, token),
                )
            })?;
            row.push(value);
        }

        if let Some(first) = table.rows.first() {
            if first.len() != row.len() {
                return Err(QeplotError::ColumnMismatch {
                    line: lineno + 1,
                    expected: first.len(),
                    found: row.len(),
                });
            }
        }
        table.rows.push(row);
    }

    if table.rows.is_empty() {
        return Err(QeplotError::parse(format, source, "no numeric rows"));
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let content = "# header\n\n 1.0 2.0\n 3.0 4.0\n# trailer\n";
        let table = parse_numeric_table(content, "test", "mem").unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.ncols(), 2);
        assert_eq!(table.column(1), vec![2.0, 4.0]);
    }

    #[test]
    fn test_fortran_exponent() {
        assert_eq!(parse_number("1.5D-01"), Some(0.15));
        assert_eq!(parse_number("2.0E+00"), Some(2.0));
        assert_eq!(parse_number("abc"), None);
    }

    #[test]
    fn test_column_mismatch() {
        let err = parse_numeric_table("1 2 3\n4 5\n", "test", "mem").unwrap_err();
        match err {
            QeplotError::ColumnMismatch {
                line,
                expected,
                found,
            } => {
                assert_eq!(line, 2);
                assert_eq!(expected, 3);
                assert_eq!(found, 2);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_empty_table_is_error() {
        assert!(parse_numeric_table("# only comments\n", "test", "mem").is_err());
    }

    #[test]
    fn test_sum_columns() {
        let table = parse_numeric_table("0 1 2 3 4\n0 5 6 7 8\n", "test", "mem").unwrap();
        assert_eq!(table.sum_columns((1..5).step_by(2)), vec![4.0, 12.0]);
    }
}
