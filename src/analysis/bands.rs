//! # 能带分析
//!
//! 统计费米能附近的能带点，判断体系是否为金属。
//!
//! ## 依赖关系
//! - 被 `commands/analyze.rs` 使用
//! - 使用 `models/bands.rs`

use crate::models::{BandSegment, BandTable};

/// 判定“穿过费米能”的能量窗口 (eV)
pub const FERMI_CROSSING_WINDOW: f64 = 0.1;

/// 放大图中保留能带的能量窗口 (eV)
pub const NEAR_FERMI_WINDOW: f64 = 3.0;

/// 能带分析结果
#[derive(Debug, Clone, PartialEq)]
pub struct BandReport {
    pub fermi_energy: f64,
    pub num_points: usize,
    pub num_segments: usize,
    /// 相对费米能的最小/最大能量
    pub energy_min: f64,
    pub energy_max: f64,
    /// |E - E_F| < 0.1 eV 的点数
    pub fermi_crossings: usize,
}

impl BandReport {
    pub fn is_metallic(&self) -> bool {
        self.fermi_crossings > 0
    }

    pub fn verdict(&self) -> &'static str {
        if self.is_metallic() {
            "System appears to be metallic (bands cross Fermi level)"
        } else {
            "System might be semiconducting/insulating"
        }
    }
}

/// 分析能带表
pub fn analyze_bands(table: &BandTable, fermi_energy: f64) -> BandReport {
    let shifted = table.shifted_energies(fermi_energy);

    let energy_min = shifted.iter().copied().fold(f64::INFINITY, f64::min);
    let energy_max = shifted.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let fermi_crossings = shifted
        .iter()
        .filter(|e| e.abs() < FERMI_CROSSING_WINDOW)
        .count();

    BandReport {
        fermi_energy,
        num_points: table.len(),
        num_segments: table.segments().len(),
        energy_min,
        energy_max,
        fermi_crossings,
    }
}

/// 段内是否有点落在费米能 ±window 内
pub fn segment_near_fermi(
    table: &BandTable,
    segment: BandSegment,
    fermi_energy: f64,
    window: f64,
) -> bool {
    table.points[segment.start..segment.end]
        .iter()
        .any(|(_, e)| (e - fermi_energy).abs() < window)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> BandTable {
        BandTable {
            points: vec![
                (0.0, 5.0),
                (1.0, 6.0),
                (0.0, 10.05),
                (1.0, 11.0),
                (0.0, 20.0),
                (1.0, 21.0),
            ],
            blank_breaks: vec![],
        }
    }

    #[test]
    fn test_analyze_metallic() {
        let report = analyze_bands(&table(), 10.0);
        assert_eq!(report.num_points, 6);
        assert_eq!(report.num_segments, 3);
        assert_eq!(report.fermi_crossings, 1);
        assert!(report.is_metallic());
        assert!((report.energy_min + 5.0).abs() < 1e-12);
        assert!((report.energy_max - 11.0).abs() < 1e-12);
    }

    #[test]
    fn test_analyze_gapped() {
        let report = analyze_bands(&table(), 8.0);
        assert_eq!(report.fermi_crossings, 0);
        assert!(!report.is_metallic());
        assert!(report.verdict().contains("semiconducting"));
    }

    #[test]
    fn test_segment_near_fermi() {
        let t = table();
        let segs = t.segments();
        assert!(!segment_near_fermi(&t, segs[0], 10.0, NEAR_FERMI_WINDOW));
        assert!(segment_near_fermi(&t, segs[1], 10.0, NEAR_FERMI_WINDOW));
        assert!(!segment_near_fermi(&t, segs[2], 10.0, NEAR_FERMI_WINDOW));
    }
}
