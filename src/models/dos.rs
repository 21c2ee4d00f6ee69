//! # 态密度 (DOS) 数据模型
//!
//! 存储 Quantum ESPRESSO `dos.x` 输出 (`<prefix>.dos`) 的数值列。
//!
//! ## 依赖关系
//! - 被 `parsers/dos.rs` 构造
//! - 被 `plot/dos.rs`, `analysis/`, `export.rs` 使用

use serde::{Deserialize, Serialize};

/// DOS 数值通道
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DosChannels {
    /// 非自旋极化: 单一总 DOS
    Unpolarized(Vec<f64>),
    /// 自旋极化: (spin-up, spin-down)，均以正值存储
    Polarized { up: Vec<f64>, down: Vec<f64> },
}

/// 总态密度表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DosTable {
    /// 能量 (eV, 绝对值)
    pub energy: Vec<f64>,
    /// DOS 通道
    pub channels: DosChannels,
    /// 积分 DOS
    pub integrated: Vec<f64>,
    /// 费米能 (eV)
    pub fermi_energy: f64,
}

impl DosTable {
    /// 行数
    pub fn len(&self) -> usize {
        self.energy.len()
    }

    pub fn is_spin_polarized(&self) -> bool {
        matches!(self.channels, DosChannels::Polarized { .. })
    }

    /// 相对费米能的能量 E - E_F
    pub fn shifted_energy(&self) -> Vec<f64> {
        self.energy.iter().map(|e| e - self.fermi_energy).collect()
    }

    /// spin-up 通道（非极化时为总 DOS）
    pub fn up(&self) -> &[f64] {
        match &self.channels {
            DosChannels::Unpolarized(total) => total,
            DosChannels::Polarized { up, .. } => up,
        }
    }

    /// spin-down 通道（非极化时为 None）
    pub fn down(&self) -> Option<&[f64]> {
        match &self.channels {
            DosChannels::Unpolarized(_) => None,
            DosChannels::Polarized { down, .. } => Some(down),
        }
    }

    /// 总 DOS（极化时为两通道之和）
    pub fn total(&self) -> Vec<f64> {
        match &self.channels {
            DosChannels::Unpolarized(total) => total.clone(),
            DosChannels::Polarized { up, down } => {
                up.iter().zip(down).map(|(u, d)| u + d).collect()
            }
        }
    }

    /// 在给定绝对能量处对 `values` 做线性插值
    ///
    /// 能量超出网格范围时返回 None。
    pub fn interpolate(&self, values: &[f64], energy: f64) -> Option<f64> {
        interpolate(&self.energy, values, energy)
    }

    /// 费米能处的 (N↑, N↓)
    pub fn dos_at_fermi(&self) -> Option<(f64, Option<f64>)> {
        let up = self.interpolate(self.up(), self.fermi_energy)?;
        let down = match self.down() {
            Some(d) => Some(self.interpolate(d, self.fermi_energy)?),
            None => None,
        };
        Some((up, down))
    }

    /// 费米能处的自旋极化率 P = (N↑ - N↓) / (N↑ + N↓)
    pub fn spin_polarization_at_fermi(&self) -> Option<f64> {
        let (up, down) = self.dos_at_fermi()?;
        let down = down?;
        let sum = up + down;
        if sum.abs() < 1e-12 {
            return None;
        }
        Some((up - down) / sum)
    }
}

/// 单调递增网格上的线性插值
pub fn interpolate(grid: &[f64], values: &[f64], x: f64) -> Option<f64> {
    if grid.is_empty() || grid.len() != values.len() {
        return None;
    }
    let last = grid.len() - 1;
    if x < grid[0] || x > grid[last] {
        return None;
    }

    let idx = grid.partition_point(|&g| g < x);
    if idx == 0 {
        return Some(values[0]);
    }
    let (x0, x1) = (grid[idx - 1], grid[idx]);
    let (y0, y1) = (values[idx - 1], values[idx]);
    if (x1 - x0).abs() < f64::EPSILON {
        return Some(y1);
    }
    Some(y0 + (y1 - y0) * (x - x0) / (x1 - x0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn polarized() -> DosTable {
        DosTable {
            energy: vec![9.0, 10.0, 11.0],
            channels: DosChannels::Polarized {
                up: vec![1.0, 3.0, 5.0],
                down: vec![0.0, 1.0, 2.0],
            },
            integrated: vec![0.0, 1.0, 2.0],
            fermi_energy: 10.5,
        }
    }

    #[test]
    fn test_shifted_energy() {
        let dos = polarized();
        assert_eq!(dos.shifted_energy(), vec![-1.5, -0.5, 0.5]);
    }

    #[test]
    fn test_interpolate_midpoint() {
        let v = interpolate(&[0.0, 1.0, 2.0], &[0.0, 10.0, 20.0], 1.5).unwrap();
        assert!((v - 15.0).abs() < 1e-12);
        assert!(interpolate(&[0.0, 1.0], &[0.0, 1.0], 2.0).is_none());
    }

    #[test]
    fn test_spin_polarization_at_fermi() {
        let dos = polarized();
        let (up, down) = dos.dos_at_fermi().unwrap();
        assert!((up - 4.0).abs() < 1e-12);
        assert!((down.unwrap() - 1.5).abs() < 1e-12);

        let p = dos.spin_polarization_at_fermi().unwrap();
        assert!((p - 2.5 / 5.5).abs() < 1e-12);
    }

    #[test]
    fn test_unpolarized_has_no_polarization() {
        let dos = DosTable {
            energy: vec![0.0, 1.0],
            channels: DosChannels::Unpolarized(vec![1.0, 1.0]),
            integrated: vec![0.0, 1.0],
            fermi_energy: 0.5,
        };
        assert!(!dos.is_spin_polarized());
        assert!(dos.down().is_none());
        assert!(dos.spin_polarization_at_fermi().is_none());
        assert_eq!(dos.total(), vec![1.0, 1.0]);
    }
}
