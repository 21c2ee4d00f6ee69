//! # 投影态密度 (PDOS) 数据模型
//!
//! 对应 `projwfc.x` 输出的 `<prefix>.pdos_atm#N(X)_wfc#M(l)` 文件。
//!
//! ## 依赖关系
//! - 被 `parsers/pdos.rs` 构造
//! - 被 `plot/pdos.rs`, `commands/pdos.rs` 使用

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 轨道角动量类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OrbitalKind {
    S,
    P,
    D,
    F,
}

impl OrbitalKind {
    /// 从轨道字母解析 (s/p/d/f)
    pub fn from_letter(letter: &str) -> Option<Self> {
        match letter.to_ascii_lowercase().as_str() {
            "s" => Some(OrbitalKind::S),
            "p" => Some(OrbitalKind::P),
            "d" => Some(OrbitalKind::D),
            "f" => Some(OrbitalKind::F),
            _ => None,
        }
    }

    /// 角量子数 l
    pub fn angular_momentum(self) -> usize {
        match self {
            OrbitalKind::S => 0,
            OrbitalKind::P => 1,
            OrbitalKind::D => 2,
            OrbitalKind::F => 3,
        }
    }

    /// 磁量子数分量数 2l+1
    pub fn components(self) -> usize {
        2 * self.angular_momentum() + 1
    }
}

impl std::fmt::Display for OrbitalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrbitalKind::S => write!(f, "s"),
            OrbitalKind::P => write!(f, "p"),
            OrbitalKind::D => write!(f, "d"),
            OrbitalKind::F => write!(f, "f"),
        }
    }
}

/// 从文件名解析出的 PDOS 文件元数据
#[derive(Debug, Clone, PartialEq)]
pub struct PdosFileInfo {
    pub path: PathBuf,
    /// 原子序号 (1 起)
    pub atom_index: usize,
    /// 元素符号
    pub species: String,
    /// 波函数序号 (1 起)
    pub wfc_index: usize,
    pub orbital: OrbitalKind,
    /// 自旋轨道耦合计算中的总角动量 j
    pub j: Option<f64>,
}

impl PdosFileInfo {
    /// 文件中投影分量的数目：有 j 时为 2j+1，否则为 2l+1
    pub fn components(&self) -> usize {
        match self.j {
            Some(j) => (2.0 * j + 1.0).round() as usize,
            None => self.orbital.components(),
        }
    }
}

/// 单个轨道的 PDOS（已对 m 分量求和）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdosTable {
    pub energy: Vec<f64>,
    /// spin-up（非极化时为总量）
    pub up: Vec<f64>,
    /// spin-down，正值存储
    pub down: Option<Vec<f64>>,
}

impl PdosTable {
    pub fn shifted_energy(&self, fermi_energy: f64) -> Vec<f64> {
        self.energy.iter().map(|e| e - fermi_energy).collect()
    }
}

/// `.pdos_tot` 表：总 DOS 与投影总和
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdosTotal {
    pub energy: Vec<f64>,
    pub dos_up: Vec<f64>,
    pub dos_down: Option<Vec<f64>>,
    pub pdos_up: Vec<f64>,
    pub pdos_down: Option<Vec<f64>>,
}

impl PdosTotal {
    /// 相对费米能的窗口内 ∫PDOS / ∫DOS（梯形积分）
    ///
    /// 反映原子轨道投影对总 DOS 的覆盖程度；DOS 积分为零时返回 None。
    pub fn projectability(&self, fermi_energy: f64, window: (f64, f64)) -> Option<f64> {
        let dos = sum_channels(&self.dos_up, self.dos_down.as_deref());
        let pdos = sum_channels(&self.pdos_up, self.pdos_down.as_deref());

        let lo = fermi_energy + window.0;
        let hi = fermi_energy + window.1;
        let mut int_dos = 0.0;
        let mut int_pdos = 0.0;
        for i in 1..self.energy.len() {
            let (e0, e1) = (self.energy[i - 1], self.energy[i]);
            if e0 < lo || e1 > hi {
                continue;
            }
            let de = e1 - e0;
            int_dos += 0.5 * de * (dos[i - 1] + dos[i]);
            int_pdos += 0.5 * de * (pdos[i - 1] + pdos[i]);
        }

        if int_dos.abs() < 1e-12 {
            None
        } else {
            Some(int_pdos / int_dos)
        }
    }
}

fn sum_channels(up: &[f64], down: Option<&[f64]>) -> Vec<f64> {
    match down {
        Some(down) => up.iter().zip(down).map(|(u, d)| u + d).collect(),
        None => up.to_vec(),
    }
}

/// 单个原子的各轨道 PDOS
#[derive(Debug, Clone)]
pub struct AtomPdos {
    pub atom_index: usize,
    pub species: String,
    pub orbitals: Vec<(OrbitalKind, PdosTable)>,
}

impl AtomPdos {
    pub fn orbital(&self, kind: OrbitalKind) -> Option<&PdosTable> {
        self.orbitals
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, t)| t)
    }
}
