//! # 能带数据模型
//!
//! 对应 `bands.x` 输出的 `<prefix>.bands.gnu` 文件：每条能带是一段
//! (k 路径距离, 能量) 序列，能带之间以空行分隔，k 坐标在新能带开始时回到起点。
//!
//! LSDA 计算中 bands.x 按 `spin_component` 分别输出两个文件，
//! 组合为 [`SpinBands`]。
//!
//! ## 依赖关系
//! - 被 `parsers/bands.rs` 构造
//! - 被 `plot/bands.rs`, `analysis/bands.rs`, `export.rs` 使用

use serde::{Deserialize, Serialize};

/// 能带表
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BandTable {
    /// (k 距离, 能量 eV) 点，按文件顺序
    pub points: Vec<(f64, f64)>,
    /// 文件中空行出现的位置（下一点的索引）
    pub blank_breaks: Vec<usize>,
}

/// 连续的一段能带
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandSegment {
    pub start: usize,
    pub end: usize,
}

impl BandSegment {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

impl BandTable {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// 最大 k 距离
    pub fn k_max(&self) -> Option<f64> {
        self.points
            .iter()
            .map(|(k, _)| *k)
            .fold(None, |acc: Option<f64>, k| Some(acc.map_or(k, |m| m.max(k))))
    }

    /// 切分为连续段：k 减小处或空行处断开
    pub fn segments(&self) -> Vec<BandSegment> {
        let mut breaks = vec![0];
        for i in 1..self.points.len() {
            let reset = self.points[i].0 < self.points[i - 1].0;
            if reset || self.blank_breaks.contains(&i) {
                breaks.push(i);
            }
        }
        breaks.push(self.points.len());
        breaks.dedup();

        breaks
            .windows(2)
            .map(|w| BandSegment {
                start: w[0],
                end: w[1],
            })
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// 可绘制的段（多于一个点）
    pub fn drawable_segments(&self) -> Vec<BandSegment> {
        self.segments().into_iter().filter(|s| s.len() > 1).collect()
    }

    /// 某段相对费米能的 (k, E - E_F) 点
    pub fn shifted_segment(&self, segment: BandSegment, fermi_energy: f64) -> Vec<(f64, f64)> {
        self.points[segment.start..segment.end]
            .iter()
            .map(|(k, e)| (*k, e - fermi_energy))
            .collect()
    }

    /// 所有点相对费米能的能量
    pub fn shifted_energies(&self, fermi_energy: f64) -> Vec<f64> {
        self.points.iter().map(|(_, e)| e - fermi_energy).collect()
    }
}

/// 自旋分辨能带
#[derive(Debug, Clone, Default)]
pub struct SpinBands {
    /// spin-up（非极化计算中为全部能带）
    pub up: BandTable,
    pub down: Option<BandTable>,
}

impl SpinBands {
    pub fn new(up: BandTable, down: Option<BandTable>) -> Self {
        SpinBands { up, down }
    }

    pub fn is_spin_polarized(&self) -> bool {
        self.down.is_some()
    }

    /// 两个通道中最大的 k 距离
    pub fn k_max(&self) -> Option<f64> {
        let down = self.down.as_ref().and_then(BandTable::k_max);
        match (self.up.k_max(), down) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        }
    }

    /// (通道名, 能带表)，非极化时只有 spin-up
    pub fn channels(&self) -> Vec<(&'static str, &BandTable)> {
        let mut channels = vec![("up", &self.up)];
        if let Some(down) = &self.down {
            channels.push(("down", down));
        }
        channels
    }
}

/// 高对称点标记
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymmetryMarker {
    /// k 路径距离
    pub position: f64,
    pub label: String,
}

impl SymmetryMarker {
    pub fn new(position: f64, label: impl Into<String>) -> Self {
        SymmetryMarker {
            position,
            label: label.into(),
        }
    }
}

/// 无 bands.x 日志时按 k 路径比例估计的高对称点
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KPathPreset {
    /// Γ-X-W-L-Γ
    FccExtended,
    /// Γ-X-L-Γ-X
    FccShort,
}

impl KPathPreset {
    fn fractions(self) -> &'static [(f64, &'static str)] {
        match self {
            KPathPreset::FccExtended => &[
                (0.0, "Γ"),
                (0.33, "X"),
                (0.66, "W"),
                (0.83, "L"),
                (0.95, "Γ"),
            ],
            KPathPreset::FccShort => &[
                (0.0, "Γ"),
                (0.33, "X"),
                (0.66, "L"),
                (0.85, "Γ"),
                (1.0, "X"),
            ],
        }
    }

    /// 按最大 k 距离缩放得到标记
    pub fn estimate(self, k_max: f64) -> Vec<SymmetryMarker> {
        self.fractions()
            .iter()
            .map(|(frac, label)| SymmetryMarker::new(k_max * frac, *label))
            .collect()
    }
}

/// 将用户标签与 bands.x 给出的位置配对
///
/// 标签不足时用空字符串补齐，多余标签忽略。
pub fn label_positions(positions: &[f64], labels: &[String]) -> Vec<SymmetryMarker> {
    positions
        .iter()
        .enumerate()
        .map(|(i, &p)| SymmetryMarker::new(p, labels.get(i).cloned().unwrap_or_default()))
        .collect()
}

/// 将 "G" / "Gamma" 规范化为 "Γ"
pub fn normalize_label(label: &str) -> String {
    match label.trim() {
        "G" | "g" | "Gamma" | "GAMMA" | "gamma" => "Γ".to_string(),
        other => other.to_string(),
    }
}
