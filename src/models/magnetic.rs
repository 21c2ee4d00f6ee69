//! # 磁性数据模型
//!
//! 从 `pw.x` SCF 标准输出中提取的磁矩信息。
//!
//! ## 依赖关系
//! - 被 `parsers/scf_log.rs` 构造
//! - 被 `analysis/magnetism.rs` 使用

use serde::{Deserialize, Serialize};

/// 单个原子位点的积分电荷与磁矩
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteMoment {
    /// 原子序号 (1 起)
    pub atom_index: usize,
    /// 元素符号（日志中不一定给出，可由 PDOS 文件名补全）
    pub species: Option<String>,
    pub charge: f64,
    /// 磁矩 (μB)
    pub magnetization: f64,
}

/// SCF 日志汇总
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MagneticSummary {
    /// 费米能；固定磁矩计算中为 spin-up 通道的费米能
    pub fermi_energy: Option<f64>,
    /// 固定磁矩计算中 spin-down 通道的费米能
    pub fermi_energy_down: Option<f64>,
    /// 总磁化强度 (μB/cell)
    pub total_magnetization: Option<f64>,
    /// 绝对磁化强度 (μB/cell)
    pub absolute_magnetization: Option<f64>,
    /// 最后一次迭代的位点磁矩
    pub sites: Vec<SiteMoment>,
    /// 是否收敛
    pub converged: bool,
}

impl MagneticSummary {
    /// 用原子序号 → 元素映射补全位点元素
    pub fn assign_species(&mut self, species: &[(usize, String)]) {
        for site in &mut self.sites {
            if site.species.is_none() {
                site.species = species
                    .iter()
                    .find(|(idx, _)| *idx == site.atom_index)
                    .map(|(_, s)| s.clone());
            }
        }
    }

    /// 位点磁矩之和
    pub fn site_sum(&self) -> f64 {
        self.sites.iter().map(|s| s.magnetization).sum()
    }
}
