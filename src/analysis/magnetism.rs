//! # 磁性分析
//!
//! 根据 SCF 位点磁矩判断磁有序类型。
//!
//! ## 依赖关系
//! - 被 `commands/analyze.rs` 使用
//! - 使用 `models/magnetic.rs`

use crate::models::{MagneticSummary, SiteMoment};

/// 小于该值的位点磁矩视为零 (μB)
const NEGLIGIBLE_MOMENT: f64 = 0.05;

/// 磁有序类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MagneticOrder {
    NonMagnetic,
    Ferromagnetic,
    Ferrimagnetic,
    Antiferromagnetic,
}

impl std::fmt::Display for MagneticOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MagneticOrder::NonMagnetic => write!(f, "non-magnetic"),
            MagneticOrder::Ferromagnetic => write!(f, "ferromagnetic"),
            MagneticOrder::Ferrimagnetic => write!(f, "ferrimagnetic"),
            MagneticOrder::Antiferromagnetic => write!(f, "antiferromagnetic"),
        }
    }
}

/// 磁性分析结果
#[derive(Debug, Clone)]
pub struct MagneticReport {
    pub order: MagneticOrder,
    /// 总磁矩：优先取日志中的 total magnetization，否则为位点磁矩之和
    pub total_moment: f64,
    /// 磁矩绝对值最大的位点
    pub dominant: Option<SiteMoment>,
    /// 与总磁矩反平行的位点
    pub antiparallel: Vec<SiteMoment>,
}

/// 分析磁矩
pub fn analyze_magnetism(summary: &MagneticSummary) -> MagneticReport {
    let total_moment = summary
        .total_magnetization
        .unwrap_or_else(|| summary.site_sum());

    let significant: Vec<&SiteMoment> = summary
        .sites
        .iter()
        .filter(|s| s.magnetization.abs() >= NEGLIGIBLE_MOMENT)
        .collect();

    let positive = significant.iter().any(|s| s.magnetization > 0.0);
    let negative = significant.iter().any(|s| s.magnetization < 0.0);

    let order = match (positive, negative) {
        (false, false) => MagneticOrder::NonMagnetic,
        (true, false) | (false, true) => MagneticOrder::Ferromagnetic,
        (true, true) if total_moment.abs() < NEGLIGIBLE_MOMENT => MagneticOrder::Antiferromagnetic,
        (true, true) => MagneticOrder::Ferrimagnetic,
    };

    let dominant = summary
        .sites
        .iter()
        .max_by(|a, b| {
            a.magnetization
                .abs()
                .partial_cmp(&b.magnetization.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .cloned();

    let sign = total_moment.signum();
    let antiparallel = significant
        .iter()
        .filter(|s| s.magnetization.signum() != sign)
        .map(|s| (*s).clone())
        .collect();

    MagneticReport {
        order,
        total_moment,
        dominant,
        antiparallel,
    }
}
