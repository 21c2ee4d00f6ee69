//! # DOS 分析
//!
//! 费米能处各自旋通道的态密度与自旋极化率。
//!
//! ## 依赖关系
//! - 被 `commands/analyze.rs` 使用
//! - 使用 `models/dos.rs`

use crate::models::{DosTable, PdosTotal};

/// 自旋极化率超过该值时提示可能为半金属
const HALF_METAL_POLARIZATION: f64 = 0.9;

/// 投影完备度的积分窗口（相对费米能，eV）
pub const PROJECTABILITY_WINDOW: (f64, f64) = (-8.0, 0.0);

/// DOS 分析结果
#[derive(Debug, Clone, PartialEq)]
pub struct DosReport {
    pub fermi_energy: f64,
    /// 费米能处 N↑（非极化时为总 DOS）
    pub up_at_fermi: Option<f64>,
    pub down_at_fermi: Option<f64>,
    /// P = (N↑ - N↓) / (N↑ + N↓)
    pub polarization: Option<f64>,
    /// 占据态中 ∫PDOS / ∫DOS，来自 `.pdos_tot`
    pub projectability: Option<f64>,
}

impl DosReport {
    pub fn is_half_metal_candidate(&self) -> bool {
        self.polarization
            .map(|p| p.abs() >= HALF_METAL_POLARIZATION)
            .unwrap_or(false)
    }
}

/// 分析 DOS 表，可选地附带 `.pdos_tot` 的投影完备度
pub fn dos_report(dos: &DosTable, pdos_total: Option<&PdosTotal>) -> DosReport {
    let at_fermi = dos.dos_at_fermi();

    DosReport {
        fermi_energy: dos.fermi_energy,
        up_at_fermi: at_fermi.map(|(up, _)| up),
        down_at_fermi: at_fermi.and_then(|(_, down)| down),
        polarization: dos.spin_polarization_at_fermi(),
        projectability: pdos_total
            .and_then(|t| t.projectability(dos.fermi_energy, PROJECTABILITY_WINDOW)),
    }
}
