//! # 分析模块
//!
//! 对解析后的数据做简单的物理量统计，用于终端报告。
//!
//! ## 依赖关系
//! - 被 `commands/analyze.rs`, `commands/all.rs` 使用
//! - 使用 `models/`
//! - 子模块: bands, dos, magnetism

pub mod bands;
pub mod dos;
pub mod magnetism;

pub use bands::{analyze_bands, segment_near_fermi, BandReport, NEAR_FERMI_WINDOW};
pub use dos::{dos_report, DosReport};
pub use magnetism::{analyze_magnetism, MagneticReport};
