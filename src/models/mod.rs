//! # 数据模型模块
//!
//! 定义 DOS、PDOS、能带与磁矩的数据结构。
//!
//! ## 依赖关系
//! - 被 `parsers/`, `analysis/`, `plot/`, `commands/` 使用
//! - 子模块: dos, pdos, bands, magnetic

pub mod bands;
pub mod dos;
pub mod magnetic;
pub mod pdos;

pub use bands::{BandSegment, BandTable, KPathPreset, SpinBands, SymmetryMarker};
pub use dos::{DosChannels, DosTable};
pub use magnetic::{MagneticSummary, SiteMoment};
pub use pdos::{AtomPdos, OrbitalKind, PdosFileInfo, PdosTable, PdosTotal};
