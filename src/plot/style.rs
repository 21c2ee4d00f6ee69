//! # 配色与线型
//!
//! ## 依赖关系
//! - 被 `plot/` 各子模块使用

use plotters::style::RGBColor;

/// 原子配色，按原子顺序循环：blue, green, red, orange
pub const ATOM_PALETTE: [RGBColor; 4] = [
    RGBColor(0, 0, 255),
    RGBColor(0, 128, 0),
    RGBColor(255, 0, 0),
    RGBColor(255, 165, 0),
];

/// s 轨道使用的浅色 (Pastel1)
pub const PASTEL_PALETTE: [RGBColor; 5] = [
    RGBColor(251, 180, 174),
    RGBColor(179, 205, 227),
    RGBColor(204, 235, 197),
    RGBColor(222, 203, 228),
    RGBColor(254, 217, 166),
];

pub const SPIN_UP: RGBColor = RGBColor(0, 0, 255);
pub const SPIN_DOWN: RGBColor = RGBColor(255, 0, 0);
pub const BAND_LINE: RGBColor = RGBColor(0, 0, 255);
pub const GRAY: RGBColor = RGBColor(128, 128, 128);

pub const FONT: &str = "sans-serif";

/// 线型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Solid,
    Dashed,
    Dotted,
}

pub fn atom_color(i: usize) -> RGBColor {
    ATOM_PALETTE[i % ATOM_PALETTE.len()]
}

pub fn pastel_color(i: usize) -> RGBColor {
    PASTEL_PALETTE[i % PASTEL_PALETTE.len()]
}
