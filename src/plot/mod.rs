//! # 图表生成模块
//!
//! 使用 `plotters` 将 DOS、PDOS 与能带数据渲染为 PNG / SVG。
//!
//! ## 约定
//! - 能量轴一律为 E - E_F (eV)
//! - spin-down 通道以负值绘制
//! - 超出坐标范围的曲线在绘制前裁剪
//!
//! ## 依赖关系
//! - 被 `commands/` 调用
//! - 使用 `models/` 的数据结构
//! - 子模块: style, chart, dos, pdos, bands

use crate::error::QeplotError;
use std::path::{Path, PathBuf};

/// 在 PNG / SVG 后端上执行同一个绘图函数并写出文件
macro_rules! render_to_file {
    ($config:expr, $path:expr, $draw:path, $($arg:expr),* $(,)?) => {{
        let config: &$crate::plot::PlotConfig = $config;
        let size = (config.width, config.height);
        match config.format {
            $crate::plot::ImageFormat::Png => {
                let root = ::plotters::prelude::BitMapBackend::new($path, size).into_drawing_area();
                $draw(&root, $($arg),*)?;
                root.present().map_err($crate::plot::plot_err)?;
            }
            $crate::plot::ImageFormat::Svg => {
                let root = ::plotters::prelude::SVGBackend::new($path, size).into_drawing_area();
                $draw(&root, $($arg),*)?;
                root.present().map_err($crate::plot::plot_err)?;
            }
        }
    }};
}

pub mod bands;
pub mod chart;
pub mod dos;
pub mod pdos;
pub mod style;

/// 图像输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Svg,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }
}

/// 绘图参数
#[derive(Debug, Clone)]
pub struct PlotConfig {
    /// 图像宽度（像素 / SVG 点）
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
    /// DOS / PDOS 能量轴范围
    pub energy_window: (f64, f64),
    /// 能带图纵轴范围
    pub band_window: (f64, f64),
    /// 费米能附近放大图的纵轴范围
    pub zoom_window: (f64, f64),
}

impl Default for PlotConfig {
    fn default() -> Self {
        PlotConfig {
            width: 1200,
            height: 800,
            format: ImageFormat::Png,
            energy_window: (-8.0, 8.0),
            band_window: (-6.0, 6.0),
            zoom_window: (-3.0, 3.0),
        }
    }
}

impl PlotConfig {
    /// `<output_dir>/<prefix>_<name>.<ext>`
    pub fn output_path(&self, output_dir: &Path, prefix: &str, name: &str) -> PathBuf {
        output_dir.join(format!("{}_{}.{}", prefix, name, self.format.extension()))
    }
}

/// 将 plotters 错误转换为 QeplotError
pub fn plot_err<E: std::fmt::Debug>(e: E) -> QeplotError {
    QeplotError::PlotError(format!("{:?}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path() {
        let mut config = PlotConfig::default();
        let p = config.output_path(Path::new("out"), "CoFeMnTi", "total_dos");
        assert_eq!(p, Path::new("out").join("CoFeMnTi_total_dos.png"));

        config.format = ImageFormat::Svg;
        let p = config.output_path(Path::new("."), "X", "bands_detailed");
        assert!(p.ends_with("X_bands_detailed.svg"));
    }
}
