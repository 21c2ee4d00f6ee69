//! # dos 子命令 CLI 定义
//!
//! 读取 `<prefix>.dos` 并绘制自旋分辨的总 DOS
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/dos.rs`

use super::{InputArgs, PlotArgs};
use clap::Args;

/// dos 子命令参数
#[derive(Args, Debug)]
pub struct DosArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub plot: PlotArgs,

    /// Title of the plot (default: "Total Density of States - <prefix>")
    #[arg(long)]
    pub title: Option<String>,
}
