//! # all 子命令 CLI 定义
//!
//! 并行生成全部图表并输出分析报告
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/all.rs`

use super::bands::BandOptions;
use super::{InputArgs, PlotArgs};
use clap::Args;
use std::path::PathBuf;

/// all 子命令参数
#[derive(Args, Debug)]
pub struct AllArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub plot: PlotArgs,

    #[command(flatten)]
    pub bands: BandOptions,

    /// pw.x SCF output used for the magnetic analysis (default: <dir>/<prefix>.scf.out)
    #[arg(long)]
    pub scf_log: Option<PathBuf>,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,

    /// Skip the analysis reports
    #[arg(long, default_value_t = false)]
    pub no_report: bool,
}
