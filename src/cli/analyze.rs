//! # analyze 子命令 CLI 定义
//!
//! 输出能带、DOS 与磁性分析报告
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/analyze.rs`

use super::InputArgs;
use clap::Args;
use std::path::PathBuf;

/// analyze 子命令参数
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// pw.x SCF output used for the magnetic analysis (default: <dir>/<prefix>.scf.out)
    #[arg(long)]
    pub scf_log: Option<PathBuf>,
}
