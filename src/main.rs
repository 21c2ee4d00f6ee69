//! # qeplot - Quantum ESPRESSO 后处理绘图工具
//!
//! 将 DOS / PDOS / 能带输出文件转换为图表，并给出简单的分析报告。
//!
//! ## 子命令
//! - `dos`     - 总 DOS
//! - `pdos`    - 原子 / 轨道投影 DOS
//! - `bands`   - 能带结构
//! - `analyze` - 能带、DOS、磁性分析报告
//! - `all`     - 并行生成全部图表并输出报告
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── parsers/   (QE 输出解析器)
//!   │     ├── models/    (数据模型)
//!   │     ├── analysis/  (物理量统计)
//!   │     ├── plot/      (plotters 渲染)
//!   │     ├── export.rs  (CSV 导出)
//!   │     └── batch/     (并行任务)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod analysis;
mod batch;
mod cli;
mod commands;
mod error;
mod export;
mod models;
mod parsers;
mod plot;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
