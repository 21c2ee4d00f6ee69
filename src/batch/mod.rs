//! # 批量处理模块
//!
//! 并行执行相互独立的图表任务。
//!
//! ## 功能
//! - 并行处理（每个任务仍为单次读取 + 单次渲染）
//! - 进度反馈与统计
//!
//! ## 依赖关系
//! - 被 `commands/all.rs` 使用
//! - 使用 `rayon` 进行并行处理
//! - 使用 `indicatif` 显示进度

pub mod runner;

pub use runner::{BatchRunner, ProcessResult};
