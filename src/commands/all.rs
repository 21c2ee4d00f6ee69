//! # all 命令实现
//!
//! 将全部图表作为独立任务并行渲染，随后输出分析报告。
//! 输入文件缺失的图表记为跳过，其余错误记为失败；
//! 命令行显式指定的文件缺失 (`MissingInput`) 也记为失败。
//!
//! ## 依赖关系
//! - 使用 `cli/all.rs` 定义的 AllArgs
//! - 使用 `batch/` 模块并行执行
//! - 复用 `commands/dos.rs`, `commands/pdos.rs`, `commands/bands.rs`, `commands/analyze.rs`

use super::{analyze, bands, dos, pdos, Workspace};
use crate::batch::{BatchRunner, ProcessResult};
use crate::cli::all::AllArgs;
use crate::cli::bands::{BandOptions, BandsFigure};
use crate::cli::pdos::PdosFigure;
use crate::cli::OutputFormat;
use crate::error::{QeplotError, Result};
use crate::plot::PlotConfig;
use crate::utils::output;

use std::path::PathBuf;

/// 单个图表任务
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FigureJob {
    Dos,
    Pdos(PdosFigure),
    Bands(BandsFigure),
}

impl FigureJob {
    /// 全部图表任务
    pub fn all() -> Vec<FigureJob> {
        let mut jobs = vec![FigureJob::Dos];
        jobs.extend(PdosFigure::All.expand().into_iter().map(FigureJob::Pdos));
        jobs.extend(BandsFigure::All.expand().into_iter().map(FigureJob::Bands));
        jobs
    }

    pub fn name(self) -> &'static str {
        match self {
            FigureJob::Dos => dos::FILE_STEM,
            FigureJob::Pdos(figure) => figure.file_stem(),
            FigureJob::Bands(figure) => figure.file_stem(),
        }
    }

    fn render(self, ws: &Workspace, config: &PlotConfig, options: &BandOptions) -> Result<PathBuf> {
        match self {
            FigureJob::Dos => dos::render(ws, config),
            FigureJob::Pdos(figure) => pdos::render(ws, config, figure),
            FigureJob::Bands(figure) => bands::render(ws, config, options, figure),
        }
    }
}

/// 将渲染结果分类：缺少输入文件为跳过，其余错误为失败
fn classify(job: FigureJob, result: Result<PathBuf>) -> ProcessResult {
    match result {
        Ok(path) => ProcessResult::Success(path.display().to_string()),
        Err(e @ (QeplotError::FileNotFound { .. } | QeplotError::NoPdosFiles { .. })) => {
            ProcessResult::Skipped(format!("{}: {}", job.name(), e))
        }
        Err(e) => ProcessResult::Failed(job.name().to_string(), e.to_string()),
    }
}

/// 执行 all 命令
pub fn execute(args: AllArgs) -> Result<()> {
    output::print_header("Rendering All Figures");

    if args.plot.format == OutputFormat::Csv {
        return Err(QeplotError::InvalidArgument(
            "'all' renders images; use 'dos' or 'bands' with --format csv".to_string(),
        ));
    }

    let ws = Workspace::from_args(&args.input);
    ws.prepare_output_dir()?;
    let config = args.plot.to_config()?;

    let jobs = FigureJob::all();
    let runner = BatchRunner::new(args.jobs);
    output::print_info(&format!(
        "Rendering {} figures for '{}' with {} parallel jobs",
        jobs.len(),
        ws.prefix,
        runner.jobs()
    ));

    let result = runner.run(&jobs, |job| {
        classify(*job, job.render(&ws, &config, &args.bands))
    })?;

    for path in &result.outputs {
        output::print_success(&format!("Saved '{}'", path));
    }
    for reason in &result.skips {
        output::print_warning(&format!("Skipped {}", reason));
    }
    for (name, err) in &result.failures {
        output::print_error(&format!("{}: {}", name, err));
    }

    output::print_separator();
    output::print_done(&format!(
        "{} rendered, {} skipped, {} failed (total {})",
        result.success,
        result.skipped,
        result.failed,
        result.total()
    ));

    if !args.no_report {
        analyze::print_reports(&ws, args.scf_log.as_deref())?;
    }

    if result.failed > 0 {
        return Err(QeplotError::Other(format!(
            "{} of {} figures failed",
            result.failed,
            result.total()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use std::fs;
    use std::path::Path;
    use tempdir::TempDir;

    const DOS: &str = "\
#  E (eV)   dosup(E)   dosdw(E)  Int dos(E) EFermi =   10.000 eV
   8.000  0.5000E+00  0.2000E+00  0.0000E+00
   9.000  0.1000E+01  0.4000E+00  0.1000E+01
  10.000  0.2000E+01  0.1000E+00  0.2000E+01
  11.000  0.1000E+01  0.8000E+00  0.3000E+01
  12.000  0.5000E+00  0.3000E+00  0.4000E+01
";

    const GNU: &str = "\
      0.0000   5.0000
      0.5000   6.0000
      1.0000   5.5000
";

    fn all_args(dir: &Path, extra: &[&str]) -> AllArgs {
        let dir_arg = dir.display().to_string();
        let out_arg = dir.join("figures").display().to_string();
        let mut argv = vec![
            "qeplot",
            "all",
            "--dir",
            dir_arg.as_str(),
            "--prefix",
            "CoFeMnTi",
            "--output-dir",
            out_arg.as_str(),
            "--format",
            "svg",
            "--jobs",
            "2",
            "--no-report",
        ];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::All(args) => args,
            _ => panic!("expected all command"),
        }
    }

    #[test]
    fn test_all_jobs() {
        let jobs = FigureJob::all();
        assert_eq!(jobs.len(), 8);
        let names: Vec<&str> = jobs.iter().map(|j| j.name()).collect();
        assert!(names.contains(&"total_dos"));
        assert!(names.contains(&"combined_dos_pdos"));
        assert!(names.contains(&"bands_comparison"));
        assert!(!names.contains(&"pdos"));
    }

    #[test]
    fn test_classify() {
        let missing = Err(QeplotError::FileNotFound {
            path: "X.dos".to_string(),
        });
        assert!(matches!(
            classify(FigureJob::Dos, missing),
            ProcessResult::Skipped(_)
        ));

        let broken = Err(QeplotError::PlotError("bad".to_string()));
        assert!(matches!(
            classify(FigureJob::Bands(BandsFigure::Detailed), broken),
            ProcessResult::Failed(name, _) if name == "bands_detailed"
        ));

        let ok = Ok(PathBuf::from("out/X_total_dos.png"));
        assert!(matches!(classify(FigureJob::Dos, ok), ProcessResult::Success(_)));

        let explicit = Err(QeplotError::MissingInput {
            option: "--bands-log".to_string(),
            path: "bands.out".to_string(),
        });
        assert!(matches!(
            classify(FigureJob::Bands(BandsFigure::Corrected), explicit),
            ProcessResult::Failed(_, _)
        ));
    }

    #[test]
    fn test_missing_inputs_are_skipped() {
        let tmp = TempDir::new("qeplot_all").unwrap();
        fs::write(tmp.path().join("CoFeMnTi.dos"), DOS).unwrap();

        execute(all_args(tmp.path(), &[])).unwrap();

        let figures = tmp.path().join("figures");
        assert!(figures.join("CoFeMnTi_total_dos.svg").is_file());
        assert!(!figures.join("CoFeMnTi_atomic_pdos.svg").exists());
        assert!(!figures.join("CoFeMnTi_bands_corrected.svg").exists());
    }

    #[test]
    fn test_missing_explicit_bands_log_fails() {
        let tmp = TempDir::new("qeplot_all").unwrap();
        fs::write(tmp.path().join("CoFeMnTi.dos"), DOS).unwrap();
        fs::write(tmp.path().join("CoFeMnTi_fixed.bands.gnu"), GNU).unwrap();
        let log = tmp.path().join("bands.out").display().to_string();

        let err = execute(all_args(tmp.path(), &["--bands-log", log.as_str()])).unwrap_err();
        assert!(matches!(err, QeplotError::Other(_)));
        assert!(tmp.path().join("figures").join("CoFeMnTi_total_dos.svg").is_file());
    }
}
