//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `parsers/`, `plot/`, `analysis/`, `utils/`
//! - 子模块: dos, pdos, bands, analyze, all

pub mod all;
pub mod analyze;
pub mod bands;
pub mod dos;
pub mod pdos;

use crate::cli::{Commands, InputArgs};
use crate::error::{QeplotError, Result};
use crate::parsers;

use std::fs;
use std::path::{Path, PathBuf};

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Dos(args) => dos::execute(args),
        Commands::Pdos(args) => pdos::execute(args),
        Commands::Bands(args) => bands::execute(args),
        Commands::Analyze(args) => analyze::execute(args),
        Commands::All(args) => all::execute(args),
    }
}

/// 一次计算的输入输出位置
#[derive(Debug, Clone)]
pub struct Workspace {
    pub dir: PathBuf,
    pub prefix: String,
    pub output_dir: PathBuf,
    fermi_override: Option<f64>,
}

impl Workspace {
    pub fn from_args(args: &InputArgs) -> Self {
        Workspace {
            dir: args.dir.clone(),
            prefix: args.prefix.clone(),
            output_dir: args.output_dir.clone(),
            fermi_override: args.fermi,
        }
    }

    /// `<dir>/<prefix>.dos`
    pub fn dos_path(&self) -> PathBuf {
        self.dir.join(format!("{}.dos", self.prefix))
    }

    /// `<dir>/<prefix>.scf.out`，可被显式路径覆盖
    pub fn scf_log_path(&self, explicit: Option<&Path>) -> PathBuf {
        match explicit {
            Some(path) => path.to_path_buf(),
            None => self.dir.join(format!("{}.scf.out", self.prefix)),
        }
    }

    /// 费米能：命令行给出时直接使用，否则读取 DOS 文件首行
    pub fn fermi_energy(&self) -> Result<f64> {
        match self.fermi_override {
            Some(fermi) => Ok(fermi),
            None => parsers::dos::read_fermi_energy(&self.dos_path()),
        }
    }

    pub fn fermi_override(&self) -> Option<f64> {
        self.fermi_override
    }

    /// 确保输出目录存在
    pub fn prepare_output_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.output_dir).map_err(|e| QeplotError::FileWriteError {
            path: self.output_dir.display().to_string(),
            source: e,
        })
    }

    /// `<output_dir>/<prefix>_<name>.<ext>`
    pub fn data_path(&self, name: &str, extension: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}_{}.{}", self.prefix, name, extension))
    }
}

/// 将显式指定文件的 FileNotFound 转为 MissingInput
///
/// `all` 把 FileNotFound 视为可跳过，而用户点名要求的文件缺失必须报错。
pub fn explicit_input<T>(option: &str, result: Result<T>) -> Result<T> {
    result.map_err(|e| match e {
        QeplotError::FileNotFound { path } => QeplotError::MissingInput {
            option: option.to_string(),
            path,
        },
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    fn workspace(dir: &Path, fermi: Option<f64>) -> Workspace {
        Workspace {
            dir: dir.to_path_buf(),
            prefix: "CoFeMnTi".to_string(),
            output_dir: dir.join("figures"),
            fermi_override: fermi,
        }
    }

    #[test]
    fn test_paths() {
        let ws = workspace(Path::new("calc"), None);
        assert_eq!(ws.dos_path(), Path::new("calc").join("CoFeMnTi.dos"));
        assert_eq!(
            ws.scf_log_path(None),
            Path::new("calc").join("CoFeMnTi.scf.out")
        );
        assert_eq!(
            ws.scf_log_path(Some(Path::new("pw.out"))),
            Path::new("pw.out")
        );
        assert!(ws.data_path("bands", "csv").ends_with("CoFeMnTi_bands.csv"));
    }

    #[test]
    fn test_fermi_from_header_or_override() {
        let tmp = TempDir::new("qeplot_ws").unwrap();
        fs::write(
            tmp.path().join("CoFeMnTi.dos"),
            "#  E (eV)   dosup(E)   dosdw(E)  Int dos(E) EFermi =   17.834 eV\n\
             -10.0 0.0 0.0 0.0\n",
        )
        .unwrap();

        let ws = workspace(tmp.path(), None);
        assert!((ws.fermi_energy().unwrap() - 17.834).abs() < 1e-12);

        let ws = workspace(tmp.path(), Some(1.5));
        assert_eq!(ws.fermi_energy().unwrap(), 1.5);

        ws.prepare_output_dir().unwrap();
        assert!(tmp.path().join("figures").is_dir());
    }

    #[test]
    fn test_explicit_input_not_found() {
        let missing = parsers::read_to_string(Path::new("/nonexistent/bands.out"));
        let err = explicit_input("--bands-log", missing).unwrap_err();
        assert!(matches!(
            err,
            QeplotError::MissingInput { ref option, .. } if option == "--bands-log"
        ));

        let other: Result<()> = Err(QeplotError::Other("x".to_string()));
        assert!(matches!(
            explicit_input("--bands-log", other),
            Err(QeplotError::Other(_))
        ));
    }
}
