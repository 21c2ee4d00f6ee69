//! # 数据导出
//!
//! 将相对费米能平移后的 DOS / 能带数据导出为 CSV。
//!
//! ## 格式
//! - DOS: `energy,dos` 或 `energy,dos_up,dos_down,dos_total`，末列为积分 DOS
//! - 能带: `band,k,energy`，band 为分段序号（0 起）；
//!   自旋极化时为 `spin,band,k,energy`，spin 为 `up` / `down`
//!
//! ## 依赖关系
//! - 被 `commands/dos.rs`, `commands/bands.rs` 调用
//! - 使用 `csv` 库写入 CSV 文件

use crate::error::{QeplotError, Result};
use crate::models::{BandTable, DosTable, SpinBands};

use std::io::Write;
use std::path::Path;

/// 导出 DOS 为 CSV
pub fn dos_to_csv(dos: &DosTable, output_path: &Path) -> Result<()> {
    let wtr = csv::Writer::from_path(output_path)?;
    write_dos(dos, wtr).map_err(|e| write_err(output_path, e))
}

/// 导出能带为 CSV
pub fn bands_to_csv(bands: &SpinBands, fermi_energy: f64, output_path: &Path) -> Result<()> {
    let wtr = csv::Writer::from_path(output_path)?;
    write_bands(bands, fermi_energy, wtr).map_err(|e| write_err(output_path, e))
}

/// CSV 写入的中间错误
enum ExportError {
    Csv(csv::Error),
    Io(std::io::Error),
}

impl From<csv::Error> for ExportError {
    fn from(e: csv::Error) -> Self {
        ExportError::Csv(e)
    }
}

impl From<std::io::Error> for ExportError {
    fn from(e: std::io::Error) -> Self {
        ExportError::Io(e)
    }
}

fn write_err(path: &Path, e: ExportError) -> QeplotError {
    match e {
        ExportError::Csv(e) => QeplotError::CsvError(e),
        ExportError::Io(source) => QeplotError::FileWriteError {
            path: path.display().to_string(),
            source,
        },
    }
}

fn write_dos<W: Write>(dos: &DosTable, mut wtr: csv::Writer<W>) -> std::result::Result<(), ExportError> {
    let energy = dos.shifted_energy();

    match dos.down() {
        Some(down) => {
            let total = dos.total();
            wtr.write_record(["energy", "dos_up", "dos_down", "dos_total", "integrated"])?;
            for i in 0..energy.len() {
                wtr.write_record(&[
                    format!("{:.4}", energy[i]),
                    format!("{:.6}", dos.up()[i]),
                    format!("{:.6}", down[i]),
                    format!("{:.6}", total[i]),
                    format!("{:.6}", dos.integrated[i]),
                ])?;
            }
        }
        None => {
            wtr.write_record(["energy", "dos", "integrated"])?;
            for i in 0..energy.len() {
                wtr.write_record(&[
                    format!("{:.4}", energy[i]),
                    format!("{:.6}", dos.up()[i]),
                    format!("{:.6}", dos.integrated[i]),
                ])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}

fn write_bands<W: Write>(
    bands: &SpinBands,
    fermi_energy: f64,
    mut wtr: csv::Writer<W>,
) -> std::result::Result<(), ExportError> {
    if !bands.is_spin_polarized() {
        wtr.write_record(["band", "k", "energy"])?;
        for (band, k, e) in band_rows(&bands.up, fermi_energy) {
            wtr.write_record(&[band.to_string(), format!("{:.6}", k), format!("{:.4}", e)])?;
        }
    } else {
        wtr.write_record(["spin", "band", "k", "energy"])?;
        for (spin, table) in bands.channels() {
            for (band, k, e) in band_rows(table, fermi_energy) {
                wtr.write_record(&[
                    spin.to_string(),
                    band.to_string(),
                    format!("{:.6}", k),
                    format!("{:.4}", e),
                ])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}

/// (分段序号, k, E - E_F)
fn band_rows(table: &BandTable, fermi_energy: f64) -> Vec<(usize, f64, f64)> {
    table
        .segments()
        .into_iter()
        .enumerate()
        .flat_map(|(band, segment)| {
            table
                .shifted_segment(segment, fermi_energy)
                .into_iter()
                .map(move |(k, e)| (band, k, e))
        })
        .collect()
}
