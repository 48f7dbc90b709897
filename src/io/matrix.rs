//! Read / write system matrices in the `matrix.bin` layout.
//!
//! There is no header. For each voxel column, in voxel order:
//!
//! ```text
//! n: u64                          number of entries in the column
//! n x { index: i32, value: f32 }  ray index and weight, ascending index
//! ```
//!
//! All values in native byte order.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Seek, Write};
use std::path::{Path, PathBuf};

use binrw::BinReaderExt;
use binrw::BinWriterExt;
use tracing::info;

use crate::error::{MatrixError, Result, WithPath};
use crate::system_matrix::{Entry, SparseColumn, SystemMatrix};
use crate::utils::group_digits;

pub const MATRIX_FILE_NAME: &str = "matrix.bin";
const PARTIAL_SUFFIX: &str = ".partial";

/// Size on disk of one `Entry`
const ENTRY_BYTES: u64 = 8;

/// Write `matrix` to `matrix.bin` in `dir`, returning the path of the file.
///
/// The matrix is consumed: each column's storage is released as soon as it has
/// been written. The data go to a `.partial` file which only receives the
/// final name once everything has been written, so a failed run never leaves
/// a `matrix.bin` behind.
pub fn write(matrix: SystemMatrix, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(MATRIX_FILE_NAME);
    let partial = dir.join(format!("{MATRIX_FILE_NAME}{PARTIAL_SUFFIX}"));
    info!(path = %path.display(),
          columns = %group_digits(matrix.n_columns()),
          entries = %group_digits(matrix.n_entries()),
          "writing system matrix");

    match write_columns(matrix.into_columns(), &partial) {
        Ok(bytes) => {
            fs::rename(&partial, &path).with_path(&path)?;
            info!(bytes = %group_digits(bytes), "wrote system matrix");
            Ok(path)
        }
        Err(e) => {
            // Whatever made writing fail may well stop this too: nothing more to do
            let _ = fs::remove_file(&partial);
            Err(e)
        }
    }
}

/// Returns the number of bytes written
fn write_columns(columns: impl IntoIterator<Item = SparseColumn>, path: &Path) -> Result<u64> {
    let mut file = BufWriter::new(File::create(path).with_path(path)?);
    for column in columns {
        file.write_ne(&(column.len() as u64)).with_path(path)?;
        for entry in column.iter() {
            file.write_ne(entry).with_path(path)?;
        }
        // `column` dropped here, releasing its storage
    }
    file.flush().with_path(path)?;
    let bytes = file.stream_position().with_path(path)?;
    file.get_ref().sync_all().with_path(path)?;
    Ok(bytes)
}

/// Read the `n_columns` columns of the matrix in `path`.
///
/// Fails with `MatrixError::Format` if the file ends early or continues
/// beyond the last column. The entries are returned exactly as stored: no
/// ordering is checked here (see `MatrixStats`).
pub fn read_columns(path: &Path, n_columns: usize) -> Result<Vec<Vec<Entry>>> {
    let file = File::open(path).with_path(path)?;
    let file_size = file.metadata().with_path(path)?.len();
    let mut file = BufReader::new(file);
    let format_error = |reason: String| MatrixError::Format { path: path.to_path_buf(), reason };

    let mut columns = Vec::with_capacity(n_columns);
    for column in 0..n_columns {
        let n: u64 = file.read_ne().with_path(path)?;
        let remaining = file_size - file.stream_position().with_path(path)?;
        if n > remaining / ENTRY_BYTES {
            return Err(format_error(format!(
                "column {column} claims {} entries, but only {} bytes remain",
                group_digits(n), group_digits(remaining),
            )));
        }
        let entries = (0..n)
            .map(|_| file.read_ne::<Entry>())
            .collect::<binrw::BinResult<Vec<_>>>()
            .with_path(path)?;
        columns.push(entries);
    }

    let position = file.stream_position().with_path(path)?;
    if position != file_size {
        return Err(format_error(format!(
            "{} unexpected bytes after the last of {n_columns} columns", file_size - position
        )));
    }
    Ok(columns)
}
