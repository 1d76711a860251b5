//! Keyed complex data files
//!
//! Captures and results are NumPy `.npz` archives holding complex128 arrays
//! under fixed keys: `csi_mat` ([time, channel]) for input, `x_tilde` and `y`
//! ([channel, C, frame]) for output.

use ndarray::{Array2, Array3, ArrayBase, Data, Dimension};
use ndarray_npy::{NpzReader, NpzWriter, ReadNpzError};
use num_complex::Complex64;
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::error::{SenError, SenResult};

/// Key of the CSI matrix in capture files
pub const CSI_KEY: &str = "csi_mat";
/// Key of the raw spectrogram in output files
pub const RAW_SPECTROGRAM_KEY: &str = "x_tilde";
/// Key of the enhanced spectrogram in output files
pub const ENHANCED_SPECTROGRAM_KEY: &str = "y";

/// Read the `[time, channel]` CSI matrix of a capture
pub fn read_csi(path: &Path) -> SenResult<Array2<Complex64>> {
    read_array(path, CSI_KEY)
}

/// Read the complex array stored under `key`
pub fn read_array<D: Dimension>(
    path: &Path,
    key: &str,
) -> SenResult<ndarray::Array<Complex64, D>> {
    let file = File::open(path).map_err(|e| SenError::io(path, e))?;
    let read_err = |source| SenError::ReadData {
        path: path.to_path_buf(),
        key: key.to_string(),
        source,
    };
    let mut npz = NpzReader::new(file).map_err(read_err)?;

    // Archives written by NumPy name their members `<key>.npy`
    match npz.by_name(key) {
        Ok(array) => Ok(array),
        Err(ReadNpzError::Zip(_)) => npz.by_name(&format!("{key}.npy")).map_err(read_err),
        Err(e) => Err(read_err(e)),
    }
}

/// Write a single complex array under `key`, replacing any existing file
pub fn write_array<S, D>(path: &Path, key: &str, array: &ArrayBase<S, D>) -> SenResult<()>
where
    S: Data<Elem = Complex64>,
    D: Dimension,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| SenError::io(parent, e))?;
    }
    let file = File::create(path).map_err(|e| SenError::io(path, e))?;
    let write_err = |source| SenError::WriteData {
        path: path.to_path_buf(),
        key: key.to_string(),
        source,
    };

    let mut npz = NpzWriter::new(file);
    npz.add_array(key, array).map_err(write_err)?;
    npz.finish().map_err(write_err)?;
    Ok(())
}

/// Output file names for a window width, e.g. `SEN_test_y_complex_W125.npz`
pub fn output_paths(dir: &Path, window_len: usize) -> (PathBuf, PathBuf) {
    (
        dir.join(format!("SEN_test_x_tilde_complex_W{window_len}.npz")),
        dir.join(format!("SEN_test_y_complex_W{window_len}.npz")),
    )
}

/// Write the raw and enhanced spectrograms to their two output files
pub fn write_outputs(
    dir: &Path,
    window_len: usize,
    x_tilde: &Array3<Complex64>,
    y: &Array3<Complex64>,
) -> SenResult<(PathBuf, PathBuf)> {
    let (raw_path, enhanced_path) = output_paths(dir, window_len);
    write_array(&raw_path, RAW_SPECTROGRAM_KEY, x_tilde)?;
    write_array(&enhanced_path, ENHANCED_SPECTROGRAM_KEY, y)?;
    Ok((raw_path, enhanced_path))
}
