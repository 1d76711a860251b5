//! Explicit accelerator selection
//!
//! Only device indices 0 and 1 are accepted. Builds without the `cuda`
//! feature (or hosts without CUDA) run on the CPU; a CUDA build that cannot
//! open the requested ordinal fails before any model is built.

use candle_core::Device;
use tracing::{info, warn};

use crate::error::{SenError, SenResult};

/// Accelerator indices accepted on the command line
pub const SUPPORTED_DEVICES: [usize; 2] = [0, 1];

/// Parse a device argument, accepting only the literals `0` and `1`
pub fn parse_device_index(arg: &str) -> Result<usize, String> {
    match arg {
        "0" => Ok(0),
        "1" => Ok(1),
        _ => Err(format!(
            "wrong GPU number `{arg}`, only 0 or 1 supported"
        )),
    }
}

/// Open the device with the given index
///
/// # Errors
/// `InvalidParameter` for an unsupported index, `Device` when the
/// accelerator exists in this build but cannot be opened
pub fn select_device(index: usize) -> SenResult<Device> {
    if !SUPPORTED_DEVICES.contains(&index) {
        return Err(SenError::invalid(
            "device",
            format!("only 0 or 1 supported, got {index}"),
        ));
    }

    let device =
        Device::cuda_if_available(index).map_err(|source| SenError::Device { index, source })?;

    if device.is_cpu() {
        warn!(index, "CUDA unavailable, running on CPU");
    } else {
        info!(index, "running on CUDA device");
    }
    Ok(device)
}
