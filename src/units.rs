use std::fmt;

use crate::error::Error;

pub const BYTES_PER_GB: u64 = 1024 * 1024 * 1024;

pub fn bytes_to_gb(size_bytes: u64) -> f64 {
    size_bytes as f64 / BYTES_PER_GB as f64
}

/// Per-partition byte budget, built from a user-supplied number of gigabytes.
///
/// The byte count is `floor(gb * 1024^3)`. File sizes are integers, so the
/// floor never changes the outcome of a `size > limit` comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SizeLimit(u64);

impl SizeLimit {
    pub fn from_gb(gb: f64) -> Result<Self, Error> {
        if !gb.is_finite() || gb <= 0.0 {
            return Err(Error::InvalidSizeLimit(gb));
        }
        let bytes = (gb * BYTES_PER_GB as f64).floor();
        if bytes < 1.0 || bytes > u64::MAX as f64 {
            return Err(Error::InvalidSizeLimit(gb));
        }
        Ok(Self(bytes as u64))
    }

    /// Limit given directly in bytes. Zero is rejected.
    pub fn from_bytes(bytes: u64) -> Result<Self, Error> {
        if bytes == 0 {
            return Err(Error::InvalidSizeLimit(0.0));
        }
        Ok(Self(bytes))
    }

    pub fn bytes(self) -> u64 {
        self.0
    }

    pub fn as_gb(self) -> f64 {
        bytes_to_gb(self.0)
    }

    pub fn is_exceeded_by(self, size: u64) -> bool {
        size > self.0
    }
}

impl fmt::Display for SizeLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} GB", self.as_gb())
    }
}
