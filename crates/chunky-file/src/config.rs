//! Load and save options.

use chunky_core::Version;

/// Options for [`Loader`](crate::Loader).
#[derive(Clone, Debug)]
pub struct LoadConfig {
    /// Largest index entry count accepted before allocating anything.
    pub max_chunks: u32,
    /// Reject legacy-constant anomalies instead of warning about them.
    pub strict: bool,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            max_chunks: u16::MAX as u32,
            strict: false,
        }
    }
}

impl LoadConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_chunks(mut self, max_chunks: u32) -> Self {
        self.max_chunks = max_chunks;
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

/// Options for [`Writer`](crate::Writer).
#[derive(Clone, Debug, Default)]
pub struct SaveConfig {
    /// Version written into the file header instead of the container's own.
    pub version: Option<Version>,
}

impl SaveConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(mut self, version: Version) -> Self {
        self.version = Some(version);
        self
    }
}
