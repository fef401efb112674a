use serde::Deserialize;
use shared::log::LogFormat;

/// Where resized images are written. Fixed at build time.
pub const DESTINATION_BUCKET: &str = "ahmed-elhgawy-resized-image";
pub const RESIZED_PREFIX: &str = "resized";

/// What to do with the rest of a batch once a record fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Log the failure and return it straight away; later records are skipped.
    #[default]
    Abort,
    /// Log the failure, keep going, and fail the invocation once the batch is done.
    Continue,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub failure_policy: FailurePolicy,
    #[serde(default)]
    pub log_format: LogFormat,
}

impl Config {
    /// Reads `FAILURE_POLICY` and `LOG_FORMAT`.
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env::<Config>()
    }
}
