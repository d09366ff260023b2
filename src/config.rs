use serde::Deserialize;

use crate::error::{MatmulError, Result};

fn default_processes() -> usize {
    match std::thread::available_parallelism() {
        Ok(n) => n.into(),
        Err(_) => 4,
    }
}

/// Settings supplied by the launching environment (`MATMUL_*` variables).
#[derive(Deserialize, Debug, PartialEq)]
pub struct Config {
    /// Size of the in-process worker group. Ignored under MPI, where the
    /// launcher's world size is used.
    #[serde(default = "default_processes")]
    pub processes: usize,
    /// Seeds the process-wide generator; entropy when unset.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let config: Config = envy::prefixed("MATMUL_").from_env()?;
        Self::validate(config)
    }

    /// Same as [`from_env`](Config::from_env) but over explicit `(name, value)` pairs.
    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config: Config = envy::prefixed("MATMUL_").from_iter(vars)?;
        Self::validate(config)
    }

    fn validate(config: Config) -> Result<Self> {
        if config.processes == 0 {
            return Err(MatmulError::ZeroProcesses);
        }
        Ok(config)
    }
}
