use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use anyhow::{anyhow, bail};
use tracing::info;

use crate::predict::DEFAULT_HORIZON_CREDITS;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub out_dir: PathBuf,
    pub grade_scale_path: Option<PathBuf>,
    pub horizon_credits: f64,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let horizon_credits: f64 = try_load(&lookup, "PREDICTION_HORIZON_CREDITS", "12")?;
        if !horizon_credits.is_finite() || horizon_credits <= 0.0 {
            bail!("PREDICTION_HORIZON_CREDITS must be a positive number, got {horizon_credits}");
        }

        Ok(Self {
            out_dir: try_load(&lookup, "TRANSCRIPT_OUT_DIR", ".")?,
            grade_scale_path: lookup("GRADE_SCALE_PATH")
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from),
            horizon_credits,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("."),
            grade_scale_path: None,
            horizon_credits: DEFAULT_HORIZON_CREDITS,
        }
    }
}

fn try_load<T, F>(lookup: &F, key: &str, default: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| anyhow!("invalid {key} value: {e}"))
}
