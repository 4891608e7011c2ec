use std::{
    env,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use dirs::home_dir;
use serde::{Deserialize, Serialize};

use crate::{
    errors::{ForecastError, Result},
    ledger::DayOverflow,
};

const DEFAULT_DIR_NAME: &str = ".cashflow_core";
const HOME_ENV: &str = "CASHFLOW_CORE_HOME";
const CONFIG_FILE: &str = "projection.json";
const TMP_SUFFIX: &str = "tmp";
const MAX_PRECISION: u32 = 28;

/// Settings the projection engine is constructed with.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectionConfig {
    /// Decimal places emitted balances are rounded to.
    #[serde(default = "ProjectionConfig::default_currency_precision")]
    pub currency_precision: u32,
    /// Maximum number of days the payoff-transfer occurrence search may inspect.
    #[serde(default = "ProjectionConfig::default_payoff_search_limit")]
    pub payoff_search_limit: usize,
    #[serde(default)]
    pub day_overflow: DayOverflow,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            currency_precision: Self::default_currency_precision(),
            payoff_search_limit: Self::default_payoff_search_limit(),
            day_overflow: DayOverflow::default(),
        }
    }
}

impl ProjectionConfig {
    pub fn default_currency_precision() -> u32 {
        2
    }

    pub fn default_payoff_search_limit() -> usize {
        3660
    }

    pub fn validate(&self) -> Result<()> {
        if self.payoff_search_limit == 0 {
            return Err(ForecastError::Config(
                "payoff_search_limit must be at least 1".into(),
            ));
        }
        if self.currency_precision > MAX_PRECISION {
            return Err(ForecastError::Config(format!(
                "currency_precision must be at most {}",
                MAX_PRECISION
            )));
        }
        Ok(())
    }
}

/// Loads and persists [`ProjectionConfig`] as JSON inside an application directory.
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    /// Uses `$CASHFLOW_CORE_HOME`, falling back to `~/.cashflow_core`.
    pub fn new() -> Result<Self> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base)?;
        Ok(Self {
            path: base.join(CONFIG_FILE),
        })
    }

    /// Returns the stored configuration, or the defaults when none was saved yet.
    pub fn load(&self) -> Result<ProjectionConfig> {
        if !self.path.exists() {
            return Ok(ProjectionConfig::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let config: ProjectionConfig = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &ProjectionConfig) -> Result<()> {
        config.validate()?;
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), "projection config saved");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Returns the application-specific data directory.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
