use std::path::{Path, PathBuf};
use std::result::Result as StdResult;
use std::time::Duration;

use anyhow::Context as _;
use rust_embed::RustEmbed;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JudgeConfig {
    #[serde(skip)]
    pub source_config_file: Option<PathBuf>,
    pub harness: HarnessConfig,
    pub layout: LayoutConfig,
    pub checker: CheckerConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    /// Seconds.
    pub time_limit: u64,
    pub max_timeouts: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub input_suffix: String,
    pub output_suffix: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckerConfig {
    pub path: PathBuf,
    pub interpreter: Option<String>,
    pub scratch_file: PathBuf,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            time_limit: 60,
            max_timeouts: 10,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            input_dir: "in".into(),
            output_dir: "out".into(),
            input_suffix: ".in".to_owned(),
            output_suffix: ".out".to_owned(),
        }
    }
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            path: "chk.py".into(),
            interpreter: None,
            scratch_file: ".user_out.txt".into(),
        }
    }
}

impl HarnessConfig {
    pub fn time_limit_duration(&self) -> Duration {
        Duration::from_secs(self.time_limit)
    }
}

#[derive(RustEmbed)]
#[folder = "assets/"]
struct Asset;

impl JudgeConfig {
    pub const FILENAME: &str = "vcjudge.toml";

    pub fn example_toml() -> anyhow::Result<String> {
        let file = Asset::get(Self::FILENAME).context("Example config is not embedded")?;
        let s = std::str::from_utf8(file.data.as_ref()).context("Example config is not UTF-8")?;
        Ok(s.to_owned())
    }

    pub fn from_toml(s: &str) -> StdResult<Self, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn from_toml_file(filepath: PathBuf) -> anyhow::Result<Self> {
        let toml = fsutil::read_to_string(&filepath).context("Cannot read a file")?;
        let mut cfg = Self::from_toml(&toml)
            .with_context(|| format!("Invalid config TOML: {:?}", filepath))?;
        cfg.source_config_file = Some(filepath);
        Ok(cfg)
    }

    /// Find config file in ancestor dirs, including current dir.
    pub fn find_file_in_ancestors(cur_dir: impl AsRef<Path>) -> Option<PathBuf> {
        cur_dir
            .as_ref()
            .ancestors()
            .map(|dir| dir.join(Self::FILENAME))
            .find(|path| path.is_file())
    }

    /// Loads the nearest config file, or the defaults when there is none.
    pub fn from_file_finding_in_ancestors_or_default(
        cur_dir: impl AsRef<Path>,
    ) -> anyhow::Result<Self> {
        match Self::find_file_in_ancestors(cur_dir) {
            Some(path) => {
                log::debug!("Using config {:?}", path);
                Self::from_toml_file(path)
            }
            None => {
                log::debug!("No {} found; using defaults", Self::FILENAME);
                Ok(Self::default())
            }
        }
    }
}
