use anyhow::{Context, Result};
use serde::Deserialize;
use std::num::NonZeroU64;
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "CHAT_EXPORT_";
const DEFAULT_PROGRESS_INTERVAL: NonZeroU64 = NonZeroU64::new(1000).unwrap();

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Transcript output, one `[<index>]: <message>` line per data row.
    pub transcript: PathBuf,
    /// Name index output, one `<index> : <name>` line per speaker.
    pub index: PathBuf,
    pub progress_interval: NonZeroU64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            transcript: PathBuf::from("chat.txt"),
            index: PathBuf::from("players.txt"),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    transcript: Option<PathBuf>,
    index: Option<PathBuf>,
    progress_interval: Option<NonZeroU64>,
}

#[derive(Deserialize, Debug, Default)]
struct Environment {
    transcript: Option<PathBuf>,
    index: Option<PathBuf>,
    progress_interval: Option<NonZeroU64>,
}

impl Config {
    /// Defaults, then the optional TOML file, then `CHAT_EXPORT_*`
    /// environment variables.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let file_config = config_path
            .map(|path| {
                std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file {}", path.display()))
            })
            .transpose()?;

        Self::from_sources(file_config.as_deref(), std::env::vars())
    }

    fn from_sources(
        file_config: Option<&str>,
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> Result<Self> {
        let mut config = Self::default();

        if let Some(contents) = file_config {
            let file: FileConfig =
                toml::from_str(contents).context("Failed to parse config TOML")?;
            config.apply(file.transcript, file.index, file.progress_interval);
        }

        let environment: Environment = envy::prefixed(ENV_PREFIX)
            .from_iter(vars)
            .context("Failed to read CHAT_EXPORT_* environment variables")?;
        config.apply(
            environment.transcript,
            environment.index,
            environment.progress_interval,
        );

        log::debug!("Using {config:?}");
        Ok(config)
    }

    fn apply(
        &mut self,
        transcript: Option<PathBuf>,
        index: Option<PathBuf>,
        progress_interval: Option<NonZeroU64>,
    ) {
        if let Some(transcript) = transcript {
            self.transcript = transcript;
        }
        if let Some(index) = index {
            self.index = index;
        }
        if let Some(progress_interval) = progress_interval {
            self.progress_interval = progress_interval;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn defaults_without_sources() {
        let config = Config::from_sources(None, vars(&[("HOME", "/root")])).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.transcript, PathBuf::from("chat.txt"));
        assert_eq!(config.index, PathBuf::from("players.txt"));
        assert_eq!(config.progress_interval.get(), 1000);
    }

    #[test]
    fn file_overrides_defaults() {
        let config = Config::from_sources(
            Some("transcript = \"out/chat.txt\"\nprogress_interval = 10\n"),
            vars(&[]),
        )
        .unwrap();

        assert_eq!(config.transcript, PathBuf::from("out/chat.txt"));
        assert_eq!(config.index, PathBuf::from("players.txt"));
        assert_eq!(config.progress_interval.get(), 10);
    }

    #[test]
    fn environment_overrides_file() {
        let config = Config::from_sources(
            Some("index = \"from-file.txt\"\nprogress_interval = 10\n"),
            vars(&[
                ("CHAT_EXPORT_INDEX", "from-env.txt"),
                ("CHAT_EXPORT_PROGRESS_INTERVAL", "25"),
            ]),
        )
        .unwrap();

        assert_eq!(config.index, PathBuf::from("from-env.txt"));
        assert_eq!(config.progress_interval.get(), 25);
    }

    #[test]
    fn rejects_unknown_file_keys() {
        assert!(Config::from_sources(Some("delimiter = \",\"\n"), vars(&[])).is_err());
    }

    #[test]
    fn rejects_zero_interval() {
        assert!(
            Config::from_sources(None, vars(&[("CHAT_EXPORT_PROGRESS_INTERVAL", "0")])).is_err()
        );
    }

    #[test]
    fn rejects_zero_interval_in_file() {
        assert!(Config::from_sources(Some("progress_interval = 0\n"), vars(&[])).is_err());
    }

    #[test]
    fn rejects_non_numeric_interval() {
        assert!(
            Config::from_sources(None, vars(&[("CHAT_EXPORT_PROGRESS_INTERVAL", "often")]))
                .is_err()
        );
    }
}
