use crate::error::RunnerError;
use crate::time_unit::TimeUnit;
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Interval used when none is configured.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

/// Name used in log records when none is configured.
pub const DEFAULT_NAME: &str = "periodic-runner";

const ENV_PREFIX: &str = "TASKWEAVER";
const SECTION: &str = "runner";

/// Settings for a [`PeriodicRunner`](crate::PeriodicRunner), usually read from
/// the `[runner]` table of an application config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    pub name: String,
    pub interval: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            interval: DEFAULT_INTERVAL,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RunnerSettings {
    name: Option<String>,
    interval: Option<IntervalSetting>,
    time_unit: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IntervalSetting {
    Count(u64),
    Text(String),
}

impl RunnerConfig {
    /// Load from a TOML file, with `TASKWEAVER_RUNNER__*` environment overrides.
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self, RunnerError> {
        Self::from_file(path.as_ref(), FileFormat::Toml)
    }

    /// Load from a YAML file, with `TASKWEAVER_RUNNER__*` environment overrides.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self, RunnerError> {
        Self::from_file(path.as_ref(), FileFormat::Yaml)
    }

    fn from_file(path: &Path, format: FileFormat) -> Result<Self, RunnerError> {
        let config = Config::builder()
            .add_source(File::from(path).format(format))
            .add_source(environment())
            .build()?;
        Self::from_config(&config)
    }

    /// Read the `runner` table of an already built [`Config`].
    ///
    /// A missing table yields the defaults.
    pub fn from_config(config: &Config) -> Result<Self, RunnerError> {
        let settings = match config.get::<RunnerSettings>(SECTION) {
            Ok(settings) => settings,
            Err(ConfigError::NotFound(_)) => RunnerSettings::default(),
            Err(e) => return Err(e.into()),
        };

        let unit = match settings.time_unit.as_deref() {
            Some(raw) => raw.parse::<TimeUnit>().map_err(RunnerError::Interval)?,
            None => TimeUnit::default(),
        };

        let interval = match settings.interval {
            None => DEFAULT_INTERVAL,
            Some(IntervalSetting::Count(value)) => unit.to_duration(value),
            Some(IntervalSetting::Text(raw)) => parse_interval(&raw, unit)?,
        };

        Ok(Self {
            name: settings.name.unwrap_or_else(|| DEFAULT_NAME.to_string()),
            interval,
        })
    }
}

/// `TASKWEAVER_RUNNER__TIME_UNIT` maps to `runner.time_unit`. Keys contain
/// single underscores, so nesting uses a double one.
fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}

/// Shorthand ("250ms") wins; a bare number is read in `unit`.
fn parse_interval(raw: &str, unit: TimeUnit) -> Result<Duration, RunnerError> {
    if let Some(duration) = TimeUnit::parse_duration(raw) {
        return Ok(duration);
    }
    raw.trim()
        .parse::<u64>()
        .map(|value| unit.to_duration(value))
        .map_err(|_| RunnerError::Interval(format!("'{}' is not a duration", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toml(source: &str) -> Config {
        Config::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()
            .expect("valid toml")
    }

    #[test]
    fn missing_section_uses_defaults() {
        let config = RunnerConfig::from_config(&toml("[other]\nkey = 1\n")).unwrap();
        assert_eq!(config, RunnerConfig::default());
        assert_eq!(config.interval, Duration::from_secs(1));
    }

    #[test]
    fn shorthand_interval_and_name() {
        let config =
            RunnerConfig::from_config(&toml("[runner]\nname = \"poller\"\ninterval = \"250ms\"\n"))
                .unwrap();
        assert_eq!(config.name, "poller");
        assert_eq!(config.interval, Duration::from_millis(250));
    }

    #[test]
    fn numeric_interval_uses_time_unit() {
        let config =
            RunnerConfig::from_config(&toml("[runner]\ninterval = 3\ntime_unit = \"seconds\"\n"))
                .unwrap();
        assert_eq!(config.interval, Duration::from_secs(3));

        let config = RunnerConfig::from_config(&toml("[runner]\ninterval = 40\n")).unwrap();
        assert_eq!(config.interval, Duration::from_millis(40));
    }

    #[test]
    fn bad_values_are_reported() {
        let err = RunnerConfig::from_config(&toml("[runner]\ninterval = \"soon\"\n")).unwrap_err();
        assert!(matches!(err, RunnerError::Interval(_)));

        let err =
            RunnerConfig::from_config(&toml("[runner]\ninterval = 1\ntime_unit = \"fortnights\"\n"))
                .unwrap_err();
        assert!(matches!(err, RunnerError::Interval(_)));
    }

    #[test]
    fn environment_overrides_file_values() {
        let vars: config::Map<String, String> = [
            ("TASKWEAVER_RUNNER__INTERVAL", "3"),
            ("TASKWEAVER_RUNNER__TIME_UNIT", "seconds"),
            ("TASKWEAVER_RUNNER__NAME", "from-env"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let config = Config::builder()
            .add_source(File::from_str("[runner]\ninterval = 40\n", FileFormat::Toml))
            .add_source(environment().source(Some(vars)))
            .build()
            .unwrap();

        let config = RunnerConfig::from_config(&config).unwrap();
        assert_eq!(config.name, "from-env");
        assert_eq!(config.interval, Duration::from_secs(3));
    }

    #[test]
    fn loads_yaml_file() {
        let path = std::env::temp_dir().join(format!("taskweaver-{}.yaml", std::process::id()));
        std::fs::write(&path, "runner:\n  name: yaml-runner\n  interval: 2s\n").unwrap();

        let config = RunnerConfig::from_yaml(&path);
        std::fs::remove_file(&path).ok();

        let config = config.unwrap();
        assert_eq!(config.name, "yaml-runner");
        assert_eq!(config.interval, Duration::from_secs(2));
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = RunnerConfig::from_toml("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, RunnerError::Config(_)));
    }
}
