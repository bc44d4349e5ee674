//! Configuration management.

mod settings;

pub use settings::{
    AnalysisSettings, AppConfig, AppSettings, CalendarSettings, LoggingConfig, OrderKind,
    OrderSettings, ProviderSettings, RetrySettings,
};

use config::{Config, ConfigError, Environment, File, Map};
use std::path::Path;

/// Environment prefix; `PRICECAST__ANALYSIS__HORIZON=24` overrides `analysis.horizon`.
pub const ENV_PREFIX: &str = "PRICECAST";

/// Load configuration from an optional file and the environment.
///
/// Missing keys fall back to defaults. A path that was given must exist.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    load_with_env(path, None)
}

fn load_with_env(
    path: Option<&Path>,
    env: Option<Map<String, String>>,
) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(File::from(path).required(true));
    }
    let config = builder
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true)
                .source(env),
        )
        .build()?;

    config.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricecast_core::Frequency;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn no_env() -> Option<Map<String, String>> {
        Some(Map::new())
    }

    #[test]
    fn test_defaults_without_file() {
        let config = load_with_env(None, no_env()).unwrap();
        assert_eq!(config.analysis.horizon, 12);
        assert_eq!(config.analysis.output, Frequency::Monthly);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            r#"
[analysis]
horizon = 24
range = "2010-2018"

[analysis.order]
mode = "fixed"
p = 5
d = 1
q = 0

[calendar]
holidays = ["2024-12-25"]
"#
        )
        .unwrap();

        let config = load_with_env(Some(file.path()), no_env()).unwrap();
        assert_eq!(config.analysis.horizon, 24);
        assert_eq!(config.analysis.order.kind, OrderKind::Fixed);
        assert_eq!(config.calendar.holidays.len(), 1);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides_file() {
        let mut env = Map::new();
        env.insert("PRICECAST__ANALYSIS__HORIZON".to_string(), "6".to_string());
        env.insert("PRICECAST__LOGGING__FORMAT".to_string(), "json".to_string());

        let config = load_with_env(None, Some(env)).unwrap();
        assert_eq!(config.analysis.horizon, 6);
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = load_with_env(Some(Path::new("/nonexistent/pricecast.toml")), no_env());
        assert!(result.is_err());
    }
}
