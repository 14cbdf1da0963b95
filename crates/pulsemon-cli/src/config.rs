use pulsemon_engine::config::MonitorConfig;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub monitor: MonitorConfig,
    /// Glob pattern selecting which sourced events are ingested
    /// (e.g., `"web-*"`). Events without a source always pass.
    #[serde(default)]
    pub source_filter: Option<String>,
    /// Print a snapshot JSON object after the stream ends.
    #[serde(default = "default_summary")]
    pub summary: bool,
}

fn default_summary() -> bool {
    true
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            monitor: MonitorConfig::default(),
            source_filter: None,
            summary: default_summary(),
        }
    }
}

impl CliConfig {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_config_with_nested_monitor_section() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
source_filter = "web-*"

[monitor]
trigger_threshold = 0.6
clear_threshold = 0.2
cooldown_secs = 60

[monitor.window]
mode = "count"
size = 5
"#
        )
        .unwrap();

        let config = CliConfig::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.source_filter.as_deref(), Some("web-*"));
        assert!(config.summary);
        assert_eq!(config.monitor.trigger_threshold, 0.6);
        assert_eq!(config.monitor.window.size, 5);
    }

    #[test]
    fn load_fails_on_missing_file() {
        assert!(CliConfig::load("definitely/not/here.toml").is_err());
    }
}
