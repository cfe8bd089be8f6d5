use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:3002".into()
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// Server groups shown as tabs, in order. The first one is active on start.
    #[serde(default = "default_groups")]
    pub groups: Vec<String>,
    /// Re-fetch every group overview this often. Off when unset.
    #[serde(default)]
    pub auto_refresh_secs: Option<u64>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            groups: default_groups(),
            auto_refresh_secs: None,
        }
    }
}

fn default_groups() -> Vec<String> {
    vec!["cloudeka".into(), "samrat".into()]
}

impl AppConfig {
    /// Loads `CONFIG_FILE` (default `config.toml`); built-in defaults when the file is absent.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        Self::load_from_path(&path)
    }

    pub fn load_from_path(path: &str) -> anyhow::Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(s) => Self::load_from_str(&s),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path, "config file not found, using defaults");
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
            Err(e) => Err(anyhow::anyhow!("reading {}: {}", path, e)),
        }
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        let base = &self.api.base_url;
        anyhow::ensure!(
            base.starts_with("http://") || base.starts_with("https://"),
            "api.base_url must start with http:// or https://, got {:?}",
            base
        );
        anyhow::ensure!(
            self.api.request_timeout_ms > 0,
            "api.request_timeout_ms must be > 0, got {}",
            self.api.request_timeout_ms
        );
        anyhow::ensure!(
            !self.dashboard.groups.is_empty(),
            "dashboard.groups must be non-empty"
        );
        for (i, group) in self.dashboard.groups.iter().enumerate() {
            anyhow::ensure!(
                !group.is_empty()
                    && group
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
                "dashboard.groups entries must be non-empty [A-Za-z0-9_-], got {:?}",
                group
            );
            anyhow::ensure!(
                !self.dashboard.groups[..i].contains(group),
                "dashboard.groups must be unique, {:?} appears twice",
                group
            );
        }
        if let Some(secs) = self.dashboard.auto_refresh_secs {
            anyhow::ensure!(
                secs > 0,
                "dashboard.auto_refresh_secs must be > 0 when set, got {}",
                secs
            );
        }
        Ok(())
    }
}
