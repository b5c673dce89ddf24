use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "creator-dashboard", about = "Creator dashboard client")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Path to data directory
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Log in and remember the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "user")]
        role: String,
    },
    /// Forget the stored session
    Logout,
    /// Credits, recent activity and saved posts
    Home,
    /// Show the social feed
    Feed,
    /// Save a feed post
    Save { id: String },
    /// Report a feed post
    Report { id: String },
    /// Print a post's link
    Share { id: String },
    /// Show saved posts
    Saved,
    /// Show the profile
    Profile,
    /// Edit profile fields; omitted fields keep their value
    ProfileEdit {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        bio: Option<String>,
        #[arg(long)]
        avatar: Option<String>,
    },
    /// Users and feed activity (admin only)
    Admin,
    /// Set a user's credit balance (admin only)
    AdminCredits {
        user: String,
        #[arg(allow_hyphen_values = true)]
        credits: i64,
    },
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub notifications: NotificationConfig,
    pub storage: StorageConfig,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Request timeout; the transport default applies when unset.
    pub timeout_secs: Option<u64>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct NotificationConfig {
    pub ttl_ms: u64,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct StorageConfig {
    pub path: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_secs: None,
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self { ttl_ms: 3000 }
    }
}

impl NotificationConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }
}

impl Config {
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let data_dir = Self::data_dir(cli)?;
        let config_path = cli
            .config
            .clone()
            .unwrap_or_else(|| data_dir.join("config.toml"));

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Config::default()
        };

        // CLI overrides
        if let Some(ref url) = cli.api_url {
            config.api.base_url = url.clone();
        }

        // Resolve paths relative to data dir
        if config.storage.path.is_none() {
            config.storage.path = Some(data_dir.join("storage.json"));
        }

        Ok(config)
    }

    pub fn data_dir(cli: &Cli) -> anyhow::Result<PathBuf> {
        match cli.data_dir.clone() {
            Some(dir) => Ok(dir),
            None => dirs::home_dir()
                .map(|home| home.join(".creator-dashboard"))
                .ok_or_else(|| anyhow::anyhow!("Could not determine home directory")),
        }
    }

    pub fn storage_path(&self) -> Option<&PathBuf> {
        self.storage.path.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(data_dir: Option<PathBuf>) -> Cli {
        Cli {
            config: None,
            api_url: None,
            data_dir,
            command: Command::Home,
        }
    }

    #[test]
    fn default_config_has_expected_values() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:5000");
        assert!(config.api.timeout_secs.is_none());
        assert_eq!(config.notifications.ttl(), Duration::from_millis(3000));
        assert!(config.storage.path.is_none());
    }

    #[test]
    fn data_dir_uses_cli_override() {
        let cli = cli(Some(PathBuf::from("/tmp/test-dashboard")));
        assert_eq!(
            Config::data_dir(&cli).unwrap(),
            PathBuf::from("/tmp/test-dashboard")
        );
    }

    #[test]
    fn data_dir_defaults_to_home_dot_dir() {
        let dir = Config::data_dir(&cli(None)).unwrap();
        assert!(dir.ends_with(".creator-dashboard"));
    }

    #[test]
    fn load_with_no_config_file_uses_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::load(&cli(Some(tmp.path().to_path_buf()))).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:5000");
        assert_eq!(config.storage_path(), Some(&tmp.path().join("storage.json")));
    }

    #[test]
    fn load_reads_toml_file() {
        let tmp = tempfile::tempdir().unwrap();
        let config_path = tmp.path().join("config.toml");
        std::fs::write(
            &config_path,
            r#"
[api]
base_url = "https://api.example.com"
timeout_secs = 10

[notifications]
ttl_ms = 500
"#,
        )
        .unwrap();

        let mut cli = cli(Some(tmp.path().to_path_buf()));
        cli.config = Some(config_path);
        let config = Config::load(&cli).unwrap();
        assert_eq!(config.api.base_url, "https://api.example.com");
        assert_eq!(config.api.timeout_secs, Some(10));
        assert_eq!(config.notifications.ttl_ms, 500);
    }

    #[test]
    fn cli_overrides_beat_toml_values() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join("config.toml"),
            r#"
[api]
base_url = "https://api.example.com"
"#,
        )
        .unwrap();

        let mut cli = cli(Some(tmp.path().to_path_buf()));
        cli.api_url = Some("http://127.0.0.1:9000".to_string());
        let config = Config::load(&cli).unwrap();
        assert_eq!(config.api.base_url, "http://127.0.0.1:9000");
    }

    #[test]
    fn parses_subcommands() {
        let cli = Cli::try_parse_from([
            "creator-dashboard",
            "admin-credits",
            "u1",
            "40",
            "--api-url",
            "http://x",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Command::AdminCredits {
                user: "u1".to_string(),
                credits: 40
            }
        );
        assert_eq!(cli.api_url.as_deref(), Some("http://x"));
    }
}
