use crate::storage::{BackendLocal, StorageManager};
use anyhow::{bail, Context, Result};
use homedir::my_home;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

const CONFIG_FILE: &str = "config.yaml";

const DEFAULT_OEMBED_ENDPOINT: &str = "https://noembed.com/embed";
const DEFAULT_RELAY_PREFIX: &str = "https://corsproxy.io/?";
const DEFAULT_SECONDARY_BASE: &str = "https://invidious.snopyta.org/api/v1/videos";
const DEFAULT_THUMBNAIL_HOST: &str = "https://i.ytimg.com/vi";
const DEFAULT_WATCH_BASE: &str = "https://www.youtube.com/watch?v=";

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_COPY_STATUS_CLEAR_MS: u64 = 2000;
const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const USER_AGENT_DEFAULT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:124.0) Gecko/20100101 Firefox/124.0";

/// Endpoints of the external collaborators
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// oEmbed style endpoint, receives the watch url as `?url=`
    #[serde(default = "default_oembed_endpoint")]
    pub oembed_endpoint: String,

    /// Relay the watch page url is appended to
    #[serde(default = "default_relay_prefix")]
    pub relay_prefix: String,

    /// Alternate metadata api, `<secondary_base>/<id>`
    #[serde(default = "default_secondary_base")]
    pub secondary_base: String,

    /// Static image host, `<thumbnail_host>/<id>/<tier>.jpg`
    #[serde(default = "default_thumbnail_host")]
    pub thumbnail_host: String,

    #[serde(default = "default_watch_base")]
    pub watch_base: String,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            oembed_endpoint: default_oembed_endpoint(),
            relay_prefix: default_relay_prefix(),
            secondary_base: default_secondary_base(),
            thumbnail_host: default_thumbnail_host(),
            watch_base: default_watch_base(),
        }
    }
}

fn default_oembed_endpoint() -> String {
    DEFAULT_OEMBED_ENDPOINT.to_string()
}

fn default_relay_prefix() -> String {
    DEFAULT_RELAY_PREFIX.to_string()
}

fn default_secondary_base() -> String {
    DEFAULT_SECONDARY_BASE.to_string()
}

fn default_thumbnail_host() -> String {
    DEFAULT_THUMBNAIL_HOST.to_string()
}

fn default_watch_base() -> String {
    DEFAULT_WATCH_BASE.to_string()
}

/// Where `publish_date` comes from. No provider reports the real one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishDate {
    /// Date the request was made
    #[default]
    RequestTime,
    /// Always `N/A`
    Unknown,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub providers: ProvidersConfig,

    /// Upper bound for every single provider call
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default)]
    pub publish_date: PublishDate,

    /// How long a copy action stays visible
    #[serde(default = "default_copy_status_clear_ms")]
    pub copy_status_clear_ms: u64,

    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    #[serde(skip_serializing, skip_deserializing)]
    base_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            providers: ProvidersConfig::default(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            user_agent: default_user_agent(),
            publish_date: PublishDate::default(),
            copy_status_clear_ms: DEFAULT_COPY_STATUS_CLEAR_MS,
            listen_addr: default_listen_addr(),
            base_path: PathBuf::new(),
        }
    }
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    USER_AGENT_DEFAULT.to_string()
}

fn default_copy_status_clear_ms() -> u64 {
    DEFAULT_COPY_STATUS_CLEAR_MS
}

fn default_listen_addr() -> String {
    DEFAULT_LISTEN_ADDR.to_string()
}

/// `$VIDMETA_BASE_PATH`, or `~/.local/share/vidmeta`.
pub fn base_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("VIDMETA_BASE_PATH") {
        return Ok(PathBuf::from(path));
    }

    let home = my_home()
        .context("Could not determine home directory")?
        .context("Home directory path is empty")?;

    Ok(home.join(".local/share/vidmeta"))
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        let p = &self.providers;
        for (name, value) in [
            ("providers.oembed_endpoint", &p.oembed_endpoint),
            ("providers.relay_prefix", &p.relay_prefix),
            ("providers.secondary_base", &p.secondary_base),
            ("providers.thumbnail_host", &p.thumbnail_host),
            ("providers.watch_base", &p.watch_base),
        ] {
            if value.trim().is_empty() {
                bail!("{name} cannot be empty");
            }
            if url::Url::parse(value).is_err() {
                bail!("{name} is not a valid url: {value:?}");
            }
        }

        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be greater than 0");
        }

        if self.copy_status_clear_ms == 0 {
            bail!("copy_status_clear_ms must be greater than 0");
        }

        if self.listen_addr.parse::<std::net::SocketAddr>().is_err() {
            bail!("listen_addr is not a socket address: {:?}", self.listen_addr);
        }

        Ok(())
    }

    pub fn load_with(base_path: impl Into<PathBuf>) -> Result<Self> {
        let base_path = base_path.into();
        let store = BackendLocal::new(&base_path).context("failed to create base directory")?;

        // create new if does not exist
        if !store.exists(CONFIG_FILE) {
            store.write(
                CONFIG_FILE,
                serde_yml::to_string(&Self::default())?.as_bytes(),
            )?;
        }

        let config_str =
            String::from_utf8(store.read(CONFIG_FILE)?).context("config file is not valid utf8")?;
        let mut config: Self = serde_yml::from_str(&config_str).context("config is malformed")?;

        config.base_path = base_path;

        config.validate()?;

        // resave in case config version needs an upgrade
        if config_str != serde_yml::to_string(&config)? {
            config.save()?;
        }

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let store = BackendLocal::new(&self.base_path)?;

        let config_str = serde_yml::to_string(&self)?;
        store.write(CONFIG_FILE, config_str.as_bytes())?;
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn copy_status_clear_after(&self) -> Duration {
        Duration::from_millis(self.copy_status_clear_ms)
    }
}
