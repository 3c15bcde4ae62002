use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Top-level configuration for the recipe box
#[derive(Debug, Deserialize, Clone, Default)]
pub struct RecipeBoxConfig {
    /// Bullet and step numbering used when editing lists
    #[serde(default)]
    pub formatting: FormattingConfig,
    /// Recipe store location
    #[serde(default)]
    pub store: StoreConfig,
    /// Durable user settings location
    #[serde(default)]
    pub settings: SettingsConfig,
    /// Chat assistant endpoint and quota
    #[serde(default)]
    pub chat: ChatConfig,
    /// Web page scanning
    #[serde(default)]
    pub scan: ScanConfig,
    /// Deep link routing
    #[serde(default)]
    pub deep_link: DeepLinkConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FormattingConfig {
    /// Glyph prepended to ingredient and note lines
    #[serde(default = "default_bullet")]
    pub bullet: String,
    /// Number given to the first step line
    #[serde(default = "default_step_base")]
    pub step_base: u32,
}

impl Default for FormattingConfig {
    fn default() -> Self {
        Self {
            bullet: default_bullet(),
            step_base: default_step_base(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    /// Path of the JSON file holding recipes and folders
    #[serde(default = "default_store_path")]
    pub path: String,
    /// Add the sample recipe the first time a store is created
    #[serde(default = "default_true")]
    pub seed_preset: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            seed_preset: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SettingsConfig {
    #[serde(default = "default_settings_path")]
    pub path: String,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            path: default_settings_path(),
        }
    }
}

/// Configuration for the chat assistant service
#[derive(Debug, Deserialize, Clone)]
pub struct ChatConfig {
    /// Model identifier sent with every request
    #[serde(default = "default_chat_model")]
    pub model: String,
    /// Base URL of an OpenAI compatible API
    #[serde(default = "default_chat_base_url")]
    pub base_url: String,
    /// API key (can also be set via OPENAI_API_KEY)
    pub api_key: Option<String>,
    /// Messages a user may send per calendar day
    #[serde(default = "default_daily_limit")]
    pub daily_limit: u32,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            model: default_chat_model(),
            base_url: default_chat_base_url(),
            api_key: None,
            daily_limit: default_daily_limit(),
            timeout: default_timeout(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScanConfig {
    /// Page fetch timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
        }
    }
}

/// Expected shape of an incoming recipe deep link
#[derive(Debug, Deserialize, Clone)]
pub struct DeepLinkConfig {
    #[serde(default = "default_scheme")]
    pub scheme: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_path")]
    pub path: String,
}

impl Default for DeepLinkConfig {
    fn default() -> Self {
        Self {
            scheme: default_scheme(),
            host: default_host(),
            path: default_path(),
        }
    }
}

// Default value functions
fn default_bullet() -> String {
    "•".to_string()
}

fn default_step_base() -> u32 {
    1
}

fn default_store_path() -> String {
    "recipes.json".to_string()
}

fn default_settings_path() -> String {
    "settings.json".to_string()
}

fn default_true() -> bool {
    true
}

fn default_chat_model() -> String {
    "gpt-4".to_string()
}

fn default_chat_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_daily_limit() -> u32 {
    12
}

fn default_timeout() -> u64 {
    30
}

fn default_scheme() -> String {
    "reciperealm".to_string()
}

fn default_host() -> String {
    "recipe".to_string()
}

fn default_path() -> String {
    "/new".to_string()
}

impl RecipeBoxConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_BOX__ prefix
    /// 2. recipe_box.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_BOX__CHAT__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables
///
/// See [`RecipeBoxConfig::load`] for the precedence rules.
pub fn load_config() -> Result<RecipeBoxConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("recipe_box").required(false))
        // Use double underscore for nested: RECIPE_BOX__FORMATTING__BULLET
        .add_source(
            Environment::with_prefix("RECIPE_BOX")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
