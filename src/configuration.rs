use std::time::Duration;

use secrecy::Secret;
use serde_aux::field_attributes::deserialize_number_from_string;

use crate::form::FormSettings;

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub subscription_form: SubscriptionFormSettings,
    pub subscription_service: SubscriptionServiceSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
    pub hmac_secret: Secret<String>,
    /// Only send the session cookie over https.
    pub secure_cookies: bool,
}

#[derive(serde::Deserialize, Clone)]
pub struct SubscriptionFormSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub success_display_milliseconds: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub submission_timeout_milliseconds: u64,
    /// Forms nobody touched for this long are forgotten.
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub idle_form_ttl_seconds: u64,
}

impl SubscriptionFormSettings {
    pub fn form_settings(&self) -> FormSettings {
        FormSettings {
            success_display_window: Duration::from_millis(
                self.success_display_milliseconds,
            ),
            submission_timeout: Duration::from_millis(
                self.submission_timeout_milliseconds,
            ),
        }
    }

    pub fn idle_form_ttl(&self) -> Duration {
        Duration::from_secs(self.idle_form_ttl_seconds)
    }
}

#[derive(serde::Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionServiceKind {
    Simulated,
    Http,
}

#[derive(serde::Deserialize, Clone)]
pub struct SubscriptionServiceSettings {
    pub kind: SubscriptionServiceKind,
    pub base_url: String,
    pub authorization_token: Secret<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub simulated_latency_milliseconds: u64,
}

impl SubscriptionServiceSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }

    pub fn simulated_latency(&self) -> Duration {
        Duration::from_millis(self.simulated_latency_milliseconds)
    }
}

pub fn get_config() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| config::ConfigError::Foreign(Box::new(e)))?;
    let config_dir = base_path.join("configuration");

    // detect the running environment, default to `local` if unspecified.
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;
    let environment_filename = format!("{}.yaml", environment.as_str());

    let settings = config::Config::builder()
        .add_source(config::File::from(config_dir.join("base.yaml")))
        .add_source(config::File::from(config_dir.join(environment_filename)))
        // e.g. `APP_APPLICATION__PORT=5001` sets `Settings.application.port`
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. \
                Use either `local` or `production`.",
                other
            )),
        }
    }
}
