// SPDX-FileCopyrightText: 2023 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{path::Path, time::Duration};

use config::{Config, ConfigError, File, FileFormat, Source};
use msgcoreclient::{
    push::troubleshoot::DEFAULT_USER_RESPONSE_TIMEOUT, room::SubscriptionSettings,
};
use serde::Deserialize;

/// Configuration of the client
///
/// Every field has a default, so missing configuration files are fine.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    pub room_subscription: SubscriptionSettings,
    pub troubleshoot: TroubleshootSettings,
}

/// Configuration of the notification troubleshooting tests
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TroubleshootSettings {
    pub user_response_timeout_secs: u64,
}

impl TroubleshootSettings {
    pub fn user_response_timeout(&self) -> Duration {
        Duration::from_secs(self.user_response_timeout_secs)
    }
}

impl Default for TroubleshootSettings {
    fn default() -> Self {
        Self {
            user_response_timeout_secs: DEFAULT_USER_RESPONSE_TIMEOUT.as_secs(),
        }
    }
}

/// The possible runtime environment for our application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn from_env() -> Result<Self, String> {
        std::env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| "local".into())
            .try_into()
    }

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
                "{other} is not a supported environment. Use either `local` or `production`."
            )),
        }
    }
}

/// Load the configuration from the given configuration directory.
///
/// Reads `base` and the file of the current environment (both optional, any
/// format supported by `config`), then `MSG_`-prefixed environment variables,
/// e.g. `MSG_ROOM_SUBSCRIPTION__TIMELINE_LIMIT=50`.
pub fn get_configuration(configuration_directory: &Path) -> Result<ClientSettings, ConfigError> {
    let environment = Environment::from_env().map_err(ConfigError::Message)?;

    get_configuration_impl(
        File::from(configuration_directory.join("base")).required(false),
        File::from(configuration_directory.join(environment.as_str())).required(false),
    )
}

/// Load the configuration from the given configuration strings (in YAML format).
pub fn get_configuration_from_str(
    base: &str,
    environment: &str,
) -> Result<ClientSettings, ConfigError> {
    get_configuration_impl(
        File::from_str(base, FileFormat::Yaml),
        File::from_str(environment, FileFormat::Yaml),
    )
}

fn get_configuration_impl(
    base: impl Source + Send + Sync + 'static,
    environment: impl Source + Send + Sync + 'static,
) -> Result<ClientSettings, ConfigError> {
    let builder = Config::builder()
        .add_source(base)
        .add_source(environment)
        .add_source(
            config::Environment::with_prefix("MSG")
                .prefix_separator("_")
                .separator("__"),
        );
    builder.build()?.try_deserialize()
}

#[cfg(test)]
mod tests {
    use msgcoreclient::room::{RequiredState, StateEventType};
    use parking_lot::{Mutex, const_mutex};

    use super::*;

    /// Tests reading `MSG_` variables must not see each other's variables.
    static ENV_LOCK: Mutex<()> = const_mutex(());

    #[test]
    fn empty_configuration_uses_defaults() {
        let _env = ENV_LOCK.lock();
        let settings = get_configuration_from_str("{}", "{}").unwrap();
        assert_eq!(settings.room_subscription, SubscriptionSettings::default());
        assert_eq!(
            settings.troubleshoot.user_response_timeout(),
            Duration::from_secs(30)
        );
    }

    #[test]
    fn environment_overrides_base() {
        let _env = ENV_LOCK.lock();
        let base = r#"
room_subscription:
  timeline_limit: 10
  required_state:
    - key: m.room.name
    - key: m.room.topic
troubleshoot:
  user_response_timeout_secs: 5
"#;
        let environment = r#"
room_subscription:
  timeline_limit: 40
"#;
        let settings = get_configuration_from_str(base, environment).unwrap();
        assert_eq!(settings.room_subscription.timeline_limit, 40);
        assert_eq!(
            settings.room_subscription.required_state,
            [
                RequiredState::any(StateEventType::RoomName),
                RequiredState::any(StateEventType::RoomTopic),
            ]
        );
        assert!(!settings.room_subscription.include_heroes);
        assert_eq!(
            settings.troubleshoot.user_response_timeout(),
            Duration::from_secs(5)
        );
    }

    #[test]
    fn environment_variables_override_files() {
        let _env = ENV_LOCK.lock();
        let base = r#"
room_subscription:
  timeline_limit: 10
"#;
        // SAFETY: the other tests touching `MSG_` variables hold `ENV_LOCK`.
        unsafe { std::env::set_var("MSG_ROOM_SUBSCRIPTION__TIMELINE_LIMIT", "50") };
        let settings = get_configuration_from_str(base, "{}");
        unsafe { std::env::remove_var("MSG_ROOM_SUBSCRIPTION__TIMELINE_LIMIT") };

        let settings = settings.unwrap();
        assert_eq!(settings.room_subscription.timeline_limit, 50);
        assert_eq!(
            settings.troubleshoot.user_response_timeout(),
            DEFAULT_USER_RESPONSE_TIMEOUT
        );
    }

    #[test]
    fn environment_names() {
        assert_eq!(
            Environment::try_from("Production".to_owned()),
            Ok(Environment::Production)
        );
        assert!(Environment::try_from("staging".to_owned()).is_err());
    }
}
