//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::error::ConfigError;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

/// Fragment interval bounds in milliseconds
const FRAGMENT_MILLIS_RANGE: std::ops::RangeInclusive<u64> = 10..=5_000;

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    if !is_valid_config_key(key) {
        return Err(unknown_key_error(key));
    }
    validate_config_value(key, value)?;

    let mut config = store.load().await?;
    match key {
        "server_url" => config.server_url = Some(value.to_string()),
        "fragment_millis" => {
            config.fragment_millis = Some(value.parse().map_err(|_| ConfigError::ValidationError {
                key: key.to_string(),
                message: "Value must be a whole number of milliseconds".to_string(),
            })?)
        }
        "overlay" => {
            config.overlay = Some(parse_bool(value).map_err(|_| ConfigError::ValidationError {
                key: key.to_string(),
                message: "Value must be 'true' or 'false'".to_string(),
            })?)
        }
        _ => unreachable!(), // Already validated
    }

    store.save(&config).await?;
    presenter.success(&format!("{} = {}", key, value));
    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    if !is_valid_config_key(key) {
        return Err(unknown_key_error(key));
    }

    let config = store.load().await?;
    let value = match key {
        "server_url" => config.server_url,
        "fragment_millis" => config.fragment_millis.map(|v| v.to_string()),
        "overlay" => config.overlay.map(|b| b.to_string()),
        _ => unreachable!(),
    };

    match value {
        Some(v) => presenter.output(&v),
        None => presenter.output("(not set)"),
    }
    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    presenter.key_value(
        "server_url",
        config.server_url.as_deref().unwrap_or("(not set)"),
    );
    presenter.key_value(
        "fragment_millis",
        &config
            .fragment_millis
            .map(|v| v.to_string())
            .unwrap_or_else(|| "(not set)".to_string()),
    );
    presenter.key_value(
        "overlay",
        &config
            .overlay
            .map(|b| b.to_string())
            .unwrap_or_else(|| "(not set)".to_string()),
    );
    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

fn unknown_key_error(key: &str) -> ConfigError {
    ConfigError::ValidationError {
        key: key.to_string(),
        message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
    }
}

/// Validate a config value based on key type
fn validate_config_value(key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "server_url" => {
            let url = reqwest::Url::parse(value).map_err(|e| ConfigError::ValidationError {
                key: key.to_string(),
                message: e.to_string(),
            })?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(ConfigError::ValidationError {
                    key: key.to_string(),
                    message: format!("Unsupported scheme '{}', use http or https", url.scheme()),
                });
            }
        }
        "fragment_millis" => {
            let millis: u64 = value.parse().map_err(|_| ConfigError::ValidationError {
                key: key.to_string(),
                message: "Value must be a whole number of milliseconds".to_string(),
            })?;
            if !FRAGMENT_MILLIS_RANGE.contains(&millis) {
                return Err(ConfigError::ValidationError {
                    key: key.to_string(),
                    message: format!(
                        "Value must be between {} and {} milliseconds",
                        FRAGMENT_MILLIS_RANGE.start(),
                        FRAGMENT_MILLIS_RANGE.end()
                    ),
                });
            }
        }
        "overlay" => {
            parse_bool(value).map_err(|_| ConfigError::ValidationError {
                key: key.to_string(),
                message: "Value must be 'true' or 'false'".to_string(),
            })?;
        }
        _ => {}
    }
    Ok(())
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ()> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bool_values() {
        assert_eq!(parse_bool("true"), Ok(true));
        assert_eq!(parse_bool("false"), Ok(false));
        assert_eq!(parse_bool("yes"), Ok(true));
        assert_eq!(parse_bool("no"), Ok(false));
        assert_eq!(parse_bool("1"), Ok(true));
        assert_eq!(parse_bool("0"), Ok(false));
        assert!(parse_bool("invalid").is_err());
    }

    #[test]
    fn validate_server_url_valid() {
        assert!(validate_config_value("server_url", "http://localhost:8000").is_ok());
        assert!(validate_config_value("server_url", "https://coach.example.com").is_ok());
    }

    #[test]
    fn validate_server_url_invalid() {
        assert!(validate_config_value("server_url", "not a url").is_err());
        assert!(validate_config_value("server_url", "ftp://coach.example.com").is_err());
    }

    #[test]
    fn validate_fragment_millis_valid() {
        assert!(validate_config_value("fragment_millis", "250").is_ok());
        assert!(validate_config_value("fragment_millis", "10").is_ok());
        assert!(validate_config_value("fragment_millis", "5000").is_ok());
    }

    #[test]
    fn validate_fragment_millis_invalid() {
        assert!(validate_config_value("fragment_millis", "abc").is_err());
        assert!(validate_config_value("fragment_millis", "5").is_err());
        assert!(validate_config_value("fragment_millis", "60000").is_err());
    }

    #[test]
    fn validate_overlay_values() {
        assert!(validate_config_value("overlay", "true").is_ok());
        assert!(validate_config_value("overlay", "maybe").is_err());
    }
}
