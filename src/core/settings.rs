use crate::core::error_bus::BusError;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

pub const DEFAULT_AUTH_HEADER: &str = "x-event-auth-token";

pub const ENV_AUTH_TOKEN: &str = "EVENT_AUTH_TOKEN";
pub const ENV_AUTH_HEADER: &str = "EVENT_AUTH_HEADER";
pub const ENV_ENDPOINT: &str = "EVENT_ENDPOINT";
pub const ENV_PUBLISH_TIMEOUT_SECS: &str = "EVENT_PUBLISH_TIMEOUT_SECS";

#[derive(Default)]
pub struct SettingsDto {
    pub event_auth_token: String,
    pub auth_header: Option<String>,
    pub endpoint: Option<String>,
    pub publish_timeout: Option<Duration>,
}

/// Shared by the consumer and the publisher of one client.
#[derive(Debug)]
pub struct Settings {
    event_auth_token: SecretString,
    auth_header: String,
    endpoint: Option<String>,
    publish_timeout: Option<Duration>,
}

impl Settings {
    pub fn new(dto: SettingsDto) -> Result<Self, BusError> {
        if dto.event_auth_token.is_empty() {
            return Err(BusError::MissingAuthToken);
        }

        let auth_header = match dto.auth_header {
            Some(name) => {
                let name = name.trim().to_ascii_lowercase();
                if name.is_empty() || !name.bytes().all(is_header_name_byte) {
                    return Err(BusError::InvalidAuthHeader(name));
                }
                name
            }
            None => DEFAULT_AUTH_HEADER.to_string(),
        };

        let endpoint = dto
            .endpoint
            .map(|endpoint| endpoint.trim().to_string())
            .filter(|endpoint| !endpoint.is_empty());

        Ok(Self {
            event_auth_token: SecretString::from(dto.event_auth_token),
            auth_header,
            endpoint,
            publish_timeout: dto.publish_timeout,
        })
    }

    /// Builds settings from `EVENT_AUTH_TOKEN`, `EVENT_AUTH_HEADER`,
    /// `EVENT_ENDPOINT` and `EVENT_PUBLISH_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, BusError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, BusError> {
        let publish_timeout = match lookup(ENV_PUBLISH_TIMEOUT_SECS) {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|err| {
                    BusError::InvalidSetting(ENV_PUBLISH_TIMEOUT_SECS.to_string(), err.to_string())
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Self::new(SettingsDto {
            event_auth_token: lookup(ENV_AUTH_TOKEN).unwrap_or_default(),
            auth_header: lookup(ENV_AUTH_HEADER),
            endpoint: lookup(ENV_ENDPOINT),
            publish_timeout,
        })
    }

    pub fn event_auth_token(&self) -> &SecretString {
        &self.event_auth_token
    }

    pub fn auth_header(&self) -> &str {
        &self.auth_header
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    pub fn publish_timeout(&self) -> Option<Duration> {
        self.publish_timeout
    }

    pub(crate) fn token_matches(&self, provided: &str) -> bool {
        use subtle::ConstantTimeEq;

        provided
            .as_bytes()
            .ct_eq(self.event_auth_token.expose_secret().as_bytes())
            .into()
    }
}

fn is_header_name_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&byte)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn dto(token: &str) -> SettingsDto {
        SettingsDto {
            event_auth_token: token.to_string(),
            ..SettingsDto::default()
        }
    }

    #[test]
    fn test_missing_token_fails_fast() {
        assert!(matches!(
            Settings::new(dto("")),
            Err(BusError::MissingAuthToken)
        ));
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::new(dto("secret")).unwrap();

        assert_eq!(settings.auth_header(), DEFAULT_AUTH_HEADER);
        assert_eq!(settings.endpoint(), None);
        assert_eq!(settings.publish_timeout(), None);
        assert_eq!(settings.event_auth_token().expose_secret(), "secret");
    }

    #[test]
    fn test_auth_header_is_normalized_and_validated() {
        let settings = Settings::new(SettingsDto {
            auth_header: Some(" X-Hook-Secret ".to_string()),
            ..dto("secret")
        })
        .unwrap();
        assert_eq!(settings.auth_header(), "x-hook-secret");

        assert!(matches!(
            Settings::new(SettingsDto {
                auth_header: Some("bad header".to_string()),
                ..dto("secret")
            }),
            Err(BusError::InvalidAuthHeader(name)) if name == "bad header"
        ));
        assert!(matches!(
            Settings::new(SettingsDto {
                auth_header: Some("  ".to_string()),
                ..dto("secret")
            }),
            Err(BusError::InvalidAuthHeader(_))
        ));
    }

    #[test]
    fn test_blank_endpoint_is_absent() {
        let settings = Settings::new(SettingsDto {
            endpoint: Some("   ".to_string()),
            ..dto("secret")
        })
        .unwrap();
        assert_eq!(settings.endpoint(), None);
    }

    #[test]
    fn test_token_matches_exactly() {
        let settings = Settings::new(dto("secret")).unwrap();

        assert!(settings.token_matches("secret"));
        assert!(!settings.token_matches("wrong"));
        assert!(!settings.token_matches("secret "));
        assert!(!settings.token_matches("Secret"));
        assert!(!settings.token_matches(""));
    }

    #[test]
    fn test_debug_does_not_leak_token() {
        let settings = Settings::new(dto("super-secret-value")).unwrap();
        let debug = format!("{settings:?}");

        assert!(!debug.contains("super-secret-value"));
        assert!(debug.contains(DEFAULT_AUTH_HEADER));
    }

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (ENV_AUTH_TOKEN, "secret"),
            (ENV_AUTH_HEADER, "X-Custom-Token"),
            (ENV_ENDPOINT, "http://localhost:8080/events"),
            (ENV_PUBLISH_TIMEOUT_SECS, "5"),
        ]);

        let settings = Settings::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap();

        assert_eq!(settings.auth_header(), "x-custom-token");
        assert_eq!(settings.endpoint(), Some("http://localhost:8080/events"));
        assert_eq!(settings.publish_timeout(), Some(Duration::from_secs(5)));
        assert!(settings.token_matches("secret"));
    }

    #[test]
    fn test_from_lookup_without_token() {
        assert!(matches!(
            Settings::from_lookup(|_| None),
            Err(BusError::MissingAuthToken)
        ));
    }

    #[test]
    fn test_from_lookup_rejects_bad_timeout() {
        let result = Settings::from_lookup(|key| match key {
            ENV_AUTH_TOKEN => Some("secret".to_string()),
            ENV_PUBLISH_TIMEOUT_SECS => Some("soon".to_string()),
            _ => None,
        });

        assert!(matches!(
            result,
            Err(BusError::InvalidSetting(key, _)) if key == ENV_PUBLISH_TIMEOUT_SECS
        ));
    }
}
