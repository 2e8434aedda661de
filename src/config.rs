//! Builder configuration parsed from environment variables.

pub const DEFAULT_OPENMRS_BASE_URL: &str = "http://localhost";
pub const DEFAULT_LOCALE: &str = "en";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_TOAST_TIMEOUT_MS: u64 = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderConfig {
    pub base_url: String,
    pub credentials: Option<Credentials>,
    /// Stands in for the browser's `openmrsDefaultLocale` storage key.
    pub default_locale: String,
    pub timeouts: HttpTimeouts,
    pub toast_timeout_ms: u64,
}

impl BuilderConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `OPENMRS_BASE_URL`: default `http://localhost`
    /// - `OPENMRS_USERNAME` / `OPENMRS_PASSWORD`: basic auth, used only when both are set
    /// - `OPENMRS_DEFAULT_LOCALE`: default `en`
    /// - `OPENMRS_REQUEST_TIMEOUT_SECS`: default 30
    /// - `OPENMRS_CONNECT_TIMEOUT_SECS`: default 10
    /// - `TOAST_TIMEOUT_MS`: default 5000
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build typed config from any key lookup (the environment in production).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("OPENMRS_BASE_URL")
            .unwrap_or_else(|| DEFAULT_OPENMRS_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let credentials = match (lookup("OPENMRS_USERNAME"), lookup("OPENMRS_PASSWORD")) {
            (Some(username), Some(password)) => Some(Credentials { username, password }),
            _ => None,
        };
        let default_locale = lookup("OPENMRS_DEFAULT_LOCALE")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOCALE.to_string());
        let parse = |key: &str, default: u64| lookup(key).and_then(|v| v.parse::<u64>().ok()).unwrap_or(default);
        let timeouts = HttpTimeouts {
            request_secs: parse("OPENMRS_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: parse("OPENMRS_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        let toast_timeout_ms = parse("TOAST_TIMEOUT_MS", DEFAULT_TOAST_TIMEOUT_MS);

        Self { base_url, credentials, default_locale, timeouts, toast_timeout_ms }
    }

    /// Override the base URL (e.g. from a CLI flag).
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Override the default locale (e.g. from a CLI flag).
    #[must_use]
    pub fn with_default_locale(mut self, locale: &str) -> Self {
        self.default_locale = locale.to_string();
        self
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
