//! Application configuration loaded from environment variables.
//!
//! Everything is read once at startup and shared read-only afterwards.
//! The Strava client id and secret are required; the process refuses to
//! start without them.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Strava OAuth client ID (public)
    pub strava_client_id: String,
    /// Strava OAuth client secret
    pub strava_client_secret: String,
    /// OAuth redirect URI registered with Strava
    pub redirect_uri: String,
    /// Frontend URL for post-login redirects
    pub frontend_url: String,
    /// Domain attribute for the refresh-token cookie (host-only when unset)
    pub cookie_domain: Option<String>,
    /// Server port
    pub port: u16,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            strava_client_id: "test_client_id".to_string(),
            strava_client_secret: "test_secret".to_string(),
            redirect_uri: "http://localhost:8080/api/v1/callback".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            cookie_domain: None,
            port: 8080,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// `STRAVA_CLIENT_ID` and `STRAVA_CLIENT_SECRET` are required; the
    /// remaining variables fall back to local-development defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            strava_client_id: env::var("STRAVA_CLIENT_ID")
                .map_err(|_| ConfigError::Missing("STRAVA_CLIENT_ID"))?,
            strava_client_secret: env::var("STRAVA_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STRAVA_CLIENT_SECRET"))?,
            redirect_uri: env::var("STRAVA_REDIRECT_URI")
                .unwrap_or_else(|_| "http://localhost:8080/api/v1/callback".to_string()),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            cookie_domain: env::var("COOKIE_DOMAIN").ok().filter(|v| !v.is_empty()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
        })
    }

    /// Log the non-sensitive parts of the config at startup.
    pub fn log_sanitized(&self) {
        tracing::info!(
            client_id = %self.strava_client_id,
            redirect_uri = %self.redirect_uri,
            frontend_url = %self.frontend_url,
            cookie_domain = ?self.cookie_domain,
            "Configuration loaded"
        );
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
