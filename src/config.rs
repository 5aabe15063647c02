//! Gateway configuration parsed from environment variables.

use std::path::PathBuf;

pub const DEFAULT_UPSTREAM_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_UPSTREAM_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_UPSTREAM_CONNECT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_ADMIN_UI_DIR: &str = "./dist";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpstreamTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Upstream API base URL, without a trailing slash.
    pub upstream_base_url: String,
    pub port: u16,
    pub production: bool,
    /// Whether the `session` cookie carries the `Secure` attribute.
    pub cookie_secure: bool,
    /// Issue a canned session when the upstream login endpoint is unreachable.
    pub mock_login_fallback: bool,
    pub timeouts: UpstreamTimeouts,
    pub admin_ui_dir: PathBuf,
}

impl GatewayConfig {
    /// Build typed gateway config from environment variables.
    ///
    /// Optional:
    /// - `API_BASE_URL`: server-side upstream base URL (wins over the public one)
    /// - `PUBLIC_API_BASE_URL`: public upstream base URL
    /// - `PORT`: default 3000
    /// - `APP_ENV`: `production` enables secure cookies and disables the mock login
    /// - `COOKIE_SECURE`: explicit override for the cookie `Secure` flag
    /// - `MOCK_LOGIN_FALLBACK`: explicit override for the mock login
    /// - `UPSTREAM_REQUEST_TIMEOUT_SECS`: default 30
    /// - `UPSTREAM_CONNECT_TIMEOUT_SECS`: default 5
    /// - `ADMIN_UI_DIR`: default `./dist`
    #[must_use]
    pub fn from_env() -> Self {
        let upstream_base_url = resolve_base_url(
            non_empty_var("API_BASE_URL").as_deref(),
            non_empty_var("PUBLIC_API_BASE_URL").as_deref(),
        );
        let production = std::env::var("APP_ENV")
            .map(|v| v.trim().eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        Self {
            upstream_base_url,
            port: env_parse("PORT", DEFAULT_PORT),
            production,
            cookie_secure: env_bool("COOKIE_SECURE").unwrap_or(production),
            mock_login_fallback: env_bool("MOCK_LOGIN_FALLBACK").unwrap_or(!production),
            timeouts: UpstreamTimeouts {
                request_secs: env_parse("UPSTREAM_REQUEST_TIMEOUT_SECS", DEFAULT_UPSTREAM_REQUEST_TIMEOUT_SECS),
                connect_secs: env_parse("UPSTREAM_CONNECT_TIMEOUT_SECS", DEFAULT_UPSTREAM_CONNECT_TIMEOUT_SECS),
            },
            admin_ui_dir: non_empty_var("ADMIN_UI_DIR").map_or_else(|| PathBuf::from(DEFAULT_ADMIN_UI_DIR), PathBuf::from),
        }
    }

    /// Config pointing at `upstream_base_url` with development defaults.
    #[must_use]
    pub fn for_upstream(upstream_base_url: &str) -> Self {
        Self {
            upstream_base_url: resolve_base_url(Some(upstream_base_url), None),
            port: DEFAULT_PORT,
            production: false,
            cookie_secure: false,
            mock_login_fallback: true,
            timeouts: UpstreamTimeouts {
                request_secs: DEFAULT_UPSTREAM_REQUEST_TIMEOUT_SECS,
                connect_secs: DEFAULT_UPSTREAM_CONNECT_TIMEOUT_SECS,
            },
            admin_ui_dir: PathBuf::from(DEFAULT_ADMIN_UI_DIR),
        }
    }
}

/// Pick the server-side URL over the public one, falling back to the local default.
pub(crate) fn resolve_base_url(server_side: Option<&str>, public: Option<&str>) -> String {
    server_side
        .or(public)
        .unwrap_or(DEFAULT_UPSTREAM_BASE_URL)
        .trim()
        .trim_end_matches('/')
        .to_string()
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
