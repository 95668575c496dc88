//! Client configuration resolved from the environment.
//!
//! `API_URL` points at the backend; `FILE_BASE_URL` optionally points at
//! where stored media is served. The asset base is derived by trimming any
//! trailing `/` and stripping a trailing `/api` segment, so media paths
//! never get routed through the API prefix.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Where the backend and its served media live.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Base URL all API paths are joined onto.
    pub base_url: String,
    /// Base URL for stored media paths, already stripped of any `/api`
    /// suffix. Empty when nothing is configured; media paths then stay
    /// origin-relative.
    pub asset_base: String,
}

impl ApiConfig {
    /// Build from explicit values. `file_base` falls back to `base_url`
    /// for the asset base.
    #[must_use]
    pub fn new(base_url: impl Into<String>, file_base: Option<&str>) -> Self {
        let base_url = base_url.into();
        let asset_base = asset_base_from(file_base.unwrap_or(&base_url));
        Self { base_url, asset_base }
    }

    /// Load from `API_URL` and `FILE_BASE_URL`.
    ///
    /// The API base defaults to the local dev backend; the asset base is
    /// derived from the environment only, so with nothing configured media
    /// paths stay origin-relative.
    #[must_use]
    pub fn from_env() -> Self {
        let api_url = env_nonempty("API_URL");
        let file_base = env_nonempty("FILE_BASE_URL");
        let asset_source = file_base.or_else(|| api_url.clone()).unwrap_or_default();
        Self {
            base_url: api_url.unwrap_or_else(|| DEFAULT_API_URL.to_owned()),
            asset_base: asset_base_from(&asset_source),
        }
    }

    /// Absolute URL for a stored media path.
    ///
    /// Absolute inputs (`http(s)://`, protocol-relative `//`) pass through
    /// unchanged; empty input stays empty; everything else is normalized to
    /// a leading `/` and prefixed with the asset base.
    #[must_use]
    pub fn asset_url(&self, path: &str) -> String {
        if path.is_empty() {
            return String::new();
        }
        if is_absolute_url(path) {
            return path.to_owned();
        }
        if path.starts_with('/') {
            format!("{}{path}", self.asset_base)
        } else {
            format!("{}/{path}", self.asset_base)
        }
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn asset_base_from(source: &str) -> String {
    let trimmed = source.trim_end_matches('/');
    trimmed.strip_suffix("/api").unwrap_or(trimmed).to_owned()
}

fn is_absolute_url(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://") || path.starts_with("//")
}
