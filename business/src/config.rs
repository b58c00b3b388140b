use std::any::Any;

use log::{info, warn};
use serde::Deserialize;
use taskflow_states::{State, state_assign_impl};
use ustr::Ustr;

/// Versioned prefix every endpoint lives under.
pub const API_PREFIX: &str = "/api/v1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessConfig {
    /// Origin of the backend. Empty means same-origin (web builds served by the backend).
    pub api_base_url: String,
}

/// Environment overrides, read with `serde-env`.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    taskflow_api_base_url: Option<String>,
}

impl BusinessConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: base_url.into(),
        }
    }

    /// Feature default, overridden by `TASKFLOW_API_BASE_URL` when set.
    pub fn from_env() -> Self {
        match serde_env::from_env::<RawConfig>() {
            Ok(raw) => Self::from_raw(raw),
            Err(err) => {
                warn!("BusinessConfig: failed to read environment, using defaults: {err}");
                Self::default()
            }
        }
    }

    fn from_raw(raw: RawConfig) -> Self {
        match raw.taskflow_api_base_url {
            Some(url) if !url.trim().is_empty() => {
                let url = url.trim().trim_end_matches('/').to_owned();
                info!("BusinessConfig: using API base URL from environment: {url}");
                Self::new(url)
            }
            _ => Self::default(),
        }
    }

    pub fn api_url(&self) -> Ustr {
        if self.api_base_url.is_empty() {
            Ustr::from(API_PREFIX)
        } else {
            Ustr::from(&format!("{}{API_PREFIX}", self.api_base_url))
        }
    }
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            api_base_url: if cfg!(target_arch = "wasm32") {
                String::new()
            } else if cfg!(feature = "env_test") {
                "https://taskflow-test.example.com".to_owned()
            } else if cfg!(feature = "env_internal") {
                "https://taskflow-internal.example.com".to_owned()
            } else if cfg!(feature = "env_nightly") {
                "https://taskflow-nightly.example.com".to_owned()
            } else {
                "https://taskflow.example.com".to_owned()
            },
        }
    }
}

impl State for BusinessConfig {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        state_assign_impl(self, new_self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_env::from_iter;

    #[test]
    fn test_environment_urls() {
        let config = BusinessConfig::default();

        if cfg!(target_arch = "wasm32") {
            assert_eq!(config.api_url(), Ustr::from("/api/v1"));
        } else if cfg!(feature = "env_test") {
            assert_eq!(
                config.api_url(),
                Ustr::from("https://taskflow-test.example.com/api/v1")
            );
        } else if cfg!(feature = "env_internal") {
            assert_eq!(
                config.api_url(),
                Ustr::from("https://taskflow-internal.example.com/api/v1")
            );
        } else if cfg!(feature = "env_nightly") {
            assert_eq!(
                config.api_url(),
                Ustr::from("https://taskflow-nightly.example.com/api/v1")
            );
        } else {
            assert_eq!(
                config.api_url(),
                Ustr::from("https://taskflow.example.com/api/v1")
            );
        }
    }

    #[test]
    fn empty_base_url_is_same_origin() {
        assert_eq!(BusinessConfig::new("").api_url(), Ustr::from("/api/v1"));
    }

    #[test]
    fn env_override_trims_trailing_slash() {
        let raw: RawConfig = from_iter(vec![(
            "TASKFLOW_API_BASE_URL",
            "http://localhost:8080/",
        )])
        .expect("RawConfig should deserialize");

        let config = BusinessConfig::from_raw(raw);
        assert_eq!(config.api_base_url, "http://localhost:8080");
        assert_eq!(config.api_url(), Ustr::from("http://localhost:8080/api/v1"));
    }

    #[test]
    fn blank_env_override_falls_back_to_default() {
        let raw: RawConfig =
            from_iter(vec![("TASKFLOW_API_BASE_URL", "  ")]).expect("RawConfig should deserialize");

        assert_eq!(BusinessConfig::from_raw(raw), BusinessConfig::default());
    }
}
