use crate::error::{HarnessError, Result};
use esfixture_client::DEFAULT_URL;
use std::fmt;
use std::path::PathBuf;

/// How response bodies are decoded by the fixture client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DecoderPolicy {
    /// Unknown response fields are ignored.
    #[default]
    Lenient,
    /// Unknown response fields fail the request.
    Strict,
}

impl DecoderPolicy {
    /// Parses a boolean-ish flag value (`true`/`1`/`yes`, `false`/`0`/`no`/empty).
    pub fn parse_flag(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(DecoderPolicy::Strict),
            "false" | "0" | "no" | "off" | "" => Ok(DecoderPolicy::Lenient),
            other => Err(HarnessError::Config(format!(
                "ESFIXTURE_STRICT_DECODER must be a boolean, got: {}",
                other
            ))),
        }
    }
}

/// What to do with deprecation warnings the cluster sends back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeprecationPolicy {
    #[default]
    Off,
    LogOnly,
    FailOnWarning,
}

impl DeprecationPolicy {
    /// `off` disables the monitor, `fail` and `error` turn warnings into test
    /// failures, and any other value logs them.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "off" | "" => DeprecationPolicy::Off,
            "fail" | "error" => DeprecationPolicy::FailOnWarning,
            "log" => DeprecationPolicy::LogOnly,
            other => {
                tracing::warn!(
                    "Unknown deprecation mode '{}', logging deprecation warnings",
                    other
                );
                DeprecationPolicy::LogOnly
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeprecationPolicy::Off => "off",
            DeprecationPolicy::LogOnly => "log",
            DeprecationPolicy::FailOnWarning => "fail",
        }
    }
}

impl fmt::Display for DeprecationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The continuous-integration runner the suite is executing under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CiEnvironment {
    pub provider: String,
    pub toolchain: Option<String>,
}

impl CiEnvironment {
    pub fn detect() -> Option<Self> {
        Self::detect_with(|key| std::env::var(key).ok())
    }

    pub fn detect_with(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let set = |key: &str| lookup(key).is_some_and(|v| !v.is_empty());

        let provider = if set("TRAVIS") {
            "travis"
        } else if set("GITHUB_ACTIONS") {
            "github-actions"
        } else if set("CI") {
            "generic"
        } else {
            return None;
        };

        let toolchain = lookup("TRAVIS_RUST_VERSION")
            .or_else(|| lookup("RUSTUP_TOOLCHAIN"))
            .filter(|v| !v.is_empty());

        Some(Self {
            provider: provider.to_string(),
            toolchain,
        })
    }
}

/// Everything the harness needs to know about its environment, resolved once
/// and handed to [`crate::Harness`].
#[derive(Debug, Clone, PartialEq)]
pub struct HarnessConfig {
    /// Cluster endpoint
    pub url: String,
    pub decoder: DecoderPolicy,
    pub deprecations: DeprecationPolicy,
    /// Alternative mapping document; the embedded one is used when unset.
    pub mapping_path: Option<PathBuf>,
    pub ci: Option<CiEnvironment>,
    /// `ESFIXTURE_LIVE` asks for the live-cluster tests outside CI.
    pub live: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            decoder: DecoderPolicy::Lenient,
            deprecations: DeprecationPolicy::Off,
            mapping_path: None,
            ci: None,
            live: false,
        }
    }
}

impl HarnessConfig {
    /// Load config from `ESFIXTURE_*` environment variables.
    ///
    /// - `ESFIXTURE_URL` (default `http://127.0.0.1:9200`)
    /// - `ESFIXTURE_DEPRECATIONS`: `off`, `log`, `fail` (default `off`)
    /// - `ESFIXTURE_STRICT_DECODER`: boolean (default `false`)
    /// - `ESFIXTURE_MAPPING`: path to a mapping file (optional)
    /// - `ESFIXTURE_LIVE`: run live-cluster tests outside CI (optional)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let url = lookup("ESFIXTURE_URL")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_URL.to_string());

        let decoder = match lookup("ESFIXTURE_STRICT_DECODER") {
            Some(v) => DecoderPolicy::parse_flag(&v)?,
            None => DecoderPolicy::Lenient,
        };

        let deprecations = lookup("ESFIXTURE_DEPRECATIONS")
            .map(|v| DeprecationPolicy::parse(&v))
            .unwrap_or_default();

        let mapping_path = lookup("ESFIXTURE_MAPPING")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            url,
            decoder,
            deprecations,
            mapping_path,
            ci: CiEnvironment::detect_with(&lookup),
            live: lookup("ESFIXTURE_LIVE").is_some_and(|v| !v.is_empty()),
        })
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_decoder(mut self, decoder: DecoderPolicy) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn with_deprecations(mut self, deprecations: DeprecationPolicy) -> Self {
        self.deprecations = deprecations;
        self
    }

    /// Live-cluster tests run under CI or when explicitly requested.
    pub fn live_tests_enabled(&self) -> bool {
        self.live || self.ci.is_some()
    }

    pub fn with_mapping_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.mapping_path = Some(path.into());
        self
    }
}
