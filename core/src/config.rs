//! Client configuration: credentials, paging limit, response language and
//! endpoint URLs.

use std::fmt;
use std::str::FromStr;

pub const DEFAULT_JSON_URL: &str = "https://api.novaposhta.ua/v2.0/json/";
pub const DEFAULT_PRINT_URL: &str = "https://my.novaposhta.ua";
pub const DEFAULT_LIMIT: u32 = 20;

/// Language used when picking description fields out of provider records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Language {
    #[default]
    Ua,
    Ru,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::Ua => "UA",
            Language::Ru => "RU",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "UA" | "UK" => Ok(Language::Ua),
            "RU" => Ok(Language::Ru),
            other => Err(format!("unsupported language: {other}")),
        }
    }
}

/// Provider endpoints. Overridden in tests to point at the mock server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub json_url: String,
    pub print_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            json_url: DEFAULT_JSON_URL.to_string(),
            print_url: DEFAULT_PRINT_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Both endpoints served from one base URL, the way the mock server
    /// exposes them.
    pub fn at(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            json_url: format!("{base}/v2.0/json/"),
            print_url: base.to_string(),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_key: String,
    pub limit: u32,
    pub language: Language,
    pub endpoints: Endpoints,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            limit: DEFAULT_LIMIT,
            language: Language::default(),
            endpoints: Endpoints::default(),
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Read configuration from `NOVAPOSHTA_*` environment variables.
    ///
    /// Unset or unparseable values fall back to the defaults; a missing API
    /// key becomes an empty string and is rejected by the provider on first
    /// use.
    pub fn from_env() -> Self {
        let api_key = std::env::var("NOVAPOSHTA_API_KEY").unwrap_or_default();
        let limit = std::env::var("NOVAPOSHTA_LIMIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_LIMIT);
        let language = std::env::var("NOVAPOSHTA_LANGUAGE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();
        let json_url =
            std::env::var("NOVAPOSHTA_JSON_URL").unwrap_or_else(|_| DEFAULT_JSON_URL.to_string());
        let print_url =
            std::env::var("NOVAPOSHTA_PRINT_URL").unwrap_or_else(|_| DEFAULT_PRINT_URL.to_string());

        Self {
            api_key,
            limit,
            language,
            endpoints: Endpoints {
                json_url,
                print_url,
            },
        }
    }
}

// The API key stays out of debug output.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("limit", &self.limit)
            .field("language", &self.language)
            .field("endpoints", &self.endpoints)
            .finish()
    }
}
