use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Per-vendor settings sections
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VendorsConfig {
    /// `OpenAI` Responses API
    #[serde(default)]
    pub openai: Option<VendorSettings>,
    /// Anthropic Messages API
    #[serde(default)]
    pub anthropic: Option<VendorSettings>,
    /// Google Gemini
    #[serde(default)]
    pub gemini: Option<VendorSettings>,
    /// xAI Grok
    #[serde(default)]
    pub grok: Option<VendorSettings>,
    /// OpenRouter
    #[serde(default)]
    pub openrouter: Option<VendorSettings>,
}

/// Credentials and endpoint overrides for one vendor
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VendorSettings {
    /// API key
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Base URL override
    #[serde(default)]
    pub base_url: Option<Url>,
    /// Organization header value (`OpenAI` only)
    #[serde(default)]
    pub organization: Option<String>,
    /// `HTTP-Referer` attribution (OpenRouter only)
    #[serde(default)]
    pub referer: Option<String>,
    /// `X-Title` attribution (OpenRouter only)
    #[serde(default)]
    pub title: Option<String>,
}

/// Transport tuning
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransportConfig {
    /// Additional attempts after the first transient failure
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Per-attempt timeout for non-streaming calls, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Per-attempt timeout for streaming calls, in seconds
    #[serde(default = "default_stream_timeout_secs")]
    pub stream_timeout_secs: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            request_timeout_secs: default_request_timeout_secs(),
            stream_timeout_secs: default_stream_timeout_secs(),
        }
    }
}

const fn default_max_retries() -> u32 {
    2
}

const fn default_request_timeout_secs() -> u64 {
    30
}

const fn default_stream_timeout_secs() -> u64 {
    120
}
