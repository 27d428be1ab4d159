use serde::Deserialize;
use std::collections::HashMap;

/// Main configuration structure for Listhawk
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub index: IndexConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub throttle: ThrottleConfig,
    #[serde(default)]
    pub fields: Vec<FieldEntry>,
}

impl Config {
    /// Returns the selected field identifiers in declared order.
    ///
    /// Only entries with `include = true` participate; the header row and
    /// every record column follow this exact order.
    pub fn selected_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.include)
            .map(|f| f.name.as_str())
            .collect()
    }
}

/// Listing index configuration
#[derive(Debug, Clone, Deserialize)]
pub struct IndexConfig {
    /// Base URL of the paginated listing index
    pub url: String,

    /// Query parameter carrying the page number
    #[serde(rename = "page-param", default = "default_page_param")]
    pub page_param: String,
}

fn default_page_param() -> String {
    "p".to_string()
}

/// Output sink configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the delimiter-separated output file
    pub path: String,

    /// Column delimiter, a single ASCII character
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
}

fn default_delimiter() -> String {
    ";".to_string()
}

impl OutputConfig {
    /// The delimiter as a byte. Validation guarantees a single ASCII char.
    pub fn delimiter_byte(&self) -> u8 {
        self.delimiter.as_bytes().first().copied().unwrap_or(b';')
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HttpConfig {
    /// Request headers sent with every fetch
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Optional proxy for all requests
    #[serde(default)]
    pub proxy: Option<ProxyConfig>,
}

/// Proxy settings
#[derive(Debug, Clone, Deserialize)]
pub struct ProxyConfig {
    /// Proxy URL (http, https or socks5 scheme)
    pub url: String,
}

/// Politeness throttle configuration
///
/// Every two outbound requests are separated by the base delay plus a
/// uniformly random jitter drawn from the configured range.
#[derive(Debug, Clone, Deserialize)]
pub struct ThrottleConfig {
    #[serde(rename = "base-delay-ms", default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    #[serde(rename = "jitter-min-ms", default = "default_jitter_min_ms")]
    pub jitter_min_ms: u64,

    #[serde(rename = "jitter-max-ms", default = "default_jitter_max_ms")]
    pub jitter_max_ms: u64,
}

fn default_base_delay_ms() -> u64 {
    3000
}

fn default_jitter_min_ms() -> u64 {
    1000
}

fn default_jitter_max_ms() -> u64 {
    4000
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: default_base_delay_ms(),
            jitter_min_ms: default_jitter_min_ms(),
            jitter_max_ms: default_jitter_max_ms(),
        }
    }
}

/// One field-selection entry
///
/// Entries are declared as an ordered `[[fields]]` array; the declaration
/// order is the output column order.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldEntry {
    /// Field identifier (e.g. "price", "physical address")
    pub name: String,

    /// Whether this field participates in the crawl
    #[serde(default = "default_include")]
    pub include: bool,
}

fn default_include() -> bool {
    true
}
