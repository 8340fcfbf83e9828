use std::collections::HashMap;

use anyhow::Result;

/// Server configuration.
/// Secrets (upstream API keys) come from env/.env only and are never logged.
#[derive(Debug, Clone)]
pub struct Config {
    // Web server
    pub web_bind: String,
    pub web_port: u16,
    /// Directory holding the client UI build; empty disables static hosting.
    pub static_dir: String,

    // SC-100 template
    pub template_path: String,
    /// Download SC-100 from the forms catalog when `template_path` does not exist.
    pub template_auto_fetch: bool,

    // Place search (address autocomplete, business lookup)
    pub google_places_api_key: String,
    pub places_base_url: String,

    // Chat completions (court info, jurisdiction, legal text, pre-suit demand)
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub openai_model: String,

    /// Small-claims ceiling for an individual plaintiff, in dollars.
    pub max_claim_amount: f64,

    /// "text" (default) or "json".
    pub log_format: String,
}

pub const DEFAULT_MAX_CLAIM_AMOUNT: f64 = 12_500.0;

fn parse_dotenv_str(contents: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((k, v)) = line.split_once('=') {
            let v = v.trim().trim_matches('"');
            map.insert(k.trim().to_string(), v.to_string());
        }
    }
    map
}

fn parse_dotenv() -> HashMap<String, String> {
    let Ok(contents) = std::fs::read_to_string(".env") else {
        return HashMap::new();
    };
    parse_dotenv_str(&contents)
}

type Lookup<'a> = dyn Fn(&str) -> Option<String> + 'a;

fn get_str(lookup: &Lookup<'_>, key: &str, default: &str) -> String {
    lookup(key).unwrap_or_else(|| default.to_string())
}

fn get_bool(lookup: &Lookup<'_>, key: &str, default: bool) -> bool {
    match lookup(key).as_deref() {
        Some("true") | Some("1") => true,
        Some("false") | Some("0") => false,
        Some(_) => default,
        None => default,
    }
}

fn get_u16(lookup: &Lookup<'_>, key: &str, default: u16) -> u16 {
    lookup(key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn get_f64(lookup: &Lookup<'_>, key: &str, default: f64) -> f64 {
    lookup(key)
        .and_then(|v| v.parse().ok())
        .filter(|v: &f64| v.is_finite() && *v > 0.0)
        .unwrap_or(default)
}

impl Config {
    /// Process environment wins over `.env` in the working directory.
    pub fn from_env() -> Result<Self> {
        let dotenv = parse_dotenv();
        let lookup = |key: &str| std::env::var(key).ok().or_else(|| dotenv.get(key).cloned());
        Ok(Self::from_lookup(&lookup))
    }

    pub fn from_map(values: &HashMap<String, String>) -> Self {
        Self::from_lookup(&|key: &str| values.get(key).cloned())
    }

    fn from_lookup(lookup: &Lookup<'_>) -> Self {
        Config {
            web_bind: get_str(lookup, "WEB_BIND", "127.0.0.1"),
            web_port: get_u16(lookup, "WEB_PORT", 3000),
            static_dir: get_str(lookup, "STATIC_DIR", ""),
            template_path: get_str(lookup, "TEMPLATE_PATH", "templates/sc100.pdf"),
            template_auto_fetch: get_bool(lookup, "TEMPLATE_AUTO_FETCH", true),
            google_places_api_key: get_str(lookup, "GOOGLE_PLACES_API_KEY", ""),
            places_base_url: get_str(
                lookup,
                "PLACES_BASE_URL",
                "https://maps.googleapis.com/maps/api/place",
            ),
            openai_api_key: get_str(lookup, "OPENAI_API_KEY", ""),
            openai_base_url: get_str(lookup, "OPENAI_BASE_URL", "https://api.openai.com/v1"),
            openai_model: get_str(lookup, "OPENAI_MODEL", "gpt-4o-mini"),
            max_claim_amount: get_f64(lookup, "MAX_CLAIM_AMOUNT", DEFAULT_MAX_CLAIM_AMOUNT),
            log_format: get_str(lookup, "LOG_FORMAT", "text"),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.web_bind, self.web_port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_map(&HashMap::new())
    }
}
