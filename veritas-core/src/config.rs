use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct VeritasConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub routing: RoutingConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServiceConfig {
    pub socket_path: String,
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            socket_path: "/tmp/veritas.sock".to_string(),
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ClassifierConfig {
    /// "linear" or "onnx"
    pub backend: String,
    pub vectorizer_path: String,
    pub model_path: String,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            backend: "linear".to_string(),
            vectorizer_path: "models/vectorizer.json".to_string(),
            model_path: "models/model.json".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RoutingConfig {
    /// Claims with fewer tokens than this go to web search instead of the classifier.
    pub short_claim_tokens: usize,
    pub preview_chars: usize,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            short_claim_tokens: 10,
            preview_chars: crate::models::PREVIEW_CHARS,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub min_paragraph_chars: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0".to_string(),
            timeout_seconds: 15,
            min_paragraph_chars: 50,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    pub base_url: String,
    pub engine: String,
    pub max_results: usize,
    pub timeout_seconds: u64,
    pub api_key: Option<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://serpapi.com".to_string(),
            engine: "google".to_string(),
            max_results: 5,
            timeout_seconds: 15,
            api_key: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HttpConfig {
    pub enabled: bool,
    pub host: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: "127.0.0.1".to_string(),
            port: 8770,
        }
    }
}

impl VeritasConfig {
    /// Load from a TOML file, then apply `VERITAS__SECTION__KEY` environment overrides.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::with_name(path))
            .add_source(Environment::with_prefix("VERITAS").separator("__"))
            .build()?;
        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_documented_values() {
        let c = VeritasConfig::default();
        assert_eq!(c.routing.short_claim_tokens, 10);
        assert_eq!(c.routing.preview_chars, 500);
        assert_eq!(c.fetch.user_agent, "Mozilla/5.0");
        assert_eq!(c.fetch.min_paragraph_chars, 50);
        assert_eq!(c.search.engine, "google");
        assert_eq!(c.search.max_results, 5);
        assert_eq!(c.classifier.backend, "linear");
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[classifier]\nbackend = \"onnx\"\nvectorizer_path = \"/opt/v.json\"\nmodel_path = \"/opt/m.onnx\"\n\n[http]\nenabled = false\nhost = \"0.0.0.0\"\nport = 9000"
        )
        .unwrap();

        let c = VeritasConfig::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(c.classifier.backend, "onnx");
        assert_eq!(c.classifier.model_path, "/opt/m.onnx");
        assert!(!c.http.enabled);
        assert_eq!(c.http.port, 9000);
        assert_eq!(c.search.max_results, 5);
        assert_eq!(c.service.socket_path, "/tmp/veritas.sock");
    }

    #[test]
    fn test_load_single_key_in_section_keeps_other_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[search]\napi_key = \"x\"\n\n[fetch]\ntimeout_seconds = 5").unwrap();

        let c = VeritasConfig::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(c.search.api_key.as_deref(), Some("x"));
        assert_eq!(c.search.base_url, "https://serpapi.com");
        assert_eq!(c.search.engine, "google");
        assert_eq!(c.search.max_results, 5);
        assert_eq!(c.fetch.timeout_seconds, 5);
        assert_eq!(c.fetch.user_agent, "Mozilla/5.0");
        assert_eq!(c.fetch.min_paragraph_chars, 50);
    }

    #[test]
    fn test_load_missing_file_is_error() {
        assert!(VeritasConfig::load("/nonexistent/veritas.toml").is_err());
    }
}
