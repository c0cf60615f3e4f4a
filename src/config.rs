use std::env;

const DEFAULT_STORE_URL: &str = "postgres://localhost:5432";
const DEFAULT_STORE_DATABASE: &str = "chatbotdb";
const DEFAULT_STORE_COLLECTION: &str = "messages";
const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_PORT: u16 = 3001;

/// Process-wide settings, read once in `main`.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub store_url: String,
    pub store_database: String,
    pub store_collection: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub port: u16,
}

impl RelayConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Self {
            store_url: var("STORE_URL", DEFAULT_STORE_URL),
            store_database: var("STORE_DATABASE", DEFAULT_STORE_DATABASE),
            store_collection: var("STORE_COLLECTION", DEFAULT_STORE_COLLECTION),
            gemini_api_key: lookup("GEMINI_API_KEY").filter(|k| !k.trim().is_empty()),
            gemini_model: var("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            gemini_base_url: var("GEMINI_API_BASE_URL", DEFAULT_GEMINI_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
        }
    }
}
