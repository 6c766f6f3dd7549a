use serde::Deserialize;

// Compiled-in fallbacks so a fresh checkout talks to the shared demo project.
// Override with SUPABASE_URL / SUPABASE_ANON_KEY in deployment; the anon key is
// only safe to embed because every table is row-level-security scoped by user.
const DEFAULT_SUPABASE_URL: &str = "https://homestock-demo.supabase.co";
const DEFAULT_SUPABASE_ANON_KEY: &str = "sb-anon-demo-key";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    /// When absent the AI model runs offline with canned responses.
    pub gemini_api_key: Option<String>,
    /// Persisted access token from a previous sign-in, if any.
    pub access_token: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let supabase_url =
            std::env::var("SUPABASE_URL").unwrap_or_else(|_| DEFAULT_SUPABASE_URL.into());
        let supabase_anon_key =
            std::env::var("SUPABASE_ANON_KEY").unwrap_or_else(|_| DEFAULT_SUPABASE_ANON_KEY.into());
        let gemini_api_key = std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty());
        let access_token = std::env::var("SUPABASE_ACCESS_TOKEN")
            .ok()
            .filter(|t| !t.is_empty());
        Self {
            supabase_url,
            supabase_anon_key,
            gemini_api_key,
            access_token,
        }
    }
}
