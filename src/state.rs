use std::sync::Arc;

use tracing::info;

use crate::ai::{gemini::Gemini, AiModel, Offline};
use crate::config::AppConfig;
use crate::inventory::repo::SupabaseInventoryRepo;
use crate::inventory::InventoryRepo;
use crate::profile::repo::SupabaseProfileRepo;
use crate::profile::ProfileRepo;
use crate::session::SessionController;
use crate::shopping::repo::SupabaseShoppingRepo;
use crate::shopping::ShoppingRepo;
use crate::supabase::{auth::GoTrue, SupabaseClient};

/// Everything the workflows need, wired once at startup. Stores and the AI
/// model sit behind trait objects so tests can swap the backends.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub supabase: Arc<SupabaseClient>,
    pub inventory: Arc<dyn InventoryRepo>,
    pub shopping: Arc<dyn ShoppingRepo>,
    pub profiles: Arc<dyn ProfileRepo>,
    pub ai: Arc<dyn AiModel>,
    pub session: Arc<SessionController>,
    #[cfg(test)]
    mem_profiles: Option<Arc<crate::profile::repo::mem::MemoryProfileRepo>>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env());

        let supabase = Arc::new(SupabaseClient::new(
            &config.supabase_url,
            &config.supabase_anon_key,
        ));

        let ai: Arc<dyn AiModel> = match &config.gemini_api_key {
            Some(key) => Arc::new(Gemini::new(key.clone())),
            None => {
                info!("GEMINI_API_KEY not set; AI operations return canned data");
                Arc::new(Offline)
            }
        };

        let auth = Arc::new(GoTrue::new(&config.supabase_url, &config.supabase_anon_key));
        let session = Arc::new(SessionController::new(auth, supabase.clone()));
        session.restore(config.access_token.clone()).await;

        Ok(Self {
            inventory: Arc::new(SupabaseInventoryRepo::new(supabase.clone())),
            shopping: Arc::new(SupabaseShoppingRepo::new(supabase.clone())),
            profiles: Arc::new(SupabaseProfileRepo::new(supabase.clone())),
            ai,
            session,
            supabase,
            config,
            #[cfg(test)]
            mem_profiles: None,
        })
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        Self::fake_with_model(Arc::new(Offline))
    }

    /// In-memory backends plus the given model; no network anywhere.
    #[cfg(test)]
    pub fn fake_with_model(ai: Arc<dyn AiModel>) -> Self {
        use crate::inventory::repo::mem::MemoryInventoryRepo;
        use crate::profile::repo::mem::MemoryProfileRepo;
        use crate::session::test_auth::NullAuth;
        use crate::shopping::repo::mem::MemoryShoppingRepo;

        let config = Arc::new(AppConfig {
            supabase_url: "http://localhost:54321".into(),
            supabase_anon_key: "test-anon-key".into(),
            gemini_api_key: None,
            access_token: None,
        });
        let supabase = Arc::new(SupabaseClient::new(
            &config.supabase_url,
            &config.supabase_anon_key,
        ));
        let session = Arc::new(SessionController::new(Arc::new(NullAuth), supabase.clone()));
        let mem_profiles = Arc::new(MemoryProfileRepo::default());

        Self {
            inventory: Arc::new(MemoryInventoryRepo::default()),
            shopping: Arc::new(MemoryShoppingRepo::default()),
            profiles: mem_profiles.clone(),
            ai,
            session,
            supabase,
            config,
            mem_profiles: Some(mem_profiles),
        }
    }

    #[cfg(test)]
    pub fn profile_row_count(&self) -> usize {
        self.mem_profiles
            .as_ref()
            .expect("profile_row_count only works on fake state")
            .row_count()
    }
}
