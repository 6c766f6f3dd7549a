use homestock::session::{guard, Access, View};
use homestock::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| "homestock=debug,reqwest=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let state = AppState::init().await?;

    // Startup diagnostics: storage reachability and session state.
    match state.supabase.probe("products").await {
        Ok(()) => tracing::info!("row storage reachable"),
        Err(e) => tracing::error!(error = %e, "row storage unreachable"),
    }

    let session = state.session.current();
    match &session {
        Some(s) => tracing::info!(user_id = %s.user_id, "signed in"),
        None => tracing::info!("no session; login required"),
    }
    match guard(View::Overview, session.as_ref()) {
        Access::Allow => tracing::info!("default view: overview"),
        Access::Redirect(view) => tracing::info!(?view, "default view redirects"),
    }

    Ok(())
}
