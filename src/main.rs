use std::{error::Error, sync::Arc};
use todo_server::{
    app_state::{AppState, SharedState},
    build_router,
    data_access::data_context::DataContext,
    settings::Settings,
    ImageAcquirer,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    // ── Settings ───────────────────────────────────────────────
    let settings = Settings::load()?;
    let image_dir = settings.image_dir();
    std::fs::create_dir_all(&image_dir)?;

    // ── Persistence ────────────────────────────────────────────
    let data_context = DataContext::new(&settings.database_path)?;
    tracing::info!(
        path = %settings.database_path.display(),
        todos = data_context.list_todos()?.len(),
        "database opened"
    );

    // ── Image acquisition ──────────────────────────────────────
    let acquirer = ImageAcquirer::new(&settings.image_service, &image_dir)?;
    if acquirer.is_enabled() {
        tracing::info!(url = %settings.image_service.generation_url(), "image generation enabled");
    } else {
        tracing::warn!("no image service credential configured, todos will be created without images");
    }

    // ── Shared state ───────────────────────────────────────────
    let state: SharedState = Arc::new(AppState::new(
        data_context,
        Arc::new(acquirer),
        settings.public_dir.clone(),
    ));

    // ── Start ──────────────────────────────────────────────────
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(settings.bind_address()).await?;
    tracing::info!(addr = %listener.local_addr()?, "server running");

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(not(feature = "profile-console"))]
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("todo_server=info,tower_http=info")),
        )
        .init();
}

#[cfg(feature = "profile-console")]
fn init_tracing() {
    console_subscriber::init();
}
