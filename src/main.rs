use std::sync::{Arc, Mutex};

use sheetpress::application::ConvertWorkbookUseCase;
use sheetpress::infrastructure::config::Settings;
use sheetpress::interfaces::http::{start_server, AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::load()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;

    tracing::info!(
        host = %settings.host,
        port = settings.port,
        max_upload_bytes = settings.max_upload_bytes,
        "starting sheetpress"
    );

    let state = AppState {
        settings,
        convert_use_case: ConvertWorkbookUseCase::new(),
        logs: Arc::new(Mutex::new(Vec::new())),
    };

    start_server(state)?.await
}
