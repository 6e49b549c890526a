use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;

static TRACING_INITIALIZED: OnceLock<()> = OnceLock::new();

pub fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

/// Idempotent setup; safe to call from every entry point and from tests.
pub fn init() {
    TRACING_INITIALIZED.get_or_init(|| {
        if let Err(e) = init_tracing() {
            eprintln!("Failed to initialize tracing: {}", e);
        }
    });
}
