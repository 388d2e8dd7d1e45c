use std::sync::{Arc, Mutex};

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::infrastructure::bootstrap;
use crate::infrastructure::config::Settings;
use crate::interfaces::http::{add_log, start_server, LogEntry};

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Load configuration and data, then serve the dashboard until shutdown.
pub async fn run() -> std::io::Result<()> {
    let _ = dotenvy::dotenv();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(err) => {
            init_tracing("info");
            error!(error = %err, "Failed to load configuration");
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, err));
        }
    };
    init_tracing(&settings.log_filter);

    let dashboard = bootstrap::setup(&settings).map_err(|err| {
        error!(error = %err, "Failed to start dashboard");
        std::io::Error::new(std::io::ErrorKind::Other, err)
    })?;

    let logs: Arc<Mutex<Vec<LogEntry>>> = Arc::new(Mutex::new(Vec::new()));
    add_log(
        &logs,
        "INFO",
        "Bootstrap",
        &format!(
            "Loaded {} missions from {}",
            dashboard.dataset().len(),
            settings.data_path
        ),
    );

    info!(host = %settings.host, port = settings.port, "Dashboard listening");
    start_server(Arc::new(dashboard), logs, &settings.host, settings.port)?.await
}
