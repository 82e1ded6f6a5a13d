use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

mod api;
mod config;
mod dataset;
mod http;
mod logger;
mod server;

use dataset::{Dataset, Resource};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;
    logger::init(&cfg)?;

    // Build the Tokio runtime, sized by `server.workers` when set
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_reusable_listener(addr)?;

    let state = Arc::new(config::AppState::new(&cfg));
    report_dataset(&state.cities);
    report_dataset(&state.countries);

    let signals = Arc::new(server::SignalHandler::new());
    server::start_signal_handler(Arc::clone(&signals))?;

    logger::log_server_start(&addr, &cfg);

    let active_connections = Arc::new(AtomicUsize::new(0));
    server::start_server_loop(
        listener,
        state,
        active_connections,
        Arc::clone(&signals.shutdown),
    )
    .await;

    Ok(())
}

fn report_dataset<R: Resource>(dataset: &Dataset<R>) {
    if dataset.is_empty() {
        logger::log_warning(&format!("{} dataset is empty", R::LABEL));
    } else {
        logger::log_dataset_loaded(R::LABEL, dataset.len());
    }
}
