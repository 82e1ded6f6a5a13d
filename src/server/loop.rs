// Server loop module
// Accepts connections until shutdown, then drains the open ones

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// How often the drain phase re-checks the connection counter
const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Run the accept loop until `shutdown` is notified.
///
/// After shutdown the listener is dropped and open connections get up to
/// `performance.shutdown_timeout` seconds to finish.
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    active_connections: Arc<AtomicUsize>,
    shutdown: Arc<Notify>,
) {
    let shutdown_signal = shutdown.notified();
    tokio::pin!(shutdown_signal);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = &mut shutdown_signal => break,
        }
    }

    drop(listener);
    logger::log_shutdown_started(active_connections.load(Ordering::SeqCst));

    let timeout = Duration::from_secs(state.config.performance.shutdown_timeout);
    let remaining = drain_connections(&active_connections, timeout).await;
    logger::log_shutdown_complete(remaining);
}

/// Wait until the counter reaches zero or `timeout` passes.
/// Returns the number of connections still open.
async fn drain_connections(active_connections: &AtomicUsize, timeout: Duration) -> usize {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        let active = active_connections.load(Ordering::SeqCst);
        if active == 0 || tokio::time::Instant::now() >= deadline {
            return active;
        }
        tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::server::create_reusable_listener;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    #[tokio::test]
    async fn test_drain_returns_immediately_when_idle() {
        let counter = AtomicUsize::new(0);
        assert_eq!(drain_connections(&counter, Duration::from_secs(5)).await, 0);
    }

    #[tokio::test]
    async fn test_drain_times_out() {
        let counter = AtomicUsize::new(2);
        let remaining = drain_connections(&counter, Duration::from_millis(120)).await;
        assert_eq!(remaining, 2);
    }

    #[tokio::test]
    async fn test_serves_request_then_shuts_down() {
        let mut config = Config::default();
        config.logging.access_log = false;
        let state = Arc::new(AppState::new(&config));

        let listener = create_reusable_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let counter = Arc::new(AtomicUsize::new(0));
        let shutdown = Arc::new(Notify::new());

        let server = tokio::spawn(start_server_loop(
            listener,
            state,
            Arc::clone(&counter),
            Arc::clone(&shutdown),
        ));

        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(
                b"GET /api/countries?id=3 HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
            )
            .await
            .unwrap();
        let mut raw = String::new();
        stream.read_to_string(&mut raw).await.unwrap();
        assert!(raw.starts_with("HTTP/1.1 200 OK"));
        assert!(raw.contains("\"Japan\""));

        shutdown.notify_one();
        tokio::time::timeout(Duration::from_secs(5), server)
            .await
            .unwrap()
            .unwrap();
    }
}
