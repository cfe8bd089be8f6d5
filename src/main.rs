use anyhow::Result;
use serverdash::*;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(_) => {
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the dashboard frames; logs go to stderr.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let app_config = config::AppConfig::load()?;
    let fetcher = Arc::new(fetcher::HttpFetcher::new(&app_config.api)?);
    tracing::info!(
        version = %version::banner(),
        base_url = fetcher.base_url(),
        groups = ?app_config.dashboard.groups,
        "starting dashboard"
    );

    let (frames_tx, mut frames_rx) = broadcast::channel::<String>(worker::FRAME_CHANNEL_CAPACITY);
    let (commands_tx, commands_rx) = mpsc::channel::<command::Command>(32);
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    let printer = tokio::spawn(async move {
        loop {
            match frames_rx.recv().await {
                Ok(frame) => println!("{frame}\n"),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "frame printer lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    let worker_handle = worker::spawn(
        worker::WorkerDeps {
            fetcher,
            commands_rx,
            frames_tx,
            shutdown_rx,
        },
        worker::WorkerConfig {
            groups: app_config.dashboard.groups.clone(),
            auto_refresh_secs: app_config.dashboard.auto_refresh_secs,
        },
    );

    println!("{}\n", command::HELP);
    let mut lines = input::stdin_lines();
    let signal = shutdown_signal();
    tokio::pin!(signal);
    loop {
        tokio::select! {
            line = lines.recv() => {
                let line = match line {
                    Some(Ok(l)) => l,
                    None => break,
                    Some(Err(e)) => {
                        tracing::warn!(error = %e, operation = "read_stdin", "stdin read failed");
                        break;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }
                match command::parse(&line) {
                    Ok(cmd) => {
                        let quit = cmd == command::Command::Quit;
                        if commands_tx.send(cmd).await.is_err() || quit {
                            break;
                        }
                    }
                    Err(e) => println!("{e}\n{}\n", command::HELP),
                }
            }
            _ = &mut signal => {
                tracing::info!("Received shutdown signal");
                break;
            }
        }
    }

    // The reader thread may still be parked in a read; it is not joined.
    drop(lines);
    let _ = shutdown_tx.send(());
    let _ = worker_handle.await;
    let _ = printer.await;
    Ok(())
}
