// Dashboard event loop.
// A single task owns the Dashboard; fetches are futures polled by that same task,
// so view state is never touched concurrently. Rendered frames go out on a broadcast channel.

use crate::command::{Command, HELP};
use crate::dashboard::Dashboard;
use crate::error::FetchError;
use crate::fetcher::Fetcher;
use crate::models::{GroupOverview, HealthSnapshot};
use crate::render;
use crate::view_state::{Applied, HistoryTicket, OverviewTicket};
use futures_util::StreamExt;
use futures_util::stream::FuturesUnordered;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::time::{Duration, Instant, Interval, interval_at};

/// Rate limit for "no receivers" log (nobody subscribed to frames)
const NO_RECEIVERS_WARN_INTERVAL: Duration = Duration::from_secs(60);

/// Capacity of the frame broadcast channel; slow readers skip to newer frames.
pub const FRAME_CHANNEL_CAPACITY: usize = 16;

/// A fetch result routed back to the tab that issued it.
#[derive(Debug)]
pub enum FetchOutcome {
    Overview {
        group: String,
        ticket: OverviewTicket,
        result: Result<GroupOverview, FetchError>,
    },
    History {
        group: String,
        ticket: HistoryTicket,
        result: Result<Vec<HealthSnapshot>, FetchError>,
    },
}

type PendingFetch = Pin<Box<dyn Future<Output = FetchOutcome> + Send>>;

/// Fetcher, channels, and shutdown for the worker.
pub struct WorkerDeps<F> {
    pub fetcher: Arc<F>,
    pub commands_rx: mpsc::Receiver<Command>,
    pub frames_tx: broadcast::Sender<String>,
    pub shutdown_rx: oneshot::Receiver<()>,
}

pub struct WorkerConfig {
    /// Tab order; the first group is active on mount.
    pub groups: Vec<String>,
    pub auto_refresh_secs: Option<u64>,
}

fn overview_fetch<F: Fetcher>(
    fetcher: &Arc<F>,
    group: String,
    ticket: OverviewTicket,
) -> PendingFetch {
    let fetcher = fetcher.clone();
    Box::pin(async move {
        let result = fetcher.fetch_overview(&group).await;
        FetchOutcome::Overview {
            group,
            ticket,
            result,
        }
    })
}

fn history_fetch<F: Fetcher>(
    fetcher: &Arc<F>,
    group: String,
    ticket: HistoryTicket,
) -> PendingFetch {
    let fetcher = fetcher.clone();
    Box::pin(async move {
        let result = fetcher.fetch_history(ticket.server_id()).await;
        FetchOutcome::History {
            group,
            ticket,
            result,
        }
    })
}

/// Applies a completed fetch to its tab. Returns the group key when something visible changed.
pub fn apply_outcome(dashboard: &mut Dashboard, outcome: FetchOutcome) -> Option<String> {
    let (group, applied) = match outcome {
        FetchOutcome::Overview {
            group,
            ticket,
            result,
        } => {
            let applied = dashboard.group_mut(&group)?.apply_overview(ticket, result);
            (group, applied)
        }
        FetchOutcome::History {
            group,
            ticket,
            result,
        } => {
            let applied = dashboard.group_mut(&group)?.apply_history(ticket, result);
            (group, applied)
        }
    };
    (applied != Applied::Stale).then_some(group)
}

struct Publisher {
    tx: broadcast::Sender<String>,
    last_no_receivers_warn: Option<Instant>,
}

impl Publisher {
    fn send(&mut self, text: String) {
        if self.tx.send(text).is_err() {
            let should_warn = self
                .last_no_receivers_warn
                .is_none_or(|t| t.elapsed() >= NO_RECEIVERS_WARN_INTERVAL);
            if should_warn {
                tracing::debug!(
                    operation = "publish_frame",
                    "No frame subscribers; broadcast channel has no receivers"
                );
                self.last_no_receivers_warn = Some(Instant::now());
            }
        }
    }

    fn frame(&mut self, dashboard: &Dashboard) {
        self.send(render::frame(dashboard));
    }
}

async fn next_refresh(tick: &mut Option<Interval>) {
    match tick {
        Some(t) => {
            t.tick().await;
        }
        None => std::future::pending().await,
    }
}

enum Flow {
    Continue,
    Quit,
}

fn handle_command<F: Fetcher>(
    command: Command,
    dashboard: &mut Dashboard,
    fetcher: &Arc<F>,
    pending: &mut FuturesUnordered<PendingFetch>,
    publisher: &mut Publisher,
) -> Flow {
    match command {
        Command::Tab(key) => match dashboard.select_tab(&key) {
            Ok(()) => publisher.frame(dashboard),
            Err(e) => publisher.send(e.to_string()),
        },
        Command::Open(server_id) => {
            let Some(view) = dashboard.active_mut() else {
                return Flow::Continue;
            };
            match view.open_detail(server_id) {
                Some(ticket) => {
                    let group = view.key().to_string();
                    tracing::debug!(group = %group, server_id, "opening detail");
                    pending.push(history_fetch(fetcher, group, ticket));
                    publisher.frame(dashboard);
                }
                None => publisher.send(format!("no server with id {server_id} in this tab")),
            }
        }
        Command::Close => {
            if let Some(view) = dashboard.active_mut() {
                view.close_detail();
            }
            publisher.frame(dashboard);
        }
        Command::Refresh => {
            for (group, ticket) in dashboard.begin_mount() {
                pending.push(overview_fetch(fetcher, group, ticket));
            }
            publisher.frame(dashboard);
        }
        Command::Show => publisher.frame(dashboard),
        Command::Help => publisher.send(HELP.to_string()),
        Command::Quit => return Flow::Quit,
    }
    Flow::Continue
}

/// Spawns the dashboard loop. The handle yields the final dashboard state on exit
/// (quit command, closed command channel, or shutdown signal).
pub fn spawn<F: Fetcher>(
    deps: WorkerDeps<F>,
    config: WorkerConfig,
) -> tokio::task::JoinHandle<Dashboard> {
    let WorkerDeps {
        fetcher,
        mut commands_rx,
        frames_tx,
        mut shutdown_rx,
    } = deps;
    let WorkerConfig {
        groups,
        auto_refresh_secs,
    } = config;

    tokio::spawn(async move {
        let mut dashboard = Dashboard::new(groups);
        let mut pending: FuturesUnordered<PendingFetch> = FuturesUnordered::new();
        let mut publisher = Publisher {
            tx: frames_tx,
            last_no_receivers_warn: None,
        };

        let mut refresh_tick = auto_refresh_secs.map(|secs| {
            let period = Duration::from_secs(secs);
            let mut t = interval_at(Instant::now() + period, period);
            t.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            t
        });

        for (group, ticket) in dashboard.begin_mount() {
            pending.push(overview_fetch(&fetcher, group, ticket));
        }
        publisher.frame(&dashboard);

        loop {
            tokio::select! {
                Some(outcome) = pending.next(), if !pending.is_empty() => {
                    if let Some(group) = apply_outcome(&mut dashboard, outcome)
                        && dashboard.active_key() == Some(group.as_str())
                    {
                        publisher.frame(&dashboard);
                    }
                }
                command = commands_rx.recv() => {
                    let Some(command) = command else {
                        tracing::debug!("Command channel closed");
                        break;
                    };
                    let flow = handle_command(
                        command,
                        &mut dashboard,
                        &fetcher,
                        &mut pending,
                        &mut publisher,
                    );
                    if let Flow::Quit = flow {
                        break;
                    }
                }
                _ = next_refresh(&mut refresh_tick) => {
                    tracing::debug!(operation = "auto_refresh", in_flight = pending.len(), "refreshing overviews");
                    for (group, ticket) in dashboard.begin_mount() {
                        pending.push(overview_fetch(&fetcher, group, ticket));
                    }
                }
                _ = &mut shutdown_rx => {
                    tracing::debug!("Worker shutting down");
                    break;
                }
            }
        }
        dashboard
    })
}
