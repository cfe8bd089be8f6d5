// Per-group view state: collections, selection and detail history.
// All mutation goes through the transition methods; fetch results carry a ticket
// and are only committed while that ticket is still current.

use crate::error::FetchError;
use crate::join::latest_health;
use crate::models::{GroupOverview, HealthSnapshot, ServerRecord};

/// Lifecycle of a tab, derived from its flags rather than stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing loaded yet (also where a failed first load ends up).
    Idle,
    /// Overview request in flight.
    Loading,
    /// Overview shown, no detail panel.
    Loaded,
    /// A server's detail panel is open.
    DetailOpen,
}

/// Issued by [`ServerGroupView::begin_load`]; identifies one overview request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverviewTicket {
    generation: u64,
}

/// Issued by [`ServerGroupView::open_detail`]; identifies one history request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryTicket {
    server_id: i64,
    generation: u64,
}

impl HistoryTicket {
    pub fn server_id(&self) -> i64 {
        self.server_id
    }
}

/// Outcome of feeding a fetch result back into the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Result stored.
    Committed,
    /// Superseded by a newer request or selection; state untouched.
    Stale,
    /// Fetch failed; previous data kept.
    Failed,
}

/// History section of the open detail panel.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryState {
    /// Request in flight (or no panel open).
    Pending,
    /// Snapshots in the order the server returned them.
    Ready(Vec<HealthSnapshot>),
    /// The history request failed.
    Unavailable,
}

/// One dashboard tab, parameterized by the group key it queries.
#[derive(Debug, Clone)]
pub struct ServerGroupView {
    key: String,
    servers: Vec<ServerRecord>,
    healths: Vec<HealthSnapshot>,
    loaded_once: bool,
    loading: bool,
    selected_server_id: Option<i64>,
    history: HistoryState,
    load_generation: u64,
    selection_generation: u64,
}

impl ServerGroupView {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            servers: Vec::new(),
            healths: Vec::new(),
            loaded_once: false,
            loading: false,
            selected_server_id: None,
            history: HistoryState::Pending,
            load_generation: 0,
            selection_generation: 0,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn phase(&self) -> Phase {
        if self.selected_server_id.is_some() {
            Phase::DetailOpen
        } else if self.loading {
            Phase::Loading
        } else if self.loaded_once {
            Phase::Loaded
        } else {
            Phase::Idle
        }
    }

    pub fn servers(&self) -> &[ServerRecord] {
        &self.servers
    }

    pub fn healths(&self) -> &[HealthSnapshot] {
        &self.healths
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn detail_open(&self) -> bool {
        self.selected_server_id.is_some()
    }

    pub fn selected_server_id(&self) -> Option<i64> {
        self.selected_server_id
    }

    pub fn selected_server(&self) -> Option<&ServerRecord> {
        let id = self.selected_server_id?;
        self.servers.iter().find(|s| s.id == id)
    }

    pub fn history_state(&self) -> &HistoryState {
        &self.history
    }

    /// History of the selected server; empty until its fetch lands.
    pub fn history(&self) -> &[HealthSnapshot] {
        match &self.history {
            HistoryState::Ready(h) => h,
            _ => &[],
        }
    }

    /// Latest health snapshot for a server in the current overview batch.
    pub fn health_for(&self, server_id: i64) -> Option<&HealthSnapshot> {
        latest_health(&self.healths, server_id)
    }

    /// Mount or refresh. Previous collections stay visible until the response lands.
    pub fn begin_load(&mut self) -> OverviewTicket {
        self.load_generation += 1;
        self.loading = true;
        OverviewTicket {
            generation: self.load_generation,
        }
    }

    pub fn apply_overview(
        &mut self,
        ticket: OverviewTicket,
        result: Result<GroupOverview, FetchError>,
    ) -> Applied {
        if ticket.generation != self.load_generation {
            tracing::debug!(
                group = %self.key,
                generation = ticket.generation,
                current = self.load_generation,
                "dropping superseded overview response"
            );
            return Applied::Stale;
        }
        self.loading = false;
        match result {
            Ok(overview) => {
                tracing::debug!(
                    group = %self.key,
                    servers = overview.servers.len(),
                    healths = overview.healths.len(),
                    "overview loaded"
                );
                self.servers = overview.servers;
                self.healths = overview.healths;
                self.loaded_once = true;
                if let Some(id) = self.selected_server_id
                    && !self.servers.iter().any(|s| s.id == id)
                {
                    tracing::info!(group = %self.key, server_id = id, "selected server gone after refresh, closing detail");
                    self.close_detail();
                }
                Applied::Committed
            }
            Err(e) => {
                tracing::warn!(
                    group = %self.key,
                    error = %e,
                    operation = "fetch_overview",
                    "Error fetching data"
                );
                Applied::Failed
            }
        }
    }

    /// Opens the detail panel right away; history fills in when the returned ticket resolves.
    /// Returns `None` for an id that is not in the current server list.
    pub fn open_detail(&mut self, server_id: i64) -> Option<HistoryTicket> {
        if !self.servers.iter().any(|s| s.id == server_id) {
            tracing::info!(group = %self.key, server_id, "open_detail: unknown server");
            return None;
        }
        self.selection_generation += 1;
        self.selected_server_id = Some(server_id);
        self.history = HistoryState::Pending;
        Some(HistoryTicket {
            server_id,
            generation: self.selection_generation,
        })
    }

    pub fn apply_history(
        &mut self,
        ticket: HistoryTicket,
        result: Result<Vec<HealthSnapshot>, FetchError>,
    ) -> Applied {
        if ticket.generation != self.selection_generation
            || self.selected_server_id != Some(ticket.server_id)
        {
            tracing::debug!(
                group = %self.key,
                server_id = ticket.server_id,
                selected = ?self.selected_server_id,
                "dropping stale history response"
            );
            return Applied::Stale;
        }
        match result {
            Ok(history) => {
                self.history = HistoryState::Ready(history);
                Applied::Committed
            }
            Err(e) => {
                tracing::warn!(
                    group = %self.key,
                    server_id = ticket.server_id,
                    error = %e,
                    operation = "fetch_history",
                    "Error fetching health data"
                );
                self.history = HistoryState::Unavailable;
                Applied::Failed
            }
        }
    }

    pub fn close_detail(&mut self) {
        self.selection_generation += 1;
        self.selected_server_id = None;
        self.history = HistoryState::Pending;
    }
}
