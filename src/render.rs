// Text presentation: tab bar, server cards, health detail panel.
// Everything here is a pure function of Dashboard / ServerGroupView state.

use std::fmt;

use chrono::{DateTime, Local, Utc};

use crate::dashboard::Dashboard;
use crate::models::{HealthSnapshot, ServerRecord};
use crate::view_state::{HistoryState, ServerGroupView};

pub const TITLE: &str = "Server Daily Report Dashboard";
pub const NO_HEALTH: &str = "No health data available for this server";
pub const NO_SERVERS: &str = "No servers to display";
pub const HISTORY_LOADING: &str = "Loading history...";
pub const HISTORY_UNAVAILABLE: &str = "History unavailable";

/// Local wall-clock rendering of a snapshot time.
pub fn local_time(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// "cloudeka" -> "Cloudeka"
pub fn tab_label(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub struct TabBar<'a>(pub &'a Dashboard);

impl fmt::Display for TabBar<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let active = self.0.active_key();
        for (i, tab) in self.0.tabs().iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            let label = tab_label(tab.key());
            if Some(tab.key()) == active {
                write!(f, "[{label}]")?;
            } else {
                write!(f, " {label} ")?;
            }
        }
        Ok(())
    }
}

pub struct ServerCard<'a>(pub &'a ServerRecord);

impl fmt::Display for ServerCard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.0;
        writeln!(f, "+ {} (#{})", s.name, s.id)?;
        writeln!(f, "| IP Address: {}", s.ip_addresses.join(", "))?;
        writeln!(f, "| OS Type: {}", s.os_type)?;
        write!(f, "+ Check Details: open {}", s.id)
    }
}

/// Card grid for one group.
pub struct GroupPanel<'a>(pub &'a ServerGroupView);

impl fmt::Display for GroupPanel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.0;
        if view.is_loading() {
            writeln!(f, "(loading {})", view.key())?;
        }
        if view.servers().is_empty() {
            return write!(f, "{NO_SERVERS}");
        }
        for (i, server) in view.servers().iter().enumerate() {
            if i > 0 {
                f.write_str("\n\n")?;
            }
            write!(f, "{}", ServerCard(server))?;
        }
        Ok(())
    }
}

/// Detail dialog for the selected server: latest health plus fetched history.
pub struct DetailPanel<'a> {
    pub server: &'a ServerRecord,
    pub health: Option<&'a HealthSnapshot>,
    pub history: &'a HistoryState,
}

impl<'a> DetailPanel<'a> {
    /// Panel for the open detail of `view`, if any.
    pub fn for_view(view: &'a ServerGroupView) -> Option<Self> {
        let server = view.selected_server()?;
        Some(Self {
            server,
            health: view.health_for(server.id),
            history: view.history_state(),
        })
    }
}

fn write_health(f: &mut fmt::Formatter<'_>, h: &HealthSnapshot, indent: &str) -> fmt::Result {
    writeln!(f, "{indent}CPU Usage: {}%", h.cpu_usage_percent)?;
    writeln!(f, "{indent}RAM Usage: {}%", h.ram_usage_percent)?;
    writeln!(f, "{indent}Partitions:")?;
    for p in &h.partitions {
        writeln!(f, "{indent}  {}: {}%", p.name, p.usage_percent)?;
    }
    Ok(())
}

impl fmt::Display for DetailPanel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.server;
        match self.health {
            Some(h) => writeln!(
                f,
                "== {} | Server Health | {} ==",
                s.name,
                local_time(&h.observed_at)
            )?,
            None => writeln!(f, "== {} | Server Health ==", s.name)?,
        }
        writeln!(f, "OS: {}", s.os_type)?;
        writeln!(f, "IPs: {}", s.ip_addresses.join(", "))?;
        match self.health {
            Some(h) => write_health(f, h, "")?,
            None => writeln!(f, "{NO_HEALTH}")?,
        }
        writeln!(f, "-- Last Server Infos --")?;
        match self.history {
            HistoryState::Pending => writeln!(f, "{HISTORY_LOADING}")?,
            HistoryState::Unavailable => writeln!(f, "{HISTORY_UNAVAILABLE}")?,
            HistoryState::Ready(history) if history.is_empty() => writeln!(f, "(no history)")?,
            HistoryState::Ready(history) => {
                for h in history {
                    writeln!(f, "@ {}", local_time(&h.observed_at))?;
                    write_health(f, h, "  ")?;
                }
            }
        }
        write!(f, "[close]")
    }
}

/// Whole screen: title, tabs, active group and its open detail panel.
pub struct Frame<'a>(pub &'a Dashboard);

impl fmt::Display for Frame<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{TITLE}")?;
        writeln!(f, "{}", TabBar(self.0))?;
        writeln!(f)?;
        let Some(view) = self.0.active() else {
            return Ok(());
        };
        write!(f, "{}", GroupPanel(view))?;
        if let Some(panel) = DetailPanel::for_view(view) {
            write!(f, "\n\n{panel}")?;
        }
        Ok(())
    }
}

pub fn frame(dashboard: &Dashboard) -> String {
    Frame(dashboard).to_string()
}
