// Shared test helpers

#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use serverdash::error::FetchError;
use serverdash::fetcher::Fetcher;
use serverdash::models::*;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

pub fn server(id: i64) -> ServerRecord {
    ServerRecord {
        id,
        name: format!("srv-{id}"),
        ip_addresses: vec![format!("10.0.0.{id}")],
        os_type: "Ubuntu".into(),
    }
}

pub fn snapshot(server_id: i64, secs: i64, cpu: f64) -> HealthSnapshot {
    HealthSnapshot {
        server_id,
        observed_at: Utc.timestamp_opt(secs, 0).unwrap(),
        cpu_usage_percent: cpu,
        ram_usage_percent: 50.0,
        partitions: vec![PartitionUsage {
            name: "/".into(),
            usage_percent: 30.0,
        }],
    }
}

pub fn overview(ids: &[i64]) -> GroupOverview {
    GroupOverview {
        servers: ids.iter().map(|&id| server(id)).collect(),
        healths: ids
            .iter()
            .map(|&id| snapshot(id, 1_700_000_000, id as f64))
            .collect(),
    }
}

/// In-memory fetcher with per-server history latency.
/// `later_overviews` is served from the second overview call for a group onwards.
#[derive(Default)]
pub struct ScriptedFetcher {
    pub overviews: HashMap<String, GroupOverview>,
    pub later_overviews: HashMap<String, GroupOverview>,
    pub overview_calls: Mutex<HashMap<String, usize>>,
    pub fail_overview: bool,
    pub history_delay: HashMap<i64, Duration>,
}

impl ScriptedFetcher {
    pub fn with_group(mut self, group: &str, ids: &[i64]) -> Self {
        self.overviews.insert(group.into(), overview(ids));
        self
    }

    pub fn then_group(mut self, group: &str, ids: &[i64]) -> Self {
        self.later_overviews.insert(group.into(), overview(ids));
        self
    }

    pub fn overview_calls(&self, group: &str) -> usize {
        self.overview_calls
            .lock()
            .unwrap()
            .get(group)
            .copied()
            .unwrap_or(0)
    }
}

impl Fetcher for ScriptedFetcher {
    async fn fetch_overview(&self, group: &str) -> Result<GroupOverview, FetchError> {
        let previous = {
            let mut calls = self.overview_calls.lock().unwrap();
            let count = calls.entry(group.to_string()).or_default();
            *count += 1;
            *count - 1
        };
        if previous > 0
            && let Some(later) = self.later_overviews.get(group)
        {
            return Ok(later.clone());
        }
        if self.fail_overview {
            return Err(FetchError::Transport {
                status: reqwest::StatusCode::BAD_GATEWAY,
            });
        }
        Ok(self.overviews.get(group).cloned().unwrap_or_default())
    }

    async fn fetch_history(&self, server_id: i64) -> Result<Vec<HealthSnapshot>, FetchError> {
        if let Some(delay) = self.history_delay.get(&server_id) {
            tokio::time::sleep(*delay).await;
        }
        Ok(vec![
            snapshot(server_id, 1_700_000_000, 1.0),
            snapshot(server_id, 1_700_003_600, 2.0),
        ])
    }
}
