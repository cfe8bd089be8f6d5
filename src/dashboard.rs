// Tab container: one ServerGroupView per configured group

use crate::view_state::{OverviewTicket, ServerGroupView};

#[derive(Debug, Clone)]
pub struct Dashboard {
    tabs: Vec<ServerGroupView>,
    active: usize,
}

impl Dashboard {
    /// Tabs in the given order; the first is active.
    pub fn new<I, S>(group_keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tabs: group_keys.into_iter().map(ServerGroupView::new).collect(),
            active: 0,
        }
    }

    pub fn tabs(&self) -> &[ServerGroupView] {
        &self.tabs
    }

    pub fn active(&self) -> Option<&ServerGroupView> {
        self.tabs.get(self.active)
    }

    pub fn active_mut(&mut self) -> Option<&mut ServerGroupView> {
        self.tabs.get_mut(self.active)
    }

    pub fn active_key(&self) -> Option<&str> {
        self.active().map(ServerGroupView::key)
    }

    pub fn group(&self, key: &str) -> Option<&ServerGroupView> {
        self.tabs.iter().find(|t| t.key() == key)
    }

    pub fn group_mut(&mut self, key: &str) -> Option<&mut ServerGroupView> {
        self.tabs.iter_mut().find(|t| t.key() == key)
    }

    pub fn select_tab(&mut self, key: &str) -> anyhow::Result<()> {
        let idx = self
            .tabs
            .iter()
            .position(|t| t.key() == key)
            .ok_or_else(|| anyhow::anyhow!("unknown group {:?}", key))?;
        self.active = idx;
        Ok(())
    }

    /// Starts an overview load on every tab (dashboard mount, or refresh).
    pub fn begin_mount(&mut self) -> Vec<(String, OverviewTicket)> {
        self.tabs
            .iter_mut()
            .map(|t| {
                let ticket = t.begin_load();
                (t.key().to_string(), ticket)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_group_is_active_by_default() {
        let d = Dashboard::new(["cloudeka", "samrat"]);
        assert_eq!(d.active_key(), Some("cloudeka"));
        assert_eq!(d.tabs().len(), 2);
    }

    #[test]
    fn select_tab_switches_and_rejects_unknown() {
        let mut d = Dashboard::new(["cloudeka", "samrat"]);
        d.select_tab("samrat").unwrap();
        assert_eq!(d.active_key(), Some("samrat"));
        let err = d.select_tab("nope").unwrap_err();
        assert!(err.to_string().contains("nope"));
        assert_eq!(d.active_key(), Some("samrat"));
    }

    #[test]
    fn mount_issues_one_ticket_per_tab() {
        let mut d = Dashboard::new(["cloudeka", "samrat"]);
        let tickets = d.begin_mount();
        let keys: Vec<_> = tickets.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["cloudeka", "samrat"]);
        assert!(d.tabs().iter().all(|t| t.is_loading()));
    }

    #[test]
    fn groups_are_independent_instances() {
        let mut d = Dashboard::new(["cloudeka", "samrat"]);
        d.group_mut("samrat").unwrap().begin_load();
        assert!(d.group("samrat").unwrap().is_loading());
        assert!(!d.group("cloudeka").unwrap().is_loading());
    }
}
