// Server <-> health join by server id

use crate::models::HealthSnapshot;

/// First snapshot whose `server_id` matches, or `None`.
pub fn find_health(healths: &[HealthSnapshot], server_id: i64) -> Option<&HealthSnapshot> {
    healths.iter().find(|h| h.server_id == server_id)
}

/// Most recent snapshot for `server_id` by `observed_at`.
///
/// The overview batch is expected to hold one snapshot per server, in which case
/// this agrees with [`find_health`]. If the backend sends several, the newest wins;
/// on equal timestamps the earliest in the batch is kept.
pub fn latest_health(healths: &[HealthSnapshot], server_id: i64) -> Option<&HealthSnapshot> {
    healths
        .iter()
        .filter(|h| h.server_id == server_id)
        .fold(None, |best: Option<&HealthSnapshot>, h| match best {
            Some(b) if b.observed_at >= h.observed_at => Some(b),
            _ => Some(h),
        })
}
