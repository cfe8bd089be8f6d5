// Health snapshot models (CPU, RAM, partitions)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartitionUsage {
    #[serde(rename = "partition")]
    pub name: String,
    #[serde(rename = "usage")]
    pub usage_percent: f64,
}

/// One timestamped measurement for a server. Percentages are kept exactly as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthSnapshot {
    pub server_id: i64,
    #[serde(rename = "serverTime", with = "server_time")]
    pub observed_at: DateTime<Utc>,
    #[serde(rename = "cpuUsage")]
    pub cpu_usage_percent: f64,
    #[serde(rename = "ramUsage")]
    pub ram_usage_percent: f64,
    #[serde(default)]
    pub partitions: Vec<PartitionUsage>,
}

/// `serverTime` is RFC 3339; zone-less timestamps are taken as UTC.
mod server_time {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&ts.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid serverTime {raw:?}")))
    }

    fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts.with_timezone(&Utc));
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(|naive| naive.and_utc())
    }
}
