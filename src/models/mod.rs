// Domain models (wire format of the report API)

mod health;
mod server;

pub use health::{HealthSnapshot, PartitionUsage};
pub use server::{GroupOverview, ServerRecord};
