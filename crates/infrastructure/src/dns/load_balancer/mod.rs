pub mod forwarder;
pub mod pool;
pub mod query;
pub mod strategy;

pub use forwarder::LoadBalancedForwarder;
pub use pool::{Partition, UpstreamPool, ALL_PARTITION};
pub use strategy::Strategy;
