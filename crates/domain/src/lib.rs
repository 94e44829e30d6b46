//! Hoopoe Domain Layer
pub mod config;
pub mod dns_query;
pub mod errors;
pub mod query_log;
pub mod region;
pub mod upstream_server;

pub use config::{CliOverrides, Config, LoadBalanceType};
pub use dns_query::{EngineQuery, Query, QueryResult, RequestMetadata, PTR_RECORD_TYPE};
pub use errors::DomainError;
pub use query_log::{AccessLogEntry, AccessStatus};
pub use region::{Region, RegionDefinition, RegionMap, RegionsFile};
pub use upstream_server::{UpstreamServer, REGION_ANNOTATION};
