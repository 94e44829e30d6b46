use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid rule #{index} \"{rule}\": {reason}")]
    InvalidRule {
        index: usize,
        rule: String,
        reason: String,
    },

    #[error("Invalid regular expression '{pattern}': {reason}")]
    InvalidRegex { pattern: String, reason: String },

    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid CIDR format: {0}")]
    InvalidCidr(String),

    #[error("Regions '{first}' and '{second}' have overlapping networks")]
    RegionOverlap { first: String, second: String },

    #[error("Region '{0}' is defined more than once")]
    DuplicateRegion(String),

    #[error("Region map error: {0}")]
    RegionMapError(String),

    #[error("Unresolved template in query name: {0}")]
    UnresolvedTemplate(String),

    #[error("Domain is blocked")]
    Blocked,

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("Query timeout")]
    QueryTimeout,

    #[error("Transport timeout connecting to {server}")]
    TransportTimeout { server: String },

    #[error("Transport connection refused by {server}")]
    TransportConnectionRefused { server: String },

    #[error("Transport connection reset by {server}")]
    TransportConnectionReset { server: String },

    #[error("Transport error talking to {server}: {message}")]
    TransportIo { server: String, message: String },

    #[error("No upstream servers configured")]
    NoUpstreamServers,

    #[error("All upstream servers are unreachable")]
    TransportAllServersUnreachable,

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl DomainError {
    /// Errors raised while talking to a single upstream; the forwarder moves
    /// on to the next candidate when it sees one of these.
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            Self::TransportTimeout { .. }
                | Self::TransportConnectionRefused { .. }
                | Self::TransportConnectionReset { .. }
                | Self::TransportIo { .. }
                | Self::InvalidDnsResponse(_)
        )
    }

    /// Per-request policy outcomes that the client sees as REFUSED.
    pub fn is_policy_block(&self) -> bool {
        matches!(
            self,
            Self::Blocked | Self::UnresolvedTemplate(_) | Self::InvalidDomainName(_)
        )
    }
}
