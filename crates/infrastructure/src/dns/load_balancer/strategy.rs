use super::pool::Partition;
use hoopoe_domain::LoadBalanceType;
use std::sync::Arc;

/// Picks the server for each attempt of the forwarding loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Candidates in configured order, one pass.
    ByOrder,

    /// Rotates through the candidates via the partition cursor, cycling
    /// until the forwarding budget runs out.
    RoundRobin,
}

impl Strategy {
    /// Server for the `attempt`-th try (0-based), or `None` once a `ByOrder`
    /// pass is exhausted.
    pub fn pick<'a>(&self, partition: &'a Partition, attempt: usize) -> Option<&'a Arc<str>> {
        if partition.is_empty() {
            return None;
        }
        match self {
            Self::ByOrder => partition.servers().get(attempt),
            Self::RoundRobin => partition.servers().get(partition.advance()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::ByOrder => "ByOrder",
            Self::RoundRobin => "RoundRobin",
        }
    }
}

impl From<LoadBalanceType> for Strategy {
    fn from(lb_type: LoadBalanceType) -> Self {
        match lb_type {
            LoadBalanceType::ByOrder => Self::ByOrder,
            LoadBalanceType::RoundRobin => Self::RoundRobin,
        }
    }
}
