use hoopoe_domain::{DomainError, RegionMap, UpstreamServer};
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::info;

/// Partition holding every configured server.
pub const ALL_PARTITION: &str = "all";

/// Candidate list for one region, with its own rotation cursor.
#[derive(Debug, Default)]
pub struct Partition {
    servers: Vec<Arc<str>>,
    cursor: AtomicUsize,
}

impl Partition {
    fn push(&mut self, server: Arc<str>) {
        self.servers.push(server);
    }

    pub fn servers(&self) -> &[Arc<str>] {
        &self.servers
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    /// Index for the next round-robin pick. Starts at 0 and wraps at `len`.
    pub fn advance(&self) -> usize {
        let len = self.servers.len();
        if len == 0 {
            return 0;
        }
        self.cursor
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |c| Some((c + 1) % len))
            .unwrap_or_else(|c| c)
            % len
    }
}

/// Upstream servers partitioned by region affinity.
///
/// Built once at startup and read-only afterwards; only the per-partition
/// cursors change while serving.
#[derive(Debug)]
pub struct UpstreamPool {
    all: Partition,
    regions: HashMap<String, Partition>,
}

impl UpstreamPool {
    pub fn new(servers: &[UpstreamServer]) -> Result<Self, DomainError> {
        if servers.is_empty() {
            return Err(DomainError::NoUpstreamServers);
        }

        let mut all = Partition::default();
        let mut regions: HashMap<String, Partition> = HashMap::new();
        for server in servers {
            let address: Arc<str> = Arc::from(server.address.trim());
            all.push(Arc::clone(&address));

            if let Some(region) = server.region() {
                regions.entry(region.to_string()).or_default().push(address);
            }
        }

        info!(partition = ALL_PARTITION, servers = all.len(), "Upstream partition ready");
        for (name, partition) in &regions {
            info!(partition = %name, servers = partition.len(), "Upstream partition ready");
        }

        Ok(Self { all, regions })
    }

    /// Candidates for a client in `region`; `"all"` when the region has no
    /// servers of its own or the client is unclassified.
    pub fn select(&self, region: &str) -> &Partition {
        self.regions
            .get(region)
            .filter(|p| !p.is_empty())
            .unwrap_or(&self.all)
    }

    /// Candidates for a client address, classified through `regions`.
    pub fn select_for(&self, regions: &RegionMap, client_ip: IpAddr) -> &Partition {
        self.select(regions.resolve_addr(client_ip).unwrap_or(""))
    }

    pub fn all(&self) -> &Partition {
        &self.all
    }

    pub fn region_names(&self) -> impl Iterator<Item = &str> {
        self.regions.keys().map(String::as_str)
    }
}
