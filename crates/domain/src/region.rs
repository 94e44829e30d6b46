use ipnetwork::IpNetwork;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::Path;

use crate::errors::DomainError;

/// One entry of the client map file.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct RegionDefinition {
    pub region: String,
    #[serde(default)]
    pub networks: Vec<String>,
}

impl RegionDefinition {
    pub fn new(region: impl Into<String>, networks: &[&str]) -> Self {
        Self {
            region: region.into(),
            networks: networks.iter().map(|n| n.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct RegionsFile {
    #[serde(default)]
    pub regions: Vec<RegionDefinition>,
}

#[derive(Debug, Clone)]
pub struct Region {
    pub name: String,
    pub networks: Vec<IpNetwork>,
}

impl Region {
    pub fn contains(&self, ip: IpAddr) -> bool {
        self.networks.iter().any(|n| n.contains(ip))
    }

    fn overlaps(&self, other: &Region) -> bool {
        self.networks.iter().any(|a| {
            other
                .networks
                .iter()
                .any(|b| a.contains(b.network()) || b.contains(a.network()))
        })
    }
}

/// Client IP to region classifier.
///
/// Regions are pairwise disjoint once built, so at most one region
/// contains any given address.
#[derive(Debug, Clone, Default)]
pub struct RegionMap {
    regions: Vec<Region>,
}

impl RegionMap {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn build(definitions: Vec<RegionDefinition>) -> Result<Self, DomainError> {
        let mut regions: Vec<Region> = Vec::with_capacity(definitions.len());

        for def in definitions {
            let name = def.region.trim().to_string();
            if name.is_empty() {
                return Err(DomainError::RegionMapError(
                    "region with an empty name".to_string(),
                ));
            }
            if regions.iter().any(|r| r.name == name) {
                return Err(DomainError::DuplicateRegion(name));
            }

            let mut networks = Vec::with_capacity(def.networks.len());
            for cidr in &def.networks {
                let network: IpNetwork = cidr
                    .trim()
                    .parse()
                    .map_err(|e| DomainError::InvalidCidr(format!("{} ({}): {}", cidr, name, e)))?;
                networks.push(network);
            }

            let region = Region { name, networks };
            if let Some(existing) = regions.iter().find(|r| r.overlaps(&region)) {
                return Err(DomainError::RegionOverlap {
                    first: existing.name.clone(),
                    second: region.name,
                });
            }

            regions.push(region);
        }

        Ok(Self { regions })
    }

    /// Reads the client map. A missing file is not an error: every client
    /// stays unclassified.
    pub fn load(path: impl AsRef<Path>) -> Result<Option<Self>, DomainError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| DomainError::IoError(format!("{}: {}", path.display(), e)))?;

        let is_toml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("toml"));

        let file: RegionsFile = if is_toml {
            toml::from_str(&contents)
                .map_err(|e| DomainError::RegionMapError(format!("{}: {}", path.display(), e)))?
        } else {
            serde_yaml::from_str(&contents)
                .map_err(|e| DomainError::RegionMapError(format!("{}: {}", path.display(), e)))?
        };

        Self::build(file.regions).map(Some)
    }

    /// Region label for a textual IP, or `""` when unclassified.
    pub fn resolve(&self, ip: &str) -> &str {
        ip.trim()
            .parse::<IpAddr>()
            .ok()
            .and_then(|addr| self.resolve_addr(addr))
            .unwrap_or("")
    }

    pub fn resolve_addr(&self, ip: IpAddr) -> Option<&str> {
        let ip = match ip {
            IpAddr::V6(v6) => v6.to_ipv4_mapped().map(IpAddr::V4).unwrap_or(ip),
            v4 => v4,
        };
        self.regions
            .iter()
            .find(|r| r.contains(ip))
            .map(|r| r.name.as_str())
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn region_names(&self) -> impl Iterator<Item = &str> {
        self.regions.iter().map(|r| r.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
