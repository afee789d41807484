use crate::plugin::DomainPlugin;
use polylint_types::{Domain, DomainInfo};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Duplicate lint domain plugin registration: `{0}`")]
    Duplicate(Domain),
}

/// Domain -> plugin map, built once at startup and read-only afterwards.
pub struct DomainRegistry {
    plugins: BTreeMap<Domain, Box<dyn DomainPlugin>>,
}

impl DomainRegistry {
    pub fn new(plugins: Vec<Box<dyn DomainPlugin>>) -> Result<Self, RegistryError> {
        let mut map: BTreeMap<Domain, Box<dyn DomainPlugin>> = BTreeMap::new();
        for plugin in plugins {
            let domain = plugin.domain();
            if map.contains_key(&domain) {
                return Err(RegistryError::Duplicate(domain));
            }
            map.insert(domain, plugin);
        }
        Ok(Self { plugins: map })
    }

    pub fn get(&self, domain: Domain) -> Option<&dyn DomainPlugin> {
        self.plugins.get(&domain).map(|p| p.as_ref())
    }

    pub fn description(&self, domain: Domain) -> String {
        self.get(domain)
            .map(|p| p.description().to_string())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Registered domains in canonical order.
    pub fn list(&self) -> Vec<DomainInfo> {
        self.plugins
            .values()
            .map(|p| DomainInfo {
                domain: p.domain(),
                description: p.description().to_string(),
                target_flag: p.domain().target_flag().to_string(),
            })
            .collect()
    }
}

impl std::fmt::Debug for DomainRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomainRegistry")
            .field("domains", &self.plugins.keys().collect::<Vec<_>>())
            .finish()
    }
}
