//! App registry

use std::collections::HashMap;

use crate::error::RegistryError;
use crate::manifest::{AppManifest, AppType};

const TAG: &str = "app_registry";

/// Every app the runtime can start, indexed by id.
#[derive(Debug, Default)]
pub struct AppRegistry {
    manifests: Vec<&'static AppManifest>,
    by_id: HashMap<&'static str, usize>,
}

impl AppRegistry {
    /// Build a registry; ids must be non-empty and unique.
    pub fn new<I>(manifests: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = &'static AppManifest>,
    {
        let mut registry = Self::default();
        for manifest in manifests {
            registry.add(manifest)?;
        }
        Ok(registry)
    }

    /// Register one more manifest.
    pub fn add(&mut self, manifest: &'static AppManifest) -> Result<(), RegistryError> {
        if manifest.id.is_empty() {
            return Err(RegistryError::EmptyId);
        }
        if self.by_id.contains_key(manifest.id) {
            log::error!(target: TAG, "duplicate app id {}", manifest.id);
            return Err(RegistryError::DuplicateId(manifest.id.to_string()));
        }
        self.by_id.insert(manifest.id, self.manifests.len());
        self.manifests.push(manifest);
        Ok(())
    }

    pub fn find(&self, id: &str) -> Option<&'static AppManifest> {
        self.by_id.get(id).map(|&index| self.manifests[index])
    }

    /// All manifests in registration order
    pub fn manifests(&self) -> &[&'static AppManifest] {
        &self.manifests
    }

    /// Manifests of one category, in registration order
    pub fn of_type(&self, app_type: AppType) -> Vec<&'static AppManifest> {
        self.manifests
            .iter()
            .copied()
            .filter(|m| m.app_type == app_type)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.manifests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.manifests.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static LAUNCHER: AppManifest = AppManifest {
        app_type: AppType::Launcher,
        ..AppManifest::new("Launcher", "Launcher")
    };
    static SETTINGS: AppManifest = AppManifest {
        app_type: AppType::Settings,
        ..AppManifest::new("TimeDateSettings", "Time & Date")
    };
    static SETTINGS_AGAIN: AppManifest = AppManifest::new("TimeDateSettings", "Clone");
    static NAMELESS: AppManifest = AppManifest::new("", "Nameless");

    #[test]
    fn test_find() {
        let registry = AppRegistry::new([&LAUNCHER, &SETTINGS]).unwrap();
        assert_eq!(registry.find("TimeDateSettings").unwrap().name, "Time & Date");
        assert!(registry.find("Missing").is_none());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_duplicate_rejected() {
        assert_eq!(
            AppRegistry::new([&SETTINGS, &SETTINGS_AGAIN]).err(),
            Some(RegistryError::DuplicateId(String::from("TimeDateSettings")))
        );
    }

    #[test]
    fn test_empty_id_rejected() {
        assert_eq!(AppRegistry::new([&NAMELESS]).err(), Some(RegistryError::EmptyId));
    }

    #[test]
    fn test_of_type() {
        let registry = AppRegistry::new([&LAUNCHER, &SETTINGS]).unwrap();
        let settings = registry.of_type(AppType::Settings);
        assert_eq!(settings.len(), 1);
        assert_eq!(settings[0].id, "TimeDateSettings");
        assert!(registry.of_type(AppType::Boot).is_empty());
    }
}
