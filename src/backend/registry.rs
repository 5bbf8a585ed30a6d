//! Named volume drivers.

use std::sync::Arc;

use dashmap::DashMap;

use super::fake::FakeDriver;
use super::VolumeDriver;

/// Thread-safe map from driver name to driver instance.
#[derive(Clone, Default)]
pub struct DriverRegistry {
    drivers: Arc<DashMap<String, Arc<dyn VolumeDriver>>>,
}

impl DriverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the in-memory `fake` driver.
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        registry.register(Arc::new(FakeDriver::new()));
        registry
    }

    /// Registers `driver` under its own name, replacing any previous entry.
    pub fn register(&self, driver: Arc<dyn VolumeDriver>) {
        let name = driver.name().to_string();
        tracing::debug!(driver = %name, "Registered volume driver");
        self.drivers.insert(name, driver);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn VolumeDriver>> {
        self.drivers.get(name).map(|entry| Arc::clone(entry.value()))
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.drivers.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }
}

impl std::fmt::Debug for DriverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriverRegistry")
            .field("drivers", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_include_fake_driver() {
        let registry = DriverRegistry::with_defaults();
        assert!(registry.get("fake").is_some());
        assert!(registry.get("pxd").is_none());
        assert_eq!(registry.names(), vec!["fake".to_string()]);
    }
}
