//! Service descriptors and the service registry.

use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::classifier::{LinkClassifier, LinkType};
use crate::errors::{ClassificationError, ConfigError};

/// Identifies a backend: its id, display name and URL classifier.
#[derive(Clone)]
pub struct ServiceDescriptor {
    id: u32,
    name: String,
    classifier: Arc<dyn LinkClassifier>,
}

impl ServiceDescriptor {
    /// Creates a new service descriptor.
    pub fn new(id: u32, name: impl Into<String>, classifier: Arc<dyn LinkClassifier>) -> Self {
        Self {
            id,
            name: name.into(),
            classifier,
        }
    }

    /// The service id every produced item must carry.
    #[must_use]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The service's classifier.
    #[must_use]
    pub fn classifier(&self) -> &Arc<dyn LinkClassifier> {
        &self.classifier
    }

    /// Classifies a URL with this service's grammar.
    pub fn link_type(&self, url: &str) -> Result<LinkType, ClassificationError> {
        self.classifier.classify(url)
    }
}

impl fmt::Debug for ServiceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceDescriptor")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Registry of known services, ordered by id.
#[derive(Debug, Default)]
pub struct ServiceRegistry {
    services: RwLock<BTreeMap<u32, ServiceDescriptor>>,
}

impl ServiceRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a service. Ids must be unique.
    pub fn register(&self, service: ServiceDescriptor) -> Result<(), ConfigError> {
        let mut services = self.services.write();
        if services.contains_key(&service.id) {
            return Err(ConfigError::DuplicateService(service.id));
        }
        tracing::debug!(service_id = service.id, service = %service.name, "Registered service");
        services.insert(service.id, service);
        Ok(())
    }

    /// Looks up a service by id.
    #[must_use]
    pub fn get(&self, id: u32) -> Option<ServiceDescriptor> {
        self.services.read().get(&id).cloned()
    }

    /// Looks up a service by display name, ignoring case.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<ServiceDescriptor> {
        self.services
            .read()
            .values()
            .find(|s| s.name.eq_ignore_ascii_case(name))
            .cloned()
    }

    /// Finds the first service (by id) that recognises the URL.
    ///
    /// Classifier faults propagate instead of being skipped.
    pub fn service_for_url(&self, url: &str) -> Result<Option<ServiceDescriptor>, ClassificationError> {
        for service in self.services.read().values() {
            if service.link_type(url)? != LinkType::None {
                return Ok(Some(service.clone()));
            }
        }
        Ok(None)
    }

    /// All registered services, ordered by id.
    #[must_use]
    pub fn services(&self) -> Vec<ServiceDescriptor> {
        self.services.read().values().cloned().collect()
    }

    /// Number of registered services.
    #[must_use]
    pub fn len(&self) -> usize {
        self.services.read().len()
    }

    /// Returns true if no service is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.services.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linking::classifier::{FnClassifier, MockLinkClassifier};

    fn host_service(id: u32, name: &str, host: &'static str) -> ServiceDescriptor {
        ServiceDescriptor::new(
            id,
            name,
            Arc::new(FnClassifier::new(move |url: &str| {
                Ok(if url.contains(host) {
                    LinkType::Stream
                } else {
                    LinkType::None
                })
            })),
        )
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = ServiceRegistry::new();
        registry.register(host_service(1, "SoundCloud", "soundcloud.com")).unwrap();
        registry.register(host_service(0, "YouTube", "youtube.com")).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(1).unwrap().name(), "SoundCloud");
        assert_eq!(registry.by_name("youtube").unwrap().id(), 0);
        assert!(registry.get(9).is_none());

        let ids: Vec<u32> = registry.services().iter().map(ServiceDescriptor::id).collect();
        assert_eq!(ids, vec![0, 1]);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let registry = ServiceRegistry::new();
        registry.register(host_service(0, "A", "a.com")).unwrap();
        let err = registry.register(host_service(0, "B", "b.com")).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateService(0)));
    }

    #[test]
    fn test_service_for_url() {
        let registry = ServiceRegistry::new();
        registry.register(host_service(0, "YouTube", "youtube.com")).unwrap();
        registry.register(host_service(1, "SoundCloud", "soundcloud.com")).unwrap();

        let found = registry
            .service_for_url("https://soundcloud.com/artist/track")
            .unwrap()
            .unwrap();
        assert_eq!(found.id(), 1);
        assert!(registry.service_for_url("https://example.org").unwrap().is_none());
    }

    #[test]
    fn test_service_for_url_propagates_classifier_fault() {
        let mut classifier = MockLinkClassifier::new();
        classifier
            .expect_classify()
            .returning(|url| Err(ClassificationError::decomposition(url, "broken")));

        let registry = ServiceRegistry::new();
        registry
            .register(ServiceDescriptor::new(4, "Broken", Arc::new(classifier)))
            .unwrap();

        assert!(registry.service_for_url("https://anything").is_err());
    }
}
