//! Configuration loading.
//!
//! Services are described declaratively (hosts plus URL patterns per link
//! type) and turned into [`ServiceDescriptor`]s backed by a
//! [`PatternClassifier`].

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use crate::errors::ConfigError;
use crate::linking::{LinkType, PatternClassifier, ServiceDescriptor, ServiceRegistry};
use crate::observability::TracingConfig;
use crate::validation::{ValidationConfig, ValidationEngine};

/// Declarative description of one service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service id items must carry.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Accepted hosts. Subdomains are accepted too.
    #[serde(default)]
    pub hosts: Vec<String>,
    /// Regexes matched against path and query for stream URLs.
    #[serde(default)]
    pub stream_patterns: Vec<String>,
    /// Regexes for channel URLs.
    #[serde(default)]
    pub channel_patterns: Vec<String>,
    /// Regexes for playlist URLs.
    #[serde(default)]
    pub playlist_patterns: Vec<String>,
}

impl ServiceConfig {
    /// Creates a service config with no hosts or patterns.
    #[must_use]
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            hosts: Vec::new(),
            stream_patterns: Vec::new(),
            channel_patterns: Vec::new(),
            playlist_patterns: Vec::new(),
        }
    }

    /// Adds an accepted host.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.hosts.push(host.into());
        self
    }

    /// Adds a stream pattern.
    #[must_use]
    pub fn with_stream_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.stream_patterns.push(pattern.into());
        self
    }

    /// Adds a channel pattern.
    #[must_use]
    pub fn with_channel_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.channel_patterns.push(pattern.into());
        self
    }

    /// Adds a playlist pattern.
    #[must_use]
    pub fn with_playlist_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.playlist_patterns.push(pattern.into());
        self
    }

    /// Compiles the classifier.
    pub fn classifier(&self) -> Result<PatternClassifier, ConfigError> {
        if self.hosts.is_empty() {
            return Err(ConfigError::NoHosts(self.name.clone()));
        }

        let mut classifier = self
            .hosts
            .iter()
            .fold(PatternClassifier::new(), |c, host| c.with_host(host.as_str()));

        let groups = [
            (LinkType::Stream, &self.stream_patterns),
            (LinkType::Channel, &self.channel_patterns),
            (LinkType::Playlist, &self.playlist_patterns),
        ];
        for (link_type, patterns) in groups {
            for pattern in patterns {
                classifier = classifier.with_pattern(link_type, pattern).map_err(|source| {
                    ConfigError::InvalidPattern {
                        service: self.name.clone(),
                        pattern: pattern.clone(),
                        source,
                    }
                })?;
            }
        }
        Ok(classifier)
    }

    /// Builds the service descriptor.
    pub fn build(&self) -> Result<ServiceDescriptor, ConfigError> {
        let classifier = self.classifier()?;
        Ok(ServiceDescriptor::new(self.id, &self.name, Arc::new(classifier)))
    }
}

/// Top level configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagewiseConfig {
    /// Known services.
    #[serde(default)]
    pub services: Vec<ServiceConfig>,
    /// Validation policy.
    #[serde(default)]
    pub validation: ValidationConfig,
    /// Log subscriber settings.
    #[serde(default)]
    pub tracing: TracingConfig,
}

impl PagewiseConfig {
    /// Parses a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&raw)?;
        tracing::debug!(
            path = %path.display(),
            service_count = config.services.len(),
            "Loaded config"
        );
        Ok(config)
    }

    /// Adds a service.
    #[must_use]
    pub fn with_service(mut self, service: ServiceConfig) -> Self {
        self.services.push(service);
        self
    }

    /// Sets the validation policy.
    #[must_use]
    pub fn with_validation(mut self, validation: ValidationConfig) -> Self {
        self.validation = validation;
        self
    }

    /// Builds a registry holding every configured service.
    pub fn to_registry(&self) -> Result<ServiceRegistry, ConfigError> {
        let registry = ServiceRegistry::new();
        for service in &self.services {
            registry.register(service.build()?)?;
        }
        Ok(registry)
    }

    /// Builds a validation engine with the configured policy.
    #[must_use]
    pub fn engine(&self) -> ValidationEngine {
        ValidationEngine::new(self.validation.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::ErrorTolerance;
    use crate::testing::video_service_config;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_build_service() {
        let service = video_service_config().build().unwrap();
        assert_eq!(service.id(), 0);
        assert_eq!(service.name(), "YouTube");
        assert_eq!(
            service.link_type("https://www.youtube.com/watch?v=dQw4w9WgXcQ").unwrap(),
            LinkType::Stream
        );
    }

    #[test]
    fn test_service_without_hosts() {
        let err = ServiceConfig::new(4, "Bare")
            .with_stream_pattern("^/v/")
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::NoHosts(name) if name == "Bare"));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = ServiceConfig::new(4, "Broken")
            .with_host("example.com")
            .with_playlist_pattern("(unclosed")
            .build()
            .unwrap_err();
        match err {
            ConfigError::InvalidPattern { service, pattern, .. } => {
                assert_eq!(service, "Broken");
                assert_eq!(pattern, "(unclosed");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_from_json_str_with_defaults() {
        let config = PagewiseConfig::from_json_str(
            r#"{
                "services": [
                    {"id": 1, "name": "Tube", "hosts": ["tube.example"], "stream_patterns": ["^/v/\\d+$"]}
                ],
                "validation": {"error_tolerance": {"mode": "at_most", "count": 2}}
            }"#,
        )
        .unwrap();

        assert_eq!(config.services.len(), 1);
        assert_eq!(config.validation.error_tolerance, ErrorTolerance::AtMost(2));
        assert!(config.validation.require_items);
        assert_eq!(config.tracing, TracingConfig::default());

        let registry = config.to_registry().unwrap();
        let service = registry.service_for_url("https://tube.example/v/42").unwrap();
        assert_eq!(service.map(|s| s.id()), Some(1));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let config = PagewiseConfig::default()
            .with_service(ServiceConfig::new(1, "A").with_host("a.example"))
            .with_service(ServiceConfig::new(1, "B").with_host("b.example"));
        assert!(matches!(
            config.to_registry().unwrap_err(),
            ConfigError::DuplicateService(1)
        ));
    }

    #[test]
    fn test_from_path() {
        let config = PagewiseConfig::default()
            .with_service(video_service_config())
            .with_validation(ValidationConfig::new().with_require_items(false));
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string_pretty(&config).unwrap().as_bytes())
            .unwrap();

        let loaded = PagewiseConfig::from_path(file.path()).unwrap();
        assert_eq!(loaded, config);
        assert!(!loaded.engine().config().require_items);
    }

    #[test]
    fn test_from_path_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = PagewiseConfig::from_path(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io(_)));

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{ not json").unwrap();
        assert!(matches!(
            PagewiseConfig::from_path(&bad).unwrap_err(),
            ConfigError::Parse(_)
        ));
    }
}
