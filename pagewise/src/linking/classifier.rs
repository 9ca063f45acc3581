//! Link classification: mapping URL strings to link types.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

use crate::errors::ClassificationError;

/// Semantic type of a link for a given service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkType {
    /// Not recognised by this service.
    #[default]
    None,
    /// A single stream.
    Stream,
    /// A channel.
    Channel,
    /// A playlist.
    Playlist,
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Stream => write!(f, "stream"),
            Self::Channel => write!(f, "channel"),
            Self::Playlist => write!(f, "playlist"),
        }
    }
}

/// Classifies URLs against one service's URL grammar.
///
/// Implementations must be pure: no network access, deterministic, and
/// malformed input classifies as [`LinkType::None`] instead of failing.
#[cfg_attr(test, mockall::automock)]
pub trait LinkClassifier: Send + Sync {
    /// Classifies a URL.
    fn classify(&self, url: &str) -> Result<LinkType, ClassificationError>;
}

/// A closure-based classifier.
pub struct FnClassifier<F>
where
    F: Fn(&str) -> Result<LinkType, ClassificationError> + Send + Sync,
{
    func: F,
}

impl<F> FnClassifier<F>
where
    F: Fn(&str) -> Result<LinkType, ClassificationError> + Send + Sync,
{
    /// Creates a new closure-based classifier.
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> fmt::Debug for FnClassifier<F>
where
    F: Fn(&str) -> Result<LinkType, ClassificationError> + Send + Sync,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnClassifier").finish_non_exhaustive()
    }
}

impl<F> LinkClassifier for FnClassifier<F>
where
    F: Fn(&str) -> Result<LinkType, ClassificationError> + Send + Sync,
{
    fn classify(&self, url: &str) -> Result<LinkType, ClassificationError> {
        (self.func)(url)
    }
}

/// Host allow-list plus ordered regex rules per link type.
///
/// Rules are matched against the URL's path and query (`/watch?v=...`).
/// Unparseable URLs, non-http(s) schemes and foreign hosts classify as
/// [`LinkType::None`]. A URL matched by rules of two different link types
/// is reported as [`ClassificationError::Ambiguous`].
#[derive(Debug, Clone, Default)]
pub struct PatternClassifier {
    hosts: Vec<String>,
    rules: Vec<(LinkType, Regex)>,
}

impl PatternClassifier {
    /// Creates an empty classifier. It recognises nothing until hosts and
    /// rules are added.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an accepted host. Subdomains of the host are accepted too.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.hosts.push(host.into().to_ascii_lowercase());
        self
    }

    /// Adds a compiled rule.
    #[must_use]
    pub fn with_rule(mut self, link_type: LinkType, pattern: Regex) -> Self {
        self.rules.push((link_type, pattern));
        self
    }

    /// Compiles and adds a rule.
    pub fn with_pattern(self, link_type: LinkType, pattern: &str) -> Result<Self, regex::Error> {
        Ok(self.with_rule(link_type, Regex::new(pattern)?))
    }

    /// Accepted hosts.
    #[must_use]
    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }

    fn accepts_host(&self, host: &str) -> bool {
        let host = host.to_ascii_lowercase();
        self.hosts.iter().any(|accepted| {
            host == *accepted
                || host
                    .strip_suffix(accepted.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
    }
}

impl LinkClassifier for PatternClassifier {
    fn classify(&self, url: &str) -> Result<LinkType, ClassificationError> {
        let trimmed = url.trim();
        if trimmed.is_empty() {
            return Ok(LinkType::None);
        }

        let Ok(parsed) = Url::parse(trimmed) else {
            return Ok(LinkType::None);
        };
        if !matches!(parsed.scheme(), "http" | "https") {
            return Ok(LinkType::None);
        }
        match parsed.host_str() {
            Some(host) if self.accepts_host(host) => {}
            _ => return Ok(LinkType::None),
        }

        let target = match parsed.query() {
            Some(query) => format!("{}?{}", parsed.path(), query),
            None => parsed.path().to_string(),
        };

        let mut matched: Vec<LinkType> = Vec::new();
        for (link_type, pattern) in &self.rules {
            if !matched.contains(link_type) && pattern.is_match(&target) {
                matched.push(*link_type);
            }
        }

        match matched.as_slice() {
            [] => Ok(LinkType::None),
            [single] => Ok(*single),
            _ => Err(ClassificationError::ambiguous(trimmed, matched)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video_classifier() -> PatternClassifier {
        PatternClassifier::new()
            .with_host("youtube.com")
            .with_host("youtu.be")
            .with_pattern(LinkType::Stream, r"^/watch\?(.*&)?v=[\w-]{11}")
            .and_then(|c| c.with_pattern(LinkType::Channel, r"^/(channel/UC[\w-]{22}|user/[\w.-]+|c/[\w.-]+)/?$"))
            .and_then(|c| c.with_pattern(LinkType::Playlist, r"^/playlist\?(.*&)?list=[\w-]+"))
            .unwrap()
    }

    #[test]
    fn test_classifies_each_link_type() {
        let classifier = video_classifier();

        assert_eq!(
            classifier.classify("https://www.youtube.com/watch?v=dQw4w9WgXcQ").unwrap(),
            LinkType::Stream
        );
        assert_eq!(
            classifier
                .classify("https://www.youtube.com/channel/UC-lHJZR3Gqxm24_Vd_AJ5Yw")
                .unwrap(),
            LinkType::Channel
        );
        assert_eq!(
            classifier
                .classify("https://m.youtube.com/playlist?list=PL123abc")
                .unwrap(),
            LinkType::Playlist
        );
    }

    #[test]
    fn test_malformed_and_foreign_urls_are_none() {
        let classifier = video_classifier();

        for url in [
            "",
            "   ",
            "not a url",
            "ftp://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://www.notyoutube.com/watch?v=dQw4w9WgXcQ",
            "https://evil.com/www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://www.youtube.com/feed/trending",
        ] {
            assert_eq!(classifier.classify(url).unwrap(), LinkType::None, "{url}");
        }
    }

    #[test]
    fn test_overlapping_rules_are_ambiguous() {
        let classifier = PatternClassifier::new()
            .with_host("example.com")
            .with_pattern(LinkType::Stream, r"^/media/")
            .and_then(|c| c.with_pattern(LinkType::Playlist, r"^/media/list"))
            .unwrap();

        let err = classifier.classify("https://example.com/media/list/1").unwrap_err();
        assert_eq!(
            err,
            ClassificationError::ambiguous(
                "https://example.com/media/list/1",
                vec![LinkType::Stream, LinkType::Playlist]
            )
        );

        assert_eq!(
            classifier.classify("https://example.com/media/42").unwrap(),
            LinkType::Stream
        );
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        assert!(PatternClassifier::new()
            .with_pattern(LinkType::Stream, "(unclosed")
            .is_err());
    }

    #[test]
    fn test_fn_classifier() {
        let classifier = FnClassifier::new(|url: &str| {
            if url.contains("/v/") {
                Ok(LinkType::Stream)
            } else {
                Err(ClassificationError::decomposition(url, "no segment"))
            }
        });

        assert_eq!(classifier.classify("https://a/v/1").unwrap(), LinkType::Stream);
        assert!(classifier.classify("https://a/x").is_err());
    }
}
