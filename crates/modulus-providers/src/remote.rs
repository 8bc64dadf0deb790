//! Remote-feed provider (spec §4.2): an HTTP(S) source with a caching
//! layer keyed by feed URL + package identity, supporting "no-cache" and
//! "ignore-failed-sources" modes.
//!
//! The wire format itself isn't specified upstream, so this module defines
//! the minimal flat JSON index the feed-probing steps need (spec §4.2):
//! `GET <feed>/<name>/index.json` returning every known version, its
//! dependencies, and its archive URL.

use crate::candidate::{Candidate, ProviderKind, ProviderToken};
use crate::error::{ProviderError, Result};
use dashmap::DashMap;
use modulus_core::{LibraryRange, Version};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use url::Url;

#[derive(Debug, Clone, Deserialize)]
struct FeedIndex {
    versions: Vec<FeedVersionEntry>,
}

#[derive(Debug, Clone, Deserialize)]
struct FeedVersionEntry {
    version: String,
    #[serde(default)]
    dependencies: BTreeMap<String, String>,
    archive: String,
}

/// An HTTP(S) package feed, with per-`(feed, name)` index caching.
#[derive(Debug, Clone)]
pub struct RemoteFeedProvider {
    feed_url: Arc<Url>,
    client: reqwest::Client,
    no_cache: bool,
    ignore_failed: bool,
    index_cache: Arc<DashMap<String, Vec<Candidate>>>,
}

impl RemoteFeedProvider {
    #[must_use]
    pub fn new(feed_url: Url, client: reqwest::Client, no_cache: bool, ignore_failed: bool) -> Self {
        Self {
            feed_url: Arc::new(feed_url),
            client,
            no_cache,
            ignore_failed,
            index_cache: Arc::new(DashMap::new()),
        }
    }

    #[must_use]
    pub fn feed_url(&self) -> &Url {
        &self.feed_url
    }

    async fn fetch_index(&self, name: &str) -> Result<Vec<Candidate>> {
        if !self.no_cache {
            if let Some(cached) = self.index_cache.get(name) {
                return Ok(cached.clone());
            }
        }

        let joined = format!("{name}/index.json");
        let index_url = self
            .feed_url
            .join(&joined)
            .map_err(|_| ProviderError::InvalidFeedUrl { base: self.feed_url.to_string(), joined })?;

        let response = self
            .client
            .get(index_url.clone())
            .send()
            .await
            .map_err(|source| ProviderError::RemoteFeed { url: index_url.to_string(), source })?;

        let index: FeedIndex = response
            .json()
            .await
            .map_err(|source| ProviderError::RemoteFeed { url: index_url.to_string(), source })?;

        let mut candidates = Vec::new();
        for entry in index.versions {
            let Ok(version) = Version::parse(&entry.version) else { continue };
            let Ok(archive_url) = Url::parse(&entry.archive) else { continue };
            let dependencies = entry
                .dependencies
                .into_iter()
                .map(|(dep_name, range)| {
                    modulus_core::VersionRange::parse(&range)
                        .map(|r| LibraryRange::new(dep_name, r))
                        .unwrap_or_else(|_| LibraryRange::new("", modulus_core::VersionRange::any()))
                })
                .collect();

            candidates.push(Candidate {
                name: name.to_string(),
                version,
                kind: ProviderKind::Remote,
                token: ProviderToken::Remote { feed_url: self.feed_url.clone(), dependencies, archive_url },
            });
        }

        self.index_cache.insert(name.to_string(), candidates.clone());
        Ok(candidates)
    }

    /// All versions this feed has for `range.name` that satisfy `range`. A
    /// failed request is a plain `Err` to the caller, who decides whether
    /// to warn (ignore-failed-sources) or abort based on
    /// [`Self::ignore_failed_sources`].
    pub async fn find_library_range(&self, range: &LibraryRange) -> Result<Vec<Candidate>> {
        let all = self.fetch_index(&range.name).await?;
        Ok(all.into_iter().filter(|c| range.range.satisfies(&c.version)).collect())
    }

    #[must_use]
    pub fn get_dependencies(token: &ProviderToken) -> Vec<LibraryRange> {
        match token {
            ProviderToken::Remote { dependencies, .. } => dependencies.clone(),
            _ => Vec::new(),
        }
    }

    /// Download a remote candidate's archive bytes.
    pub async fn materialise(&self, token: &ProviderToken) -> Result<modulus_fetch::Downloaded> {
        let ProviderToken::Remote { archive_url, .. } = token else {
            return Err(ProviderError::WrongProviderToken);
        };
        modulus_fetch::download(&self.client, archive_url)
            .await
            .map_err(|source| ProviderError::Fetch { name: archive_url.to_string(), version: String::new(), source })
    }

    #[must_use]
    pub fn ignore_failed_sources(&self) -> bool {
        self.ignore_failed
    }
}
