//! An HTTP mock server speaking the remote-feed wire format
//! `RemoteFeedProvider` consumes: `GET <feed>/<name>/index.json`.

use crate::fixtures::Fixtures;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A mock remote package feed.
#[derive(Debug)]
pub struct MockFeed {
    server: MockServer,
}

impl MockFeed {
    /// Start a new mock feed server.
    pub async fn start() -> Self {
        Self { server: MockServer::start().await }
    }

    /// The feed's base URL, suitable for `--source`/`RemoteFeedProvider::new`.
    #[must_use]
    pub fn feed_url(&self) -> Url {
        Url::parse(&self.server.uri()).expect("wiremock URIs are valid URLs")
    }

    /// Register a package with one or more `(version, archive-url)` entries
    /// and no dependencies.
    pub async fn register_package(&self, name: &str, versions: &[(&str, &str)]) {
        let body = Fixtures::feed_index_json(versions);
        Mock::given(method("GET"))
            .and(path(format!("/{name}/index.json")))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&self.server)
            .await;
    }

    /// Register a single version carrying dependencies, for resolver-graph
    /// tests that need a dependency edge to walk.
    pub async fn register_package_with_deps(&self, name: &str, version: &str, archive: &str, deps: &[(&str, &str)]) {
        let body = Fixtures::feed_index_with_deps_json(version, archive, deps);
        Mock::given(method("GET"))
            .and(path(format!("/{name}/index.json")))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&self.server)
            .await;
    }

    /// Register a 404 for `name`, simulating a feed that doesn't carry the
    /// package (used to exercise `ignore-failed-sources`).
    pub async fn register_missing(&self, name: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/{name}/index.json")))
            .respond_with(ResponseTemplate::new(404))
            .mount(&self.server)
            .await;
    }

    /// Serve raw bytes (an archive) at `route`, e.g. `"archives/b-1.0.0.tar.gz"`.
    pub async fn register_archive(&self, route: &str, bytes: Vec<u8>) {
        Mock::given(method("GET"))
            .and(path(format!("/{route}")))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(bytes))
            .mount(&self.server)
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn feed_url_is_a_valid_base_for_joining_index_paths() {
        let feed = MockFeed::start().await;
        let joined = feed.feed_url().join("Acme.Core/index.json").unwrap();
        assert!(joined.as_str().ends_with("/Acme.Core/index.json"));
    }

    #[tokio::test]
    async fn registered_package_responds_with_its_index() {
        let feed = MockFeed::start().await;
        feed.register_package("Acme.Core", &[("1.0.0", "https://example/a-1.0.0.zip")]).await;

        let url = feed.feed_url().join("Acme.Core/index.json").unwrap();
        let response = reqwest::get(url).await.unwrap();
        assert_eq!(response.status(), 200);
    }
}
