use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("manifest read failed for project candidate {name}: {source}")]
    ProjectManifest {
        name: String,
        #[source]
        source: modulus_core::Error,
    },
    #[error("remote feed request to {url} failed: {source}")]
    RemoteFeed {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("remote feed response from {url} was not valid feed JSON: {source}")]
    RemoteFeedParse {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("download/extraction failed for {name} {version}: {source}")]
    Fetch {
        name: String,
        version: String,
        #[source]
        source: modulus_fetch::FetchError,
    },

    #[error("materialise called with a token that did not come from this provider")]
    WrongProviderToken,

    #[error("could not join {joined:?} onto feed url {base}")]
    InvalidFeedUrl { base: String, joined: String },
}

pub type Result<T> = std::result::Result<T, ProviderError>;
