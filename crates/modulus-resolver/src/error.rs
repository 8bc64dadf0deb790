use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolverError {
    #[error(transparent)]
    Provider(#[from] modulus_providers::ProviderError),

    #[error("feed {url} failed and --ignore-failed-sources was not set: {source}")]
    FeedFailure {
        url: String,
        #[source]
        source: modulus_providers::ProviderError,
    },

    #[error("walk cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, ResolverError>;
