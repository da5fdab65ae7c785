use axum::http::header::InvalidHeaderValue;

#[derive(Debug, thiserror::Error)]
pub enum RedirectError {
    #[error("could not embed value in interstitial script: {0}")]
    Script(#[from] serde_json::Error),
    #[error("invalid value for response header {name}: {source}")]
    Header {
        name: &'static str,
        #[source]
        source: InvalidHeaderValue,
    },
}

pub type Result<T> = std::result::Result<T, RedirectError>;
