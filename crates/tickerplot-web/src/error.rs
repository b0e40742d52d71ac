use std::net::SocketAddr;

use thiserror::Error;

/// Process-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum WebError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),

    #[error(transparent)]
    HttpClient(#[from] tickerplot_core::HttpError),
}

impl WebError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Bind { .. } => 2,
            Self::Serve(_) => 10,
            Self::HttpClient(_) => 3,
        }
    }
}
