use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::server::GenerateResponse;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Got error with details: {0}")]
    Decode(serde_json::Error),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("error generating text: {0}")]
    Remote(String),

    #[error(transparent)]
    ResponseShape(#[from] ShapeError),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Address parse error: {0}")]
    AddrParse(#[from] std::net::AddrParseError),
}

/// Ways a generation result can fail to be a JSON array.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeError {
    #[error("invalid response: no candidates found")]
    NoCandidates,

    #[error("invalid response: no content found")]
    NoContent,

    #[error("invalid JSON response")]
    InvalidJson,

    #[error("invalid response: not an array")]
    NotAnArray,
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn remote(msg: impl Into<String>) -> Self {
        Self::Remote(msg.into())
    }

    /// Only a body that fails to decode is answered with a 4xx. Everything
    /// downstream of decoding travels inside a 200 envelope.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Decode(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::OK,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(GenerateResponse::failure(&self))).into_response()
    }
}
