use crate::catalog::{Catalog, CatalogShapeError};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

pub const CATALOG_PATH: &str = "/api/getmodels";
pub const PREDICT_PATH: &str = "/api/predict";

/// Body of `POST /api/predict`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictRequest {
    pub mdl_name: String,
    pub cv_task: String,
    /// Base64 without a `data:` header.
    pub image: String,
    /// Raw metadata JSON text, or empty.
    pub metadata: String,
}

impl PredictRequest {
    pub fn to_display_string(&self) -> String {
        format!(
            "PredictRequest {{ mdl_name: {:?}, cv_task: {:?}, image: <{} chars>, metadata: <{} chars> }}",
            self.mdl_name,
            self.cv_task,
            self.image.len(),
            self.metadata.len()
        )
    }
}

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("Request failed with status code {status}")]
    Status { status: u16, body: Option<Value> },
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Invalid catalog: {0}")]
    Catalog(#[from] CatalogShapeError),
}

impl BackendError {
    /// Structured error payload returned by the server, if any.
    pub fn body(&self) -> Option<&Value> {
        match self {
            BackendError::Status { body, .. } => body.as_ref(),
            _ => None,
        }
    }
}

pub trait Backend: Send + Sync {
    fn fetch_catalog(&self) -> Result<Catalog, BackendError>;
    fn predict(&self, request: &PredictRequest) -> Result<Value, BackendError>;
}
