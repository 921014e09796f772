use crate::backend::interface::{Backend, BackendError, PredictRequest, CATALOG_PATH, PREDICT_PATH};
use crate::catalog::Catalog;
use crate::config::Config;
use crate::library::logger::interface::Logger;
use reqwest::blocking::Client;
use serde_json::Value;
use std::sync::Arc;

pub struct BackendHttp {
    client: Client,
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl BackendHttp {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Result<Self, BackendError> {
        // Requests run to completion; the UI has no way to abort them.
        let client = Client::builder().timeout(None).build()?;

        Ok(Self {
            client,
            config,
            logger: logger.with_namespace("backend").with_namespace("http"),
        })
    }
}

impl Backend for BackendHttp {
    fn fetch_catalog(&self) -> Result<Catalog, BackendError> {
        let url = self.config.endpoint(CATALOG_PATH);
        let _ = self.logger.info(&format!("GET {}", url));

        let response = self.client.get(&url).send()?;
        let status = response.status().as_u16();
        let text = response.text()?;
        let _ = self.logger.info(&format!("GET {} -> {}", url, status));

        interpret_catalog_response(status, text)
    }

    fn predict(&self, request: &PredictRequest) -> Result<Value, BackendError> {
        let url = self.config.endpoint(PREDICT_PATH);
        let _ = self
            .logger
            .info(&format!("POST {} {}", url, request.to_display_string()));

        let response = self.client.post(&url).json(request).send()?;
        let status = response.status().as_u16();
        let text = response.text()?;
        let _ = self.logger.info(&format!("POST {} -> {}", url, status));

        interpret_response(status, text)
    }
}

/// Maps a raw HTTP reply onto the result the UI works with. Bodies that are not
/// JSON are carried as a JSON string.
pub fn interpret_response(status: u16, text: String) -> Result<Value, BackendError> {
    if (200..300).contains(&status) {
        return Ok(parse_lenient(text).unwrap_or(Value::Null));
    }

    Err(status_error(status, text))
}

/// Unlike predictions, a catalog body must be JSON. An empty body is an empty
/// catalog.
pub fn interpret_catalog_response(status: u16, text: String) -> Result<Catalog, BackendError> {
    if !(200..300).contains(&status) {
        return Err(status_error(status, text));
    }
    if text.trim().is_empty() {
        return Ok(Catalog::default());
    }

    let value: Value = serde_json::from_str(&text)?;
    Ok(Catalog::from_json(&value)?)
}

fn status_error(status: u16, text: String) -> BackendError {
    BackendError::Status {
        status,
        body: parse_lenient(text),
    }
}

fn parse_lenient(text: String) -> Option<Value> {
    if text.trim().is_empty() {
        return None;
    }
    match serde_json::from_str(&text) {
        Ok(value) => Some(value),
        Err(_) => Some(Value::String(text)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_body_is_parsed() {
        let value = interpret_response(200, r#"{"label": "cat", "scores": [0.5]}"#.to_string())
            .unwrap();
        assert_eq!(value, json!({"label": "cat", "scores": [0.5]}));
    }

    #[test]
    fn success_body_that_is_not_json_is_kept_as_text() {
        let value = interpret_response(200, "ok".to_string()).unwrap();
        assert_eq!(value, json!("ok"));
    }

    #[test]
    fn empty_success_body_is_null() {
        assert_eq!(interpret_response(204, String::new()).unwrap(), Value::Null);
    }

    #[test]
    fn error_status_keeps_structured_body() {
        let err = interpret_response(500, r#"{"detail": "model crashed"}"#.to_string()).unwrap_err();

        assert_eq!(err.to_string(), "Request failed with status code 500");
        assert_eq!(err.body(), Some(&json!({"detail": "model crashed"})));
    }

    #[test]
    fn error_status_without_body() {
        let err = interpret_response(404, "  ".to_string()).unwrap_err();

        assert_eq!(err.to_string(), "Request failed with status code 404");
        assert_eq!(err.body(), None);
    }

    #[test]
    fn catalog_body_is_decoded_in_order() {
        let catalog =
            interpret_catalog_response(200, r#"{"b_task": ["m1"], "a_task": []}"#.to_string())
                .unwrap();

        assert_eq!(catalog.tasks().collect::<Vec<_>>(), vec!["b_task", "a_task"]);
    }

    #[test]
    fn catalog_body_that_is_not_json_is_a_decode_error() {
        let err = interpret_catalog_response(200, "<html>oops</html>".to_string()).unwrap_err();

        assert!(matches!(err, BackendError::Decode(_)), "{:?}", err);
        assert!(err.to_string().starts_with("Invalid response body"));
    }

    #[test]
    fn catalog_body_with_wrong_shape() {
        let err = interpret_catalog_response(200, "[1, 2]".to_string()).unwrap_err();
        assert!(matches!(err, BackendError::Catalog(_)), "{:?}", err);
    }

    #[test]
    fn empty_catalog_body_is_empty_catalog() {
        assert!(interpret_catalog_response(200, " ".to_string()).unwrap().is_empty());
    }

    #[test]
    fn catalog_error_status_keeps_body() {
        let err = interpret_catalog_response(503, r#"{"detail": "warming up"}"#.to_string())
            .unwrap_err();

        assert_eq!(err.to_string(), "Request failed with status code 503");
        assert_eq!(err.body(), Some(&json!({"detail": "warming up"})));
    }

    #[test]
    fn error_status_with_plain_text_body() {
        let err = interpret_response(502, "Bad Gateway".to_string()).unwrap_err();
        assert_eq!(err.body(), Some(&json!("Bad Gateway")));
    }
}
