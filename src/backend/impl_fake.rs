use crate::backend::interface::{Backend, BackendError, PredictRequest};
use crate::catalog::Catalog;
use crate::library::logger::interface::Logger;
use base64::prelude::{Engine, BASE64_STANDARD};
use rand::Rng;
use serde_json::{json, Value};
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

/// In-process stand-in for the prediction service.
pub struct BackendFake {
    catalog: Catalog,
    latency: Duration,
    failure: Option<(u16, Option<Value>)>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl BackendFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            catalog: Catalog::new(vec![
                (
                    "object_detection".to_string(),
                    vec!["yolov8n".to_string(), "detr_resnet50".to_string()],
                ),
                (
                    "instance_segmentation".to_string(),
                    vec!["mask_rcnn".to_string()],
                ),
                ("image_classification".to_string(), vec![]),
            ]),
            latency: Duration::from_millis(500),
            failure: None,
            logger: logger.with_namespace("backend").with_namespace("fake"),
        }
    }

    #[allow(dead_code)]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Every call fails with `status` and `body`.
    #[allow(dead_code)]
    pub fn with_failure(mut self, status: u16, body: Option<Value>) -> Self {
        self.failure = Some((status, body));
        self
    }

    fn check_failure(&self) -> Result<(), BackendError> {
        match &self.failure {
            Some((status, body)) => Err(BackendError::Status {
                status: *status,
                body: body.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl Backend for BackendFake {
    fn fetch_catalog(&self) -> Result<Catalog, BackendError> {
        self.logger.info("Fetching catalog...").ok();
        std::thread::sleep(self.latency);
        self.check_failure()?;
        self.logger
            .info(&format!("Catalog has {} tasks", self.catalog.len()))
            .ok();
        Ok(self.catalog.clone())
    }

    fn predict(&self, request: &PredictRequest) -> Result<Value, BackendError> {
        self.logger
            .info(&format!("Predicting {}", request.to_display_string()))
            .ok();
        std::thread::sleep(self.latency);
        self.check_failure()?;

        let (width, height) = match image_dimensions(&request.image) {
            Some(dims) => dims,
            None => {
                return Err(BackendError::Status {
                    status: 400,
                    body: Some(json!({"detail": "image could not be decoded"})),
                })
            }
        };

        let labels = ["dog", "cat", "person", "car", "bicycle", "bird", "cup"];
        let mut rng = rand::rng();
        let count = rng.random_range(1..=4);

        let mut boxes = Vec::with_capacity(count);
        let mut scores = Vec::with_capacity(count);
        let mut classes = Vec::with_capacity(count);

        for _ in 0..count {
            let x1 = rng.random_range(0..width.max(2) / 2);
            let y1 = rng.random_range(0..height.max(2) / 2);
            let x2 = rng.random_range(x1 + 1..=width.max(x1 + 1));
            let y2 = rng.random_range(y1 + 1..=height.max(y1 + 1));
            boxes.push(json!([{"x": x1, "y": y1}, {"x": x2, "y": y2}]));
            scores.push(rng.random_range(0.05..1.0f64));
            classes.push(labels[rng.random_range(0..labels.len())]);
        }

        Ok(json!({
            "model": request.mdl_name,
            "task": request.cv_task,
            "classes": classes,
            "bounding_box": boxes,
            "scores": scores,
        }))
    }
}

fn image_dimensions(encoded: &str) -> Option<(u32, u32)> {
    let bytes = BASE64_STANDARD.decode(encoded).ok()?;
    image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::logger::impl_noop::LoggerNoop;
    use crate::showroom::overlay::{parse_bounding_boxes, parse_scores};

    fn png_base64(width: u32, height: u32) -> String {
        let image = image::RgbImage::new(width, height);
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        BASE64_STANDARD.encode(bytes)
    }

    fn backend() -> BackendFake {
        BackendFake::new(Arc::new(LoggerNoop)).with_latency(Duration::ZERO)
    }

    fn request(image: String) -> PredictRequest {
        PredictRequest {
            mdl_name: "yolov8n".to_string(),
            cv_task: "object_detection".to_string(),
            image,
            metadata: String::new(),
        }
    }

    #[test]
    fn catalog_lists_tasks() {
        let catalog = backend().fetch_catalog().unwrap();
        assert_eq!(catalog.first_task(), Some("object_detection"));
        assert_eq!(catalog.default_model("image_classification"), "");
    }

    #[test]
    fn boxes_fit_inside_the_image() {
        let response = backend().predict(&request(png_base64(64, 32))).unwrap();

        let boxes = parse_bounding_boxes(&response);
        let scores = parse_scores(&response);

        assert!(!boxes.is_empty());
        assert_eq!(boxes.len(), scores.len());
        for b in boxes {
            assert!(b.x1 < b.x2 && b.x2 <= 64.0);
            assert!(b.y1 < b.y2 && b.y2 <= 32.0);
        }
    }

    #[test]
    fn undecodable_image_is_a_client_error() {
        let err = backend()
            .predict(&request("bm90IGFuIGltYWdl".to_string()))
            .unwrap_err();

        assert_eq!(err.to_string(), "Request failed with status code 400");
        assert!(err.body().is_some());
    }

    #[test]
    fn scripted_failure() {
        let err = backend()
            .with_failure(503, None)
            .fetch_catalog()
            .unwrap_err();
        assert_eq!(err.to_string(), "Request failed with status code 503");
    }
}
