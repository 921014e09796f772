use crate::backend::interface::Backend;
use crate::library::logger::interface::Logger;
use crate::showroom::core::{Effect, Msg};
use crate::upload::intake::FileSource;
use crate::upload::preview;
use std::sync::mpsc::Sender;
use std::sync::Arc;

/// Executes background effects and reports the outcome as a `Msg`.
#[derive(Clone)]
pub struct RunEffect {
    logger: Arc<dyn Logger + Send + Sync>,
    backend: Arc<dyn Backend + Send + Sync>,
    event_sender: Sender<Msg>,
    wake: Arc<dyn Fn() + Send + Sync>,
}

impl RunEffect {
    pub fn new(
        logger: Arc<dyn Logger + Send + Sync>,
        backend: Arc<dyn Backend + Send + Sync>,
        event_sender: Sender<Msg>,
        wake: Arc<dyn Fn() + Send + Sync>,
    ) -> Self {
        Self {
            logger: logger.with_namespace("effect"),
            backend,
            event_sender,
            wake,
        }
    }

    pub fn run_effect(&self, effect: Effect) {
        let _ = self
            .logger
            .info(&format!("Running effect: {:?}", effect));

        match effect {
            Effect::FetchCatalog => {
                let catalog = self.backend.fetch_catalog();
                if let Err(e) = &catalog {
                    let _ = self.logger.error(&format!("Catalog fetch failed: {}", e));
                }
                self.send(Msg::CatalogLoadDone(catalog));
            }
            Effect::ReadFiles { files } => {
                let candidates = files.into_iter().map(FileSource::read).collect();
                self.send(Msg::FilesDropped(candidates));
            }
            Effect::DecodePreview { preview, image } => {
                let result = preview::decode(&image.bytes).map_err(|e| e.to_string());
                self.send(Msg::PreviewDecodeDone { preview, result });
            }
            Effect::Predict { job } => {
                let request = job.to_request();
                let response = self.backend.predict(&request);
                if let Err(e) = &response {
                    let _ = self.logger.error(&format!("Prediction failed: {}", e));
                }
                self.send(Msg::PredictDone(response));
            }
            // Textures live on the UI thread.
            Effect::ReleasePreview { .. } => {}
        }
    }

    fn send(&self, msg: Msg) {
        if self.event_sender.send(msg).is_err() {
            let _ = self.logger.error("UI is gone, dropping message");
            return;
        }
        (self.wake)();
    }
}
