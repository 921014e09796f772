use crate::backend::interface::Backend;
use crate::config::Config;
use crate::library::logger::interface::Logger;
use crate::showroom::core::{init, transition, Effect, Model, Msg};
use crate::showroom::render::render;
use crate::showroom::run_effect::RunEffect;
use crate::showroom::textures::PreviewTextures;
use eframe::egui;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;

pub struct ShowroomApp {
    config: Config,
    model: Model,
    logger: Arc<dyn Logger + Send + Sync>,
    run_effect: RunEffect,
    event_receiver: Receiver<Msg>,
    textures: PreviewTextures,
}

impl ShowroomApp {
    pub fn new(
        ctx: &egui::Context,
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        backend: Arc<dyn Backend + Send + Sync>,
    ) -> Self {
        let (event_sender, event_receiver) = channel();
        let repaint_ctx = ctx.clone();
        let run_effect = RunEffect::new(
            logger.clone(),
            backend,
            event_sender,
            Arc::new(move || repaint_ctx.request_repaint()),
        );
        let (model, effects) = init();

        let mut app = Self {
            config,
            model,
            logger: logger.with_namespace("showroom"),
            run_effect,
            event_receiver,
            textures: PreviewTextures::default(),
        };
        app.execute_effects(effects);
        app
    }

    #[allow(dead_code)]
    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn dispatch(&mut self, msg: Msg) {
        let _ = self
            .logger
            .info(&format!("msg: {}", msg.to_display_string()));

        let model = std::mem::take(&mut self.model);
        let (new_model, effects) = transition(&self.config, model, msg);
        self.model = new_model;

        if !effects.is_empty() {
            let _ = self.logger.info(&format!("effects: {:?}", effects));
        }

        self.execute_effects(effects);
    }

    fn execute_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ReleasePreview { preview } => {
                    if self.textures.release(preview) {
                        let _ = self
                            .logger
                            .info(&format!("Released preview texture {}", preview));
                    }
                }
                effect => {
                    let run_effect = self.run_effect.clone();
                    std::thread::spawn(move || run_effect.run_effect(effect));
                }
            }
        }
    }

    /// Applies everything the workers have reported so far.
    pub fn drain_events(&mut self) {
        while let Ok(msg) = self.event_receiver.try_recv() {
            self.dispatch(msg);
        }
    }
}

impl eframe::App for ShowroomApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_events();

        for msg in render(ctx, &self.model, &mut self.textures) {
            self.dispatch(msg);
        }
    }
}

impl Drop for ShowroomApp {
    fn drop(&mut self) {
        let released = self.textures.release_all();
        let _ = self
            .logger
            .info(&format!("Shutting down, released {} preview textures", released));
    }
}
