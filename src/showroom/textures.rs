use crate::showroom::core::PreviewId;
use crate::upload::preview::DecodedImage;
use eframe::egui;
use std::collections::HashMap;

/// GPU textures for image previews. A texture is freed when its handle is
/// dropped, so releasing means removing it from the map.
#[derive(Default)]
pub struct PreviewTextures {
    handles: HashMap<PreviewId, egui::TextureHandle>,
}

impl PreviewTextures {
    pub fn get_or_load(
        &mut self,
        ctx: &egui::Context,
        preview: PreviewId,
        image: &DecodedImage,
    ) -> egui::load::SizedTexture {
        let handle = self.handles.entry(preview).or_insert_with(|| {
            let pixels = egui::ColorImage::from_rgba_unmultiplied(
                [image.width as usize, image.height as usize],
                &image.rgba,
            );
            ctx.load_texture(
                format!("preview-{}", preview),
                pixels,
                egui::TextureOptions::LINEAR,
            )
        });
        egui::load::SizedTexture::from_handle(handle)
    }

    pub fn release(&mut self, preview: PreviewId) -> bool {
        self.handles.remove(&preview).is_some()
    }

    pub fn release_all(&mut self) -> usize {
        let count = self.handles.len();
        self.handles.clear();
        count
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}
