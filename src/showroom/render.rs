use crate::showroom::core::{Model, Msg, PreviewState};
use crate::showroom::overlay::{display_boxes, ImageMetrics};
use crate::showroom::textures::PreviewTextures;
use crate::upload::intake::{file_name, FileSource, MetadataFile};
use eframe::egui;

const BOX_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 64, 64);
const LABEL_FONT_SIZE: f32 = 13.0;

/// Draws the whole window and returns what the user asked for this frame.
pub fn render(ctx: &egui::Context, model: &Model, textures: &mut PreviewTextures) -> Vec<Msg> {
    let mut msgs = vec![];

    let dropped: Vec<FileSource> = ctx.input(|i| {
        i.raw
            .dropped_files
            .iter()
            .filter_map(source_from_dropped)
            .collect()
    });
    if !dropped.is_empty() {
        msgs.push(Msg::FilesOffered(dropped));
    }
    let drag_active = ctx.input(|i| !i.raw.hovered_files.is_empty());

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.heading("Model Showroom");
        ui.add_space(8.0);

        ui.columns(2, |columns| {
            left_column(&mut columns[0], model, textures, drag_active, &mut msgs);
            right_column(&mut columns[1], model, &mut msgs);
        });
    });

    msgs
}

fn source_from_dropped(file: &egui::DroppedFile) -> Option<FileSource> {
    match (&file.bytes, &file.path) {
        (Some(bytes), path) => {
            let name = match path {
                Some(path) if file.name.is_empty() => file_name(path),
                _ => file.name.clone(),
            };
            Some(FileSource::Memory {
                name,
                bytes: bytes.clone(),
            })
        }
        (None, Some(path)) => Some(FileSource::Disk(path.clone())),
        (None, None) => None,
    }
}

fn left_column(
    ui: &mut egui::Ui,
    model: &Model,
    textures: &mut PreviewTextures,
    drag_active: bool,
    msgs: &mut Vec<Msg>,
) {
    let prompt = if drag_active {
        "Drop the image here ..."
    } else {
        "Drag 'n' drop an image here, or click to select one"
    };

    let drop_zone = egui::Frame::group(ui.style())
        .inner_margin(egui::Margin::same(24.0))
        .show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.vertical_centered(|ui| ui.label(prompt));
        })
        .response
        .interact(egui::Sense::click());

    if drop_zone.clicked() {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", &["jpeg", "jpg", "png", "gif"])
            .set_title("Select an image")
            .pick_file()
        {
            msgs.push(Msg::FilesOffered(vec![FileSource::Disk(path)]));
        }
    }

    let Some(upload) = &model.upload else {
        return;
    };

    ui.horizontal(|ui| {
        ui.label(egui::RichText::new("Selected Image:").strong());
        ui.label(&upload.image.name);
    });

    match &upload.preview.state {
        PreviewState::Decoding => {
            ui.spinner();
        }
        PreviewState::Failed => {
            ui.label("Preview unavailable");
        }
        PreviewState::Ready(decoded) => {
            let texture = textures.get_or_load(ui.ctx(), upload.preview.id, decoded);
            let max_width = ui.available_width();
            let response = ui.add(egui::Image::from_texture(texture).max_width(max_width));

            let metrics = ImageMetrics {
                rendered_width: response.rect.width() as f64,
                rendered_height: response.rect.height() as f64,
                natural_width: decoded.width as f64,
                natural_height: decoded.height as f64,
            };
            paint_overlay(ui, response.rect, model, metrics);
        }
    }
}

fn paint_overlay(ui: &egui::Ui, image_rect: egui::Rect, model: &Model, metrics: ImageMetrics) {
    let painter = ui.painter_at(image_rect);
    let font = egui::FontId::proportional(LABEL_FONT_SIZE);

    for display in display_boxes(&model.boxes, &model.scores, Some(metrics)) {
        let rect = egui::Rect::from_min_size(
            image_rect.min + egui::vec2(display.left as f32, display.top as f32),
            egui::vec2(display.width as f32, display.height as f32),
        );
        if !display.is_drawable() {
            continue;
        }
        painter.rect_stroke(rect, 0.0, egui::Stroke::new(2.0, BOX_COLOR));

        if let Some(label) = display.label {
            let size = ui.fonts(|f| {
                f.layout_no_wrap(label.clone(), font.clone(), egui::Color32::WHITE)
                    .size()
            });
            let label_rect = egui::Rect::from_min_size(rect.min, size + egui::vec2(4.0, 0.0));
            painter.rect_filled(label_rect, 0.0, BOX_COLOR);
            painter.text(
                label_rect.min + egui::vec2(2.0, 0.0),
                egui::Align2::LEFT_TOP,
                label,
                font.clone(),
                egui::Color32::WHITE,
            );
        }
    }
}

/// `object_detection` is shown as `OBJECT DETECTION`.
pub fn task_label(task: &str) -> String {
    task.replacen('_', " ", 1).to_uppercase()
}

/// Results are hidden while there are none, and for empty-ish payloads such as
/// `null`, `false`, `0` or `""`.
pub fn shown_result(model: &Model) -> Option<&serde_json::Value> {
    use serde_json::Value;

    model.result.as_ref().filter(|result| match result {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

fn right_column(ui: &mut egui::Ui, model: &Model, msgs: &mut Vec<Msg>) {
    ui.label("Task:");
    egui::ComboBox::from_id_source("task-select")
        .selected_text(task_label(&model.selected_task))
        .width(ui.available_width())
        .show_ui(ui, |ui| {
            if model.catalog.is_empty() {
                ui.add_enabled(false, egui::SelectableLabel::new(false, "Loading tasks..."));
            }
            for task in model.catalog.tasks() {
                if ui
                    .selectable_label(task == model.selected_task, task_label(task))
                    .clicked()
                {
                    msgs.push(Msg::TaskSelected(task.to_string()));
                }
            }
        });

    ui.add_space(8.0);
    ui.label("Model:");
    egui::ComboBox::from_id_source("model-select")
        .selected_text(model.selected_model.as_str())
        .width(ui.available_width())
        .show_ui(ui, |ui| match model.catalog.models(&model.selected_task) {
            Some([]) => {
                ui.add_enabled(
                    false,
                    egui::SelectableLabel::new(false, "No models available for this task"),
                );
            }
            Some(models) => {
                for name in models {
                    if ui
                        .selectable_label(*name == model.selected_model, name.as_str())
                        .clicked()
                    {
                        msgs.push(Msg::ModelSelected(name.clone()));
                    }
                }
            }
            None => {
                ui.add_enabled(false, egui::SelectableLabel::new(false, "Select a task first"));
            }
        });

    ui.add_space(8.0);
    ui.label("Metadata (JSON):");
    if ui.button("Choose file...").clicked() {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .set_title("Select metadata")
            .pick_file()
        {
            match MetadataFile::from_path(&path) {
                Ok(file) => msgs.push(Msg::MetadataPicked(file)),
                Err(message) => msgs.push(Msg::MetadataPickFailed {
                    name: file_name(&path),
                    message,
                }),
            }
        }
    }
    if let Some(metadata) = &model.metadata {
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("Selected Metadata:").strong());
            ui.label(&metadata.name);
        });
    }

    ui.add_space(8.0);
    let submit_text = if model.loading {
        "Processing..."
    } else {
        "Upload and Predict"
    };
    ui.horizontal(|ui| {
        if ui
            .add_enabled(!model.loading, egui::Button::new(submit_text))
            .clicked()
        {
            msgs.push(Msg::SubmitClicked);
        }
        if model.loading {
            ui.spinner();
        }
    });

    ui.add_space(12.0);
    ui.heading("Logs");
    egui::ScrollArea::vertical()
        .id_source("logs")
        .max_height(200.0)
        .stick_to_bottom(true)
        .show(ui, |ui| {
            ui.monospace(&model.logs);
        });

    if let Some(result) = shown_result(model) {
        ui.add_space(12.0);
        ui.heading("Results");
        let pretty = serde_json::to_string_pretty(result).unwrap_or_else(|_| result.to_string());
        egui::ScrollArea::vertical()
            .id_source("results")
            .show(ui, |ui| {
                ui.monospace(pretty);
            });
    }
}
