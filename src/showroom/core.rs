use crate::backend::interface::{BackendError, PredictRequest};
use crate::catalog::Catalog;
use crate::config::Config;
use crate::showroom::overlay::{parse_bounding_boxes, parse_scores, BoxRecord};
use crate::upload::encode::{image_payload, metadata_payload};
use crate::upload::intake::{
    classify, CandidateFile, DropEvent, FileSource, ImageFile, MetadataFile,
};
use crate::upload::preview::DecodedImage;
use serde_json::Value;

pub type PreviewId = u64;

#[derive(Debug, Clone, PartialEq)]
pub enum PreviewState {
    Decoding,
    Ready(DecodedImage),
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub id: PreviewId,
    pub state: PreviewState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub image: ImageFile,
    pub preview: Preview,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    pub catalog: Catalog,
    pub selected_task: String,
    pub selected_model: String,
    pub upload: Option<Upload>,
    pub metadata: Option<MetadataFile>,
    pub result: Option<Value>,
    pub boxes: Vec<BoxRecord>,
    pub scores: Vec<Option<f64>>,
    pub logs: String,
    pub loading: bool,
    pub next_preview_id: PreviewId,
}

impl Model {
    fn append_log(&mut self, line: &str) {
        self.logs.push_str(line);
        self.logs.push('\n');
    }

    #[allow(dead_code)]
    pub fn log_lines(&self) -> Vec<&str> {
        self.logs.lines().collect()
    }

    pub fn preview_id(&self) -> Option<PreviewId> {
        self.upload.as_ref().map(|upload| upload.preview.id)
    }
}

/// Everything a prediction needs. Encoding into the wire body is left to the
/// worker that sends it.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictJob {
    pub mdl_name: String,
    pub cv_task: String,
    pub image: ImageFile,
    pub metadata: Option<MetadataFile>,
}

impl PredictJob {
    pub fn to_request(&self) -> PredictRequest {
        PredictRequest {
            mdl_name: self.mdl_name.clone(),
            cv_task: self.cv_task.clone(),
            image: image_payload(&self.image),
            metadata: metadata_payload(self.metadata.as_ref()),
        }
    }
}

#[derive(Debug)]
pub enum Msg {
    CatalogLoadDone(Result<Catalog, BackendError>),
    TaskSelected(String),
    ModelSelected(String),
    FilesOffered(Vec<FileSource>),
    FilesDropped(Vec<CandidateFile>),
    PreviewDecodeDone {
        preview: PreviewId,
        result: Result<DecodedImage, String>,
    },
    MetadataPicked(MetadataFile),
    MetadataPickFailed {
        name: String,
        message: String,
    },
    SubmitClicked,
    PredictDone(Result<Value, BackendError>),
}

impl Msg {
    pub fn to_display_string(&self) -> String {
        match self {
            Msg::PredictDone(Ok(_)) => "PredictDone(Ok(..))".to_string(),
            msg => format!("{:?}", msg),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    FetchCatalog,
    ReadFiles {
        files: Vec<FileSource>,
    },
    DecodePreview {
        preview: PreviewId,
        image: ImageFile,
    },
    ReleasePreview {
        preview: PreviewId,
    },
    Predict {
        job: PredictJob,
    },
}

pub fn init() -> (Model, Vec<Effect>) {
    (Model::default(), vec![Effect::FetchCatalog])
}

pub fn transition(config: &Config, model: Model, msg: Msg) -> (Model, Vec<Effect>) {
    match msg {
        Msg::CatalogLoadDone(result) => catalog_loaded(model, result),
        Msg::TaskSelected(task) => (select_task(model, task), vec![]),
        Msg::ModelSelected(selected_model) => (
            Model {
                selected_model,
                ..model
            },
            vec![],
        ),
        Msg::FilesOffered(files) if files.is_empty() => (model, vec![]),
        Msg::FilesOffered(files) => (model, vec![Effect::ReadFiles { files }]),
        Msg::FilesDropped(candidates) => {
            let event = classify(candidates, &config.accepted_image_types);
            apply_drop(model, event)
        }
        Msg::PreviewDecodeDone { preview, result } => (preview_decoded(model, preview, result), vec![]),
        Msg::MetadataPicked(file) => {
            let mut model = model;
            model.append_log(&format!("Metadata file \"{}\" selected.", file.name));
            model.metadata = Some(file);
            (model, vec![])
        }
        Msg::MetadataPickFailed { name, message } => {
            let mut model = model;
            model.append_log(&format!("Could not read \"{}\": {}", name, message));
            (model, vec![])
        }
        Msg::SubmitClicked => submit(model),
        Msg::PredictDone(result) => (prediction_done(model, result), vec![]),
    }
}

fn catalog_loaded(mut model: Model, result: Result<Catalog, BackendError>) -> (Model, Vec<Effect>) {
    match result {
        Ok(catalog) => {
            if let Some(first) = catalog.first_task() {
                model.selected_task = first.to_string();
                model.selected_model = catalog.default_model(first);
            }
            model.catalog = catalog;
        }
        Err(e) => model.append_log(&format!("Error fetching models: {}", e)),
    }
    (model, vec![])
}

/// The model is recomputed only for tasks the catalog knows.
fn select_task(mut model: Model, task: String) -> Model {
    if model.catalog.contains_task(&task) {
        model.selected_model = model.catalog.default_model(&task);
    }
    model.selected_task = task;
    model
}

pub fn apply_drop(mut model: Model, event: DropEvent) -> (Model, Vec<Effect>) {
    for rejection in &event.rejected {
        for reason in &rejection.reasons {
            model.append_log(&format!("Skipped \"{}\" because {}", rejection.name, reason));
        }
    }

    // Only the first accepted file is used.
    let Some(image) = event.accepted.into_iter().next() else {
        return (model, vec![]);
    };

    model.append_log(&format!("Accepted \"{}\"", image.name));

    let mut effects = vec![];
    if let Some(previous) = model.preview_id() {
        effects.push(Effect::ReleasePreview { preview: previous });
    }

    let preview = model.next_preview_id;
    model.next_preview_id += 1;
    effects.push(Effect::DecodePreview {
        preview,
        image: image.clone(),
    });
    model.upload = Some(Upload {
        image,
        preview: Preview {
            id: preview,
            state: PreviewState::Decoding,
        },
    });

    (model, effects)
}

fn preview_decoded(
    mut model: Model,
    preview: PreviewId,
    result: Result<DecodedImage, String>,
) -> Model {
    let Some(upload) = model.upload.as_mut().filter(|u| u.preview.id == preview) else {
        return model;
    };

    match result {
        Ok(decoded) => upload.preview.state = PreviewState::Ready(decoded),
        Err(message) => {
            upload.preview.state = PreviewState::Failed;
            let line = format!("Could not preview \"{}\": {}", upload.image.name, message);
            model.append_log(&line);
        }
    }
    model
}

fn submit(mut model: Model) -> (Model, Vec<Effect>) {
    if model.loading {
        return (model, vec![]);
    }

    let missing = if model.upload.is_none() {
        Some("Please upload an image.")
    } else if model.selected_task.is_empty() {
        Some("Please select a task.")
    } else if model.selected_model.is_empty() {
        Some("Please select a model.")
    } else {
        None
    };
    if let Some(line) = missing {
        model.append_log(line);
        return (model, vec![]);
    }

    let Some(upload) = &model.upload else {
        return (model, vec![]);
    };
    let job = PredictJob {
        mdl_name: model.selected_model.clone(),
        cv_task: model.selected_task.clone(),
        image: upload.image.clone(),
        metadata: model.metadata.clone(),
    };

    model.loading = true;
    model.logs.clear();
    model.result = None;
    model.boxes.clear();
    model.scores.clear();
    model.append_log("Sending prediction request...");

    (model, vec![Effect::Predict { job }])
}

fn prediction_done(mut model: Model, result: Result<Value, BackendError>) -> Model {
    model.loading = false;

    match result {
        Ok(response) => {
            model.boxes = parse_bounding_boxes(&response);
            model.scores = parse_scores(&response);
            model.result = Some(response);
            model.append_log("Prediction successful.");
        }
        Err(e) => {
            model.append_log(&format!("Error: {}", e));
            if let Some(body) = e.body() {
                model.append_log(&body.to_string());
            }
        }
    }
    model
}
