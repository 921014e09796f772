use std::path::{Path, PathBuf};
use std::sync::Arc;

/// An image that passed the type check.
#[derive(Clone, PartialEq)]
pub struct ImageFile {
    pub name: String,
    pub mime: &'static str,
    pub bytes: Arc<[u8]>,
}

impl std::fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageFile")
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("bytes", &format_args!("<{} bytes>", self.bytes.len()))
            .finish()
    }
}

#[derive(Clone, PartialEq)]
pub struct MetadataFile {
    pub name: String,
    pub bytes: Arc<[u8]>,
}

impl std::fmt::Debug for MetadataFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataFile")
            .field("name", &self.name)
            .field("bytes", &format_args!("<{} bytes>", self.bytes.len()))
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RejectedFile {
    pub name: String,
    pub reasons: Vec<String>,
}

/// Outcome of one drop or pick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DropEvent {
    pub accepted: Vec<ImageFile>,
    pub rejected: Vec<RejectedFile>,
}

/// A file offered by the user before any checks.
#[derive(Clone)]
pub struct CandidateFile {
    pub name: String,
    pub bytes: Result<Arc<[u8]>, String>,
}

impl std::fmt::Debug for CandidateFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.bytes {
            Ok(bytes) => write!(f, "CandidateFile({:?}, <{} bytes>)", self.name, bytes.len()),
            Err(message) => write!(f, "CandidateFile({:?}, error: {})", self.name, message),
        }
    }
}

impl CandidateFile {
    pub fn from_bytes(name: impl Into<String>, bytes: Arc<[u8]>) -> Self {
        Self {
            name: name.into(),
            bytes: Ok(bytes),
        }
    }

    pub fn from_path(path: &Path) -> Self {
        Self {
            name: file_name(path),
            bytes: std::fs::read(path)
                .map(Arc::from)
                .map_err(|e| e.to_string()),
        }
    }
}

/// Where a dropped or picked file lives. Reading happens off the UI thread.
#[derive(Clone, PartialEq)]
pub enum FileSource {
    Memory { name: String, bytes: Arc<[u8]> },
    Disk(PathBuf),
}

impl std::fmt::Debug for FileSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileSource::Memory { name, bytes } => {
                write!(f, "Memory({:?}, <{} bytes>)", name, bytes.len())
            }
            FileSource::Disk(path) => write!(f, "Disk({:?})", path),
        }
    }
}

impl FileSource {
    pub fn read(self) -> CandidateFile {
        match self {
            FileSource::Memory { name, bytes } => CandidateFile::from_bytes(name, bytes),
            FileSource::Disk(path) => CandidateFile::from_path(&path),
        }
    }
}

impl MetadataFile {
    pub fn from_path(path: &Path) -> Result<Self, String> {
        let bytes = std::fs::read(path).map_err(|e| e.to_string())?;
        Ok(Self {
            name: file_name(path),
            bytes: Arc::from(bytes),
        })
    }
}

pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Sorts candidates into accepted images and rejections, keeping input order.
pub fn classify(candidates: Vec<CandidateFile>, accepted_types: &[&str]) -> DropEvent {
    let mut event = DropEvent::default();

    for candidate in candidates {
        let bytes = match candidate.bytes {
            Ok(bytes) => bytes,
            Err(message) => {
                event.rejected.push(RejectedFile {
                    name: candidate.name,
                    reasons: vec![format!("it could not be read ({})", message)],
                });
                continue;
            }
        };

        match detect_mime(&candidate.name, &bytes).filter(|m| accepted_types.contains(m)) {
            Some(mime) => event.accepted.push(ImageFile {
                name: candidate.name,
                mime,
                bytes,
            }),
            None => event.rejected.push(RejectedFile {
                name: candidate.name,
                reasons: vec![format!(
                    "File type must be one of {}",
                    accepted_types.join(", ")
                )],
            }),
        }
    }

    event
}

/// Sniffs the content first and falls back to the extension.
pub fn detect_mime(name: &str, bytes: &[u8]) -> Option<&'static str> {
    if let Ok(format) = image::guess_format(bytes) {
        return Some(format.to_mime_type());
    }

    let extension = Path::new(name)
        .extension()?
        .to_string_lossy()
        .to_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}
