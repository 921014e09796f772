use crate::upload::intake::{ImageFile, MetadataFile};
use base64::prelude::{Engine, BASE64_STANDARD};

/// Plain base64 of the image bytes, without a `data:` URL header.
pub fn image_payload(image: &ImageFile) -> String {
    BASE64_STANDARD.encode(&image.bytes)
}

/// Metadata is sent as text, untouched. Absent metadata is the empty string.
pub fn metadata_payload(metadata: Option<&MetadataFile>) -> String {
    match metadata {
        Some(file) => String::from_utf8_lossy(&file.bytes).into_owned(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn image_payload_has_no_header() {
        let image = ImageFile {
            name: "dot.png".to_string(),
            mime: "image/png",
            bytes: Arc::from(&[0x89u8, b'P', b'N', b'G', 1, 2, 3][..]),
        };

        let payload = image_payload(&image);

        assert!(!payload.starts_with("data:"));
        assert!(!payload.contains(','));
        assert_eq!(payload, "iVBORwECAw==");
        assert_eq!(BASE64_STANDARD.decode(&payload).unwrap(), image.bytes.to_vec());
    }

    #[test]
    fn empty_image_encodes_to_empty_string() {
        let image = ImageFile {
            name: "empty.gif".to_string(),
            mime: "image/gif",
            bytes: Arc::from(Vec::new()),
        };
        assert_eq!(image_payload(&image), "");
    }

    #[test]
    fn metadata_is_sent_verbatim() {
        let text = "{\n  \"camera\": \"front\", \"note\": \"caf\u{e9}\"\n}";
        let metadata = MetadataFile {
            name: "meta.json".to_string(),
            bytes: Arc::from(text.as_bytes()),
        };

        assert_eq!(metadata_payload(Some(&metadata)), text);
    }

    #[test]
    fn absent_metadata_is_empty() {
        assert_eq!(metadata_payload(None), "");
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let metadata = MetadataFile {
            name: "meta.json".to_string(),
            bytes: Arc::from(&[b'{', 0xff, b'}'][..]),
        };
        assert_eq!(metadata_payload(Some(&metadata)), "{\u{fffd}}");
    }
}
