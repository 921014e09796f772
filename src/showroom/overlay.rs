use serde_json::Value;

/// Box corners in the image's natural pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxRecord {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Sizes needed to map natural coordinates onto the widget on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageMetrics {
    pub rendered_width: f64,
    pub rendered_height: f64,
    pub natural_width: f64,
    pub natural_height: f64,
}

/// Box in rendered coordinates, relative to the image's top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub label: Option<String>,
}

impl DisplayBox {
    /// Inverted or zero-sized boxes are kept but not painted, label included.
    pub fn is_drawable(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Reads `bounding_box` from a prediction. Entries that are not a pair of
/// `{x, y}` points are skipped.
pub fn parse_bounding_boxes(response: &Value) -> Vec<BoxRecord> {
    let Some(entries) = response.get("bounding_box").and_then(Value::as_array) else {
        return vec![];
    };

    entries.iter().filter_map(parse_box).collect()
}

fn parse_box(entry: &Value) -> Option<BoxRecord> {
    match entry.as_array()?.as_slice() {
        [top_left, bottom_right] => {
            let (x1, y1) = parse_point(top_left)?;
            let (x2, y2) = parse_point(bottom_right)?;
            Some(BoxRecord { x1, y1, x2, y2 })
        }
        _ => None,
    }
}

fn parse_point(point: &Value) -> Option<(f64, f64)> {
    let point = point.as_object()?;
    Some((point.get("x")?.as_f64()?, point.get("y")?.as_f64()?))
}

/// Reads `scores`, index-aligned with the boxes. Non-numeric entries are kept
/// as `None` so later indices stay aligned.
pub fn parse_scores(response: &Value) -> Vec<Option<f64>> {
    response
        .get("scores")
        .and_then(Value::as_array)
        .map(|scores| scores.iter().map(Value::as_f64).collect())
        .unwrap_or_default()
}

pub fn format_score(score: f64) -> String {
    format!("{:.2}", score)
}

impl ImageMetrics {
    /// `None` until the image has a measurable natural size.
    pub fn scale(&self) -> Option<(f64, f64)> {
        if self.natural_width <= 0.0 || self.natural_height <= 0.0 {
            return None;
        }
        Some((
            self.rendered_width / self.natural_width,
            self.rendered_height / self.natural_height,
        ))
    }
}

pub fn to_display_box(record: &BoxRecord, scale: (f64, f64), score: Option<f64>) -> DisplayBox {
    let (scale_x, scale_y) = scale;
    DisplayBox {
        left: record.x1 * scale_x,
        top: record.y1 * scale_y,
        width: (record.x2 - record.x1) * scale_x,
        height: (record.y2 - record.y1) * scale_y,
        label: score.map(format_score),
    }
}

/// Nothing is produced while the image is not laid out yet.
pub fn display_boxes(
    boxes: &[BoxRecord],
    scores: &[Option<f64>],
    metrics: Option<ImageMetrics>,
) -> Vec<DisplayBox> {
    let Some(scale) = metrics.and_then(|m| m.scale()) else {
        return vec![];
    };

    boxes
        .iter()
        .enumerate()
        .map(|(i, record)| to_display_box(record, scale, scores.get(i).copied().flatten()))
        .collect()
}
