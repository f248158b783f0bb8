//! Text run output records.

use serde::{Deserialize, Serialize};

use crate::utils::{Point, Rect};

/// A single positioned character emitted by the run builder.
///
/// `x`/`y` is the device-space origin of the glyph; `width` already carries
/// the horizontal scaling factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialObject {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub content: String,
}

impl SpatialObject {
    pub fn new(origin: Point, width: f64, height: f64, content: impl Into<String>) -> Self {
        let (x, y) = origin;
        Self {
            x,
            y,
            width,
            height,
            content: content.into(),
        }
    }

    pub const fn origin(&self) -> Point {
        (self.x, self.y)
    }

    /// Bounding box `(x0, y0, x1, y1)` spanned from the origin.
    pub fn bbox(&self) -> Rect {
        (self.x, self.y, self.x + self.width, self.y + self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox() {
        let run = SpatialObject::new((10.0, 20.0), 5.0, 12.0, 'g');
        assert_eq!(run.content, "g");
        assert_eq!(run.bbox(), (10.0, 20.0, 15.0, 32.0));
    }

    #[test]
    fn test_json_field_names() {
        let run = SpatialObject::new((72.0, 700.0), 0.0, 0.0, "H");
        let value = serde_json::to_value(&run).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"x": 72.0, "y": 700.0, "width": 0.0, "height": 0.0, "content": "H"})
        );
        let back: SpatialObject = serde_json::from_value(value).unwrap();
        assert_eq!(back, run);
    }
}
