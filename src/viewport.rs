//! Visible region of the logical drawing plane.
//!
//! A [`Viewport`] pairs the on-screen surface size with the logical rectangle
//! it shows. Zooming is a pure, center-anchored transform of that pair.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ViewportError {
    #[error("zoom factor must be a positive finite number, got {0}")]
    InvalidZoomFactor(f32),
    #[error("zoom factor {0} leaves no representable viewport")]
    Saturated(f32),
}

/// Pointer coordinates relative to the top-left corner of the surface, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewportPoint {
    pub x: f32,
    pub y: f32,
}

impl ViewportPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub origin_x: f32,
    pub origin_y: f32,
    pub scale_width: f32,
    pub scale_height: f32,
}

impl Viewport {
    /// Surface of `width` x `height` pixels showing the same-sized logical rectangle at the origin.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            origin_x: 0.0,
            origin_y: 0.0,
            scale_width: width,
            scale_height: height,
        }
    }

    /// Smallest logical rectangle with the surface's aspect ratio that shows the whole content, centered on it.
    pub fn fit(width: f32, height: f32, content_width: f32, content_height: f32) -> Self {
        let width = width.max(1.0);
        let height = height.max(1.0);
        let scale = (content_width / width).max(content_height / height).max(f32::EPSILON);
        let scale_width = width * scale;
        let scale_height = height * scale;
        Self {
            width,
            height,
            origin_x: (content_width - scale_width) / 2.0,
            origin_y: (content_height - scale_height) / 2.0,
            scale_width,
            scale_height,
        }
    }

    pub fn center(&self) -> (f32, f32) {
        (
            self.origin_x + self.scale_width / 2.0,
            self.origin_y + self.scale_height / 2.0,
        )
    }

    /// `factor > 1` zooms in, `0 < factor < 1` zooms out.
    pub fn zoom(&self, factor: f32) -> Result<Self, ViewportError> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(ViewportError::InvalidZoomFactor(factor));
        }
        let (cx, cy) = self.center();
        let scale_width = self.scale_width / factor;
        let scale_height = self.scale_height / factor;
        let zoomed = Self {
            width: self.width * factor,
            height: self.height * factor,
            origin_x: cx - scale_width / 2.0,
            origin_y: cy - scale_height / 2.0,
            scale_width,
            scale_height,
        };
        if !zoomed.is_representable() {
            return Err(ViewportError::Saturated(factor));
        }
        Ok(zoomed)
    }

    /// Every field finite, surface and rectangle strictly positive.
    fn is_representable(&self) -> bool {
        let sizes = [self.width, self.height, self.scale_width, self.scale_height];
        sizes.iter().all(|v| v.is_normal() && *v > 0.0)
            && self.origin_x.is_finite()
            && self.origin_y.is_finite()
    }

    pub fn zoom_in(&self, step: f32) -> Result<Self, ViewportError> {
        self.zoom(step)
    }

    pub fn zoom_out(&self, step: f32) -> Result<Self, ViewportError> {
        if !step.is_finite() || step <= 0.0 {
            return Err(ViewportError::InvalidZoomFactor(step));
        }
        self.zoom(1.0 / step)
    }

    /// Maps a surface point to the logical plane.
    pub fn to_logical(&self, point: ViewportPoint) -> (f32, f32) {
        let sx = if self.width > 0.0 { self.scale_width / self.width } else { 0.0 };
        let sy = if self.height > 0.0 { self.scale_height / self.height } else { 0.0 };
        (self.origin_x + point.x * sx, self.origin_y + point.y * sy)
    }

    pub fn view_box(&self) -> String {
        format!(
            "{:.2} {:.2} {:.2} {:.2}",
            self.origin_x, self.origin_y, self.scale_width, self.scale_height
        )
    }
}
