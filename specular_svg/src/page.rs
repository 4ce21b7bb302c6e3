use specular::Float;

/// A physical sheet with a plotting margin, and the pixel density the SVG
/// is rendered at.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Page {
    pub width_mm: Float,
    pub height_mm: Float,
    pub margin_mm: Float,
    pub px_per_mm: Float,
}

impl Page {
    /// Screen-preview density.
    pub const PREVIEW_PX_PER_MM: Float = 2.0;
    /// Export density, 96 DPI.
    pub const EXPORT_PX_PER_MM: Float = 3.7795;

    /// A3 landscape at preview density.
    #[must_use]
    pub fn a3_preview() -> Self {
        Self {
            width_mm: 420.0,
            height_mm: 297.0,
            margin_mm: 15.0,
            px_per_mm: Self::PREVIEW_PX_PER_MM,
        }
    }

    /// A3 landscape at export density.
    #[must_use]
    pub fn a3_export() -> Self {
        Self {
            px_per_mm: Self::EXPORT_PX_PER_MM,
            ..Self::a3_preview()
        }
    }

    #[inline]
    #[must_use]
    pub fn width_px(&self) -> Float {
        self.width_mm * self.px_per_mm
    }

    #[inline]
    #[must_use]
    pub fn height_px(&self) -> Float {
        self.height_mm * self.px_per_mm
    }

    #[inline]
    #[must_use]
    pub fn margin_px(&self) -> Float {
        self.margin_mm * self.px_per_mm
    }

    /// Drawable width inside the margins, in pixels.
    #[inline]
    #[must_use]
    pub fn inner_width_px(&self) -> Float {
        self.width_px() - 2.0 * self.margin_px()
    }

    /// Drawable height inside the margins, in pixels.
    #[inline]
    #[must_use]
    pub fn inner_height_px(&self) -> Float {
        self.height_px() - 2.0 * self.margin_px()
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::a3_export()
    }
}
