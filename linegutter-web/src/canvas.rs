use crate::error::js_error;
use linegutter_core::{GutterError, Raster, Result, TextAlign};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

/// Detached `<canvas>` used as the gutter raster. It is never inserted into
/// the document.
pub struct CanvasRaster {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl CanvasRaster {
    pub fn new(document: &Document) -> Result<Self> {
        let canvas: HtmlCanvasElement = document
            .create_element("canvas")
            .map_err(js_error)?
            .dyn_into()
            .map_err(|_| GutterError::Platform("canvas is not an HtmlCanvasElement".into()))?;
        let context: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .map_err(js_error)?
            .ok_or_else(|| GutterError::Platform("no 2d context".into()))?
            .dyn_into()
            .map_err(|_| GutterError::Platform("unexpected 2d context type".into()))?;

        Ok(Self { canvas, context })
    }
}

impl Raster for CanvasRaster {
    fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn fill_background(&mut self, color: &str) {
        self.context.set_fill_style_str(color);
        self.context.fill_rect(
            0.0,
            0.0,
            self.canvas.width() as f64,
            self.canvas.height() as f64,
        );
    }

    fn set_fill_color(&mut self, color: &str) {
        self.context.set_fill_style_str(color);
    }

    fn set_font(&mut self, font: &str) {
        self.context.set_font(font);
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.context.set_text_align(align.as_str());
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> Result<()> {
        self.context.fill_text(text, x, y).map_err(js_error)
    }

    fn to_data_url(&self) -> Result<String> {
        self.canvas.to_data_url().map_err(js_error)
    }
}
