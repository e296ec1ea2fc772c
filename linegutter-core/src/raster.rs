use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Start,
    End,
}

impl TextAlign {
    pub fn as_str(self) -> &'static str {
        match self {
            TextAlign::Start => "start",
            TextAlign::End => "end",
        }
    }
}

/// Off-screen 2-D surface the numerals are painted on.
///
/// Coordinates and sizes are device pixels. Resizing clears the surface and
/// resets drawing state, the way a canvas does.
pub trait Raster {
    fn resize(&mut self, width: u32, height: u32);
    fn fill_background(&mut self, color: &str);
    fn set_fill_color(&mut self, color: &str);
    fn set_font(&mut self, font: &str);
    fn set_text_align(&mut self, align: TextAlign);
    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> Result<()>;

    /// Encode the current contents as an embeddable `data:` URL.
    fn to_data_url(&self) -> Result<String>;
}
