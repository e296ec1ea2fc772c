//! In-memory stand-ins for a layout engine and a canvas.
//!
//! Both are cheap handles over shared state so a test can keep one clone
//! and hand the other to a [`Coordinator`](crate::Coordinator).

use crate::config::AttributeSource;
use crate::error::{GutterError, Result};
use crate::host::{BoxMetrics, ComputedStyle, Host, Measure, ProbeContent, ProbeStyle, StyleDeclaration};
use crate::raster::{Raster, TextAlign};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

const DEFAULT_FONT_SIZE: f64 = 16.0;
const NORMAL_LINE_HEIGHT: f64 = 1.2;

struct HostState {
    style: ComputedStyle,
    attributes: HashMap<String, String>,
    inline: BTreeMap<&'static str, String>,
    writes: usize,
    probes: Vec<ProbeStyle>,
    scroll_height: f64,
    device_pixel_ratio: f64,
    container_width: f64,
    connected: bool,
}

/// Host with a tiny length resolver: `px`, `em`, `%` of the container width,
/// unitless numbers, and `normal` line height.
#[derive(Clone)]
pub struct FakeHost {
    state: Rc<RefCell<HostState>>,
}

impl FakeHost {
    /// 20px lines of 14px monospace, 4px padding, 100px of content.
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(HostState {
                style: ComputedStyle {
                    padding_top: "0px".into(),
                    padding_right: "4px".into(),
                    line_height: "20px".into(),
                    font_size: "14px".into(),
                    font_family: "monospace".into(),
                },
                attributes: HashMap::new(),
                inline: BTreeMap::new(),
                writes: 0,
                probes: Vec::new(),
                scroll_height: 100.0,
                device_pixel_ratio: 1.0,
                container_width: 400.0,
                connected: true,
            })),
        }
    }

    pub fn update_style(&self, edit: impl FnOnce(&mut ComputedStyle)) {
        edit(&mut self.state.borrow_mut().style);
    }

    pub fn set_attribute(&self, name: &str, value: &str) {
        self.state
            .borrow_mut()
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    pub fn remove_attribute(&self, name: &str) {
        self.state.borrow_mut().attributes.remove(name);
    }

    pub fn set_scroll_height(&self, height: f64) {
        self.state.borrow_mut().scroll_height = height;
    }

    pub fn set_device_pixel_ratio(&self, dpr: f64) {
        self.state.borrow_mut().device_pixel_ratio = dpr;
    }

    pub fn set_container_width(&self, width: f64) {
        self.state.borrow_mut().container_width = width;
    }

    /// A disconnected host fails style reads and measurement.
    pub fn set_connected(&self, connected: bool) {
        self.state.borrow_mut().connected = connected;
    }

    /// Latest inline value written for `property`.
    pub fn inline_style(&self, property: &str) -> Option<String> {
        self.state.borrow().inline.get(property).cloned()
    }

    pub fn background_image(&self) -> Option<String> {
        self.inline_style("background-image")
    }

    /// Number of `apply_style` calls so far.
    pub fn style_writes(&self) -> usize {
        self.state.borrow().writes
    }

    pub fn probes(&self) -> Vec<ProbeStyle> {
        self.state.borrow().probes.clone()
    }
}

impl Default for FakeHost {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve_length(value: &str, font_size: f64, container: f64) -> f64 {
    let value = value.trim();
    if let Some(px) = value.strip_suffix("px") {
        px.trim().parse().unwrap_or(0.0)
    } else if let Some(em) = value.strip_suffix("em") {
        em.trim().parse::<f64>().unwrap_or(0.0) * font_size
    } else if let Some(pct) = value.strip_suffix('%') {
        pct.trim().parse::<f64>().unwrap_or(0.0) / 100.0 * container
    } else {
        value.parse().unwrap_or(0.0)
    }
}

fn resolve_line_height(value: &str, font_size: f64, container: f64) -> f64 {
    match value.trim() {
        "normal" => font_size * NORMAL_LINE_HEIGHT,
        v if v.parse::<f64>().is_ok() => v.parse::<f64>().unwrap_or(0.0) * font_size,
        v => resolve_length(v, font_size, container),
    }
}

impl Measure for FakeHost {
    fn measure_probe(&self, probe: &ProbeStyle) -> Result<BoxMetrics> {
        let mut state = self.state.borrow_mut();
        if !state.connected {
            return Err(GutterError::Detached);
        }
        state.probes.push(probe.clone());

        let container = state.container_width;
        let font_size = resolve_length(&probe.font_size, DEFAULT_FONT_SIZE, container);
        let content_height = match probe.content {
            ProbeContent::Empty => 0.0,
            ProbeContent::NonBreakingSpace => resolve_line_height(&probe.line_height, font_size, container),
        };

        Ok(BoxMetrics {
            width: resolve_length(&probe.width, font_size, container)
                + resolve_length(&probe.padding_right, font_size, container),
            height: resolve_length(&probe.padding_top, font_size, container) + content_height,
        })
    }
}

impl AttributeSource for FakeHost {
    fn attribute(&self, name: &str) -> Option<String> {
        self.state.borrow().attributes.get(name).cloned()
    }
}

impl Host for FakeHost {
    fn computed_style(&self) -> Result<ComputedStyle> {
        let state = self.state.borrow();
        if !state.connected {
            return Err(GutterError::Detached);
        }
        Ok(state.style.clone())
    }

    fn scroll_height(&self) -> f64 {
        self.state.borrow().scroll_height
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.state.borrow().device_pixel_ratio
    }

    fn apply_style(&self, declarations: &[StyleDeclaration]) -> Result<()> {
        let mut state = self.state.borrow_mut();
        for declaration in declarations {
            state.inline.insert(declaration.property, declaration.value.clone());
        }
        state.writes += 1;
        Ok(())
    }
}

/// One recorded raster call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    FillBackground(String),
    FillColor(String),
    Font(String),
    TextAlign(TextAlign),
    Text { text: String, x: f64, y: f64 },
}

#[derive(Default)]
struct RasterState {
    width: u32,
    height: u32,
    ops: Vec<DrawOp>,
    resizes: usize,
}

/// Raster that records draw calls instead of painting pixels.
///
/// Resizing clears the recording, like resizing a canvas clears it, so
/// [`ops`](Self::ops) always describes the current picture.
#[derive(Clone, Default)]
pub struct RecordingRaster {
    state: Rc<RefCell<RasterState>>,
}

impl RecordingRaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> Vec<DrawOp> {
        self.state.borrow().ops.clone()
    }

    /// Text of every numeral drawn, in draw order.
    pub fn labels(&self) -> Vec<String> {
        self.state
            .borrow()
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn size(&self) -> (u32, u32) {
        let state = self.state.borrow();
        (state.width, state.height)
    }

    /// How many times the raster has been resized (once per render).
    pub fn resizes(&self) -> usize {
        self.state.borrow().resizes
    }

    pub fn last_fill_color(&self) -> Option<String> {
        self.state.borrow().ops.iter().rev().find_map(|op| match op {
            DrawOp::FillColor(color) => Some(color.clone()),
            _ => None,
        })
    }
}

impl Raster for RecordingRaster {
    fn resize(&mut self, width: u32, height: u32) {
        let mut state = self.state.borrow_mut();
        state.width = width;
        state.height = height;
        state.ops.clear();
        state.resizes += 1;
    }

    fn fill_background(&mut self, color: &str) {
        self.state
            .borrow_mut()
            .ops
            .push(DrawOp::FillBackground(color.to_string()));
    }

    fn set_fill_color(&mut self, color: &str) {
        self.state.borrow_mut().ops.push(DrawOp::FillColor(color.to_string()));
    }

    fn set_font(&mut self, font: &str) {
        self.state.borrow_mut().ops.push(DrawOp::Font(font.to_string()));
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.state.borrow_mut().ops.push(DrawOp::TextAlign(align));
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> Result<()> {
        self.state.borrow_mut().ops.push(DrawOp::Text {
            text: text.to_string(),
            x,
            y,
        });
        Ok(())
    }

    fn to_data_url(&self) -> Result<String> {
        let state = self.state.borrow();
        let mut url = format!("data:text/x-raster;{}x{},", state.width, state.height);
        for op in &state.ops {
            url.push_str(&format!("{:?};", op));
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_length_units() {
        assert_eq!(resolve_length("12px", 16.0, 400.0), 12.0);
        assert_eq!(resolve_length("2em", 10.0, 400.0), 20.0);
        assert_eq!(resolve_length("25%", 16.0, 400.0), 100.0);
        assert_eq!(resolve_length("0", 16.0, 400.0), 0.0);
    }

    #[test]
    fn test_resolve_line_height() {
        assert_eq!(resolve_line_height("1", 14.0, 400.0), 14.0);
        assert_eq!(resolve_line_height("1.5", 10.0, 400.0), 15.0);
        assert_eq!(resolve_line_height("normal", 10.0, 400.0), 12.0);
        assert_eq!(resolve_line_height("22px", 10.0, 400.0), 22.0);
    }

    #[test]
    fn test_recording_raster_resize_clears() {
        let mut raster = RecordingRaster::new();
        raster.fill_text("1", 0.0, 0.0).unwrap();
        raster.resize(10, 20);

        assert!(raster.ops().is_empty());
        assert_eq!(raster.size(), (10, 20));
        assert_eq!(raster.resizes(), 1);
    }
}
