use crate::change::ChangeDetector;
use crate::config::{ConfigOverride, GutterConfig};
use crate::error::Result;
use crate::host::{Host, StyleDeclaration};
use crate::metrics::{self, Metrics};
use crate::raster::{Raster, TextAlign};
use smallvec::SmallVec;
use tracing::debug;

/// One numeral to draw, in device pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Numeral {
    pub label: String,
    pub x: f64,
    /// Alphabetic baseline.
    pub y: f64,
}

/// Where everything goes on the raster for one pass.
#[derive(Debug, Clone, PartialEq)]
pub struct GutterLayout {
    pub raster_width: u32,
    pub raster_height: u32,
    pub font: String,
    pub numerals: Vec<Numeral>,
}

/// Summary of a finished render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutcome {
    pub lines: usize,
    pub raster_width: u32,
    pub raster_height: u32,
    pub padding_left: f64,
    pub data_url: String,
}

/// Number of text lines the content spans. Zero line height yields zero.
pub fn line_count(scroll_height: f64, line_height: f64) -> usize {
    if line_height <= 0.0 || scroll_height <= 0.0 {
        return 0;
    }
    (scroll_height / line_height).ceil() as usize
}

/// Place a numeral on every line of the full content height.
///
/// Each numeral is end-anchored one doubled gutter padding in from the right
/// edge, with its baseline half a font size below the middle of its line.
pub fn layout_gutter(metrics: &Metrics, font_family: &str, scroll_height: f64, dpr: f64) -> GutterLayout {
    let raster_width = (metrics.gutter_width * dpr).round() as u32;
    let raster_height = (scroll_height * dpr).round() as u32;
    let x = raster_width as f64 - metrics.gutter_padding * dpr * 2.0;
    let baseline_offset = (metrics.line_height + metrics.font_size) / 2.0;

    let numerals = (0..line_count(scroll_height, metrics.line_height))
        .map(|index| Numeral {
            label: (index + 1).to_string(),
            x,
            y: (metrics.padding_top + metrics.line_height * index as f64 + baseline_offset) * dpr,
        })
        .collect();

    GutterLayout {
        raster_width,
        raster_height,
        font: format!("{}px {}", metrics.font_size * dpr, font_family),
        numerals,
    }
}

/// Inline style that puts the raster behind the text and pushes the text
/// clear of the gutter.
pub fn host_declarations(metrics: &Metrics, data_url: &str) -> SmallVec<[StyleDeclaration; 6]> {
    let mut declarations = SmallVec::new();
    declarations.push(StyleDeclaration::new(
        "padding-left",
        format!("{}px", padding_left(metrics)),
    ));
    declarations.push(StyleDeclaration::new("box-sizing", "border-box"));
    declarations.push(StyleDeclaration::new("background-repeat", "no-repeat"));
    declarations.push(StyleDeclaration::new("background-attachment", "local"));
    declarations.push(StyleDeclaration::new(
        "background-size",
        format!("{}px auto", metrics.gutter_width),
    ));
    declarations.push(StyleDeclaration::new(
        "background-image",
        format!("url(\"{}\")", data_url),
    ));
    declarations
}

fn padding_left(metrics: &Metrics) -> f64 {
    metrics.gutter_width + metrics.padding_right
}

/// Per-host render state: the host, its raster and its change snapshot.
pub struct RenderEngine<H: Host, R: Raster> {
    host: H,
    raster: R,
    overrides: ConfigOverride,
    detector: ChangeDetector,
    renders: u64,
}

impl<H: Host, R: Raster> RenderEngine<H, R> {
    pub fn new(host: H, raster: R, overrides: ConfigOverride) -> Self {
        Self {
            host,
            raster,
            overrides,
            detector: ChangeDetector::new(),
            renders: 0,
        }
    }

    /// Completed renders so far.
    pub fn render_count(&self) -> u64 {
        self.renders
    }

    /// Re-read computed style and diff it against the snapshot.
    pub fn style_changed(&mut self) -> Result<bool> {
        let style = self.host.computed_style()?;
        Ok(self.detector.style_changed(&style))
    }

    pub fn attributes_changed(&mut self) -> bool {
        self.detector.attributes_changed(&self.host)
    }

    /// Measure, repaint the whole raster and restyle the host.
    ///
    /// The snapshot is captured before anything is written to the host, so
    /// the style mutations made here never count as a change on their own.
    pub fn handle_render(&mut self) -> Result<RenderOutcome> {
        let style = self.host.computed_style()?;
        let config = GutterConfig::resolve(&self.host, &self.overrides);
        let metrics = metrics::measure(&self.host, &style, &config)?;

        self.detector.capture(&style, &self.host);

        let dpr = self.host.device_pixel_ratio();
        let scroll_height = self.host.scroll_height();
        let layout = layout_gutter(&metrics, &style.font_family, scroll_height, dpr);

        self.raster.resize(layout.raster_width, layout.raster_height);
        self.raster.fill_background(&config.background);
        self.raster.set_fill_color(&config.color);
        self.raster.set_font(&layout.font);
        self.raster.set_text_align(TextAlign::End);
        for numeral in &layout.numerals {
            self.raster.fill_text(&numeral.label, numeral.x, numeral.y)?;
        }

        let data_url = self.raster.to_data_url()?;
        self.host.apply_style(&host_declarations(&metrics, &data_url))?;
        self.renders += 1;

        debug!(
            lines = layout.numerals.len(),
            width = layout.raster_width,
            height = layout.raster_height,
            "rendered gutter"
        );

        Ok(RenderOutcome {
            lines: layout.numerals.len(),
            raster_width: layout.raster_width,
            raster_height: layout.raster_height,
            padding_left: padding_left(&metrics),
            data_url,
        })
    }
}
