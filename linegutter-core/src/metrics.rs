use crate::config::GutterConfig;
use crate::error::{GutterError, Result};
use crate::host::{ComputedStyle, Measure, ProbeContent, ProbeStyle};
use tracing::trace;

/// Pixel measurements for one render pass, all in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Metrics {
    pub line_height: f64,
    pub font_size: f64,
    pub padding_top: f64,
    pub padding_right: f64,
    pub gutter_width: f64,
    pub gutter_padding: f64,
}

/// Resolve every metric through the layout engine.
///
/// The probe goes through five stages, each changing one thing and reading
/// back one dimension:
///
/// 1. host padding on a zero-width probe: height is the top padding, width
///    the right padding
/// 2. gutter padding as right padding: width is the gutter padding
/// 3. no padding, configured gutter width: width is the gutter width
/// 4. a non-breaking space as content: height is the line height
/// 5. `line-height: 1`: height is the font size
pub fn measure(backend: &impl Measure, style: &ComputedStyle, config: &GutterConfig) -> Result<Metrics> {
    let mut probe = ProbeStyle::from_host(style);
    let host_box = backend.measure_probe(&probe)?;
    let padding_top = checked("padding-top", host_box.height)?;
    let padding_right = checked("padding-right", host_box.width)?;

    probe.padding_right = config.padding.clone();
    let gutter_padding = checked("gutter padding", backend.measure_probe(&probe)?.width)?;

    probe.padding_top = "0".to_string();
    probe.padding_right = "0".to_string();
    probe.width = config.width.clone();
    let gutter_width = checked("gutter width", backend.measure_probe(&probe)?.width)?;

    probe.content = ProbeContent::NonBreakingSpace;
    let line_height = checked("line-height", backend.measure_probe(&probe)?.height)?;

    probe.line_height = "1".to_string();
    let font_size = checked("font-size", backend.measure_probe(&probe)?.height)?;

    let metrics = Metrics {
        line_height,
        font_size,
        padding_top,
        padding_right,
        gutter_width,
        gutter_padding,
    };
    trace!(?metrics, "measured host");
    Ok(metrics)
}

fn checked(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(GutterError::InvalidMetric { name, value })
    }
}
