use crate::config::AttributeSource;
use crate::error::Result;

/// The computed-style properties the gutter depends on, as the layout engine
/// reports them (CSS strings such as `"4px"` or `"normal"`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComputedStyle {
    pub padding_top: String,
    pub padding_right: String,
    pub line_height: String,
    pub font_size: String,
    pub font_family: String,
}

/// What goes inside the probe block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeContent {
    Empty,
    /// A single non-breaking space, enough to produce one line box.
    NonBreakingSpace,
}

/// Style of an invisible probe block used to let the layout engine resolve
/// CSS values into pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeStyle {
    pub padding_top: String,
    pub padding_right: String,
    pub width: String,
    pub font_family: String,
    pub font_size: String,
    pub line_height: String,
    pub content: ProbeContent,
}

impl ProbeStyle {
    /// Zero-width probe carrying the host's padding and font.
    pub fn from_host(style: &ComputedStyle) -> Self {
        Self {
            padding_top: style.padding_top.clone(),
            padding_right: style.padding_right.clone(),
            width: "0".to_string(),
            font_family: style.font_family.clone(),
            font_size: style.font_size.clone(),
            line_height: style.line_height.clone(),
            content: ProbeContent::Empty,
        }
    }

    /// Inline CSS for the probe. Margins and borders are always zero so the
    /// measured box is padding plus content. Flex and grid sizing are pinned
    /// so a flex or grid parent can neither stretch nor shrink the probe.
    pub fn to_css(&self) -> String {
        format!(
            "display: block; visibility: hidden; margin: 0; border: 0; \
             box-sizing: content-box; height: auto; \
             flex: none; align-self: flex-start; justify-self: start; \
             padding: {} {} 0 0; width: {}; \
             font-family: {}; font-size: {}; line-height: {};",
            self.padding_top,
            self.padding_right,
            self.width,
            self.font_family,
            self.font_size,
            self.line_height,
        )
    }
}

/// Border-box size of a laid-out probe, in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoxMetrics {
    pub width: f64,
    pub height: f64,
}

/// Layout probing capability.
pub trait Measure {
    fn measure_probe(&self, probe: &ProbeStyle) -> Result<BoxMetrics>;
}

/// A single inline style property written to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleDeclaration {
    pub property: &'static str,
    pub value: String,
}

impl StyleDeclaration {
    pub fn new(property: &'static str, value: impl Into<String>) -> Self {
        Self {
            property,
            value: value.into(),
        }
    }
}

/// A managed multi-line text input.
pub trait Host: Measure + AttributeSource {
    fn computed_style(&self) -> Result<ComputedStyle>;

    /// Full content height including the part scrolled out of view.
    fn scroll_height(&self) -> f64;

    fn device_pixel_ratio(&self) -> f64;

    /// Write inline style on the host. Existing declarations for other
    /// properties are left alone.
    fn apply_style(&self, declarations: &[StyleDeclaration]) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host_style() -> ComputedStyle {
        ComputedStyle {
            padding_top: "4px".into(),
            padding_right: "6px".into(),
            line_height: "20px".into(),
            font_size: "14px".into(),
            font_family: "monospace".into(),
        }
    }

    #[test]
    fn test_measuring_block_css_carries_host_values() {
        let css = ProbeStyle::from_host(&host_style()).to_css();

        assert!(css.contains("padding: 4px 6px 0 0;"));
        assert!(css.contains("width: 0;"));
        assert!(css.contains("line-height: 20px;"));
        assert!(css.contains("visibility: hidden;"));
    }

    #[test]
    fn test_measuring_block_css_opts_out_of_flex_and_grid_sizing() {
        let css = ProbeStyle::from_host(&host_style()).to_css();

        assert!(css.contains("flex: none;"));
        assert!(css.contains("align-self: flex-start;"));
        assert!(css.contains("justify-self: start;"));
    }
}
