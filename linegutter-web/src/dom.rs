use crate::error::js_error;
use linegutter_core::config::AttributeSource;
use linegutter_core::{
    BoxMetrics, ComputedStyle, GutterError, Host, Measure, ProbeContent, ProbeStyle, Result,
    StyleDeclaration,
};
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, Node, Window};

const NBSP: &str = "\u{a0}";

/// A text input element in a live document.
pub struct DomHost {
    element: HtmlElement,
    window: Window,
    document: Document,
}

impl DomHost {
    pub fn new(element: HtmlElement, window: Window, document: Document) -> Self {
        Self {
            element,
            window,
            document,
        }
    }

    fn ensure_connected(&self) -> Result<()> {
        if self.element.is_connected() {
            Ok(())
        } else {
            Err(GutterError::Detached)
        }
    }
}

impl Measure for DomHost {
    /// Insert the probe next to the host so relative lengths resolve against
    /// the same containing block, read its box and take it out again.
    fn measure_probe(&self, probe: &ProbeStyle) -> Result<BoxMetrics> {
        self.ensure_connected()?;
        let parent = self.element.parent_node().ok_or(GutterError::Detached)?;

        let block: HtmlElement = self
            .document
            .create_element("div")
            .map_err(js_error)?
            .dyn_into()
            .map_err(|_| GutterError::Platform("probe is not an HtmlElement".into()))?;
        block.set_attribute("style", &probe.to_css()).map_err(js_error)?;
        block.set_attribute("aria-hidden", "true").map_err(js_error)?;
        if probe.content == ProbeContent::NonBreakingSpace {
            block.set_text_content(Some(NBSP));
        }

        let anchor: &Node = self.element.as_ref();
        parent.insert_before(&block, Some(anchor)).map_err(js_error)?;
        let rect = block.get_bounding_client_rect();
        parent.remove_child(&block).map_err(js_error)?;

        Ok(BoxMetrics {
            width: rect.width(),
            height: rect.height(),
        })
    }
}

impl AttributeSource for DomHost {
    fn attribute(&self, name: &str) -> Option<String> {
        self.element.get_attribute(name)
    }
}

impl Host for DomHost {
    fn computed_style(&self) -> Result<ComputedStyle> {
        self.ensure_connected()?;
        let style = self
            .window
            .get_computed_style(&self.element)
            .map_err(js_error)?
            .ok_or(GutterError::Detached)?;
        let read = |property: &str| style.get_property_value(property).map_err(js_error);

        Ok(ComputedStyle {
            padding_top: read("padding-top")?,
            padding_right: read("padding-right")?,
            line_height: read("line-height")?,
            font_size: read("font-size")?,
            font_family: read("font-family")?,
        })
    }

    fn scroll_height(&self) -> f64 {
        self.element.scroll_height() as f64
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.window.device_pixel_ratio()
    }

    fn apply_style(&self, declarations: &[StyleDeclaration]) -> Result<()> {
        let style = self.element.style();
        for declaration in declarations {
            style
                .set_property(declaration.property, &declaration.value)
                .map_err(js_error)?;
        }
        Ok(())
    }
}
