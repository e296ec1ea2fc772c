use crate::config::{AttributeSource, CONFIG_ATTRIBUTES};
use crate::host::ComputedStyle;

/// Last-seen values of everything that can invalidate a rendered gutter.
///
/// Style and attributes are tracked separately so each watcher channel can
/// ask about its own kind of change without measuring anything.
#[derive(Debug, Default)]
pub struct ChangeDetector {
    style: Option<ComputedStyle>,
    attributes: Option<[Option<String>; 4]>,
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// True (and the snapshot is updated) if any tracked style property
    /// differs from the last one seen.
    pub fn style_changed(&mut self, style: &ComputedStyle) -> bool {
        if self.style.as_ref() == Some(style) {
            return false;
        }
        self.style = Some(style.clone());
        true
    }

    /// Same as [`style_changed`](Self::style_changed) for the four
    /// configuration attributes.
    pub fn attributes_changed(&mut self, source: &impl AttributeSource) -> bool {
        let current = read_attributes(source);
        if self.attributes.as_ref() == Some(&current) {
            return false;
        }
        self.attributes = Some(current);
        true
    }

    /// Make the given state the new baseline.
    pub fn capture(&mut self, style: &ComputedStyle, source: &impl AttributeSource) {
        self.style = Some(style.clone());
        self.attributes = Some(read_attributes(source));
    }

    pub fn is_empty(&self) -> bool {
        self.style.is_none() && self.attributes.is_none()
    }
}

fn read_attributes(source: &impl AttributeSource) -> [Option<String>; 4] {
    CONFIG_ATTRIBUTES.map(|name| source.attribute(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ATTR_COLOR, ATTR_WIDTH};
    use crate::testing::FakeHost;

    fn base_style() -> ComputedStyle {
        ComputedStyle {
            padding_top: "4px".into(),
            padding_right: "4px".into(),
            line_height: "20px".into(),
            font_size: "14px".into(),
            font_family: "monospace".into(),
        }
    }

    #[test]
    fn test_empty_snapshot_reports_change() {
        let mut detector = ChangeDetector::new();
        assert!(detector.is_empty());
        assert!(detector.style_changed(&base_style()));
        assert!(!detector.style_changed(&base_style()));
    }

    #[test]
    fn test_style_changed_after_capture() {
        let host = FakeHost::new();
        let mut detector = ChangeDetector::new();
        detector.capture(&base_style(), &host);

        assert!(!detector.style_changed(&base_style()));

        let mut bigger = base_style();
        bigger.font_size = "16px".into();
        assert!(detector.style_changed(&bigger));
        // The diff itself moved the baseline.
        assert!(!detector.style_changed(&bigger));

        detector.capture(&base_style(), &host);
        assert!(detector.style_changed(&bigger));
        detector.capture(&bigger, &host);
        assert!(!detector.style_changed(&bigger));
    }

    #[test]
    fn test_each_tracked_style_property() {
        let host = FakeHost::new();
        let edits: [fn(&mut ComputedStyle); 5] = [
            |s: &mut ComputedStyle| s.padding_top = "5px".into(),
            |s: &mut ComputedStyle| s.padding_right = "5px".into(),
            |s: &mut ComputedStyle| s.line_height = "22px".into(),
            |s: &mut ComputedStyle| s.font_size = "15px".into(),
            |s: &mut ComputedStyle| s.font_family = "serif".into(),
        ];

        for edit in edits {
            let mut detector = ChangeDetector::new();
            detector.capture(&base_style(), &host);
            let mut style = base_style();
            edit(&mut style);
            assert!(detector.style_changed(&style));
        }
    }

    #[test]
    fn test_attributes_changed() {
        let host = FakeHost::new();
        let mut detector = ChangeDetector::new();
        detector.capture(&base_style(), &host);

        assert!(!detector.attributes_changed(&host));

        host.set_attribute(ATTR_COLOR, "red");
        assert!(detector.attributes_changed(&host));
        assert!(!detector.attributes_changed(&host));

        host.set_attribute("data-unrelated", "1");
        assert!(!detector.attributes_changed(&host));

        host.remove_attribute(ATTR_COLOR);
        host.set_attribute(ATTR_WIDTH, "80px");
        assert!(detector.attributes_changed(&host));
    }
}
