/// Attribute holding the gutter width (any CSS length).
pub const ATTR_WIDTH: &str = "data-gutter-width";
/// Attribute holding the horizontal padding inside the gutter.
pub const ATTR_PADDING: &str = "data-gutter-padding";
/// Attribute holding the numeral color.
pub const ATTR_COLOR: &str = "data-gutter-color";
/// Attribute holding the gutter background color.
pub const ATTR_BACKGROUND: &str = "data-gutter-background";

/// The four configuration attributes, in the order the watcher filters them.
pub const CONFIG_ATTRIBUTES: [&str; 4] = [ATTR_WIDTH, ATTR_PADDING, ATTR_COLOR, ATTR_BACKGROUND];

pub const DEFAULT_WIDTH: &str = "64px";
pub const DEFAULT_PADDING: &str = "8px";
pub const DEFAULT_COLOR: &str = "#666";
pub const DEFAULT_BACKGROUND: &str = "#f4f4f4";

/// Anything configuration attributes can be read from.
pub trait AttributeSource {
    fn attribute(&self, name: &str) -> Option<String>;
}

/// Resolved gutter configuration for one render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GutterConfig {
    pub width: String,
    pub padding: String,
    pub color: String,
    pub background: String,
}

impl Default for GutterConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH.to_string(),
            padding: DEFAULT_PADDING.to_string(),
            color: DEFAULT_COLOR.to_string(),
            background: DEFAULT_BACKGROUND.to_string(),
        }
    }
}

/// Values supplied at attach time. Each one beats the matching attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverride {
    pub width: Option<String>,
    pub padding: Option<String>,
    pub color: Option<String>,
    pub background: Option<String>,
}

impl ConfigOverride {
    pub fn is_empty(&self) -> bool {
        self.width.is_none()
            && self.padding.is_none()
            && self.color.is_none()
            && self.background.is_none()
    }
}

impl GutterConfig {
    /// Resolve from the host's current attributes, letting `overrides` win.
    pub fn resolve(source: &impl AttributeSource, overrides: &ConfigOverride) -> Self {
        let pick = |explicit: &Option<String>, attr: &str, default: &str| -> String {
            if let Some(value) = explicit.as_deref().and_then(non_blank) {
                return value.to_string();
            }
            source
                .attribute(attr)
                .as_deref()
                .and_then(non_blank)
                .map(str::to_string)
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            width: pick(&overrides.width, ATTR_WIDTH, DEFAULT_WIDTH),
            padding: pick(&overrides.padding, ATTR_PADDING, DEFAULT_PADDING),
            color: pick(&overrides.color, ATTR_COLOR, DEFAULT_COLOR),
            background: pick(&overrides.background, ATTR_BACKGROUND, DEFAULT_BACKGROUND),
        }
    }
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() { None } else { Some(trimmed) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct Attrs(HashMap<&'static str, &'static str>);

    impl AttributeSource for Attrs {
        fn attribute(&self, name: &str) -> Option<String> {
            self.0.get(name).map(|v| v.to_string())
        }
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let attrs = Attrs(HashMap::new());
        let config = GutterConfig::resolve(&attrs, &ConfigOverride::default());
        assert_eq!(config, GutterConfig::default());
        assert_eq!(config.width, "64px");
        assert_eq!(config.background, "#f4f4f4");
    }

    #[test]
    fn test_attribute_beats_default() {
        let attrs = Attrs(HashMap::from([(ATTR_COLOR, "red"), (ATTR_WIDTH, "3em")]));
        let config = GutterConfig::resolve(&attrs, &ConfigOverride::default());
        assert_eq!(config.color, "red");
        assert_eq!(config.width, "3em");
        assert_eq!(config.padding, DEFAULT_PADDING);
    }

    #[test]
    fn test_override_beats_attribute() {
        let attrs = Attrs(HashMap::from([(ATTR_COLOR, "red")]));
        let overrides = ConfigOverride {
            color: Some("blue".into()),
            ..Default::default()
        };
        let config = GutterConfig::resolve(&attrs, &overrides);
        assert_eq!(config.color, "blue");
    }

    #[test]
    fn test_blank_values_fall_through() {
        let attrs = Attrs(HashMap::from([(ATTR_PADDING, "  ")]));
        let overrides = ConfigOverride {
            width: Some(String::new()),
            ..Default::default()
        };
        let config = GutterConfig::resolve(&attrs, &overrides);
        assert_eq!(config.padding, DEFAULT_PADDING);
        assert_eq!(config.width, DEFAULT_WIDTH);
    }
}
