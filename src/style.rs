use std::collections::BTreeMap;
use std::fmt;

/// Opacity as a whole percentage, from 0 (invisible) to 100 (opaque)
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Opacity(u8);

impl Opacity {
    pub const OPAQUE: Opacity = Opacity(100);

    /// Returns `None` if `percent` exceeds 100
    pub fn new(percent: u8) -> Option<Opacity> {
        (percent <= 100).then_some(Opacity(percent))
    }

    pub fn percent(self) -> u8 {
        self.0
    }

    pub fn is_translucent(self) -> bool {
        self.0 < 100
    }
}

impl Default for Opacity {
    fn default() -> Opacity {
        Opacity(30)
    }
}

// Formats as a CSS number: 30 => "0.3", 5 => "0.05", 100 => "1"
impl fmt::Display for Opacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            100 => write!(f, "1"),
            0 => write!(f, "0"),
            p if p % 10 == 0 => write!(f, "0.{}", p / 10),
            p => write!(f, "0.{p:02}"),
        }
    }
}

/// Appearance applied to a disabled day
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StyleOptions {
    pub pointer_events: String,
    pub touch_action: String,
    pub opacity: Opacity,
    /// Further style properties, keyed by CSS property name
    pub extra: BTreeMap<String, String>,
}

impl StyleOptions {
    /// All properties as CSS `name: value` pairs, known ones first
    pub fn properties(&self) -> Vec<(String, String)> {
        let mut props = vec![
            (String::from("pointer-events"), self.pointer_events.clone()),
            (String::from("touch-action"), self.touch_action.clone()),
            (String::from("opacity"), self.opacity.to_string()),
        ];
        props.extend(self.extra.iter().map(|(k, v)| (k.clone(), v.clone())));
        props
    }
}

impl Default for StyleOptions {
    fn default() -> StyleOptions {
        StyleOptions {
            pointer_events: String::from("none"),
            touch_action: String::from("none"),
            opacity: Opacity::default(),
            extra: BTreeMap::new(),
        }
    }
}

impl fmt::Display for StyleOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.properties().into_iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{name}: {value}")?;
        }
        Ok(())
    }
}

/// Style of one day in a year's annual marks
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct MarkStyle {
    pub light: Opacity,
    pub dark: Opacity,
}

impl MarkStyle {
    pub fn uniform(opacity: Opacity) -> MarkStyle {
        MarkStyle {
            light: opacity,
            dark: opacity,
        }
    }
}
