//! Turns tracking calls into collector query fragments.
//!
//! Every free-text argument is percent-escaped before it is placed behind its field name, so a
//! fragment never contains `&` or `=` other than the field delimiters it adds itself.

use std::fmt;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left as-is inside a query component: ASCII alphanumerics plus `-`, `_`, `.`, `~`.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-escapes `value` for use as a query component (`"a b/c"` becomes `"a%20b%2Fc"`).
pub fn escape_component(value: &str) -> String {
    utf8_percent_encode(value, QUERY_COMPONENT).to_string()
}

/// An encoded, event-specific portion of a collector query string.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Fragment(String);

impl Fragment {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    fn from_fields(fields: &[(&str, &str)]) -> Self {
        let encoded = fields
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("&");
        Self(encoded)
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Fragment {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A single tracking call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Hit {
    ScreenView {
        screen_name: String,
    },
    Event {
        category: String,
        action: String,
    },
    LabeledEvent {
        category: String,
        action: String,
        label: String,
        value: String,
    },
    Exception {
        description: String,
        fatal: bool,
    },
}

impl Hit {
    pub fn screen_view(screen_name: impl Into<String>) -> Self {
        Hit::ScreenView {
            screen_name: screen_name.into(),
        }
    }

    pub fn event(category: impl Into<String>, action: impl Into<String>) -> Self {
        Hit::Event {
            category: category.into(),
            action: action.into(),
        }
    }

    pub fn labeled_event(
        category: impl Into<String>,
        action: impl Into<String>,
        label: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Hit::LabeledEvent {
            category: category.into(),
            action: action.into(),
            label: label.into(),
            value: value.into(),
        }
    }

    pub fn exception(description: impl Into<String>, fatal: bool) -> Self {
        Hit::Exception {
            description: description.into(),
            fatal,
        }
    }

    /// Collector hit type (`t` field).
    pub fn hit_type(&self) -> &'static str {
        match self {
            Hit::ScreenView { .. } => "screenview",
            Hit::Event { .. } | Hit::LabeledEvent { .. } => "event",
            Hit::Exception { .. } => "exception",
        }
    }

    pub fn encode(&self) -> Fragment {
        match self {
            Hit::ScreenView { screen_name } => encode_screen_view(screen_name),
            Hit::Event { category, action } => encode_event(category, action),
            Hit::LabeledEvent {
                category,
                action,
                label,
                value,
            } => encode_labeled_event(category, action, label, value),
            Hit::Exception { description, fatal } => encode_exception(description, *fatal),
        }
    }
}

/// `t=screenview&cd=<screen name>`
pub fn encode_screen_view(screen_name: &str) -> Fragment {
    Fragment::from_fields(&[("t", "screenview"), ("cd", &escape_component(screen_name))])
}

/// `t=event&ec=<category>&ea=<action>`
pub fn encode_event(category: &str, action: &str) -> Fragment {
    Fragment::from_fields(&[
        ("t", "event"),
        ("ec", &escape_component(category)),
        ("ea", &escape_component(action)),
    ])
}

/// `t=event&ec=<category>&ea=<action>&el=<label>&ev=<value>`
pub fn encode_labeled_event(category: &str, action: &str, label: &str, value: &str) -> Fragment {
    Fragment::from_fields(&[
        ("t", "event"),
        ("ec", &escape_component(category)),
        ("ea", &escape_component(action)),
        ("el", &escape_component(label)),
        ("ev", &escape_component(value)),
    ])
}

/// `t=exception&exd=<description>&exf=<0|1>`
pub fn encode_exception(description: &str, fatal: bool) -> Fragment {
    let fatal = if fatal { "1" } else { "0" };
    Fragment::from_fields(&[
        ("t", "exception"),
        ("exd", &escape_component(description)),
        ("exf", fatal),
    ])
}
