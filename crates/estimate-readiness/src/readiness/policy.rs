use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Rule deciding whether a resolved value counts as supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresencePolicy {
    /// Present, not null and not an empty string.
    Simple,
    /// As `Simple`, and arrays must be non-empty.
    StrictArray,
    /// As `Simple`; an empty array still counts as supplied.
    LenientArray,
}

impl PresencePolicy {
    pub fn is_supplied(self, value: Option<&Value>) -> bool {
        match self {
            Self::Simple | Self::LenientArray => is_present(value),
            Self::StrictArray => match value {
                Some(Value::Array(items)) => !items.is_empty(),
                other => is_present(other),
            },
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::StrictArray => "strict array",
            Self::LenientArray => "lenient array",
        }
    }
}

fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(text)) => !text.is_empty(),
        Some(_) => true,
    }
}
