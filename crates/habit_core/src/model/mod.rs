mod document;
mod habit;
mod task;
mod workflow;

pub use document::Document;
pub use habit::{DEFAULT_COLOR, DEFAULT_ICON, Habit};
pub use task::{Task, TaskCategory};
pub use workflow::{WorkflowStatus, WorkflowTask};

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Extra fields carried through unchanged when a record is rewritten.
pub type Extra = serde_json::Map<String, Value>;

/// Treats an explicit `null` list the same as a missing one.
pub(crate) fn nullable_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Keeps a present key even when its value is `null`; a missing key stays `None`.
pub(crate) fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Drops keys that belong to typed fields so they cannot be serialized twice.
pub(crate) fn strip_reserved(mut extra: Extra, reserved: &[&str]) -> Extra {
    for key in reserved {
        extra.remove(*key);
    }
    extra
}
