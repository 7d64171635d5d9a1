use serde_json::Value;

use super::domain::PropertyRecord;

/// Resolve a dot-separated path against a property record.
///
/// Returns `None` when any segment is missing or when a non-object value sits
/// where an object is expected. A present `null` resolves to `Some(Value::Null)`;
/// presence policies decide what that means.
pub fn resolve<'a>(record: &'a PropertyRecord, path: &str) -> Option<&'a Value> {
    resolve_value(record.as_value(), path)
}

pub(crate) fn resolve_value<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(root, |current, key| current.as_object()?.get(key))
}
