//! Shallow field merge for optimistic updates.

use serde_json::Value;

use crate::error::StoreError;
use crate::resource::Resource;

/// Merge a patch object's fields over the item's serialized form.
///
/// Returns the decoded optimistic item together with the merged body sent
/// to the server. The merge is shallow: each patch field replaces the
/// item's field wholesale.
pub(crate) fn apply_patch<R: Resource>(item: &R, patch: &Value) -> Result<(R, Value), StoreError> {
    let fields = match patch.as_object() {
        Some(map) => map,
        None => {
            return Err(StoreError::Validation(
                "patch must be a JSON object".to_string(),
            ))
        }
    };

    let mut merged = match serde_json::to_value(item) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            return Err(StoreError::Unknown(
                "resource did not serialize to an object".to_string(),
            ))
        }
        Err(err) => return Err(StoreError::Unknown(err.to_string())),
    };

    for (key, value) in fields {
        merged.insert(key.clone(), value.clone());
    }

    let body = Value::Object(merged);
    let optimistic: R = serde_json::from_value(body.clone())
        .map_err(|err| StoreError::Unknown(format!("patched item failed to decode: {}", err)))?;
    Ok((optimistic, body))
}
