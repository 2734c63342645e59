use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{StoreError, StoreResult};

/// Reserved field holding the store-assigned identity.
pub const ID_FIELD: &str = "id";

/// The one validated field.
pub const NAME_FIELD: &str = "name";

/// The whole collection, in insertion order.
pub type Collection = Vec<Item>;

/// A single record: a JSON object with a reserved `id` and a required `name`.
///
/// Every other field is opaque to the store and passed through verbatim,
/// key order included.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Item(Map<String, Value>);

impl Item {
    /// Wrap an existing field map without validating it.
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// The item's id, if it carries a string one.
    pub fn id(&self) -> Option<&str> {
        self.0.get(ID_FIELD).and_then(Value::as_str)
    }

    /// The item's name, if it carries a string one.
    pub fn name(&self) -> Option<&str> {
        self.0.get(NAME_FIELD).and_then(Value::as_str)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Returns `true` if this item's id equals `id`.
    pub fn has_id(&self, id: &str) -> bool {
        self.id() == Some(id)
    }

    /// Overwrite the id. Only the store assigns identity.
    pub(crate) fn assign_id(&mut self, id: String) {
        self.0.insert(ID_FIELD.to_string(), Value::String(id));
    }

    /// Shallow-merge `patch` onto this item.
    ///
    /// Patch fields overwrite existing ones, absent fields are kept, and an
    /// `id` key in the patch is ignored.
    pub fn merge(&mut self, patch: Map<String, Value>) {
        for (field, value) in patch {
            if field == ID_FIELD {
                continue;
            }
            self.0.insert(field, value);
        }
    }
}

impl From<Item> for Value {
    fn from(item: Item) -> Self {
        Value::Object(item.0)
    }
}

/// Check a create or update payload against the `name` rule.
///
/// The payload must be an object whose `name` is a non-empty string. On
/// success the object's fields are handed back for the caller to use.
pub fn validate(payload: Value) -> StoreResult<Map<String, Value>> {
    let fields = match payload {
        Value::Object(fields) => fields,
        other => {
            return Err(StoreError::Validation(format!(
                "item must be a JSON object, got {}",
                kind_of(&other)
            )))
        }
    };

    match fields.get(NAME_FIELD) {
        None | Some(Value::Null) => Err(StoreError::Validation(
            "field `name` is required and must be a string".into(),
        )),
        Some(Value::String(name)) if name.is_empty() => Err(StoreError::Validation(
            "field `name` must not be empty".into(),
        )),
        Some(Value::String(_)) => Ok(fields),
        Some(other) => Err(StoreError::Validation(format!(
            "field `name` must be a string, got {}",
            kind_of(other)
        ))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
