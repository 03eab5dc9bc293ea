use crate::error::{Result, YutoriError};
use schemars::JsonSchema;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// JSON Schema describing the structured output a task should return.
///
/// Built either from a raw JSON object or derived from a Rust type that
/// implements [`JsonSchema`].
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSchema(Value);

impl OutputSchema {
    /// Use a hand-written schema. Anything other than a JSON object is rejected.
    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(YutoriError::InvalidArgument(
                "output_schema must be a JSON object or a type implementing JsonSchema".to_string(),
            ));
        }
        Ok(Self(value))
    }

    /// Derive the schema from a type.
    ///
    /// ```
    /// use schemars::JsonSchema;
    /// use yutori::schema::OutputSchema;
    ///
    /// #[derive(JsonSchema)]
    /// struct Headline {
    ///     title: String,
    ///     url: String,
    /// }
    ///
    /// let schema = OutputSchema::of::<Headline>();
    /// assert_eq!(schema.as_value()["type"], "object");
    /// ```
    pub fn of<T: JsonSchema>() -> Self {
        let root = schemars::schema_for!(T);
        // RootSchema always serializes to an object
        Self(serde_json::to_value(root).unwrap_or_else(|_| Value::Object(Default::default())))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl TryFrom<Value> for OutputSchema {
    type Error = YutoriError;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(value)
    }
}

impl Serialize for OutputSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}
