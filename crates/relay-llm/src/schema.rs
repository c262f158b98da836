//! Rust-native description of tool parameter shapes.
//!
//! Providers consume this through [`Schema::to_json_schema`] and translate
//! the resulting JSON Schema into their own declaration format.

use serde_json::{Map, Value, json};

/// A tool sent to the model: name, purpose, and parameter schema. Carries no
/// execution logic.
#[derive(Debug, Clone)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Schema,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameters: Schema) -> Self {
        ToolDefinition {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

/// A value shape, convertible to a JSON Schema subset
/// (object/array/string/number/integer/boolean, arbitrarily nested).
#[derive(Debug, Clone)]
pub enum Schema {
    String { description: Option<String> },
    Number { description: Option<String> },
    Integer { description: Option<String> },
    Boolean { description: Option<String> },
    Array {
        description: Option<String>,
        items: Box<Schema>,
    },
    Object {
        description: Option<String>,
        properties: Vec<Property>,
        required: Vec<String>,
    },
    /// Escape hatch: a literal JSON Schema value.
    Raw(Value),
}

#[derive(Debug, Clone)]
pub struct Property {
    pub name: String,
    pub schema: Schema,
}

impl Schema {
    pub fn string() -> Self {
        Schema::String { description: None }
    }

    pub fn number() -> Self {
        Schema::Number { description: None }
    }

    pub fn boolean() -> Self {
        Schema::Boolean { description: None }
    }

    pub fn array(items: Schema) -> Self {
        Schema::Array {
            description: None,
            items: Box::new(items),
        }
    }

    pub fn object(
        properties: impl IntoIterator<Item = (&'static str, Schema)>,
        required: impl IntoIterator<Item = &'static str>,
    ) -> Self {
        Schema::Object {
            description: None,
            properties: properties
                .into_iter()
                .map(|(name, schema)| Property {
                    name: name.to_string(),
                    schema,
                })
                .collect(),
            required: required.into_iter().map(str::to_string).collect(),
        }
    }

    /// Render as a JSON Schema value.
    pub fn to_json_schema(&self) -> Value {
        match self {
            Schema::String { description } => leaf("string", description),
            Schema::Number { description } => leaf("number", description),
            Schema::Integer { description } => leaf("integer", description),
            Schema::Boolean { description } => leaf("boolean", description),
            Schema::Array { description, items } => {
                let mut obj = match leaf("array", description) {
                    Value::Object(m) => m,
                    _ => unreachable!(),
                };
                obj.insert("items".into(), items.to_json_schema());
                Value::Object(obj)
            }
            Schema::Object {
                description,
                properties,
                required,
            } => {
                let mut obj = match leaf("object", description) {
                    Value::Object(m) => m,
                    _ => unreachable!(),
                };
                let props: Map<String, Value> = properties
                    .iter()
                    .map(|p| (p.name.clone(), p.schema.to_json_schema()))
                    .collect();
                obj.insert("properties".into(), Value::Object(props));
                if !required.is_empty() {
                    obj.insert("required".into(), json!(required));
                }
                Value::Object(obj)
            }
            Schema::Raw(value) => value.clone(),
        }
    }
}

fn leaf(type_tag: &str, description: &Option<String>) -> Value {
    let mut obj = Map::new();
    obj.insert("type".into(), json!(type_tag));
    if let Some(d) = description {
        obj.insert("description".into(), json!(d));
    }
    Value::Object(obj)
}
