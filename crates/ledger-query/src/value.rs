//! Response values decoded from the service's wire format.
//!
//! The service answers with plain JSON in which a few special values are
//! wrapped in single-key tagged objects:
//!
//! - `{"@ref": {"id": ..., "class": {...}}}` - a reference
//! - `{"@ts": "..."}` - a timestamp
//! - `{"@date": "..."}` - a date
//! - `{"@obj": {...}}` - an object whose keys would otherwise look like tags

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::DecodeError;

/// A reference to a database entity (database, collection, index, key or
/// document).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ref {
    id: String,
    collection: Option<Box<Ref>>,
    database: Option<Box<Ref>>,
}

impl Ref {
    /// Create a reference with only an id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            collection: None,
            database: None,
        }
    }

    /// Set the collection this reference belongs to.
    #[must_use]
    pub fn with_collection(mut self, collection: Ref) -> Self {
        self.collection = Some(Box::new(collection));
        self
    }

    /// The entity id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The collection (class) of the referenced entity, if any.
    #[must_use]
    pub fn collection(&self) -> Option<&Ref> {
        self.collection.as_deref()
    }

    fn from_wire(payload: &serde_json::Value) -> Result<Self, DecodeError> {
        let fields = payload.as_object().ok_or_else(|| DecodeError::MalformedTag {
            tag: "@ref".to_string(),
            reason: "payload is not an object".to_string(),
        })?;

        let id = fields
            .get("id")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| DecodeError::MalformedTag {
                tag: "@ref".to_string(),
                reason: "missing string id".to_string(),
            })?;

        let mut reference = Ref::new(id);
        // Older servers say "class", newer ones "collection".
        if let Some(parent) = fields.get("class").or_else(|| fields.get("collection")) {
            reference.collection = Some(Box::new(Self::from_tagged(parent)?));
        }
        if let Some(parent) = fields.get("database") {
            reference.database = Some(Box::new(Self::from_tagged(parent)?));
        }
        Ok(reference)
    }

    fn from_tagged(json: &serde_json::Value) -> Result<Self, DecodeError> {
        match json.get("@ref") {
            Some(payload) => Self::from_wire(payload),
            None => Err(DecodeError::MalformedTag {
                tag: "@ref".to_string(),
                reason: "nested reference is not tagged".to_string(),
            }),
        }
    }
}

impl fmt::Display for Ref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.collection {
            Some(collection) => write!(f, "ref({}/{})", collection.id, self.id),
            None => write!(f, "ref({})", self.id),
        }
    }
}

impl Serialize for Ref {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct Body<'a>(&'a Ref);

        impl Serialize for Body<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(None)?;
                map.serialize_entry("id", &self.0.id)?;
                if let Some(collection) = &self.0.collection {
                    map.serialize_entry("class", collection)?;
                }
                if let Some(database) = &self.0.database {
                    map.serialize_entry("database", database)?;
                }
                map.end()
            }
        }

        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("@ref", &Body(self))?;
        map.end()
    }
}

/// A value returned by the service.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// JSON null.
    Null,
    /// Boolean.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Floating point number.
    Double(f64),
    /// String.
    Str(String),
    /// Array of values.
    Array(Vec<Value>),
    /// Object with string keys.
    Object(BTreeMap<String, Value>),
    /// Reference to a database entity.
    Ref(Ref),
    /// Timestamp in its wire string form.
    Timestamp(String),
    /// Date in its wire string form.
    Date(String),
}

impl Value {
    /// Decode a value from wire JSON, interpreting tagged objects.
    ///
    /// # Errors
    ///
    /// Returns an error if a tagged object carries a malformed payload.
    pub fn from_wire(json: serde_json::Value) -> Result<Self, DecodeError> {
        Ok(match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Double(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Self::Str(s),
            serde_json::Value::Array(items) => Self::Array(
                items
                    .into_iter()
                    .map(Self::from_wire)
                    .collect::<Result<_, _>>()?,
            ),
            serde_json::Value::Object(map) => Self::decode_object(map)?,
        })
    }

    fn decode_object(map: serde_json::Map<String, serde_json::Value>) -> Result<Self, DecodeError> {
        if map.len() == 1 {
            if let Some((tag, payload)) = map.iter().next() {
                match tag.as_str() {
                    "@ref" => return Ok(Self::Ref(Ref::from_wire(payload)?)),
                    "@ts" => return Ok(Self::Timestamp(tag_string(tag, payload)?)),
                    "@date" => return Ok(Self::Date(tag_string(tag, payload)?)),
                    "@obj" => {
                        let Some(fields) = payload.as_object() else {
                            return Err(DecodeError::MalformedTag {
                                tag: tag.clone(),
                                reason: "payload is not an object".to_string(),
                            });
                        };
                        return Self::plain_object(fields.clone());
                    }
                    _ => {}
                }
            }
        }
        Self::plain_object(map)
    }

    fn plain_object(map: serde_json::Map<String, serde_json::Value>) -> Result<Self, DecodeError> {
        let fields = map
            .into_iter()
            .map(|(k, v)| Self::from_wire(v).map(|v| (k, v)))
            .collect::<Result<BTreeMap<_, _>, _>>()?;
        Ok(Self::Object(fields))
    }

    /// Name of this value's type, used in error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Double(_) => "double",
            Self::Str(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
            Self::Ref(_) => "ref",
            Self::Timestamp(_) => "timestamp",
            Self::Date(_) => "date",
        }
    }

    /// The integer, if this is one.
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The string, if this is one.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// The reference, if this is one.
    #[must_use]
    pub const fn reference(&self) -> Option<&Ref> {
        match self {
            Self::Ref(r) => Some(r),
            _ => None,
        }
    }

    /// The fields, if this is an object.
    #[must_use]
    pub const fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Object(fields) => Some(fields),
            _ => None,
        }
    }

    /// The elements, if this is an array.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Look up a single key of an object.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|fields| fields.get(key))
    }

    /// Walk a path of object keys.
    #[must_use]
    pub fn at(&self, path: &[&str]) -> Option<&Value> {
        path.iter().try_fold(self, |value, key| value.get(key))
    }

    /// Walk a path of object keys, failing if any step is missing.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::MissingField`] naming the full path.
    pub fn field(&self, path: &[&str]) -> Result<&Value, DecodeError> {
        self.at(path).ok_or_else(|| DecodeError::MissingField {
            path: path.join("."),
        })
    }

    /// The integer at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is missing or not an integer.
    pub fn i64_at(&self, path: &[&str]) -> Result<i64, DecodeError> {
        let value = self.field(path)?;
        value.as_i64().ok_or_else(|| unexpected(path, "integer", value))
    }

    /// The string at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is missing or not a string.
    pub fn str_at(&self, path: &[&str]) -> Result<&str, DecodeError> {
        let value = self.field(path)?;
        value.as_str().ok_or_else(|| unexpected(path, "string", value))
    }

    /// The reference at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is missing or not a reference.
    pub fn ref_at(&self, path: &[&str]) -> Result<&Ref, DecodeError> {
        let value = self.field(path)?;
        value.reference().ok_or_else(|| unexpected(path, "ref", value))
    }
}

fn tag_string(tag: &str, payload: &serde_json::Value) -> Result<String, DecodeError> {
    payload
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| DecodeError::MalformedTag {
            tag: tag.to_string(),
            reason: "payload is not a string".to_string(),
        })
}

fn unexpected(path: &[&str], expected: &'static str, found: &Value) -> DecodeError {
    DecodeError::UnexpectedType {
        path: path.join("."),
        expected,
        found: found.type_name(),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Double(d) => write!(f, "{d}"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Object(fields) => {
                f.write_str("{")?;
                for (i, (key, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
            Self::Ref(r) => write!(f, "{r}"),
            Self::Timestamp(ts) => write!(f, "ts({ts})"),
            Self::Date(date) => write!(f, "date({date})"),
        }
    }
}

impl From<Ref> for Value {
    fn from(r: Ref) -> Self {
        Self::Ref(r)
    }
}
