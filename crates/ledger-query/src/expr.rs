//! Query expressions and their wire encoding.
//!
//! An [`Expr`] is a tree sent to the service as a single request and evaluated
//! there. The free functions in this module build the tree the way the query
//! reads:
//!
//! ```
//! use ledger_query::expr::{class, create, obj};
//!
//! let query = create(class("customers"), obj([("data", obj([("id", 0.into()), ("balance", 100.into())]))]));
//! assert_eq!(
//!     serde_json::to_value(&query).unwrap(),
//!     serde_json::json!({
//!         "create": { "class": "customers" },
//!         "params": { "object": { "data": { "object": { "balance": 100, "id": 0 } } } }
//!     })
//! );
//! ```

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::value::Ref;

/// A key path into a value, e.g. `["data", "balance"]`, used by [`select`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path(Vec<String>);

impl From<&str> for Path {
    fn from(key: &str) -> Self {
        Self(vec![key.to_string()])
    }
}

impl<const N: usize> From<[&str; N]> for Path {
    fn from(keys: [&str; N]) -> Self {
        Self(keys.iter().map(|k| (*k).to_string()).collect())
    }
}

impl From<&[&str]> for Path {
    fn from(keys: &[&str]) -> Self {
        Self(keys.iter().map(|k| (*k).to_string()).collect())
    }
}

impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // A single key goes on the wire bare, longer paths as an array.
        match self.0.as_slice() {
            [single] => serializer.serialize_str(single),
            keys => keys.serialize(serializer),
        }
    }
}

/// A query expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Literal boolean.
    Bool(bool),
    /// Literal integer.
    Int(i64),
    /// Literal string.
    Str(String),
    /// Array whose elements are evaluated in order.
    Array(Vec<Expr>),
    /// Object literal whose field values are evaluated.
    Object(BTreeMap<String, Expr>),
    /// Reference literal.
    Ref(Ref),
    /// Reference to a bound variable.
    Var(String),
    /// Reference to a database by name.
    Database(String),
    /// Reference to a collection by name.
    Class(String),
    /// Reference to an index by name.
    Index(String),
    /// Whether the referenced entity exists.
    Exists(Box<Expr>),
    /// Delete the referenced entity.
    Delete(Box<Expr>),
    /// Create a database from a params object.
    CreateDatabase(Box<Expr>),
    /// Create a key from a params object.
    CreateKey(Box<Expr>),
    /// Create a collection from a params object.
    CreateClass(Box<Expr>),
    /// Create an index from a params object.
    CreateIndex(Box<Expr>),
    /// Create a document in a collection.
    Create {
        /// Collection reference.
        class: Box<Expr>,
        /// Params object, usually `{"data": ...}`.
        params: Box<Expr>,
    },
    /// Merge params into an existing document.
    Update {
        /// Document reference.
        reference: Box<Expr>,
        /// Params object, usually `{"data": ...}`.
        params: Box<Expr>,
    },
    /// Fetch a document by reference or from a set.
    Get(Box<Expr>),
    /// The set of index entries matching a term.
    Match {
        /// Index reference.
        index: Box<Expr>,
        /// Term value.
        terms: Box<Expr>,
    },
    /// Extract the value at a path.
    Select {
        /// Path to extract.
        path: Path,
        /// Value to extract from.
        from: Box<Expr>,
    },
    /// Subtract the remaining operands from the first.
    Subtract(Vec<Expr>),
    /// Whether the operands are in non-increasing order.
    Gte(Vec<Expr>),
    /// Conditional.
    If {
        /// Boolean condition.
        cond: Box<Expr>,
        /// Result when the condition is true.
        then: Box<Expr>,
        /// Result when the condition is false.
        otherwise: Box<Expr>,
    },
    /// Bind variables visible only within `body`.
    Let {
        /// Bindings, evaluated in order.
        bindings: Vec<(String, Expr)>,
        /// Expression the bindings are scoped to.
        body: Box<Expr>,
    },
    /// Single-parameter function, used with [`Expr::Map`].
    Lambda {
        /// Parameter name.
        param: String,
        /// Function body.
        body: Box<Expr>,
    },
    /// Apply a lambda to every element of an array.
    Map {
        /// Array to map over.
        collection: Box<Expr>,
        /// Lambda to apply.
        lambda: Box<Expr>,
    },
}

impl From<i64> for Expr {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Expr {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<bool> for Expr {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for Expr {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Expr {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<Ref> for Expr {
    fn from(r: Ref) -> Self {
        Self::Ref(r)
    }
}

impl From<&Ref> for Expr {
    fn from(r: &Ref) -> Self {
        Self::Ref(r.clone())
    }
}

impl From<Vec<Expr>> for Expr {
    fn from(items: Vec<Expr>) -> Self {
        Self::Array(items)
    }
}

/// Serializes its fields as a JSON object of evaluated expressions.
struct Fields<'a>(&'a BTreeMap<String, Expr>);

impl Serialize for Fields<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Serializes let bindings: one binding as an object, several as an array of
/// single-entry objects so the service evaluates them in order.
struct Bindings<'a>(&'a [(String, Expr)]);

impl Serialize for Bindings<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct One<'a>(&'a str, &'a Expr);

        impl Serialize for One<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(self.0, self.1)?;
                map.end()
            }
        }

        match self.0 {
            [(name, value)] => One(name, value).serialize(serializer),
            bindings => serializer.collect_seq(bindings.iter().map(|(n, v)| One(n, v))),
        }
    }
}

impl Serialize for Expr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        fn single<S: Serializer, V: Serialize + ?Sized>(
            serializer: S,
            key: &str,
            value: &V,
        ) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(1))?;
            map.serialize_entry(key, value)?;
            map.end()
        }

        fn pair<S: Serializer, A: Serialize + ?Sized, B: Serialize + ?Sized>(
            serializer: S,
            (k1, v1): (&str, &A),
            (k2, v2): (&str, &B),
        ) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(2))?;
            map.serialize_entry(k1, v1)?;
            map.serialize_entry(k2, v2)?;
            map.end()
        }

        match self {
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(i) => serializer.serialize_i64(*i),
            Self::Str(s) => serializer.serialize_str(s),
            Self::Array(items) => serializer.collect_seq(items),
            Self::Object(fields) => single(serializer, "object", &Fields(fields)),
            Self::Ref(r) => r.serialize(serializer),
            Self::Var(name) => single(serializer, "var", name),
            Self::Database(name) => single(serializer, "database", name),
            Self::Class(name) => single(serializer, "class", name),
            Self::Index(name) => single(serializer, "index", name),
            Self::Exists(e) => single(serializer, "exists", e),
            Self::Delete(e) => single(serializer, "delete", e),
            Self::CreateDatabase(p) => single(serializer, "create_database", p),
            Self::CreateKey(p) => single(serializer, "create_key", p),
            Self::CreateClass(p) => single(serializer, "create_class", p),
            Self::CreateIndex(p) => single(serializer, "create_index", p),
            Self::Create { class, params } => pair(serializer, ("create", class), ("params", params)),
            Self::Update { reference, params } => {
                pair(serializer, ("update", reference), ("params", params))
            }
            Self::Get(e) => single(serializer, "get", e),
            Self::Match { index, terms } => pair(serializer, ("match", index), ("terms", terms)),
            Self::Select { path, from } => pair(serializer, ("select", path), ("from", from)),
            Self::Subtract(operands) => single(serializer, "subtract", operands),
            Self::Gte(operands) => single(serializer, "gte", operands),
            Self::If {
                cond,
                then,
                otherwise,
            } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("if", cond)?;
                map.serialize_entry("then", then)?;
                map.serialize_entry("else", otherwise)?;
                map.end()
            }
            Self::Let { bindings, body } => {
                pair(serializer, ("let", &Bindings(bindings)), ("in", body))
            }
            Self::Lambda { param, body } => pair(serializer, ("lambda", param), ("expr", body)),
            Self::Map { collection, lambda } => {
                pair(serializer, ("map", lambda), ("collection", collection))
            }
        }
    }
}

/// Object literal from `(key, value)` pairs.
#[must_use]
pub fn obj<K: Into<String>>(fields: impl IntoIterator<Item = (K, Expr)>) -> Expr {
    Expr::Object(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
}

/// Array literal.
#[must_use]
pub fn arr(items: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::Array(items.into_iter().collect())
}

/// Variable reference.
#[must_use]
pub fn var(name: impl Into<String>) -> Expr {
    Expr::Var(name.into())
}

/// Database reference by name.
#[must_use]
pub fn database(name: impl Into<String>) -> Expr {
    Expr::Database(name.into())
}

/// Collection reference by name.
#[must_use]
pub fn class(name: impl Into<String>) -> Expr {
    Expr::Class(name.into())
}

/// Index reference by name.
#[must_use]
pub fn index(name: impl Into<String>) -> Expr {
    Expr::Index(name.into())
}

/// Whether the referenced entity exists.
#[must_use]
pub fn exists(reference: Expr) -> Expr {
    Expr::Exists(Box::new(reference))
}

/// Delete the referenced entity.
#[must_use]
pub fn delete(reference: Expr) -> Expr {
    Expr::Delete(Box::new(reference))
}

/// Create a database.
#[must_use]
pub fn create_database(params: Expr) -> Expr {
    Expr::CreateDatabase(Box::new(params))
}

/// Create a key.
#[must_use]
pub fn create_key(params: Expr) -> Expr {
    Expr::CreateKey(Box::new(params))
}

/// Create a collection.
#[must_use]
pub fn create_class(params: Expr) -> Expr {
    Expr::CreateClass(Box::new(params))
}

/// Create an index.
#[must_use]
pub fn create_index(params: Expr) -> Expr {
    Expr::CreateIndex(Box::new(params))
}

/// Create a document in a collection.
#[must_use]
pub fn create(class: Expr, params: Expr) -> Expr {
    Expr::Create {
        class: Box::new(class),
        params: Box::new(params),
    }
}

/// Merge params into an existing document.
#[must_use]
pub fn update(reference: Expr, params: Expr) -> Expr {
    Expr::Update {
        reference: Box::new(reference),
        params: Box::new(params),
    }
}

/// Fetch a document.
#[must_use]
pub fn get(target: Expr) -> Expr {
    Expr::Get(Box::new(target))
}

/// The set of entries of `index` matching `term`.
#[must_use]
pub fn match_term(index: Expr, term: impl Into<Expr>) -> Expr {
    Expr::Match {
        index: Box::new(index),
        terms: Box::new(term.into()),
    }
}

/// Extract the value at `path` from `from`.
#[must_use]
pub fn select(path: impl Into<Path>, from: Expr) -> Expr {
    Expr::Select {
        path: path.into(),
        from: Box::new(from),
    }
}

/// `a - b`.
#[must_use]
pub fn subtract(a: impl Into<Expr>, b: impl Into<Expr>) -> Expr {
    Expr::Subtract(vec![a.into(), b.into()])
}

/// `a >= b`.
#[must_use]
pub fn gte(a: impl Into<Expr>, b: impl Into<Expr>) -> Expr {
    Expr::Gte(vec![a.into(), b.into()])
}

/// `if cond { then } else { otherwise }`.
#[must_use]
pub fn if_then_else(cond: Expr, then: impl Into<Expr>, otherwise: impl Into<Expr>) -> Expr {
    Expr::If {
        cond: Box::new(cond),
        then: Box::new(then.into()),
        otherwise: Box::new(otherwise.into()),
    }
}

/// Bind `name` to `value` within `body`.
#[must_use]
pub fn let_in(name: impl Into<String>, value: Expr, body: Expr) -> Expr {
    Expr::Let {
        bindings: vec![(name.into(), value)],
        body: Box::new(body),
    }
}

/// Single-parameter lambda.
#[must_use]
pub fn lambda(param: impl Into<String>, body: Expr) -> Expr {
    Expr::Lambda {
        param: param.into(),
        body: Box::new(body),
    }
}

/// Apply `lambda` to every element of `collection`.
#[must_use]
pub fn map(collection: Expr, lambda: Expr) -> Expr {
    Expr::Map {
        collection: Box::new(collection),
        lambda: Box::new(lambda),
    }
}
