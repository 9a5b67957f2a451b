//! Common test utilities for ledger demo integration tests.
//!
//! [`FakeLedger`] evaluates the subset of the query language the demo sends,
//! keeps its databases in memory and answers through a wiremock server. Each
//! request is atomic: a failing expression leaves no partial writes behind.

#![allow(dead_code)] // Some utilities are used by different test files

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde_json::{json, Map, Value as Json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use ledger_client::LedgerClient;
use ledger_demo::customers::{CUSTOMERS, CUSTOMER_BY_ID, TRANSACTIONS};
use ledger_demo::provision::{create_collections, create_unique_index, open_session, recreate_database};
use ledger_demo::{admin_client, DemoConfig};

/// Administrative secret the fake accepts.
pub const ADMIN_SECRET: &str = "secret";

const EPOCH_MICROS: i64 = 1_520_225_686_370_000;

/// Start a mock endpoint backed by a fresh fake ledger.
pub async fn start() -> (MockServer, FakeLedger) {
    let server = MockServer::start().await;
    let ledger = FakeLedger::default();

    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ledger.clone())
        .mount(&server)
        .await;

    (server, ledger)
}

/// Default demo configuration pointed at `server`.
pub fn config_for(server: &MockServer) -> DemoConfig {
    DemoConfig {
        endpoint: server.uri(),
        admin_secret: ADMIN_SECRET.to_string(),
        ..DemoConfig::default()
    }
}

/// Recreate `config.database` with its collections and index, returning a session.
pub async fn provisioned_session(config: &DemoConfig) -> LedgerClient {
    let admin = admin_client(config).expect("admin client");
    recreate_database(&admin, &config.database)
        .await
        .expect("recreate database");
    let session = open_session(&admin, &config.database)
        .await
        .expect("open session");
    create_collections(&session, &[CUSTOMERS, TRANSACTIONS])
        .await
        .expect("create collections");
    create_unique_index(&session, CUSTOMER_BY_ID, CUSTOMERS, &["data", "id"])
        .await
        .expect("create index");
    session
}

/// In-memory ledger database answering wire-format queries.
#[derive(Clone, Default)]
pub struct FakeLedger {
    state: Arc<Mutex<State>>,
}

impl FakeLedger {
    /// Whether a database with this name exists.
    pub fn has_database(&self, name: &str) -> bool {
        self.state.lock().unwrap().databases.contains_key(name)
    }

    /// Whether `database` has a collection named `class`.
    pub fn has_class(&self, database: &str, class: &str) -> bool {
        self.state
            .lock()
            .unwrap()
            .databases
            .get(database)
            .is_some_and(|db| db.classes.contains_key(class))
    }

    /// Number of documents in `class`.
    pub fn document_count(&self, database: &str, class: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .databases
            .get(database)
            .and_then(|db| db.documents.get(class))
            .map_or(0, BTreeMap::len)
    }

    /// Stored balance of the customer with `customer_id`, read without a query.
    pub fn balance_of(&self, database: &str, customer_id: i64) -> Option<i64> {
        let state = self.state.lock().unwrap();
        state
            .databases
            .get(database)?
            .documents
            .get(CUSTOMERS)?
            .values()
            .find(|doc| doc.data["id"] == json!(customer_id))
            .and_then(|doc| doc.data["balance"].as_i64())
    }
}

impl Respond for FakeLedger {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let mut state = self.state.lock().unwrap();

        let auth = request
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        let scope = if auth == basic_auth(ADMIN_SECRET) {
            Scope::Admin
        } else if let Some(database) = state.keys.get(auth) {
            Scope::Session(database.clone())
        } else {
            return failure_response(&Failure::new(401, "unauthorized", "Unauthorized"));
        };

        let Ok(query) = serde_json::from_slice::<Json>(&request.body) else {
            return failure_response(&Failure::invalid("Request body is not valid JSON."));
        };

        state.clock += 1;
        let snapshot = state.clone();
        let result = Eval {
            state: &mut state,
            scope,
        }
        .eval(&query, &Env::new());

        match result {
            Ok(resource) => ResponseTemplate::new(200).set_body_json(json!({ "resource": resource })),
            Err(failure) => {
                *state = snapshot;
                failure_response(&failure)
            }
        }
    }
}

#[derive(Clone, Default)]
struct State {
    databases: BTreeMap<String, Database>,
    /// Authorization header value -> database name.
    keys: HashMap<String, String>,
    clock: i64,
    next_id: u64,
}

impl State {
    fn now(&self) -> i64 {
        EPOCH_MICROS + self.clock
    }

    fn next_id(&mut self) -> String {
        self.next_id += 1;
        format!("{}", 190_000_000_000_000_000_u64 + self.next_id)
    }
}

#[derive(Clone, Default)]
struct Database {
    classes: BTreeMap<String, i64>,
    indexes: BTreeMap<String, IndexDef>,
    documents: BTreeMap<String, BTreeMap<String, Document>>,
}

#[derive(Clone)]
struct IndexDef {
    source: String,
    unique: bool,
    field: Vec<String>,
}

#[derive(Clone)]
struct Document {
    ts: i64,
    data: Json,
}

enum Scope {
    Admin,
    Session(String),
}

type Env = BTreeMap<String, Json>;

struct Failure {
    status: u16,
    code: &'static str,
    description: String,
}

impl Failure {
    fn new(status: u16, code: &'static str, description: impl Into<String>) -> Self {
        Self {
            status,
            code,
            description: description.into(),
        }
    }

    fn invalid(description: impl Into<String>) -> Self {
        Self::new(400, "invalid expression", description)
    }

    fn argument(description: impl Into<String>) -> Self {
        Self::new(400, "invalid argument", description)
    }

    fn invalid_ref(description: impl Into<String>) -> Self {
        Self::new(400, "invalid ref", description)
    }

    fn not_found(description: impl Into<String>) -> Self {
        Self::new(404, "instance not found", description)
    }
}

fn failure_response(failure: &Failure) -> ResponseTemplate {
    ResponseTemplate::new(failure.status).set_body_json(json!({
        "errors": [{ "position": [], "code": failure.code, "description": failure.description }]
    }))
}

enum RefKind {
    Database(String),
    Class(String),
    Index(String),
    Document { class: String, id: String },
}

fn builtin_ref(id: &str, parent: &str) -> Json {
    json!({ "@ref": { "id": id, "class": { "@ref": { "id": parent } } } })
}

fn database_ref(name: &str) -> Json {
    builtin_ref(name, "databases")
}

fn class_ref(name: &str) -> Json {
    builtin_ref(name, "classes")
}

fn index_ref(name: &str) -> Json {
    builtin_ref(name, "indexes")
}

fn document_ref(class: &str, id: &str) -> Json {
    json!({ "@ref": { "id": id, "class": class_ref(class) } })
}

fn parse_ref(value: &Json) -> Result<RefKind, Failure> {
    let inner = value
        .get("@ref")
        .ok_or_else(|| Failure::argument("Ref expected."))?;
    let id = inner
        .get("id")
        .and_then(Json::as_str)
        .ok_or_else(|| Failure::argument("Ref expected."))?
        .to_string();
    let parent = inner
        .get("class")
        .and_then(|c| c.get("@ref"))
        .and_then(|c| c.get("id"))
        .and_then(Json::as_str)
        .ok_or_else(|| Failure::invalid_ref("Ref has no class."))?;

    Ok(match parent {
        "databases" => RefKind::Database(id),
        "classes" => RefKind::Class(id),
        "indexes" => RefKind::Index(id),
        class => RefKind::Document {
            class: class.to_string(),
            id,
        },
    })
}

fn walk<'a>(value: &'a Json, path: &[String]) -> Option<&'a Json> {
    path.iter().try_fold(value, |v, key| v.get(key.as_str()))
}

fn merge(target: &mut Json, patch: &Json) {
    match (target, patch) {
        (Json::Object(existing), Json::Object(changes)) => {
            for (key, change) in changes {
                if change.is_null() {
                    existing.remove(key);
                } else {
                    merge(existing.entry(key.clone()).or_insert(Json::Null), change);
                }
            }
        }
        (target, patch) => *target = patch.clone(),
    }
}

/// `Authorization` header value for a secret with an empty password.
pub fn basic_auth(secret: &str) -> String {
    format!("Basic {}", BASE64.encode(format!("{secret}:")))
}

struct Eval<'a> {
    state: &'a mut State,
    scope: Scope,
}

impl Eval<'_> {
    fn eval(&mut self, expr: &Json, env: &Env) -> Result<Json, Failure> {
        match expr {
            Json::Array(items) => items
                .iter()
                .map(|item| self.eval(item, env))
                .collect::<Result<Vec<_>, _>>()
                .map(Json::Array),
            Json::Object(form) => self.eval_form(form, env),
            scalar => Ok(scalar.clone()),
        }
    }

    fn arg<'f>(form: &'f Map<String, Json>, key: &str) -> Result<&'f Json, Failure> {
        form.get(key)
            .ok_or_else(|| Failure::invalid(format!("Missing {key} argument.")))
    }

    fn eval_form(&mut self, form: &Map<String, Json>, env: &Env) -> Result<Json, Failure> {
        if form.contains_key("@ref") {
            return Ok(Json::Object(form.clone()));
        }
        if let Some(fields) = form.get("object") {
            let fields = fields
                .as_object()
                .ok_or_else(|| Failure::invalid("Object expected."))?;
            let mut evaluated = Map::new();
            for (key, value) in fields {
                evaluated.insert(key.clone(), self.eval(value, env)?);
            }
            return Ok(Json::Object(evaluated));
        }
        if let Some(name) = form.get("var") {
            let name = name.as_str().unwrap_or_default();
            return env
                .get(name)
                .cloned()
                .ok_or_else(|| Failure::new(400, "unbound variable", format!("{name} is unbound.")));
        }
        if let Some(bindings) = form.get("let") {
            return self.eval_let(bindings, Self::arg(form, "in")?, env);
        }
        if let Some(lambda) = form.get("map") {
            return self.eval_map(lambda, Self::arg(form, "collection")?, env);
        }
        if let Some(cond) = form.get("if") {
            let branch = match self.eval(cond, env)? {
                Json::Bool(true) => "then",
                Json::Bool(false) => "else",
                _ => return Err(Failure::argument("Boolean expected.")),
            };
            return self.eval(Self::arg(form, branch)?, env);
        }
        if let Some(name) = form.get("database") {
            return Ok(database_ref(name.as_str().unwrap_or_default()));
        }
        if let Some(name) = form.get("class") {
            return Ok(class_ref(name.as_str().unwrap_or_default()));
        }
        if let Some(name) = form.get("index") {
            return Ok(index_ref(name.as_str().unwrap_or_default()));
        }
        if let Some(target) = form.get("exists") {
            let reference = self.eval(target, env)?;
            return self.exists(&reference).map(Json::Bool);
        }
        if let Some(target) = form.get("delete") {
            let reference = self.eval(target, env)?;
            return self.delete(&reference);
        }
        if let Some(params) = form.get("create_database") {
            let params = self.eval(params, env)?;
            return self.create_database(&params);
        }
        if let Some(params) = form.get("create_key") {
            let params = self.eval(params, env)?;
            return self.create_key(&params);
        }
        if let Some(params) = form.get("create_class") {
            let params = self.eval(params, env)?;
            return self.create_class(&params);
        }
        if let Some(params) = form.get("create_index") {
            let params = self.eval(params, env)?;
            return self.create_index(&params);
        }
        if let Some(class) = form.get("create") {
            let class = self.eval(class, env)?;
            let params = self.eval(Self::arg(form, "params")?, env)?;
            return self.create(&class, &params);
        }
        if let Some(target) = form.get("update") {
            let reference = self.eval(target, env)?;
            let params = self.eval(Self::arg(form, "params")?, env)?;
            return self.update(&reference, &params);
        }
        if let Some(target) = form.get("get") {
            let target = self.eval(target, env)?;
            return self.get(&target);
        }
        if let Some(index) = form.get("match") {
            let index = self.eval(index, env)?;
            let terms = self.eval(Self::arg(form, "terms")?, env)?;
            return Ok(json!({ "@set": { "match": index, "terms": terms } }));
        }
        if let Some(path) = form.get("select") {
            let path = self.eval(path, env)?;
            let from = self.eval(Self::arg(form, "from")?, env)?;
            return select(&path, &from);
        }
        if let Some(operands) = form.get("subtract") {
            let values = self.integers(operands, env)?;
            let (first, rest) = values
                .split_first()
                .ok_or_else(|| Failure::argument("Non-empty array expected."))?;
            return Ok(json!(rest.iter().fold(*first, |acc, v| acc - v)));
        }
        if let Some(operands) = form.get("gte") {
            let values = self.integers(operands, env)?;
            return Ok(Json::Bool(values.windows(2).all(|w| w[0] >= w[1])));
        }

        Err(Failure::invalid("No form/function found, or invalid argument keys."))
    }

    fn eval_let(&mut self, bindings: &Json, body: &Json, env: &Env) -> Result<Json, Failure> {
        let mut scope = env.clone();
        let ordered: Vec<(&String, &Json)> = match bindings {
            Json::Object(map) => map.iter().collect(),
            Json::Array(items) => items
                .iter()
                .filter_map(Json::as_object)
                .flat_map(|map| map.iter())
                .collect(),
            _ => return Err(Failure::invalid("Let bindings must be an object.")),
        };
        for (name, value) in ordered {
            let value = self.eval(value, &scope)?;
            scope.insert(name.clone(), value);
        }
        self.eval(body, &scope)
    }

    fn eval_map(&mut self, lambda: &Json, collection: &Json, env: &Env) -> Result<Json, Failure> {
        let param = lambda
            .get("lambda")
            .and_then(Json::as_str)
            .ok_or_else(|| Failure::argument("Lambda expected."))?;
        let body = lambda
            .get("expr")
            .ok_or_else(|| Failure::argument("Lambda expected."))?;
        let Json::Array(items) = self.eval(collection, env)? else {
            return Err(Failure::argument("Array expected."));
        };

        let mut results = Vec::with_capacity(items.len());
        for item in items {
            let mut scope = env.clone();
            scope.insert(param.to_string(), item);
            results.push(self.eval(body, &scope)?);
        }
        Ok(Json::Array(results))
    }

    fn integers(&mut self, operands: &Json, env: &Env) -> Result<Vec<i64>, Failure> {
        let Json::Array(values) = self.eval(operands, env)? else {
            return Err(Failure::argument("Array expected."));
        };
        values
            .iter()
            .map(|v| v.as_i64().ok_or_else(|| Failure::argument("Number expected.")))
            .collect()
    }

    fn require_admin(&self) -> Result<(), Failure> {
        match self.scope {
            Scope::Admin => Ok(()),
            Scope::Session(_) => Err(Failure::new(
                403,
                "permission denied",
                "Insufficient privileges to perform the action.",
            )),
        }
    }

    fn database(&mut self) -> Result<&mut Database, Failure> {
        let Scope::Session(name) = &self.scope else {
            return Err(Failure::invalid_ref("Ref refers to undefined class."));
        };
        self.state
            .databases
            .get_mut(name)
            .ok_or_else(|| Failure::new(401, "unauthorized", "Unauthorized"))
    }

    fn exists(&mut self, reference: &Json) -> Result<bool, Failure> {
        Ok(match parse_ref(reference)? {
            RefKind::Database(name) => {
                self.require_admin()?;
                self.state.databases.contains_key(&name)
            }
            RefKind::Class(name) => self.database()?.classes.contains_key(&name),
            RefKind::Index(name) => self.database()?.indexes.contains_key(&name),
            RefKind::Document { class, id } => self
                .database()?
                .documents
                .get(&class)
                .is_some_and(|docs| docs.contains_key(&id)),
        })
    }

    fn delete(&mut self, reference: &Json) -> Result<Json, Failure> {
        let ts = self.state.now();
        match parse_ref(reference)? {
            RefKind::Database(name) => {
                self.require_admin()?;
                if self.state.databases.remove(&name).is_none() {
                    return Err(Failure::not_found("Database not found."));
                }
                self.state.keys.retain(|_, database| *database != name);
                Ok(json!({ "ref": database_ref(&name), "name": name, "ts": ts }))
            }
            RefKind::Document { class, id } => {
                let removed = self
                    .database()?
                    .documents
                    .get_mut(&class)
                    .and_then(|docs| docs.remove(&id))
                    .ok_or_else(|| Failure::not_found("Document not found."))?;
                Ok(json!({ "ref": document_ref(&class, &id), "ts": removed.ts, "data": removed.data }))
            }
            RefKind::Class(_) | RefKind::Index(_) => {
                Err(Failure::argument("Only databases and documents can be deleted here."))
            }
        }
    }

    fn create_database(&mut self, params: &Json) -> Result<Json, Failure> {
        self.require_admin()?;
        let name = params["name"]
            .as_str()
            .ok_or_else(|| Failure::new(400, "validation failed", "name is required."))?;
        if self.state.databases.contains_key(name) {
            return Err(Failure::new(400, "instance already exists", "Database already exists."));
        }
        self.state.databases.insert(name.to_string(), Database::default());
        Ok(json!({ "ref": database_ref(name), "name": name, "ts": self.state.now() }))
    }

    fn create_key(&mut self, params: &Json) -> Result<Json, Failure> {
        self.require_admin()?;
        let RefKind::Database(name) = parse_ref(&params["database"])? else {
            return Err(Failure::argument("Database ref expected."));
        };
        if !self.state.databases.contains_key(&name) {
            return Err(Failure::invalid_ref("Database does not exist."));
        }
        let role = params["role"].as_str().unwrap_or("server");

        let id = self.state.next_id();
        let secret = format!("fnKey{id}");
        self.state.keys.insert(basic_auth(&secret), name.clone());

        Ok(json!({
            "ref": builtin_ref(&id, "keys"),
            "database": database_ref(&name),
            "role": role,
            "secret": secret,
            "hashed_secret": format!("$2a$05$hashed{id}"),
            "ts": self.state.now()
        }))
    }

    fn create_class(&mut self, params: &Json) -> Result<Json, Failure> {
        let name = params["name"]
            .as_str()
            .ok_or_else(|| Failure::new(400, "validation failed", "name is required."))?
            .to_string();
        let ts = self.state.now();
        let db = self.database()?;
        if db.classes.contains_key(&name) {
            return Err(Failure::new(400, "instance already exists", "Class already exists."));
        }
        db.classes.insert(name.clone(), ts);
        db.documents.insert(name.clone(), BTreeMap::new());
        Ok(json!({ "ref": class_ref(&name), "name": name, "ts": ts, "history_days": 30 }))
    }

    fn create_index(&mut self, params: &Json) -> Result<Json, Failure> {
        let name = params["name"]
            .as_str()
            .ok_or_else(|| Failure::new(400, "validation failed", "name is required."))?
            .to_string();
        let RefKind::Class(source) = parse_ref(&params["source"])? else {
            return Err(Failure::argument("Class ref expected."));
        };
        let unique = params["unique"].as_bool().unwrap_or(false);
        let term = match &params["terms"] {
            Json::Array(terms) => terms.first().cloned().unwrap_or(Json::Null),
            other => other.clone(),
        };
        let field: Vec<String> = match &term["field"] {
            Json::String(key) => vec![key.clone()],
            Json::Array(keys) => keys.iter().filter_map(Json::as_str).map(str::to_string).collect(),
            _ => return Err(Failure::new(400, "validation failed", "terms must name a field.")),
        };

        let ts = self.state.now();
        let db = self.database()?;
        if !db.classes.contains_key(&source) {
            return Err(Failure::invalid_ref("Source class does not exist."));
        }
        if db.indexes.contains_key(&name) {
            return Err(Failure::new(400, "instance already exists", "Index already exists."));
        }
        db.indexes.insert(
            name.clone(),
            IndexDef {
                source: source.clone(),
                unique,
                field,
            },
        );

        Ok(json!({
            "ref": index_ref(&name),
            "name": name,
            "source": class_ref(&source),
            "unique": unique,
            "terms": [term],
            "active": true,
            "partitions": 1,
            "ts": ts
        }))
    }

    fn create(&mut self, class: &Json, params: &Json) -> Result<Json, Failure> {
        let RefKind::Class(class) = parse_ref(class)? else {
            return Err(Failure::argument("Class ref expected."));
        };
        let data = match &params["data"] {
            Json::Null => json!({}),
            data @ Json::Object(_) => data.clone(),
            _ => return Err(Failure::argument("Object expected.")),
        };

        let id = self.state.next_id();
        let ts = self.state.now();
        let db = self.database()?;
        if !db.classes.contains_key(&class) {
            return Err(Failure::invalid_ref("Ref refers to undefined class."));
        }
        check_unique(db, &class, None, &data)?;

        let document = Document { ts, data };
        let rendered = render(&class, &id, &document);
        db.documents.entry(class).or_default().insert(id, document);
        Ok(rendered)
    }

    fn update(&mut self, reference: &Json, params: &Json) -> Result<Json, Failure> {
        let RefKind::Document { class, id } = parse_ref(reference)? else {
            return Err(Failure::argument("Document ref expected."));
        };
        let ts = self.state.now();
        let db = self.database()?;

        let mut data = db
            .documents
            .get(&class)
            .and_then(|docs| docs.get(&id))
            .map(|doc| doc.data.clone())
            .ok_or_else(|| Failure::not_found("Document not found."))?;
        if !params["data"].is_null() {
            merge(&mut data, &params["data"]);
        }
        check_unique(db, &class, Some(&id), &data)?;

        let document = Document { ts, data };
        let rendered = render(&class, &id, &document);
        db.documents.entry(class).or_default().insert(id, document);
        Ok(rendered)
    }

    fn get(&mut self, target: &Json) -> Result<Json, Failure> {
        if let Some(set) = target.get("@set") {
            let RefKind::Index(index) = parse_ref(&set["match"])? else {
                return Err(Failure::argument("Index ref expected."));
            };
            let terms = &set["terms"];
            let db = self.database()?;
            let def = db
                .indexes
                .get(&index)
                .ok_or_else(|| Failure::invalid_ref("Ref refers to undefined index."))?;
            let docs = db.documents.get(&def.source);
            return docs
                .and_then(|docs| {
                    docs.iter()
                        .find(|(_, doc)| term_of(&def.field, &doc.data) == Some(terms))
                        .map(|(id, doc)| render(&def.source, id, doc))
                })
                .ok_or_else(|| Failure::not_found("Set not found."));
        }

        let RefKind::Document { class, id } = parse_ref(target)? else {
            return Err(Failure::argument("Document ref or set expected."));
        };
        let db = self.database()?;
        db.documents
            .get(&class)
            .and_then(|docs| docs.get(&id))
            .map(|doc| render(&class, &id, doc))
            .ok_or_else(|| Failure::not_found("Document not found."))
    }
}

/// The indexed term of a document's data, for a field path starting at the document root.
fn term_of<'a>(field: &[String], data: &'a Json) -> Option<&'a Json> {
    match field.split_first() {
        Some((root, rest)) if root == "data" => walk(data, rest).filter(|v| !v.is_null()),
        _ => None,
    }
}

fn check_unique(db: &Database, class: &str, own_id: Option<&str>, data: &Json) -> Result<(), Failure> {
    let Some(docs) = db.documents.get(class) else {
        return Ok(());
    };
    for def in db.indexes.values().filter(|d| d.unique && d.source == class) {
        let Some(term) = term_of(&def.field, data) else {
            continue;
        };
        let clash = docs
            .iter()
            .filter(|(id, _)| Some(id.as_str()) != own_id)
            .any(|(_, doc)| term_of(&def.field, &doc.data) == Some(term));
        if clash {
            return Err(Failure::new(400, "instance not unique", "document is not unique."));
        }
    }
    Ok(())
}

fn render(class: &str, id: &str, doc: &Document) -> Json {
    json!({
        "ref": document_ref(class, id),
        "class": class_ref(class),
        "ts": doc.ts,
        "data": doc.data
    })
}

fn select(path: &Json, from: &Json) -> Result<Json, Failure> {
    let segments = match path {
        Json::Array(segments) => segments.clone(),
        single => vec![single.clone()],
    };
    let mut current = from;
    for segment in &segments {
        let next = match segment {
            Json::String(key) => current.get(key.as_str()),
            Json::Number(n) => n
                .as_u64()
                .and_then(|i| usize::try_from(i).ok())
                .and_then(|i| current.get(i)),
            _ => return Err(Failure::argument("Path segment expected.")),
        };
        current = next.ok_or_else(|| Failure::new(404, "value not found", "Value not found at path."))?;
    }
    Ok(current.clone())
}
