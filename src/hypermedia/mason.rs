//! Generic Mason document builder.
//!
//! Mason documents are JSON objects with reserved `@controls`,
//! `@namespaces` and `@error` keys. This builder knows nothing about maps;
//! the only application detail it carries is the relation used for DELETE
//! controls, since IANA defines none.

use serde_json::{json, Map, Value};

#[derive(Debug, Clone, Default)]
pub struct MasonBuilder {
    body: Map<String, Value>,
    delete_relation: String,
}

impl MasonBuilder {
    /// Create an empty document whose delete controls use `delete_relation`.
    pub fn new(delete_relation: impl Into<String>) -> Self {
        Self {
            body: Map::new(),
            delete_relation: delete_relation.into(),
        }
    }

    /// Set a plain data field.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.body.insert(key.into(), value);
    }

    /// Copy every field of a JSON object into the document. Non-objects are
    /// ignored.
    pub fn extend(&mut self, fields: Value) {
        if let Value::Object(fields) = fields {
            self.body.extend(fields);
        }
    }

    /// Add an `@error` element. Only meaningful on a root document.
    pub fn add_error(&mut self, title: &str, details: &str) {
        self.body.insert(
            "@error".into(),
            json!({
                "@message": title,
                "@messages": [details],
            }),
        );
    }

    /// Register a link relation namespace.
    pub fn add_namespace(&mut self, ns: &str, uri: &str) {
        let namespaces = self.section("@namespaces");
        namespaces.insert(ns.to_string(), json!({ "name": uri }));
    }

    /// Add a control that is just a link.
    pub fn add_control(&mut self, name: &str, href: &str) {
        self.add_control_with(name, href, Map::new());
    }

    /// Add a control with extra attributes. The attributes keep their order
    /// and `href` is appended last; an existing control of the same name is
    /// replaced.
    pub fn add_control_with(&mut self, name: &str, href: &str, mut attributes: Map<String, Value>) {
        attributes.insert("href".into(), Value::String(href.to_string()));
        let controls = self.section("@controls");
        controls.insert(name.to_string(), Value::Object(attributes));
    }

    /// Add a POST control taking a JSON body described by `schema`.
    pub fn add_control_post(&mut self, name: &str, title: &str, href: &str, schema: Value) {
        let mut attributes = Map::new();
        attributes.insert("method".into(), json!("POST"));
        attributes.insert("encoding".into(), json!("json"));
        attributes.insert("title".into(), json!(title));
        attributes.insert("schema".into(), schema);
        self.add_control_with(name, href, attributes);
    }

    /// Add the `edit` control: a PUT taking a JSON body described by `schema`.
    pub fn add_control_put(&mut self, title: &str, href: &str, schema: Value) {
        let mut attributes = Map::new();
        attributes.insert("method".into(), json!("PUT"));
        attributes.insert("encoding".into(), json!("json"));
        attributes.insert("title".into(), json!(title));
        attributes.insert("schema".into(), schema);
        self.add_control_with("edit", href, attributes);
    }

    /// Add a DELETE control under the builder's delete relation.
    pub fn add_control_delete(&mut self, title: &str, href: &str) {
        let mut attributes = Map::new();
        attributes.insert("method".into(), json!("DELETE"));
        attributes.insert("title".into(), json!(title));
        let relation = self.delete_relation.clone();
        self.add_control_with(&relation, href, attributes);
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.body)
    }

    /// Get (creating on first use) one of the reserved object sections.
    fn section(&mut self, key: &str) -> &mut Map<String, Value> {
        let entry = self
            .body
            .entry(key)
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        match entry {
            Value::Object(section) => section,
            _ => unreachable!("section was just replaced with an object"),
        }
    }
}
