//! Request body validation.
//!
//! # Data Flow
//! ```text
//! serde_json::Value (any JSON the client sent)
//!     → JSON schema check (jsonschema, same schema the controls advertise)
//!     → typed payload (serde)
//! ```
//!
//! # Design Decisions
//! - Schemas are compiled once at startup and shared
//! - The first schema violation is reported back to the client verbatim
//! - Whole-number floats such as `5.0` satisfy `"type": "integer"`, so they
//!   are turned into integers before decoding
//! - Values that pass the schema but overflow the payload types are still
//!   client errors

use jsonschema::{Draft, JSONSchema};
use serde::de::DeserializeOwned;
use serde_json::{Number, Value};
use std::sync::Arc;
use thiserror::Error;

use crate::model::schema::{map_schema, observer_schema, obstacle_schema};
use crate::model::{MapPayload, ObserverPayload, ObstaclePayload};

#[derive(Debug, Error)]
pub enum ValidationError {
    /// One of the built-in schemas failed to compile.
    #[error("Invalid {kind} schema: {message}")]
    Schema { kind: &'static str, message: String },

    /// The body does not satisfy the schema.
    #[error("{0}")]
    Rejected(String),
}

/// Which payload a body is expected to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Map,
    Observer,
    Obstacle,
}

impl PayloadKind {
    fn name(self) -> &'static str {
        match self {
            PayloadKind::Map => "map",
            PayloadKind::Observer => "observer",
            PayloadKind::Obstacle => "obstacle",
        }
    }
}

/// A compiled schema and the properties it declares as integers.
struct PayloadSchema {
    compiled: JSONSchema,
    integers: Vec<String>,
}

impl PayloadSchema {
    fn compile(kind: PayloadKind, schema: &Value) -> Result<Self, ValidationError> {
        let compiled = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(schema)
            .map_err(|e| ValidationError::Schema {
                kind: kind.name(),
                message: e.to_string(),
            })?;
        let integers = schema["properties"]
            .as_object()
            .map(|properties| {
                properties
                    .iter()
                    .filter(|(_, property)| property["type"] == "integer")
                    .map(|(name, _)| name.clone())
                    .collect()
            })
            .unwrap_or_default();
        Ok(Self { compiled, integers })
    }

    /// Rewrite whole-number floats in integer properties as integers.
    fn normalize(&self, body: &mut Value) {
        let Some(fields) = body.as_object_mut() else {
            return;
        };
        for name in &self.integers {
            if let Some(value) = fields.get_mut(name) {
                if let Some(n) = integral(value) {
                    *value = Value::Number(n);
                }
            }
        }
    }
}

/// `5.0` as `5`. Negative and fractional values, and values that would not
/// fit a u64, are left alone.
fn integral(value: &Value) -> Option<Number> {
    let float = match value {
        Value::Number(n) if n.is_f64() => n.as_f64()?,
        _ => return None,
    };
    if float.fract() != 0.0 || float < 0.0 || float >= u64::MAX as f64 {
        return None;
    }
    Some(Number::from(float as u64))
}

/// Compiled schemas for every payload kind.
#[derive(Clone)]
pub struct Validators {
    map: Arc<PayloadSchema>,
    observer: Arc<PayloadSchema>,
    obstacle: Arc<PayloadSchema>,
}

impl std::fmt::Debug for Validators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validators").finish_non_exhaustive()
    }
}

impl Validators {
    pub fn compile() -> Result<Self, ValidationError> {
        Ok(Self {
            map: Arc::new(PayloadSchema::compile(PayloadKind::Map, &map_schema())?),
            observer: Arc::new(PayloadSchema::compile(PayloadKind::Observer, &observer_schema())?),
            obstacle: Arc::new(PayloadSchema::compile(PayloadKind::Obstacle, &obstacle_schema())?),
        })
    }

    fn schema(&self, kind: PayloadKind) -> &PayloadSchema {
        match kind {
            PayloadKind::Map => &self.map,
            PayloadKind::Observer => &self.observer,
            PayloadKind::Obstacle => &self.obstacle,
        }
    }

    /// Check `body` against the schema for `kind`.
    pub fn check(&self, kind: PayloadKind, body: &Value) -> Result<(), ValidationError> {
        let message = match self.schema(kind).compiled.validate(body) {
            Ok(()) => return Ok(()),
            Err(mut errors) => errors
                .next()
                .map(|e| e.to_string())
                .unwrap_or_else(|| format!("Invalid {} payload", kind.name())),
        };
        Err(ValidationError::Rejected(message))
    }

    pub fn map(&self, body: Value) -> Result<MapPayload, ValidationError> {
        self.decode(PayloadKind::Map, body)
    }

    pub fn observer(&self, body: Value) -> Result<ObserverPayload, ValidationError> {
        self.decode(PayloadKind::Observer, body)
    }

    pub fn obstacle(&self, body: Value) -> Result<ObstaclePayload, ValidationError> {
        self.decode(PayloadKind::Obstacle, body)
    }

    fn decode<T: DeserializeOwned>(&self, kind: PayloadKind, mut body: Value) -> Result<T, ValidationError> {
        self.check(kind, &body)?;
        self.schema(kind).normalize(&mut body);
        serde_json::from_value(body).map_err(|e| ValidationError::Rejected(e.to_string()))
    }
}
