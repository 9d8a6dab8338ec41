//! JSON schemas for request payloads.
//!
//! These documents are embedded in Mason POST/PUT controls and compiled by
//! the validation layer, so the schema a client reads is exactly the one its
//! request is checked against. Key order is part of the served contract.

use serde_json::{json, Value};

use crate::model::MAX_NAME_LENGTH;

/// Schema for map creation and update bodies.
pub fn map_schema() -> Value {
    json!({
        "type": "object",
        "required": ["name", "width", "height"],
        "properties": {
            "name": {
                "description": "Name for the map (unique)",
                "type": "string",
                "maxLength": MAX_NAME_LENGTH
            },
            "width": {
                "description": "Map width",
                "type": "integer",
                "minimum": 1
            },
            "height": {
                "description": "Map height",
                "type": "integer",
                "minimum": 1
            }
        }
    })
}

/// Schema for observer creation and update bodies.
pub fn observer_schema() -> Value {
    json!({
        "type": "object",
        "required": ["name", "x", "y"],
        "properties": {
            "name": {
                "description": "Name for referencing the observer (unique per map)",
                "type": "string",
                "maxLength": MAX_NAME_LENGTH
            },
            "vision": {
                "description": "Observer's vision range (infinite if omitted)",
                "type": "number",
                "minimum": 0
            },
            "x": {
                "description": "Observer's x coordinate",
                "type": "integer",
                "minimum": 0
            },
            "y": {
                "description": "Observer's y coordinate",
                "type": "integer",
                "minimum": 0
            }
        }
    })
}

/// Schema for obstacle placement bodies.
pub fn obstacle_schema() -> Value {
    json!({
        "type": "object",
        "required": ["x", "y"],
        "properties": {
            "x": {
                "description": "Obstacle's x coordinate",
                "type": "integer",
                "minimum": 0
            },
            "y": {
                "description": "Obstacle's y coordinate",
                "type": "integer",
                "minimum": 0
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_schema_key_order() {
        let text = serde_json::to_string(&map_schema()).unwrap();
        assert!(text.starts_with(r#"{"type":"object","required":["name","width","height"],"properties":{"name":{"description":"#));
        assert!(text.contains(r#""maxLength":32"#));
    }

    #[test]
    fn test_required_fields() {
        let required = |schema: Value| -> Vec<String> {
            schema["required"]
                .as_array()
                .unwrap()
                .iter()
                .map(|v| v.as_str().unwrap().to_string())
                .collect()
        };
        assert_eq!(required(observer_schema()), ["name", "x", "y"]);
        assert_eq!(required(obstacle_schema()), ["x", "y"]);
    }
}
