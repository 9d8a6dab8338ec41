//! Observers placed on a map.

use serde::{Deserialize, Serialize};

use crate::model::slug::slugify;

/// An observer standing on a map tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observer {
    /// Observer name (unique within its map).
    pub name: String,
    /// Slug derived from the name.
    pub slug: String,
    /// Vision range; `None` means unlimited.
    pub vision: Option<f64>,
    pub x: u32,
    pub y: u32,
}

impl Observer {
    pub fn from_payload(payload: ObserverPayload) -> Self {
        Self {
            slug: slugify(&payload.name),
            name: payload.name,
            vision: payload.vision,
            x: payload.x,
            y: payload.y,
        }
    }

    /// Overwrite all client-controlled attributes, slug included.
    pub fn apply(&mut self, payload: ObserverPayload) {
        *self = Self::from_payload(payload);
    }

    /// Item view that names the containing map.
    pub fn detail<'a>(&'a self, map_name: &'a str, map_slug: &'a str) -> ObserverDetail<'a> {
        ObserverDetail {
            observer: self,
            map_name,
            map_slug,
        }
    }
}

/// Plain-JSON observer item: observer attributes plus its map.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ObserverDetail<'a> {
    #[serde(flatten)]
    pub observer: &'a Observer,
    pub map_name: &'a str,
    pub map_slug: &'a str,
}

/// Client supplied observer attributes (POST and PUT).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ObserverPayload {
    pub name: String,
    pub x: u32,
    pub y: u32,
    #[serde(default)]
    pub vision: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vision_defaults_to_unlimited() {
        let payload: ObserverPayload =
            serde_json::from_str(r#"{"name": "Scout", "x": 1, "y": 2}"#).unwrap();
        let observer = Observer::from_payload(payload);
        assert_eq!(observer.slug, "scout");
        assert_eq!(observer.vision, None);

        let json = serde_json::to_string(&observer).unwrap();
        assert_eq!(json, r#"{"name":"Scout","slug":"scout","vision":null,"x":1,"y":2}"#);
    }

    #[test]
    fn test_detail_appends_map() {
        let observer = Observer::from_payload(ObserverPayload {
            name: "Test Observer 1".into(),
            x: 0,
            y: 0,
            vision: Some(5.0),
        });
        let json = serde_json::to_string(&observer.detail("Test Map 1", "test-map-1")).unwrap();
        assert_eq!(
            json,
            r#"{"name":"Test Observer 1","slug":"test-observer-1","vision":5.0,"x":0,"y":0,"map_name":"Test Map 1","map_slug":"test-map-1"}"#
        );
    }

    #[test]
    fn test_apply_renames() {
        let mut observer = Observer::from_payload(ObserverPayload {
            name: "Old".into(),
            x: 0,
            y: 0,
            vision: Some(1.5),
        });
        observer.apply(ObserverPayload {
            name: "New Name".into(),
            x: 3,
            y: 4,
            vision: None,
        });
        assert_eq!(observer.slug, "new-name");
        assert_eq!((observer.x, observer.y), (3, 4));
        assert_eq!(observer.vision, None);
    }
}
