//! Map records and payloads.

use serde::{Deserialize, Serialize};

use crate::model::observer::Observer;
use crate::model::obstacle::Obstacle;
use crate::model::slug::slugify;

/// A grid map with everything placed on it.
///
/// Serializes to the plain-JSON item representation: map attributes
/// followed by the `observers` and `obstacles` arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridMap {
    /// Map name (unique).
    pub name: String,
    /// Slug derived from the name, used in URIs.
    pub slug: String,
    /// Width in tiles.
    pub width: u32,
    /// Height in tiles.
    pub height: u32,
    /// Observers in placement order.
    #[serde(default)]
    pub observers: Vec<Observer>,
    /// Obstacles in placement order.
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
}

impl GridMap {
    /// Create an empty map from a validated payload.
    pub fn from_payload(payload: MapPayload) -> Self {
        Self {
            slug: slugify(&payload.name),
            name: payload.name,
            width: payload.width,
            height: payload.height,
            observers: Vec::new(),
            obstacles: Vec::new(),
        }
    }

    /// Whether a tile lies inside this map.
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    /// Whether everything on the map would still fit in `width` x `height`.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.observers.iter().all(|o| o.x < width && o.y < height)
            && self.obstacles.iter().all(|o| o.x < width && o.y < height)
    }

    pub fn observer(&self, slug: &str) -> Option<&Observer> {
        self.observers.iter().find(|o| o.slug == slug)
    }

    pub fn obstacle_at(&self, x: u32, y: u32) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.x == x && o.y == y)
    }

    /// Attribute-only view used in collection listings.
    pub fn summary(&self) -> MapSummary<'_> {
        MapSummary {
            name: &self.name,
            slug: &self.slug,
            width: self.width,
            height: self.height,
        }
    }
}

/// Map attributes without contents.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MapSummary<'a> {
    pub name: &'a str,
    pub slug: &'a str,
    pub width: u32,
    pub height: u32,
}

/// Client supplied map attributes (POST and PUT).
///
/// Any `slug` key sent by the client is ignored; the slug always follows
/// the name.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MapPayload {
    pub name: String,
    pub width: u32,
    pub height: u32,
}
