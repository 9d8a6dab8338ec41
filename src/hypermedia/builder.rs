//! Gridmap flavoured Mason builder.
//!
//! Adds shorthands for every POST, PUT and DELETE control the API exposes,
//! plus the complete Mason representations of each resource.

use std::ops::{Deref, DerefMut};

use serde_json::{json, Value};

use crate::api::urls;
use crate::hypermedia::mason::MasonBuilder;
use crate::hypermedia::{LINK_RELATIONS, MAP_PROFILE, NAMESPACE, OBSERVER_PROFILE};
use crate::model::schema::{map_schema, observer_schema, obstacle_schema};
use crate::model::{GridMap, Observer, Obstacle};

/// Relation used by every delete control.
pub const DELETE_RELATION: &str = "pwp-map:delete";

#[derive(Debug, Clone)]
pub struct MapBuilder {
    mason: MasonBuilder,
}

impl Default for MapBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for MapBuilder {
    type Target = MasonBuilder;

    fn deref(&self) -> &MasonBuilder {
        &self.mason
    }
}

impl DerefMut for MapBuilder {
    fn deref_mut(&mut self) -> &mut MasonBuilder {
        &mut self.mason
    }
}

impl MapBuilder {
    pub fn new() -> Self {
        Self {
            mason: MasonBuilder::new(DELETE_RELATION),
        }
    }

    pub fn into_value(self) -> Value {
        self.mason.into_value()
    }

    pub fn add_gridmap_namespace(&mut self) {
        self.add_namespace(NAMESPACE, LINK_RELATIONS);
    }

    pub fn add_control_create_map(&mut self) {
        self.add_control_post(
            "pwp-map:create-map",
            "Create a new map",
            &urls::map_collection(),
            map_schema(),
        );
    }

    pub fn add_control_edit_map(&mut self, map: &GridMap) {
        self.add_control_put("Update this map", &urls::map_item(&map.slug), map_schema());
    }

    pub fn add_control_delete_map(&mut self, map: &GridMap) {
        self.add_control_delete("Delete this map", &urls::map_item(&map.slug));
    }

    pub fn add_control_create_observer(&mut self, map: &GridMap) {
        self.add_control_post(
            "pwp-map:create-observer",
            "Place a new observer on this map",
            &urls::map_observers(&map.slug),
            observer_schema(),
        );
    }

    pub fn add_control_create_obstacle(&mut self, map: &GridMap) {
        self.add_control_post(
            "pwp-map:create-obstacle",
            "Place a new obstacle on this map",
            &urls::map_obstacles(&map.slug),
            obstacle_schema(),
        );
    }

    pub fn add_control_edit_observer(&mut self, map_slug: &str, observer: &Observer) {
        self.add_control_put(
            "Update this observer",
            &urls::observer_item(map_slug, &observer.slug),
            observer_schema(),
        );
    }

    pub fn add_control_delete_observer(&mut self, map_slug: &str, observer: &Observer) {
        self.add_control_delete(
            "Delete this observer",
            &urls::observer_item(map_slug, &observer.slug),
        );
    }

    pub fn add_control_delete_obstacle(&mut self, map_slug: &str, obstacle: &Obstacle) {
        self.add_control_delete(
            "Delete this obstacle",
            &urls::obstacle_item(map_slug, obstacle.x, obstacle.y),
        );
    }
}

/// A map as it appears inside another document. `primary` maps get the
/// full set of controls and their contents.
fn map_document(map: &GridMap, primary: bool) -> MapBuilder {
    let mut body = MapBuilder::new();
    body.add_control("self", &urls::map_item(&map.slug));
    if primary {
        body.add_control("collection", &urls::map_collection());
        body.add_control_edit_map(map);
        body.add_control_delete_map(map);
        body.add_control("profile", MAP_PROFILE);
        body.add_control_create_observer(map);
        body.add_control_create_obstacle(map);
    }
    body.extend(json!(map.summary()));
    body
}

fn observer_document(map_slug: &str, observer: &Observer, primary: bool) -> MapBuilder {
    let mut body = MapBuilder::new();
    body.add_control("self", &urls::observer_item(map_slug, &observer.slug));
    if primary {
        body.add_control("up", &urls::map_item(map_slug));
        body.add_control_edit_observer(map_slug, observer);
        body.add_control_delete_observer(map_slug, observer);
        body.add_control("profile", OBSERVER_PROFILE);
    }
    body.extend(json!(observer));
    body
}

fn obstacle_document(map_slug: &str, obstacle: &Obstacle) -> MapBuilder {
    let mut body = MapBuilder::new();
    body.add_control_delete_obstacle(map_slug, obstacle);
    body.extend(json!(obstacle));
    body
}

/// Mason representation of the map collection.
pub fn map_collection(maps: &[GridMap]) -> Value {
    let items: Vec<Value> = maps
        .iter()
        .map(|map| map_document(map, false).into_value())
        .collect();

    let mut body = MapBuilder::new();
    body.insert("maps", Value::Array(items));
    body.add_gridmap_namespace();
    body.add_control("self", &urls::map_collection());
    body.add_control_create_map();
    body.add_control("profile", MAP_PROFILE);
    body.into_value()
}

/// Mason representation of a single map with its contents.
pub fn map_item(map: &GridMap) -> Value {
    let mut body = map_document(map, true);
    let observers: Vec<Value> = map
        .observers
        .iter()
        .map(|o| observer_document(&map.slug, o, false).into_value())
        .collect();
    let obstacles: Vec<Value> = map
        .obstacles
        .iter()
        .map(|o| obstacle_document(&map.slug, o).into_value())
        .collect();
    body.insert("observers", Value::Array(observers));
    body.insert("obstacles", Value::Array(obstacles));
    body.add_gridmap_namespace();
    body.into_value()
}

/// Mason representation of a single observer.
pub fn observer_item(map_slug: &str, observer: &Observer) -> Value {
    let mut body = observer_document(map_slug, observer, true);
    body.add_gridmap_namespace();
    body.into_value()
}
