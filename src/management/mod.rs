//! Management commands run from the command line instead of the server.
//!
//! - `init-db`: create an empty snapshot
//! - `testgen`: add the documented fixture map to the snapshot
//! - `schemas`: the JSON schemas of every payload
//! - `docs`: example GET bodies for the API documentation

use serde_json::{json, Map, Value};
use std::path::Path;
use thiserror::Error;

use crate::api::negotiate::MediaType;
use crate::api::{urls, views};
use crate::model::schema::{map_schema, observer_schema, obstacle_schema};
use crate::model::{GridMap, MapPayload, ObserverPayload, ObstaclePayload};
use crate::store::{MapStore, StoreError};

#[derive(Debug, Error)]
pub enum ManagementError {
    #[error("storage.snapshot_path is not configured")]
    NoSnapshotPath,

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub const FIXTURE_MAP: &str = "Test Map 1";
const FIXTURE_OBSERVERS: [(u32, u32); 4] = [(1, 1), (40, 40), (80, 20), (10, 70)];
const FIXTURE_OBSTACLES: [(u32, u32); 4] = [(5, 5), (20, 20), (50, 50), (70, 70)];

/// Place the fixture map, its four observers and four obstacles.
pub fn populate_fixture(store: &MapStore) -> Result<GridMap, StoreError> {
    let map = store.create_map(MapPayload {
        name: FIXTURE_MAP.to_string(),
        width: 100,
        height: 80,
    })?;
    for (i, (x, y)) in FIXTURE_OBSERVERS.into_iter().enumerate() {
        store.create_observer(
            &map.slug,
            ObserverPayload {
                name: format!("Test Observer {i}"),
                x,
                y,
                vision: None,
            },
        )?;
    }
    for (x, y) in FIXTURE_OBSTACLES {
        store.create_obstacle(&map.slug, ObstaclePayload { x, y })?;
    }
    store.get_map(&map.slug)
}

fn snapshot_path(path: Option<&Path>) -> Result<&Path, ManagementError> {
    path.ok_or(ManagementError::NoSnapshotPath)
}

/// Create an empty snapshot. Returns false if one already exists.
pub fn init_db(path: Option<&Path>) -> Result<bool, ManagementError> {
    let path = snapshot_path(path)?;
    if path.exists() {
        tracing::info!(path = ?path, "Snapshot already initialized");
        return Ok(false);
    }
    MapStore::new(Some(path.to_path_buf())).save_to_file()?;
    Ok(true)
}

/// Add the fixture map to the snapshot at `path`.
pub fn testgen(path: Option<&Path>) -> Result<GridMap, ManagementError> {
    let store = MapStore::load_from_file(snapshot_path(path)?)?;
    let map = populate_fixture(&store)?;
    store.save_to_file()?;
    Ok(map)
}

/// Every payload schema, keyed by resource name.
pub fn schemas() -> Value {
    json!({
        "Map": map_schema(),
        "Observer": observer_schema(),
        "Obstacle": obstacle_schema(),
    })
}

fn response_doc(json_body: Value, mason_body: Value) -> Value {
    json!({
        "responses": {
            "200": {
                "content": {
                    (MediaType::Json.mime()): json_body,
                    (MediaType::Mason.mime()): mason_body,
                }
            }
        }
    })
}

/// Example GET responses of the collection, the fixture map and its first
/// observer, keyed by resource and URI.
pub fn docs() -> Result<Value, ManagementError> {
    let store = MapStore::new(None);
    let map = populate_fixture(&store)?;
    let maps = store.list_maps();
    let observer = store.get_observer(&map.slug, &map.observers[0].slug)?;

    let mut docs = Map::new();
    let mut document = |resource: &str, uri: String, json_body: Value, mason_body: Value| {
        let mut entry = Map::new();
        entry.insert("uri".into(), Value::String(uri));
        entry.insert("get".into(), response_doc(json_body, mason_body));
        docs.insert(resource.to_string(), Value::Object(entry));
    };

    document(
        "mapcollection",
        urls::map_collection(),
        views::render_collection(MediaType::Json, &maps),
        views::render_collection(MediaType::Mason, &maps),
    );
    document(
        "mapitem",
        urls::map_item(&map.slug),
        views::render_map(MediaType::Json, &map),
        views::render_map(MediaType::Mason, &map),
    );
    document(
        "observeritem",
        urls::observer_item(&map.slug, &observer.observer.slug),
        views::render_observer(MediaType::Json, &observer),
        views::render_observer(MediaType::Mason, &observer),
    );
    Ok(Value::Object(docs))
}
