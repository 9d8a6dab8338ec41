//! Response rendering shared by the GET handlers.

use axum::body::Bytes;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde_json::{json, Value};

use crate::api::error::ApiError;
use crate::api::negotiate::MediaType;
use crate::cache::ResponseCache;
use crate::hypermedia::builder;
use crate::model::GridMap;
use crate::store::PlacedObserver;

/// Plain JSON collection: map attributes only.
pub fn map_collection(maps: &[GridMap]) -> Value {
    let items: Vec<Value> = maps.iter().map(|m| json!(m.summary())).collect();
    json!({ "maps": items })
}

/// Plain JSON map with its observers and obstacles.
pub fn map_item(map: &GridMap) -> Value {
    json!(map)
}

/// Plain JSON observer, naming the map it stands on.
pub fn observer_item(placed: &PlacedObserver) -> Value {
    json!(placed.observer.detail(&placed.map_name, &placed.map_slug))
}

/// Render the collection in the requested variant.
pub fn render_collection(media: MediaType, maps: &[GridMap]) -> Value {
    match media {
        MediaType::Json => map_collection(maps),
        MediaType::Mason => builder::map_collection(maps),
    }
}

pub fn render_map(media: MediaType, map: &GridMap) -> Value {
    match media {
        MediaType::Json => map_item(map),
        MediaType::Mason => builder::map_item(map),
    }
}

pub fn render_observer(media: MediaType, placed: &PlacedObserver) -> Value {
    match media {
        MediaType::Json => observer_item(placed),
        MediaType::Mason => builder::observer_item(&placed.map_slug, &placed.observer),
    }
}

fn respond(media: MediaType, body: Bytes) -> Response {
    ([(header::CONTENT_TYPE, media.mime())], body).into_response()
}

/// Serve `path` from the cache, or render, store and serve it.
pub fn cached<F>(cache: &ResponseCache, media: MediaType, path: &str, render: F) -> Result<Response, ApiError>
where
    F: FnOnce() -> Result<Value, ApiError>,
{
    if let Some(body) = cache.get(media, path) {
        return Ok(respond(media, body));
    }
    let generation = cache.generation();
    let body = Bytes::from(serde_json::to_vec(&render()?)?);
    cache.put(media, path, body.clone(), generation);
    Ok(respond(media, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MapPayload, Observer, ObserverPayload};
    use crate::store::MapStore;

    fn sample_map() -> GridMap {
        let mut map = GridMap::from_payload(MapPayload {
            name: "Test Map 1".into(),
            width: 100,
            height: 80,
        });
        map.observers.push(Observer::from_payload(ObserverPayload {
            name: "Test Observer 0".into(),
            x: 1,
            y: 1,
            vision: None,
        }));
        map
    }

    #[test]
    fn test_collection_has_no_contents() {
        let body = map_collection(&[sample_map()]);
        assert_eq!(
            body.to_string(),
            r#"{"maps":[{"name":"Test Map 1","slug":"test-map-1","width":100,"height":80}]}"#
        );
    }

    #[test]
    fn test_observer_names_its_map() {
        let map = sample_map();
        let placed = PlacedObserver {
            map_name: map.name.clone(),
            map_slug: map.slug.clone(),
            observer: map.observers[0].clone(),
        };
        let body = observer_item(&placed);
        assert_eq!(body["map_slug"], "test-map-1");
        assert_eq!(body["vision"], Value::Null);

        let mason = render_observer(MediaType::Mason, &placed);
        assert!(mason.get("map_slug").is_none());
        assert!(mason.get("@controls").is_some());
    }

    #[test]
    fn test_cached_renders_once() {
        let cache = ResponseCache::new(true);
        let first = cached(&cache, MediaType::Json, "/api/maps/", || Ok(json!({"maps": []})));
        assert!(first.is_ok());

        let second = cached(&cache, MediaType::Json, "/api/maps/", || {
            Err(ApiError::Internal("should not render".into()))
        })
        .unwrap();
        assert_eq!(second.headers()[header::CONTENT_TYPE], "application/json");
    }

    #[test]
    fn test_write_during_render_is_not_masked() {
        let cache = ResponseCache::new(true);
        let store = MapStore::new(None);
        let path = "/api/maps/";

        cached(&cache, MediaType::Json, path, || {
            let body = map_collection(&store.list_maps());
            store
                .create_map(MapPayload {
                    name: "Late Map".into(),
                    width: 4,
                    height: 4,
                })
                .unwrap();
            cache.invalidate_collection();
            Ok(body)
        })
        .unwrap();
        assert!(cache.get(MediaType::Json, path).is_none());

        cached(&cache, MediaType::Json, path, || Ok(map_collection(&store.list_maps()))).unwrap();
        let body = cache.get(MediaType::Json, path).unwrap();
        let listed: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(listed["maps"][0]["slug"], "late-map");
    }
}
