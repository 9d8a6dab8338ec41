//! Mason representations: exact fixture bodies and followable controls.

use jsonschema::{Draft, JSONSchema};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::StatusCode;
use serde_json::{json, Value};

use gridmap::management;
use gridmap::model::schema::{map_schema, observer_schema, obstacle_schema};

mod common;
use common::TestServer;

const MASON: &str = "application/vnd.mason+json";

async fn get_mason(server: &TestServer, path: &str) -> Value {
    server.client.get_mason(path).await.unwrap()
}

async fn get_text(server: &TestServer, path: &str, accept: &str) -> String {
    let resp = server
        .http
        .get(server.url(path))
        .header(ACCEPT, accept)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[CONTENT_TYPE], accept);
    resp.text().await.unwrap()
}

fn control<'a>(doc: &'a Value, name: &str) -> &'a Value {
    doc["@controls"]
        .get(name)
        .unwrap_or_else(|| panic!("no {name} control in {doc}"))
}

async fn check_control_get(server: &TestServer, doc: &Value, name: &str) {
    let resp = server.client.follow(control(doc, name), None).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK, "GET {name}");
}

async fn check_control_delete(server: &TestServer, doc: &Value, name: &str) {
    let ctrl = control(doc, name);
    assert_eq!(ctrl["method"], "DELETE");
    let resp = server.client.follow(ctrl, None).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT, "DELETE {name}");
}

fn assert_valid(schema: &Value, body: &Value) {
    let compiled = JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(schema)
        .unwrap();
    assert!(compiled.is_valid(body), "{body} does not satisfy {schema}");
}

async fn check_control_write(
    server: &TestServer,
    doc: &Value,
    name: &str,
    method: &str,
    body: Value,
    expected: StatusCode,
) {
    let ctrl = control(doc, name);
    assert_eq!(ctrl["method"], method);
    assert_eq!(ctrl["encoding"], "json");
    assert_valid(&ctrl["schema"], &body);
    let resp = server.client.follow(ctrl, Some(&body)).await.unwrap();
    assert_eq!(resp.status(), expected, "{method} {name}");
}

fn valid_map() -> Value {
    json!({"name": "Valid Map A", "width": fastrand::u32(50..=60), "height": fastrand::u32(40..=60)})
}

fn valid_observer() -> Value {
    json!({"name": "Valid Observer A", "x": fastrand::u32(0..=9), "y": fastrand::u32(0..=9)})
}

#[tokio::test]
async fn test_collection_controls() {
    let server = common::spawn_test_db().await;
    let body = get_mason(&server, "/api/maps/").await;
    assert!(body["@namespaces"].get("pwp-map").is_some());
    assert!(body["@controls"].get("profile").is_some());
    check_control_get(&server, &body, "self").await;

    let maps = body["maps"].as_array().unwrap();
    assert_eq!(maps.len(), 3);
    for item in maps {
        assert!(item.get("observers").is_none());
        assert!(item.get("obstacles").is_none());
        check_control_get(&server, item, "self").await;
    }

    check_control_write(&server, &body, "pwp-map:create-map", "POST", valid_map(), StatusCode::CREATED)
        .await;
}

#[tokio::test]
async fn test_map_item_controls() {
    let server = common::spawn_test_db().await;
    let body = get_mason(&server, "/api/maps/test-map-1/").await;
    for key in ["name", "slug", "width", "height", "observers", "obstacles"] {
        assert!(body.get(key).is_some(), "missing {key}");
    }
    assert!(body["@namespaces"].get("pwp-map").is_some());
    assert!(body["@controls"].get("profile").is_some());

    check_control_get(&server, &body, "self").await;
    check_control_get(&server, &body, "collection").await;
    for observer in body["observers"].as_array().unwrap() {
        check_control_get(&server, observer, "self").await;
    }
    for obstacle in body["obstacles"].as_array().unwrap() {
        check_control_delete(&server, obstacle, "pwp-map:delete").await;
    }
}

#[tokio::test]
async fn test_map_item_create_controls() {
    let server = common::spawn_test_db().await;
    let body = get_mason(&server, "/api/maps/test-map-1/").await;
    check_control_write(
        &server,
        &body,
        "pwp-map:create-observer",
        "POST",
        valid_observer(),
        StatusCode::CREATED,
    )
    .await;
    check_control_write(
        &server,
        &body,
        "pwp-map:create-obstacle",
        "POST",
        json!({"x": 5, "y": 5}),
        StatusCode::CREATED,
    )
    .await;
}

#[tokio::test]
async fn test_map_item_edit_and_delete_controls() {
    let server = common::spawn_test_db().await;
    let body = get_mason(&server, "/api/maps/test-map-1/").await;
    check_control_write(&server, &body, "edit", "PUT", valid_map(), StatusCode::NO_CONTENT).await;

    let body = get_mason(&server, "/api/maps/valid-map-a/").await;
    check_control_delete(&server, &body, "pwp-map:delete").await;
    let resp = server.client.follow(control(&body, "self"), None).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_observer_item_controls() {
    let server = common::spawn_test_db().await;
    let path = "/api/maps/test-map-1/observers/test-observer-1/";
    let text = get_text(&server, path, MASON).await;
    let body: Value = serde_json::from_str(&text).unwrap();
    for key in ["name", "slug", "vision", "x", "y"] {
        assert!(body.get(key).is_some(), "missing {key}");
    }
    assert!(body["@namespaces"].get("pwp-map").is_some());
    check_control_get(&server, &body, "self").await;
    check_control_get(&server, &body, "up").await;
    check_control_write(&server, &body, "edit", "PUT", valid_observer(), StatusCode::NO_CONTENT)
        .await;
}

#[tokio::test]
async fn test_observer_delete_control() {
    let server = common::spawn_test_db().await;
    let body = get_mason(&server, "/api/maps/test-map-1/observers/test-observer-1/").await;
    check_control_delete(&server, &body, "pwp-map:delete").await;
    let resp = server.client.follow(control(&body, "self"), None).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

fn fixture_observers() -> Vec<Value> {
    [(1, 1), (40, 40), (80, 20), (10, 70)]
        .into_iter()
        .enumerate()
        .map(|(i, (x, y))| {
            json!({
                "name": format!("Test Observer {i}"),
                "slug": format!("test-observer-{i}"),
                "vision": null,
                "x": x,
                "y": y,
            })
        })
        .collect()
}

const FIXTURE_OBSTACLES: [(u32, u32); 4] = [(5, 5), (20, 20), (50, 50), (70, 70)];

#[tokio::test]
async fn test_fixture_plain_bodies() {
    let server = common::spawn_with_fixture().await;

    let expected = json!({
        "maps": [{"name": "Test Map 1", "slug": "test-map-1", "width": 100, "height": 80}]
    });
    assert_eq!(get_text(&server, "/api/maps/", "application/json").await, expected.to_string());

    let obstacles: Vec<Value> = FIXTURE_OBSTACLES
        .iter()
        .map(|(x, y)| json!({"x": x, "y": y}))
        .collect();
    let expected = json!({
        "name": "Test Map 1",
        "slug": "test-map-1",
        "width": 100,
        "height": 80,
        "observers": fixture_observers(),
        "obstacles": obstacles,
    });
    assert_eq!(
        get_text(&server, "/api/maps/test-map-1/", "application/json").await,
        expected.to_string()
    );

    let expected = json!({
        "name": "Test Observer 0",
        "slug": "test-observer-0",
        "vision": null,
        "x": 1,
        "y": 1,
        "map_name": "Test Map 1",
        "map_slug": "test-map-1",
    });
    assert_eq!(
        get_text(&server, "/api/maps/test-map-1/observers/test-observer-0/", "application/json").await,
        expected.to_string()
    );
}

#[tokio::test]
async fn test_fixture_mason_bodies() {
    let server = common::spawn_with_fixture().await;
    let namespaces = json!({"pwp-map": {"name": "/gridmap/link-relations/"}});

    let expected = json!({
        "maps": [{
            "@controls": {"self": {"href": "/api/maps/test-map-1/"}},
            "name": "Test Map 1",
            "slug": "test-map-1",
            "width": 100,
            "height": 80,
        }],
        "@namespaces": namespaces,
        "@controls": {
            "self": {"href": "/api/maps/"},
            "pwp-map:create-map": {
                "method": "POST",
                "encoding": "json",
                "title": "Create a new map",
                "schema": map_schema(),
                "href": "/api/maps/",
            },
            "profile": {"href": "/profiles/map/"},
        },
    });
    assert_eq!(get_text(&server, "/api/maps/", MASON).await, expected.to_string());

    let observers: Vec<Value> = fixture_observers()
        .into_iter()
        .map(|observer| {
            let href = format!("/api/maps/test-map-1/observers/{}/", observer["slug"].as_str().unwrap());
            let mut item = json!({"@controls": {"self": {"href": href}}});
            item.as_object_mut()
                .unwrap()
                .extend(observer.as_object().unwrap().clone());
            item
        })
        .collect();
    let obstacles: Vec<Value> = FIXTURE_OBSTACLES
        .iter()
        .map(|(x, y)| {
            json!({
                "@controls": {
                    "pwp-map:delete": {
                        "method": "DELETE",
                        "title": "Delete this obstacle",
                        "href": format!("/api/maps/test-map-1/obstacles/{x}/{y}/"),
                    }
                },
                "x": x,
                "y": y,
            })
        })
        .collect();
    let expected = json!({
        "@controls": {
            "self": {"href": "/api/maps/test-map-1/"},
            "collection": {"href": "/api/maps/"},
            "edit": {
                "method": "PUT",
                "encoding": "json",
                "title": "Update this map",
                "schema": map_schema(),
                "href": "/api/maps/test-map-1/",
            },
            "pwp-map:delete": {
                "method": "DELETE",
                "title": "Delete this map",
                "href": "/api/maps/test-map-1/",
            },
            "profile": {"href": "/profiles/map/"},
            "pwp-map:create-observer": {
                "method": "POST",
                "encoding": "json",
                "title": "Place a new observer on this map",
                "schema": observer_schema(),
                "href": "/api/maps/test-map-1/observers/",
            },
            "pwp-map:create-obstacle": {
                "method": "POST",
                "encoding": "json",
                "title": "Place a new obstacle on this map",
                "schema": obstacle_schema(),
                "href": "/api/maps/test-map-1/obstacles/",
            },
        },
        "name": "Test Map 1",
        "slug": "test-map-1",
        "width": 100,
        "height": 80,
        "observers": observers,
        "obstacles": obstacles,
        "@namespaces": namespaces,
    });
    assert_eq!(get_text(&server, "/api/maps/test-map-1/", MASON).await, expected.to_string());

    let href = "/api/maps/test-map-1/observers/test-observer-0/";
    let expected = json!({
        "@controls": {
            "self": {"href": href},
            "up": {"href": "/api/maps/test-map-1/"},
            "edit": {
                "method": "PUT",
                "encoding": "json",
                "title": "Update this observer",
                "schema": observer_schema(),
                "href": href,
            },
            "pwp-map:delete": {
                "method": "DELETE",
                "title": "Delete this observer",
                "href": href,
            },
            "profile": {"href": "/profiles/observer/"},
        },
        "name": "Test Observer 0",
        "slug": "test-observer-0",
        "vision": null,
        "x": 1,
        "y": 1,
        "@namespaces": namespaces,
    });
    assert_eq!(get_text(&server, href, MASON).await, expected.to_string());
}

#[tokio::test]
async fn test_docs_match_live_responses() {
    let server = common::spawn_with_fixture().await;
    let docs = management::docs().unwrap();
    for resource in ["mapcollection", "mapitem", "observeritem"] {
        let uri = docs[resource]["uri"].as_str().unwrap();
        let content = &docs[resource]["get"]["responses"]["200"]["content"];
        for accept in ["application/json", MASON] {
            let live: Value = serde_json::from_str(&get_text(&server, uri, accept).await).unwrap();
            assert_eq!(live, content[accept], "{resource} as {accept}");
        }
    }
}
