//! Resource URIs. Handlers, hypermedia controls and Location headers all
//! build their paths here.

pub fn map_collection() -> String {
    "/api/maps/".to_string()
}

pub fn map_item(map: &str) -> String {
    format!("/api/maps/{map}/")
}

pub fn map_observers(map: &str) -> String {
    format!("/api/maps/{map}/observers/")
}

pub fn map_obstacles(map: &str) -> String {
    format!("/api/maps/{map}/obstacles/")
}

pub fn observer_item(map: &str, observer: &str) -> String {
    format!("/api/maps/{map}/observers/{observer}/")
}

pub fn obstacle_item(map: &str, x: u32, y: u32) -> String {
    format!("/api/maps/{map}/obstacles/{x}/{y}/")
}
