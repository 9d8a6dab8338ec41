//! Client for the grid map API.
//!
//! Typed helpers cover the plain JSON representations; Mason documents are
//! returned as `serde_json::Value` and their controls can be followed with
//! [`GridmapClient::follow`].

use reqwest::{header, Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub const JSON: &str = "application/json";
pub const MASON: &str = "application/vnd.mason+json";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL '{0}'")]
    InvalidUrl(String),

    #[error("Server returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Response has no Location header")]
    MissingLocation,

    #[error("Invalid control: {0}")]
    InvalidControl(String),
}

impl ClientError {
    /// Status code of an error response, if that is what this is.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Map attributes as listed in the collection.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MapSummary {
    pub name: String,
    pub slug: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Observer {
    pub name: String,
    pub slug: String,
    pub vision: Option<f64>,
    pub x: u32,
    pub y: u32,
}

/// An observer item, with the map it stands on.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ObserverDetail {
    #[serde(flatten)]
    pub observer: Observer,
    pub map_name: String,
    pub map_slug: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Obstacle {
    pub x: u32,
    pub y: u32,
}

/// A map item with its contents.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Map {
    pub name: String,
    pub slug: String,
    pub width: u32,
    pub height: u32,
    pub observers: Vec<Observer>,
    pub obstacles: Vec<Obstacle>,
}

#[derive(Debug, Deserialize)]
struct MapList {
    maps: Vec<MapSummary>,
}

/// Body for creating or updating a map.
#[derive(Debug, Clone, Serialize)]
pub struct NewMap {
    pub name: String,
    pub width: u32,
    pub height: u32,
}

/// Body for placing or updating an observer.
#[derive(Debug, Clone, Serialize)]
pub struct NewObserver {
    pub name: String,
    pub x: u32,
    pub y: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vision: Option<f64>,
}

pub struct GridmapClient {
    client: Client,
    base_url: Url,
}

impl GridmapClient {
    /// `base_url` is the server root, e.g. `http://127.0.0.1:5000`.
    pub fn new(base_url: &str) -> ClientResult<Self> {
        Self::with_client(base_url, Client::new())
    }

    /// Use a preconfigured `reqwest` client.
    pub fn with_client(base_url: &str, client: Client) -> ClientResult<Self> {
        let base_url =
            Url::parse(base_url).map_err(|_| ClientError::InvalidUrl(base_url.to_string()))?;
        Ok(Self { client, base_url })
    }

    /// Resolve an href (absolute, or relative to the server root).
    pub fn url(&self, href: &str) -> ClientResult<Url> {
        self.base_url
            .join(href)
            .map_err(|_| ClientError::InvalidUrl(href.to_string()))
    }

    /// A request with nothing set but method and URL.
    pub fn request(&self, method: Method, href: &str) -> ClientResult<RequestBuilder> {
        Ok(self.client.request(method, self.url(href)?))
    }

    async fn check(response: Response) -> ClientResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await?;
        Err(ClientError::Status { status, body })
    }

    async fn get_as(&self, href: &str, accept: &str) -> ClientResult<Response> {
        let response = self
            .request(Method::GET, href)?
            .header(header::ACCEPT, accept)
            .send()
            .await?;
        Self::check(response).await
    }

    async fn send_json<T: Serialize + ?Sized>(
        &self,
        method: Method,
        href: &str,
        body: &T,
    ) -> ClientResult<Response> {
        let response = self.request(method, href)?.json(body).send().await?;
        Self::check(response).await
    }

    async fn create<T: Serialize + ?Sized>(&self, href: &str, body: &T) -> ClientResult<String> {
        let response = self.send_json(Method::POST, href, body).await?;
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or(ClientError::MissingLocation)
    }

    async fn delete(&self, href: &str) -> ClientResult<()> {
        let response = self.request(Method::DELETE, href)?.send().await?;
        Self::check(response).await?;
        Ok(())
    }

    pub async fn list_maps(&self) -> ClientResult<Vec<MapSummary>> {
        let list: MapList = self.get_as("/api/maps/", JSON).await?.json().await?;
        Ok(list.maps)
    }

    /// Create a map and return its Location.
    pub async fn create_map(&self, map: &NewMap) -> ClientResult<String> {
        self.create("/api/maps/", map).await
    }

    pub async fn get_map(&self, map: &str) -> ClientResult<Map> {
        let href = format!("/api/maps/{map}/");
        Ok(self.get_as(&href, JSON).await?.json().await?)
    }

    pub async fn update_map(&self, map: &str, update: &NewMap) -> ClientResult<()> {
        self.send_json(Method::PUT, &format!("/api/maps/{map}/"), update)
            .await?;
        Ok(())
    }

    pub async fn delete_map(&self, map: &str) -> ClientResult<()> {
        self.delete(&format!("/api/maps/{map}/")).await
    }

    /// Place an observer and return its Location.
    pub async fn create_observer(&self, map: &str, observer: &NewObserver) -> ClientResult<String> {
        self.create(&format!("/api/maps/{map}/observers/"), observer)
            .await
    }

    pub async fn get_observer(&self, map: &str, observer: &str) -> ClientResult<ObserverDetail> {
        let href = format!("/api/maps/{map}/observers/{observer}/");
        Ok(self.get_as(&href, JSON).await?.json().await?)
    }

    pub async fn update_observer(
        &self,
        map: &str,
        observer: &str,
        update: &NewObserver,
    ) -> ClientResult<()> {
        let href = format!("/api/maps/{map}/observers/{observer}/");
        self.send_json(Method::PUT, &href, update).await?;
        Ok(())
    }

    pub async fn delete_observer(&self, map: &str, observer: &str) -> ClientResult<()> {
        self.delete(&format!("/api/maps/{map}/observers/{observer}/"))
            .await
    }

    /// Place an obstacle and return its Location.
    pub async fn create_obstacle(&self, map: &str, obstacle: Obstacle) -> ClientResult<String> {
        self.create(&format!("/api/maps/{map}/obstacles/"), &obstacle)
            .await
    }

    pub async fn delete_obstacle(&self, map: &str, x: u32, y: u32) -> ClientResult<()> {
        self.delete(&format!("/api/maps/{map}/obstacles/{x}/{y}/"))
            .await
    }

    /// GET a Mason document.
    pub async fn get_mason(&self, href: &str) -> ClientResult<Value> {
        Ok(self.get_as(href, MASON).await?.json().await?)
    }

    /// Send the request a Mason control describes. GET controls ask for
    /// Mason; `body` is sent as JSON when given.
    pub async fn follow(&self, control: &Value, body: Option<&Value>) -> ClientResult<Response> {
        let href = control
            .get("href")
            .and_then(Value::as_str)
            .ok_or_else(|| ClientError::InvalidControl("missing href".into()))?;
        let method = control
            .get("method")
            .and_then(Value::as_str)
            .unwrap_or("GET");
        let method = Method::from_bytes(method.as_bytes())
            .map_err(|_| ClientError::InvalidControl(format!("unknown method '{method}'")))?;

        let mut request = self.request(method.clone(), href)?;
        if method == Method::GET {
            request = request.header(header::ACCEPT, MASON);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok(request.send().await?)
    }
}
