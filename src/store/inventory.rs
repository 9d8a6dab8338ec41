//! Thread-safe map inventory with snapshot persistence.

use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::model::{
    slugify, GridMap, MapPayload, Observer, ObserverPayload, Obstacle, ObstaclePayload,
};
use crate::observability::metrics;
use crate::store::error::{StoreError, StoreResult};

/// Everything the service knows, in creation order.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Inventory {
    maps: Vec<GridMap>,
}

impl Inventory {
    fn map(&self, slug: &str) -> StoreResult<&GridMap> {
        self.maps
            .iter()
            .find(|m| m.slug == slug)
            .ok_or_else(|| StoreError::MapNotFound(slug.to_string()))
    }

    fn map_mut(&mut self, slug: &str) -> StoreResult<&mut GridMap> {
        self.maps
            .iter_mut()
            .find(|m| m.slug == slug)
            .ok_or_else(|| StoreError::MapNotFound(slug.to_string()))
    }

    /// Reject `name` if another map (other than `except`) already uses the
    /// name or the slug it would produce.
    fn check_map_name(&self, name: &str, slug: &str, except: Option<&str>) -> StoreResult<()> {
        let taken = self
            .maps
            .iter()
            .filter(|m| Some(m.slug.as_str()) != except)
            .any(|m| m.name == name || m.slug == slug);
        if taken {
            return Err(StoreError::DuplicateMap(name.to_string()));
        }
        Ok(())
    }
}

fn check_observer_name(
    map: &GridMap,
    name: &str,
    slug: &str,
    except: Option<&str>,
) -> StoreResult<()> {
    let taken = map
        .observers
        .iter()
        .filter(|o| Some(o.slug.as_str()) != except)
        .any(|o| o.name == name || o.slug == slug);
    if taken {
        return Err(StoreError::DuplicateObserver(name.to_string()));
    }
    Ok(())
}

fn addressable_slug(name: &str) -> StoreResult<String> {
    let slug = slugify(name);
    if slug.is_empty() {
        return Err(StoreError::UnaddressableName(name.to_string()));
    }
    Ok(slug)
}

fn write_snapshot(file: File, inventory: &Inventory) -> StoreResult<()> {
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, inventory)?;
    writer.flush()?;
    writer.get_ref().sync_all()?;
    Ok(())
}

/// An observer together with the map it stands on.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedObserver {
    pub map_name: String,
    pub map_slug: String,
    pub observer: Observer,
}

/// Shared inventory of maps, observers and obstacles.
#[derive(Debug, Default)]
pub struct MapStore {
    inner: RwLock<Inventory>,
    persistence_path: Option<PathBuf>,
}

impl MapStore {
    /// Create an empty store. `persistence_path` is where `save_to_file`
    /// writes the snapshot.
    pub fn new(persistence_path: Option<PathBuf>) -> Self {
        Self {
            inner: RwLock::new(Inventory::default()),
            persistence_path,
        }
    }

    /// Open the snapshot at `path`, or start empty if it does not exist yet.
    pub fn load_from_file(path: &Path) -> StoreResult<Self> {
        let store = Self::new(Some(path.to_path_buf()));
        if path.exists() {
            let reader = BufReader::new(File::open(path)?);
            let inventory: Inventory = serde_json::from_reader(reader)?;
            tracing::info!(maps = inventory.maps.len(), path = ?path, "Loaded inventory snapshot");
            *store.write() = inventory;
        }
        metrics::record_map_count(store.count());
        Ok(store)
    }

    /// Write the snapshot, if this store has a persistence path.
    ///
    /// The snapshot goes to a sibling `.tmp` file first and replaces the
    /// previous one only once it is fully on disk.
    pub fn save_to_file(&self) -> StoreResult<()> {
        let Some(path) = &self.persistence_path else {
            return Ok(());
        };
        let staging = path.with_extension("tmp");
        let inventory = self.read();
        let written = File::create(&staging)
            .map_err(StoreError::from)
            .and_then(|file| write_snapshot(file, &inventory));
        if let Err(e) = written {
            let _ = fs::remove_file(&staging);
            return Err(e);
        }
        fs::rename(&staging, path)?;
        tracing::info!(maps = inventory.maps.len(), path = ?path, "Saved inventory snapshot");
        Ok(())
    }

    pub fn persistence_path(&self) -> Option<&Path> {
        self.persistence_path.as_deref()
    }

    fn read(&self) -> RwLockReadGuard<'_, Inventory> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inventory> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of maps.
    pub fn count(&self) -> usize {
        self.read().maps.len()
    }

    pub fn list_maps(&self) -> Vec<GridMap> {
        self.read().maps.clone()
    }

    pub fn get_map(&self, slug: &str) -> StoreResult<GridMap> {
        self.read().map(slug).cloned()
    }

    pub fn get_observer(&self, map_slug: &str, observer_slug: &str) -> StoreResult<PlacedObserver> {
        let inventory = self.read();
        let map = inventory.map(map_slug)?;
        let observer = map.observer(observer_slug).ok_or_else(|| StoreError::ObserverNotFound {
            map: map_slug.to_string(),
            observer: observer_slug.to_string(),
        })?;
        Ok(PlacedObserver {
            map_name: map.name.clone(),
            map_slug: map.slug.clone(),
            observer: observer.clone(),
        })
    }

    pub fn create_map(&self, payload: MapPayload) -> StoreResult<GridMap> {
        let slug = addressable_slug(&payload.name)?;
        let mut inventory = self.write();
        inventory.check_map_name(&payload.name, &slug, None)?;

        let map = GridMap::from_payload(payload);
        inventory.maps.push(map.clone());
        metrics::record_map_count(inventory.maps.len());
        tracing::debug!(map = %map.slug, "Map created");
        Ok(map)
    }

    /// Rename and/or resize a map. The slug follows the new name.
    pub fn update_map(&self, slug: &str, payload: MapPayload) -> StoreResult<GridMap> {
        let new_slug = addressable_slug(&payload.name)?;
        let mut inventory = self.write();
        inventory.map(slug)?;
        inventory.check_map_name(&payload.name, &new_slug, Some(slug))?;

        let map = inventory.map_mut(slug)?;
        if !map.fits_within(payload.width, payload.height) {
            return Err(StoreError::ContentsOutOfBounds {
                width: payload.width,
                height: payload.height,
            });
        }
        map.name = payload.name;
        map.slug = new_slug;
        map.width = payload.width;
        map.height = payload.height;
        tracing::debug!(from = %slug, to = %map.slug, "Map updated");
        Ok(map.clone())
    }

    /// Remove a map together with everything on it.
    pub fn delete_map(&self, slug: &str) -> StoreResult<GridMap> {
        let mut inventory = self.write();
        let index = inventory
            .maps
            .iter()
            .position(|m| m.slug == slug)
            .ok_or_else(|| StoreError::MapNotFound(slug.to_string()))?;
        let map = inventory.maps.remove(index);
        metrics::record_map_count(inventory.maps.len());
        tracing::debug!(
            map = %slug,
            observers = map.observers.len(),
            obstacles = map.obstacles.len(),
            "Map deleted"
        );
        Ok(map)
    }

    pub fn create_observer(&self, map_slug: &str, payload: ObserverPayload) -> StoreResult<Observer> {
        let slug = addressable_slug(&payload.name)?;
        let mut inventory = self.write();
        let map = inventory.map_mut(map_slug)?;
        if !map.contains(payload.x, payload.y) {
            return Err(StoreError::OutOfBounds { kind: "Observer" });
        }
        check_observer_name(map, &payload.name, &slug, None)?;

        let observer = Observer::from_payload(payload);
        map.observers.push(observer.clone());
        Ok(observer)
    }

    pub fn update_observer(
        &self,
        map_slug: &str,
        observer_slug: &str,
        payload: ObserverPayload,
    ) -> StoreResult<PlacedObserver> {
        let slug = addressable_slug(&payload.name)?;
        let mut inventory = self.write();
        let map = inventory.map_mut(map_slug)?;
        if map.observer(observer_slug).is_none() {
            return Err(StoreError::ObserverNotFound {
                map: map_slug.to_string(),
                observer: observer_slug.to_string(),
            });
        }
        if !map.contains(payload.x, payload.y) {
            return Err(StoreError::OutOfBounds { kind: "Observer" });
        }
        check_observer_name(map, &payload.name, &slug, Some(observer_slug))?;

        let (map_name, map_slug) = (map.name.clone(), map.slug.clone());
        let observer = map
            .observers
            .iter_mut()
            .find(|o| o.slug == observer_slug)
            .ok_or_else(|| StoreError::ObserverNotFound {
                map: map_slug.clone(),
                observer: observer_slug.to_string(),
            })?;
        observer.apply(payload);
        Ok(PlacedObserver {
            map_name,
            map_slug,
            observer: observer.clone(),
        })
    }

    pub fn delete_observer(&self, map_slug: &str, observer_slug: &str) -> StoreResult<Observer> {
        let mut inventory = self.write();
        let map = inventory.map_mut(map_slug)?;
        let index = map
            .observers
            .iter()
            .position(|o| o.slug == observer_slug)
            .ok_or_else(|| StoreError::ObserverNotFound {
                map: map_slug.to_string(),
                observer: observer_slug.to_string(),
            })?;
        Ok(map.observers.remove(index))
    }

    /// Block a tile. Placing onto an already blocked tile is a no-op.
    pub fn create_obstacle(&self, map_slug: &str, payload: ObstaclePayload) -> StoreResult<Obstacle> {
        let mut inventory = self.write();
        let map = inventory.map_mut(map_slug)?;
        if !map.contains(payload.x, payload.y) {
            return Err(StoreError::OutOfBounds { kind: "Obstacle" });
        }
        let obstacle = Obstacle::from(payload);
        if map.obstacle_at(obstacle.x, obstacle.y).is_none() {
            map.obstacles.push(obstacle);
        }
        Ok(obstacle)
    }

    /// Clear a tile. Returns the removed obstacle, if there was one.
    pub fn delete_obstacle(&self, map_slug: &str, x: u32, y: u32) -> StoreResult<Option<Obstacle>> {
        let mut inventory = self.write();
        let map = inventory.map_mut(map_slug)?;
        let index = map.obstacles.iter().position(|o| o.x == x && o.y == y);
        Ok(index.map(|i| map.obstacles.remove(i)))
    }
}
