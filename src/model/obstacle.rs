//! Obstacles. An obstacle is nothing but a blocked tile.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Obstacle {
    pub x: u32,
    pub y: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ObstaclePayload {
    pub x: u32,
    pub y: u32,
}

impl From<ObstaclePayload> for Obstacle {
    fn from(payload: ObstaclePayload) -> Self {
        Self {
            x: payload.x,
            y: payload.y,
        }
    }
}
