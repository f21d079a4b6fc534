use thiserror::Error;

use crate::map::WorldMap;
use crate::player::Player;

/// Startup parameter problems. Like map validation, these abort before any
/// frame is rendered.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("framebuffer dimensions must be positive, got {width}x{height}")]
    BadResolution { width: usize, height: usize },

    #[error("facing vector must be nonzero and finite, got ({x}, {y})")]
    BadFacing { x: f32, y: f32 },

    #[error("field of view (camera-plane magnitude) must be positive and finite, got {0}")]
    BadFov(f32),

    #[error("speeds must be positive and finite, got move {move_speed} / rotate {rot_speed}")]
    BadSpeeds { move_speed: f32, rot_speed: f32 },

    #[error("spawn position ({x}, {y}) is outside the map or inside a wall")]
    BlockedSpawn { x: f32, y: f32 },
}

/// Tunable parameters of the rendering core: internal resolution, per-tick
/// speeds, and the initial viewer pose.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Internal framebuffer width in pixels.
    pub width: usize,
    /// Internal framebuffer height in pixels.
    pub height: usize,
    /// Cells travelled per Advance/Retreat intent.
    pub move_speed: f32,
    /// Radians turned per RotateLeft/RotateRight intent.
    pub rot_speed: f32,
    /// Camera-plane magnitude; larger means a wider field of view.
    pub fov: f32,
    /// Initial position in cell units.
    pub spawn: [f32; 2],
    /// Initial facing; normalized before use.
    pub facing: [f32; 2],
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            move_speed: 0.08,
            rot_speed: 0.048,
            fov: 1.0,
            spawn: [2.0, 2.0],
            facing: [-1.0, 0.0],
        }
    }
}

impl Config {
    pub fn validate(&self, map: &WorldMap) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::BadResolution {
                width: self.width,
                height: self.height,
            });
        }
        let [fx, fy] = self.facing;
        if !fx.is_finite() || !fy.is_finite() || (fx == 0.0 && fy == 0.0) {
            return Err(ConfigError::BadFacing { x: fx, y: fy });
        }
        if !self.fov.is_finite() || self.fov <= 0.0 {
            return Err(ConfigError::BadFov(self.fov));
        }
        if !self.move_speed.is_finite()
            || self.move_speed <= 0.0
            || !self.rot_speed.is_finite()
            || self.rot_speed <= 0.0
        {
            return Err(ConfigError::BadSpeeds {
                move_speed: self.move_speed,
                rot_speed: self.rot_speed,
            });
        }

        let [sx, sy] = self.spawn;
        let inside = sx >= 0.0
            && sy >= 0.0
            && (sx as usize) < map.width()
            && (sy as usize) < map.height();
        if !inside || !map.is_open(sx, sy) {
            return Err(ConfigError::BlockedSpawn { x: sx, y: sy });
        }
        Ok(())
    }

    /// Initial viewer pose: normalized facing, with the camera plane set
    /// perpendicular to it and scaled to the configured field of view.
    pub fn player(&self) -> Player {
        let [fx, fy] = self.facing;
        let inv_len = 1.0 / (fx * fx + fy * fy).sqrt();
        let dir = [fx * inv_len, fy * inv_len];
        Player {
            pos: self.spawn,
            dir,
            plane: [dir[1] * self.fov, -dir[0] * self.fov],
        }
    }
}
