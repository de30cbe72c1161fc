//! Viewport mapping (world ↔ normalized screen coordinates)
//!
//! Симуляция не знает про реальную камеру host'а. Host инжектит
//! capability `Viewport`, симуляция использует её для:
//! - stop thresholds (viewport y → world y)
//! - off-screen теста (world → viewport)

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Capability конвертации координат между world space и viewport space.
///
/// Viewport coordinates: (0,0) — нижний левый угол, (1,1) — верхний правый.
pub trait Viewport {
    /// Normalized viewport point → world position (z = 0)
    fn viewport_to_world(&self, point: Vec2) -> Vec3;

    /// World position → normalized viewport point (z игнорируется)
    fn world_to_viewport(&self, position: Vec3) -> Vec2;

    /// Строго внутри (0,1)×(0,1). Граница считается off-screen.
    fn is_on_screen(&self, position: Vec3) -> bool {
        let point = self.world_to_viewport(position);
        point.x > 0.0 && point.x < 1.0 && point.y > 0.0 && point.y < 1.0
    }
}

impl<V: Viewport + ?Sized> Viewport for &V {
    fn viewport_to_world(&self, point: Vec2) -> Vec3 {
        (**self).viewport_to_world(point)
    }

    fn world_to_viewport(&self, position: Vec3) -> Vec2 {
        (**self).world_to_viewport(position)
    }
}

/// Ортографическая 2D камера без поворота: центр + половина размеров
/// видимой области в world units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrthographicViewport {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl OrthographicViewport {
    pub fn new(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    /// Видимая область `width × height`, центр в (0,0)
    pub fn from_size(width: f32, height: f32) -> Self {
        Self::new(Vec2::ZERO, Vec2::new(width * 0.5, height * 0.5))
    }
}

impl Default for OrthographicViewport {
    fn default() -> Self {
        // Portrait shmup экран: 9 × 16 world units
        Self::from_size(9.0, 16.0)
    }
}

impl Viewport for OrthographicViewport {
    fn viewport_to_world(&self, point: Vec2) -> Vec3 {
        let min = self.center - self.half_extents;
        (min + point * self.half_extents * 2.0).extend(0.0)
    }

    fn world_to_viewport(&self, position: Vec3) -> Vec2 {
        let min = self.center - self.half_extents;
        (position.truncate() - min) / (self.half_extents * 2.0)
    }
}

/// Активный viewport симуляции (resource)
///
/// Host обновляет его при изменении камеры; motion systems читают
/// каждый tick.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct ActiveViewport(pub OrthographicViewport);
