//! Robot hit zones and hit-testing
//!
//! Each zone is bound to a difficulty tier; damage and points come from tuning.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::question::Difficulty;

/// Robot hit region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    Head,
    Body,
    Limb,
}

impl Zone {
    pub const ALL: [Zone; 3] = [Zone::Head, Zone::Body, Zone::Limb];

    /// Difficulty of the questions served for this zone
    pub fn difficulty(&self) -> Difficulty {
        match self {
            Zone::Head => Difficulty::Hard,
            Zone::Body => Difficulty::Medium,
            Zone::Limb => Difficulty::Easy,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Zone::Head => "head",
            Zone::Body => "body",
            Zone::Limb => "limb",
        }
    }
}

/// Hit-test collaborator: maps a screen point to the robot zone under it
pub trait ZoneHitTest {
    fn zone_for_point(&self, point: Vec2) -> Option<Zone>;
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn from_center(center: Vec2, half_size: Vec2) -> Self {
        Self {
            min: center - half_size,
            max: center + half_size,
        }
    }

    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }
}

/// Rectangle-based robot silhouette (screen space, y grows downward).
/// Head is tested first, then body, then the four limbs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RobotHitbox {
    pub head: Rect,
    pub body: Rect,
    pub limbs: [Rect; 4],
}

impl RobotHitbox {
    /// Build a silhouette around the robot center; `scale` 1.0 is a ~300px tall robot
    pub fn new(center: Vec2, scale: f32) -> Self {
        let s = |x: f32, y: f32| Vec2::new(x, y) * scale;
        Self {
            head: Rect::from_center(center + s(0.0, -110.0), s(40.0, 35.0)),
            body: Rect::from_center(center + s(0.0, -10.0), s(60.0, 65.0)),
            limbs: [
                // arms
                Rect::from_center(center + s(-85.0, -20.0), s(25.0, 60.0)),
                Rect::from_center(center + s(85.0, -20.0), s(25.0, 60.0)),
                // legs
                Rect::from_center(center + s(-30.0, 105.0), s(22.0, 50.0)),
                Rect::from_center(center + s(30.0, 105.0), s(22.0, 50.0)),
            ],
        }
    }

    /// A point guaranteed to hit the given zone
    pub fn aim_point(&self, zone: Zone) -> Vec2 {
        match zone {
            Zone::Head => self.head.center(),
            Zone::Body => self.body.center(),
            Zone::Limb => self.limbs[0].center(),
        }
    }

    /// Center of the silhouette, where power-ups drop from
    pub fn center(&self) -> Vec2 {
        self.body.center()
    }
}

impl Default for RobotHitbox {
    fn default() -> Self {
        Self::new(Vec2::new(640.0, 360.0), 1.0)
    }
}

impl ZoneHitTest for RobotHitbox {
    fn zone_for_point(&self, point: Vec2) -> Option<Zone> {
        if self.head.contains(point) {
            Some(Zone::Head)
        } else if self.body.contains(point) {
            Some(Zone::Body)
        } else if self.limbs.iter().any(|r| r.contains(point)) {
            Some(Zone::Limb)
        } else {
            None
        }
    }
}
