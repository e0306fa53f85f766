//! Bore records read from BO blocks.

use super::Point;
use serde::{Deserialize, Serialize};

/// A single bore: a round hole or an elongated slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BoreRecord {
    /// Round hole.
    Hole { center: Point, diameter: f64 },
    /// Slot between two semicircle centers.
    Slot {
        center1: Point,
        center2: Point,
        diameter: f64,
    },
}

impl BoreRecord {
    pub fn hole(x: f64, y: f64, diameter: f64) -> Self {
        BoreRecord::Hole {
            center: Point::new(x, y),
            diameter,
        }
    }

    /// Create a slot from its first center and the offset to the second.
    pub fn slot(x: f64, y: f64, diameter: f64, dx: f64, dy: f64) -> Self {
        BoreRecord::Slot {
            center1: Point::new(x, y),
            center2: Point::new(x + dx, y + dy),
            diameter,
        }
    }

    pub fn diameter(&self) -> f64 {
        match self {
            BoreRecord::Hole { diameter, .. } | BoreRecord::Slot { diameter, .. } => *diameter,
        }
    }

    pub fn radius(&self) -> f64 {
        self.diameter() / 2.0
    }

    pub fn is_slot(&self) -> bool {
        matches!(self, BoreRecord::Slot { .. })
    }
}
