use serde::{Serialize, Deserialize};

use crate::vecmath::Vec2;

/// A point mass in the simulation.
///
/// Identity is the body's positional index within a [`State`]; that index is
/// what excludes self-interaction in the force sum and what fixes the record
/// order in `.gal` files. `mass` and `brightness` are carried through a run
/// unchanged; only `position` and `velocity` are touched by integration.
/// `brightness` is display-only and never enters the physics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub position: Vec2,
    pub mass: f64,
    pub velocity: Vec2,
    pub brightness: f64,
}

/// The complete simulation state at one time step: an ordered sequence of
/// bodies. The body count is fixed for the whole run, and a new `State` is
/// always produced atomically from the previous one — it is never partially
/// updated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub bodies: Vec<Body>,
}

impl State {
    pub fn new(bodies: Vec<Body>) -> Self {
        Self { bodies }
    }

    /// Number of bodies N.
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}
