//! Semi-implicit (symplectic) Euler integration.
//!
//! Velocity is updated first from the force evaluated against the frozen
//! previous-step state, then position is advanced with the NEW velocity.
//! That ordering is what distinguishes the scheme from naive Euler and must
//! not be reordered; it is what keeps bound orbits stable over long runs.

use galaxy_common::{Body, Vec2};

/// Advances one body by one step of size `dt` under `force`.
///
/// `force` must have been computed against the same frozen snapshot used for
/// every other body in this step; no body may observe another body's
/// already-updated position. Mass and brightness are copied through
/// unchanged.
pub fn advance(body: &Body, force: Vec2, dt: f64) -> Body {
    let acceleration = Vec2::new(force.x / body.mass, force.y / body.mass);
    let velocity = body.velocity.add(acceleration.scale(dt));
    let position = body.position.add(velocity.scale(dt));

    Body {
        position,
        mass: body.mass,
        velocity,
        brightness: body.brightness,
    }
}
