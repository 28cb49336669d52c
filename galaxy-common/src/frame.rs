use serde::{Serialize, Deserialize};

use crate::body::Body;

/// One rendered-frame record handed to the visualization consumer.
///
/// Holds the ordered x/y position arrays for a single step; index `i` in both
/// arrays is body `i` of the corresponding state. Frames are produced in
/// strictly increasing step order with no gaps, each carrying exactly N
/// points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Frame {
    /// Step index this frame was captured at (0 = initial configuration).
    pub step: u32,
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
}

impl Frame {
    pub fn from_bodies(step: u32, bodies: &[Body]) -> Self {
        Self {
            step,
            xs: bodies.iter().map(|b| b.position.x).collect(),
            ys: bodies.iter().map(|b| b.position.y).collect(),
        }
    }

    /// Number of points in this frame.
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vecmath::Vec2;

    #[test]
    fn frame_preserves_body_order() {
        let bodies = vec![
            Body {
                position: Vec2::new(0.1, 0.2),
                mass: 1.0,
                velocity: Vec2::zero(),
                brightness: 1.0,
            },
            Body {
                position: Vec2::new(0.3, 0.4),
                mass: 1.0,
                velocity: Vec2::zero(),
                brightness: 1.0,
            },
        ];
        let frame = Frame::from_bodies(7, &bodies);
        assert_eq!(frame.step, 7);
        assert_eq!(frame.xs, vec![0.1, 0.3]);
        assert_eq!(frame.ys, vec![0.2, 0.4]);
        assert_eq!(frame.len(), 2);
    }
}
