//! The time-stepped simulation loop.
//!
//! Owns the state history and drives the force model and integrator over all
//! bodies in lock-step. Step `k` is built entirely from the frozen state of
//! step `k - 1`: every per-body computation reads only the previous snapshot
//! and writes only its own slot in the next one, so the per-body work is
//! parallelized with Rayon while steps themselves stay strictly sequential.

use std::time::Instant;

use log::{info, trace};
use rayon::prelude::*;

use galaxy_common::{Body, Frame, SimulationConfig, State};

use crate::error::GalError;
use crate::forces::{self, ForceParams};
use crate::integrator;

/// How much state the loop retains across steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMode {
    /// Keep every state, step 0 included. Needed for frame export / replay.
    Full,
    /// Keep only the newest state. The batch fast path; final output is
    /// bit-identical to a `Full` run.
    FinalOnly,
}

pub struct Simulation {
    dt: f64,
    num_steps: u32,
    force: ForceParams,
    mode: HistoryMode,
    /// All recorded states in step order. In `FinalOnly` mode this holds a
    /// single entry, the newest state.
    history: Vec<State>,
    current_step: u32,
}

impl Simulation {
    /// Builds a simulation over `initial`, validating the body count and
    /// deriving `G = 100 / N`.
    pub fn new(
        initial: State,
        dt: f64,
        softening: f64,
        num_steps: u32,
        mode: HistoryMode,
    ) -> Result<Self, GalError> {
        let force = ForceParams::for_bodies(initial.len(), softening)?;

        let mut history = Vec::with_capacity(match mode {
            HistoryMode::Full => num_steps as usize,
            HistoryMode::FinalOnly => 1,
        });
        history.push(initial);

        Ok(Self {
            dt,
            num_steps,
            force,
            mode,
            history,
            current_step: 0,
        })
    }

    /// Convenience constructor from the loaded configuration. Frame saving
    /// requires the full history; a batch run keeps only the newest state.
    pub fn from_config(initial: State, config: &SimulationConfig) -> Result<Self, GalError> {
        let mode = if config.output.save_frames {
            HistoryMode::Full
        } else {
            HistoryMode::FinalOnly
        };
        Self::new(
            initial,
            config.timing.dt,
            config.physics.softening,
            config.timing.num_steps,
            mode,
        )
    }

    pub fn body_count(&self) -> usize {
        self.history[self.history.len() - 1].len()
    }

    pub fn current_step(&self) -> u32 {
        self.current_step
    }

    pub fn gravitational_constant(&self) -> f64 {
        self.force.g
    }

    /// Advances the whole system by one step.
    ///
    /// The next state is materialized completely before it becomes visible;
    /// the previous snapshot stays immutable for the entire computation.
    pub fn step(&mut self) {
        let dt = self.dt;
        let force = self.force;

        let next = {
            let prev = &self.history[self.history.len() - 1];
            let bodies: Vec<Body> = prev
                .bodies
                .par_iter()
                .enumerate()
                .map(|(i, body)| {
                    let f = forces::net_force(i, &prev.bodies, &force);
                    integrator::advance(body, f, dt)
                })
                .collect();
            State::new(bodies)
        };

        match self.mode {
            HistoryMode::Full => self.history.push(next),
            HistoryMode::FinalOnly => {
                let last = self.history.len() - 1;
                self.history[last] = next;
            }
        }
        self.current_step += 1;
    }

    /// Runs steps `1..num_steps`. Step 0 is the initial configuration, so
    /// `num_steps` recorded states mean `num_steps - 1` integration steps.
    pub fn run(&mut self) {
        let total = self.num_steps.saturating_sub(1);
        let log_every = (total / 10).max(1);
        let started = Instant::now();

        for step in 1..self.num_steps {
            let step_started = Instant::now();
            self.step();

            if step % log_every == 0 || step == total {
                info!(
                    "Step [{}/{}] | Bodies: {} | Step time: {:6.2} ms",
                    step,
                    total,
                    self.body_count(),
                    step_started.elapsed().as_secs_f64() * 1000.0
                );
            } else {
                trace!(
                    "Step [{}/{}] completed in {:.2} ms",
                    step,
                    total,
                    step_started.elapsed().as_secs_f64() * 1000.0
                );
            }
        }

        info!(
            "Integrated {} bodies over {} steps in {:.3} s",
            self.body_count(),
            total,
            started.elapsed().as_secs_f64()
        );
    }

    /// The newest state; the one encoded into the output file.
    pub fn last_state(&self) -> &State {
        &self.history[self.history.len() - 1]
    }

    /// State at step `step`, if it is still retained.
    pub fn state_at(&self, step: u32) -> Option<&State> {
        match self.mode {
            HistoryMode::Full => self.history.get(step as usize),
            HistoryMode::FinalOnly => {
                (step == self.current_step).then(|| &self.history[0])
            }
        }
    }

    /// All retained states as ordered frames for the visualization consumer.
    /// With `HistoryMode::Full` this is every step `0..num_steps` in strictly
    /// increasing order, each frame holding exactly N points. In
    /// `HistoryMode::FinalOnly` only the newest state survives, so the result
    /// is a single frame labeled with the current step.
    pub fn frames(&self) -> Vec<Frame> {
        match self.mode {
            HistoryMode::Full => self
                .history
                .iter()
                .enumerate()
                .map(|(step, state)| Frame::from_bodies(step as u32, &state.bodies))
                .collect(),
            HistoryMode::FinalOnly => {
                vec![Frame::from_bodies(self.current_step, &self.last_state().bodies)]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gal;
    use galaxy_common::Vec2;

    fn body(x: f64, y: f64, vx: f64, vy: f64, mass: f64) -> Body {
        Body {
            position: Vec2::new(x, y),
            mass,
            velocity: Vec2::new(vx, vy),
            brightness: 1.0,
        }
    }

    /// Equal masses placed symmetrically about the origin with opposite
    /// velocities.
    fn mirrored_pair() -> State {
        State::new(vec![
            body(-0.25, 0.0, 0.0, 0.4, 2.0),
            body(0.25, 0.0, 0.0, -0.4, 2.0),
        ])
    }

    fn sim(initial: State, num_steps: u32, mode: HistoryMode) -> Simulation {
        Simulation::new(initial, 1e-5, 1e-3, num_steps, mode).expect("non-empty state")
    }

    #[test]
    fn empty_state_is_rejected() {
        let result = Simulation::new(State::new(vec![]), 1e-5, 1e-3, 10, HistoryMode::Full);
        assert!(matches!(result, Err(GalError::DegenerateConfig)));
    }

    #[test]
    fn single_body_never_moves() {
        let initial = State::new(vec![body(0.5, 0.5, 0.0, 0.0, 1.0)]);
        let mut sim = sim(initial.clone(), 200, HistoryMode::FinalOnly);
        sim.run();
        assert_eq!(sim.last_state(), &initial);
    }

    #[test]
    fn mirrored_pair_keeps_center_of_mass_fixed() {
        let mut sim = sim(mirrored_pair(), 500, HistoryMode::Full);
        sim.run();

        for step in 0..500 {
            let state = sim.state_at(step).expect("full history retained");
            let com_x: f64 = state.bodies.iter().map(|b| b.mass * b.position.x).sum();
            let com_y: f64 = state.bodies.iter().map(|b| b.mass * b.position.y).sum();
            assert!(com_x.abs() < 1e-12, "COM drifted at step {}: {}", step, com_x);
            assert!(com_y.abs() < 1e-12, "COM drifted at step {}: {}", step, com_y);
        }
    }

    #[test]
    fn momentum_is_nearly_conserved() {
        let initial = State::new(vec![
            body(0.3, 0.5, 0.0, 0.2, 1.0),
            body(0.7, 0.5, 0.0, -0.1, 2.0),
            body(0.5, 0.8, 0.1, 0.0, 1.5),
        ]);
        let momentum = |state: &State| {
            state.bodies.iter().fold(Vec2::zero(), |acc, b| {
                acc.add(b.velocity.scale(b.mass))
            })
        };

        let p0 = momentum(&initial);
        let mut sim = sim(initial, 201, HistoryMode::FinalOnly);
        sim.run();
        let p1 = momentum(sim.last_state());

        assert!(
            p1.sub(p0).length() < 1e-9,
            "momentum drifted: {:?} -> {:?}",
            p0,
            p1
        );
    }

    #[test]
    fn runs_are_deterministic() {
        let initial = State::new(vec![
            body(0.1, 0.9, 0.3, 0.0, 1.0),
            body(0.4, 0.2, -0.1, 0.2, 3.0),
            body(0.8, 0.6, 0.0, -0.3, 0.5),
            body(0.5, 0.5, 0.2, 0.1, 2.0),
        ]);

        let mut a = sim(initial.clone(), 101, HistoryMode::Full);
        let mut b = sim(initial, 101, HistoryMode::Full);
        a.run();
        b.run();

        // Bit-identical, not merely close.
        assert_eq!(gal::encode(a.last_state()), gal::encode(b.last_state()));
    }

    #[test]
    fn history_modes_agree_bit_for_bit() {
        let initial = State::new(vec![
            body(0.2, 0.3, 0.1, -0.2, 1.0),
            body(0.7, 0.8, -0.3, 0.0, 4.0),
        ]);

        let mut full = sim(initial.clone(), 64, HistoryMode::Full);
        let mut final_only = sim(initial, 64, HistoryMode::FinalOnly);
        full.run();
        final_only.run();

        assert_eq!(
            gal::encode(full.last_state()),
            gal::encode(final_only.last_state())
        );
    }

    #[test]
    fn frames_are_ordered_and_complete() {
        let mut sim = sim(mirrored_pair(), 25, HistoryMode::Full);
        sim.run();

        let frames = sim.frames();
        assert_eq!(frames.len(), 25);
        for (k, frame) in frames.iter().enumerate() {
            assert_eq!(frame.step, k as u32);
            assert_eq!(frame.len(), 2);
            let state = sim.state_at(k as u32).expect("state retained");
            assert_eq!(frame.xs[0], state.bodies[0].position.x);
            assert_eq!(frame.ys[1], state.bodies[1].position.y);
        }
    }

    #[test]
    fn reproduces_reference_final_state() {
        // Three-body reference run pinned from an operation-for-operation
        // f64 replay of the engine arithmetic: dt = 1e-3, softening = 1e-3,
        // 201 recorded states. Any change to operand order, summation order,
        // or the force sign shifts these values by many orders of magnitude
        // more than the tolerance.
        let initial = State::new(vec![
            Body {
                position: Vec2::new(0.0, 0.0),
                mass: 1.0,
                velocity: Vec2::new(0.0, 0.0),
                brightness: 1.0,
            },
            Body {
                position: Vec2::new(1.0, 0.0),
                mass: 2.0,
                velocity: Vec2::new(0.0, 0.5),
                brightness: 0.5,
            },
            Body {
                position: Vec2::new(0.0, 1.0),
                mass: 3.0,
                velocity: Vec2::new(-0.5, 0.0),
                brightness: 0.25,
            },
        ]);

        #[rustfmt::skip]
        let expected: [f64; 18] = [
            -0.17186995576499467, 0.8334937700272318, 1.0,
            -5.32486292235755, 0.1672473639298682, 1.0,
            0.905465513669866, 1.0856255404948918, 2.0,
            1.9756691305411713, 1.330296769423776, 0.5,
            0.02031297614175426, 0.06508504966099635, 3.0,
            -0.04215844624159532, -0.6092803009257985, 0.25,
        ];

        let mut sim = Simulation::new(initial, 1e-3, 1e-3, 201, HistoryMode::FinalOnly)
            .expect("non-empty state");
        sim.run();

        let encoded = gal::encode(sim.last_state());
        assert_eq!(encoded.len(), expected.len());
        for (i, (got, want)) in encoded.iter().zip(expected.iter()).enumerate() {
            assert!(
                (got - want).abs() <= 1e-9,
                "field {} diverged from reference: got {}, want {}",
                i,
                got,
                want
            );
        }
    }

    #[test]
    fn final_only_frames_carry_the_current_step() {
        let mut sim = sim(mirrored_pair(), 10, HistoryMode::FinalOnly);
        sim.run();

        let frames = sim.frames();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].step, 9);
        assert_eq!(frames[0].xs[0], sim.last_state().bodies[0].position.x);
    }

    #[test]
    fn final_only_mode_exposes_only_the_newest_state() {
        let mut sim = sim(mirrored_pair(), 10, HistoryMode::FinalOnly);
        sim.run();

        assert_eq!(sim.current_step(), 9);
        assert!(sim.state_at(0).is_none());
        assert!(sim.state_at(9).is_some());
    }
}
