//! Codec for the `.gal` body-record format.
//!
//! A `.gal` file is a headerless flat sequence of 8-byte native-endian
//! IEEE-754 doubles, six per body, in the fixed field order
//! `x_pos, y_pos, mass, x_vel, y_vel, brightness`. Record order is body
//! index, and `decode(encode(s)) == s` holds for every valid state.

use std::fs;
use std::path::Path;

use zerocopy::{FromBytes, IntoBytes};

use galaxy_common::{Body, State, Vec2};

use crate::error::GalError;

/// Doubles per body record.
pub const FIELDS_PER_BODY: usize = 6;

/// Groups a flat sequence of doubles into an ordered body list.
pub fn decode(raw: &[f64]) -> Result<State, GalError> {
    if raw.len() % FIELDS_PER_BODY != 0 {
        return Err(GalError::Format { values: raw.len() });
    }

    let bodies = raw
        .chunks_exact(FIELDS_PER_BODY)
        .map(|record| Body {
            position: Vec2::new(record[0], record[1]),
            mass: record[2],
            velocity: Vec2::new(record[3], record[4]),
            brightness: record[5],
        })
        .collect();

    Ok(State::new(bodies))
}

/// Inverse of [`decode`]: concatenates the six fields of every body in
/// index order.
pub fn encode(state: &State) -> Vec<f64> {
    let mut raw = Vec::with_capacity(state.len() * FIELDS_PER_BODY);
    for body in &state.bodies {
        raw.push(body.position.x);
        raw.push(body.position.y);
        raw.push(body.mass);
        raw.push(body.velocity.x);
        raw.push(body.velocity.y);
        raw.push(body.brightness);
    }
    raw
}

/// Reads an entire file as a contiguous block of doubles.
pub fn read<P: AsRef<Path>>(path: P) -> Result<Vec<f64>, GalError> {
    let bytes = fs::read(path.as_ref())?;
    if bytes.len() % 8 != 0 {
        return Err(GalError::TruncatedFile { len: bytes.len() });
    }

    bytes
        .chunks_exact(8)
        .map(|chunk| {
            f64::read_from_bytes(chunk).map_err(|_| GalError::TruncatedFile { len: bytes.len() })
        })
        .collect()
}

/// Writes the flat double sequence back in the same byte layout.
///
/// The data goes to a temporary sibling file first and is renamed over the
/// destination, so a failed run never leaves a truncated output behind.
pub fn write<P: AsRef<Path>>(path: P, raw: &[f64]) -> Result<(), GalError> {
    let path = path.as_ref();
    let mut bytes = Vec::with_capacity(raw.len() * 8);
    for value in raw {
        bytes.extend_from_slice(value.as_bytes());
    }

    let tmp = path.with_extension("gal.tmp");
    fs::write(&tmp, &bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
