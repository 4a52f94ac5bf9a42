//! The Numerical Reflection number table.
//!
//! Maps each integer in `[-2000, 2000]` to the angle sequence used by its
//! Numerical Reflection pattern. Angle strings are generated, not hand
//! enumerated, by a doubling/bisection walk over the magnitude's binary
//! digits: each additional angle either doubles the accumulated value
//! (`Forward`) or doubles and adds one (`Right`). A leading sign marker
//! (`RightBack` for non-negative, `Back` for negative) is always present,
//! so a number and its negation never share a shape, and the marker keeps
//! every generated shape out of the registry's `{Left, LeftBack}`-using
//! built-in shapes (see `registry.rs`), since the doubling walk itself only
//! ever emits `Forward`/`Right`.
//!
//! This crate's encoding is a self-consistent scheme in this spirit, not a
//! byte-for-byte port of any particular host implementation (no portable
//! reference source for the exact angle strings was available to this
//! project) — see `DESIGN.md`.

use crate::hexgrid::{HexAngle, HexDir, HexPattern};

pub const MIN_VALUE: i64 = -2000;
pub const MAX_VALUE: i64 = 2000;

/// Build the `HexPattern` used for Numerical Reflection of `value`.
///
/// Returns `None` if `value` is out of `[MIN_VALUE, MAX_VALUE]`.
pub fn pattern_for(value: i64) -> Option<HexPattern> {
    if value < MIN_VALUE || value > MAX_VALUE {
        return None;
    }

    let negative = value < 0;
    let magnitude = value.unsigned_abs();

    let mut angles = vec![if negative { HexAngle::Back } else { HexAngle::RightBack }];
    angles.extend(magnitude_angles(magnitude));

    Some(HexPattern::new(HexDir::East, angles))
}

/// Recover the integer value of a Numerical Reflection pattern, if `shape`
/// is one this table could have produced.
pub fn value_of(shape: &HexPattern) -> Option<i64> {
    let mut angles = shape.angles.iter();
    let negative = match angles.next() {
        Some(HexAngle::Back) => true,
        Some(HexAngle::RightBack) => false,
        _ => return None,
    };

    let magnitude = magnitude_from_angles(angles.as_slice())?;
    let value = if negative {
        -(magnitude as i64)
    } else {
        magnitude as i64
    };

    if value < MIN_VALUE || value > MAX_VALUE {
        None
    } else {
        Some(value)
    }
}

fn magnitude_angles(magnitude: u64) -> Vec<HexAngle> {
    if magnitude == 0 {
        return Vec::new();
    }
    let bits = 64 - magnitude.leading_zeros();
    (0..bits)
        .rev()
        .map(|i| {
            if (magnitude >> i) & 1 == 1 {
                HexAngle::Right
            } else {
                HexAngle::Forward
            }
        })
        .collect()
}

fn magnitude_from_angles(angles: &[HexAngle]) -> Option<u64> {
    let mut value: u64 = 0;
    for angle in angles {
        let bit = match angle {
            HexAngle::Forward => 0,
            HexAngle::Right => 1,
            _ => return None,
        };
        value = value.checked_mul(2)?.checked_add(bit)?;
    }
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_across_the_full_range() {
        for v in MIN_VALUE..=MAX_VALUE {
            let shape = pattern_for(v).unwrap();
            assert_eq!(value_of(&shape), Some(v), "failed roundtrip for {v}");
        }
    }

    #[test]
    fn out_of_range_returns_none() {
        assert!(pattern_for(MIN_VALUE - 1).is_none());
        assert!(pattern_for(MAX_VALUE + 1).is_none());
    }

    #[test]
    fn positive_and_negative_shapes_differ() {
        let p = pattern_for(5).unwrap();
        let n = pattern_for(-5).unwrap();
        assert_ne!(p, n);
    }
}
