//! Hexagonal grid algebra.
//!
//! Patterns in Hex are walks on a pointy-top hex grid. This module defines
//! the six compass directions, the six turn angles, axial coordinates, the
//! Cartesian <-> axial snap, and the `HexPattern` walk itself together with
//! its orientation-invariant equality and the string form used to identify
//! patterns in source text.

use std::fmt;

use crate::error::ParseError;

/// One of the six compass directions of a pointy-top hex grid.
///
/// Fixed order matches the angle arithmetic in [`HexAngle`]: rotating a
/// direction by an angle is addition mod 6 over these indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HexDir {
    NorthEast,
    East,
    SouthEast,
    SouthWest,
    West,
    NorthWest,
}

impl HexDir {
    pub const ALL: [HexDir; 6] = [
        HexDir::NorthEast,
        HexDir::East,
        HexDir::SouthEast,
        HexDir::SouthWest,
        HexDir::West,
        HexDir::NorthWest,
    ];

    /// Axial unit step `(q, r)` for this direction.
    pub fn step(self) -> (i64, i64) {
        match self {
            HexDir::NorthEast => (1, -1),
            HexDir::East => (1, 0),
            HexDir::SouthEast => (0, 1),
            HexDir::SouthWest => (-1, 1),
            HexDir::West => (-1, 0),
            HexDir::NorthWest => (0, -1),
        }
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(i: u8) -> Self {
        Self::ALL[(i % 6) as usize]
    }

    /// Turn this direction by an angle (addition mod 6).
    pub fn turn(self, angle: HexAngle) -> Self {
        Self::from_index(self.index() + angle.index())
    }

    /// Parse the lowercase long-form name used in pattern strings.
    pub fn from_name(name: &str) -> Result<Self, ParseError> {
        match name {
            "northeast" => Ok(HexDir::NorthEast),
            "east" => Ok(HexDir::East),
            "southeast" => Ok(HexDir::SouthEast),
            "southwest" => Ok(HexDir::SouthWest),
            "west" => Ok(HexDir::West),
            "northwest" => Ok(HexDir::NorthWest),
            other => Err(ParseError::UnknownDirection(other.to_string())),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            HexDir::NorthEast => "northeast",
            HexDir::East => "east",
            HexDir::SouthEast => "southeast",
            HexDir::SouthWest => "southwest",
            HexDir::West => "west",
            HexDir::NorthWest => "northwest",
        }
    }
}

impl fmt::Display for HexDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A turn angle, in sixths of a full turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HexAngle {
    Forward,
    Right,
    RightBack,
    Back,
    LeftBack,
    Left,
}

impl HexAngle {
    pub const ALL: [HexAngle; 6] = [
        HexAngle::Forward,
        HexAngle::Right,
        HexAngle::RightBack,
        HexAngle::Back,
        HexAngle::LeftBack,
        HexAngle::Left,
    ];

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(i: u8) -> Self {
        Self::ALL[(i % 6) as usize]
    }

    /// Negation in the cyclic group of order 6: `(5 * angle) mod 6`, which
    /// is the same as `(-angle) mod 6`.
    pub fn negated(self) -> Self {
        Self::from_index((6 - self.index()) % 6)
    }

    pub fn from_char(c: char) -> Result<Self, ParseError> {
        match c {
            'w' => Ok(HexAngle::Forward),
            'e' => Ok(HexAngle::Right),
            'd' => Ok(HexAngle::RightBack),
            's' => Ok(HexAngle::Back),
            'a' => Ok(HexAngle::LeftBack),
            'q' => Ok(HexAngle::Left),
            other => Err(ParseError::UnknownAngle(other)),
        }
    }

    pub fn to_char(self) -> char {
        match self {
            HexAngle::Forward => 'w',
            HexAngle::Right => 'e',
            HexAngle::RightBack => 'd',
            HexAngle::Back => 's',
            HexAngle::LeftBack => 'a',
            HexAngle::Left => 'q',
        }
    }
}

/// An axial hex coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HexCoord {
    pub q: i64,
    pub r: i64,
}

impl HexCoord {
    pub const ORIGIN: HexCoord = HexCoord { q: 0, r: 0 };

    pub fn new(q: i64, r: i64) -> Self {
        HexCoord { q, r }
    }

    pub fn translated(self, dir: HexDir) -> Self {
        let (dq, dr) = dir.step();
        HexCoord {
            q: self.q + dq,
            r: self.r + dr,
        }
    }

    /// Convert this axial coordinate to a Cartesian point.
    pub fn to_point(self) -> (f64, f64) {
        let q = self.q as f64;
        let r = self.r as f64;
        let x = 3f64.sqrt() * q + 3f64.sqrt() / 2.0 * r;
        let y = 1.5 * r;
        (x, y)
    }

    /// Snap a Cartesian point to the nearest hex coordinate, using the
    /// standard axial rounding fix.
    pub fn snap(x: f64, y: f64) -> Self {
        let qf = 3f64.sqrt() / 3.0 * x - y / 3.0;
        let rf = 2.0 * y / 3.0;

        let mut q = qf.round();
        let mut r = rf.round();

        let q_diff = qf - q;
        let r_diff = rf - r;

        if q_diff.abs() >= r_diff.abs() {
            q += (q_diff + r_diff / 2.0).round();
        } else {
            r += (r_diff + q_diff / 2.0).round();
        }

        HexCoord {
            q: q as i64,
            r: r as i64,
        }
    }
}

/// A walk on the hex grid: a starting direction plus a sequence of turns.
///
/// Equality and hashing ignore `start`: a pattern is an unlabeled shape, see
/// [`HexPattern::eq`].
#[derive(Debug, Clone)]
pub struct HexPattern {
    pub start: HexDir,
    pub angles: Vec<HexAngle>,
}

impl HexPattern {
    pub fn new(start: HexDir, angles: Vec<HexAngle>) -> Self {
        HexPattern { start, angles }
    }

    /// The sequence of grid coordinates visited, including the origin.
    /// Length is `2 + angles.len()`.
    pub fn coords(&self) -> Vec<HexCoord> {
        let mut out = Vec::with_capacity(2 + self.angles.len());
        let mut pos = HexCoord::ORIGIN;
        out.push(pos);

        let mut dir = self.start;
        pos = pos.translated(dir);
        out.push(pos);

        for &angle in &self.angles {
            dir = dir.turn(angle);
            pos = pos.translated(dir);
            out.push(pos);
        }

        out
    }

    /// Sum of the turn angles, as an index mod 6.
    fn angle_sum_index(&self) -> u8 {
        self.angles
            .iter()
            .fold(0u8, |acc, a| (acc + a.index()) % 6)
    }

    /// The walk traversed backwards.
    pub fn reversed(&self) -> Self {
        let angles: Vec<HexAngle> = self.angles.iter().rev().map(|a| a.negated()).collect();
        let new_start_index = (self.start.index() + self.angle_sum_index() + 3) % 6;
        HexPattern {
            start: HexDir::from_index(new_start_index),
            angles,
        }
    }

    /// The walk reflected across the grid's vertical axis.
    pub fn mirrored(&self) -> Self {
        let angles = self.angles.iter().map(|a| a.negated()).collect();
        let new_start_index = (5 - self.start.index() as i64).rem_euclid(6) as u8;
        HexPattern {
            start: HexDir::from_index(new_start_index),
            angles,
        }
    }

    /// The walk with its starting direction rotated by `angle`.
    pub fn rotated(&self, angle: HexAngle) -> Self {
        HexPattern {
            start: self.start.turn(angle),
            angles: self.angles.clone(),
        }
    }

    /// Parse the `dir,angleChars` string form.
    pub fn parse(s: &str) -> Result<Self, ParseError> {
        let (dir_part, angle_part) = s
            .split_once(',')
            .ok_or_else(|| ParseError::EmptyDirection(s.to_string()))?;

        if dir_part.is_empty() {
            return Err(ParseError::EmptyDirection(s.to_string()));
        }

        let start = HexDir::from_name(dir_part)?;
        let angles = angle_part
            .chars()
            .map(HexAngle::from_char)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(HexPattern { start, angles })
    }
}

impl fmt::Display for HexPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let angle_chars: String = self.angles.iter().map(|a| a.to_char()).collect();
        write!(f, "{},{}", self.start, angle_chars)
    }
}

impl PartialEq for HexPattern {
    /// Pattern equality ignores `start`: only the turn sequence defines the
    /// shape.
    fn eq(&self, other: &Self) -> bool {
        self.angles == other.angles
    }
}
impl Eq for HexPattern {}

impl std::hash::Hash for HexPattern {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.angles.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_string_form() {
        let p = HexPattern::new(
            HexDir::NorthEast,
            vec![HexAngle::Left, HexAngle::Left, HexAngle::Right],
        );
        let s = p.to_string();
        let parsed = HexPattern::parse(&s).unwrap();
        assert_eq!(parsed.to_string(), s);
    }

    #[test]
    fn equality_ignores_start_dir() {
        let a = HexPattern::new(HexDir::NorthEast, vec![HexAngle::Left]);
        let b = HexPattern::new(HexDir::SouthWest, vec![HexAngle::Left]);
        assert_eq!(a, b);
    }

    #[test]
    fn double_reversed_preserves_angles() {
        let p = HexPattern::new(
            HexDir::East,
            vec![HexAngle::Left, HexAngle::Right, HexAngle::Back],
        );
        assert_eq!(p.reversed().reversed().angles, p.angles);
    }

    #[test]
    fn double_mirrored_preserves_angles() {
        let p = HexPattern::new(
            HexDir::West,
            vec![HexAngle::LeftBack, HexAngle::Forward, HexAngle::RightBack],
        );
        assert_eq!(p.mirrored().mirrored().angles, p.angles);
    }

    #[test]
    fn coords_length_matches_spec() {
        let p = HexPattern::new(HexDir::East, vec![HexAngle::Left, HexAngle::Right]);
        assert_eq!(p.coords().len(), 2 + p.angles.len());
    }

    #[test]
    fn unknown_direction_is_parse_error() {
        assert!(matches!(
            HexPattern::parse("north,qqq"),
            Err(ParseError::UnknownDirection(_))
        ));
    }

    #[test]
    fn unknown_angle_is_parse_error() {
        assert!(matches!(
            HexPattern::parse("east,qqz"),
            Err(ParseError::UnknownAngle('z'))
        ));
    }

    #[test]
    fn snap_of_point_is_idempotent() {
        for q in -5..5 {
            for r in -5..5 {
                let coord = HexCoord::new(q, r);
                let (x, y) = coord.to_point();
                assert_eq!(HexCoord::snap(x, y), coord);
            }
        }
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_angle() -> impl Strategy<Value = HexAngle> {
        (0u8..6).prop_map(HexAngle::from_index)
    }

    fn arb_dir() -> impl Strategy<Value = HexDir> {
        (0u8..6).prop_map(HexDir::from_index)
    }

    proptest! {
        #[test]
        fn snap_roundtrips_any_axial_coord(q in -500i64..500, r in -500i64..500) {
            let coord = HexCoord::new(q, r);
            let (x, y) = coord.to_point();
            prop_assert_eq!(HexCoord::snap(x, y), coord);
        }

        #[test]
        fn reversed_is_its_own_inverse(
            start in arb_dir(),
            angles in proptest::collection::vec(arb_angle(), 0..12),
        ) {
            let p = HexPattern::new(start, angles);
            prop_assert_eq!(p.reversed().reversed().angles, p.angles);
        }

        #[test]
        fn mirrored_is_its_own_inverse(
            start in arb_dir(),
            angles in proptest::collection::vec(arb_angle(), 0..12),
        ) {
            let p = HexPattern::new(start, angles);
            prop_assert_eq!(p.mirrored().mirrored().angles, p.angles);
        }

        #[test]
        fn coords_length_is_angles_plus_two(
            start in arb_dir(),
            angles in proptest::collection::vec(arb_angle(), 0..20),
        ) {
            let len = angles.len();
            let p = HexPattern::new(start, angles);
            prop_assert_eq!(p.coords().len(), len + 2);
        }

        #[test]
        fn rotation_does_not_change_shape_equality(
            start in arb_dir(),
            angles in proptest::collection::vec(arb_angle(), 0..12),
            turn in arb_angle(),
        ) {
            let p = HexPattern::new(start, angles);
            let rotated = p.rotated(turn);
            prop_assert_eq!(p, rotated);
        }

        #[test]
        fn string_roundtrip_preserves_angles(
            start in arb_dir(),
            angles in proptest::collection::vec(arb_angle(), 0..12),
        ) {
            let p = HexPattern::new(start, angles);
            let parsed = HexPattern::parse(&p.to_string()).unwrap();
            prop_assert_eq!(parsed.angles, p.angles);
        }
    }
}
