//! The iota value algebra.
//!
//! An `Iota` is a tagged value in Hex's closed variant set. Every variant
//! shares the same small capability surface: [`Iota::is_truthy`],
//! [`Iota::equals`] (exact, or within tolerance for `Double`/`Vector3`),
//! [`Iota::type_tag`], and [`Iota::display_fragments`].

use std::fmt;
use std::rc::Rc;

use crate::frame::ContinuationFrame;
use crate::pattern::Pattern;

/// Equality/truthiness tolerance used for `Double` and `Vector3`.
pub const TOLERANCE: f64 = 1e-4;

/// An entity type: a named classification shared by reference across all
/// entities of that kind (the host game's mob/player type registry).
#[derive(Debug, Clone)]
pub struct EntityType {
    pub name: String,
}

impl PartialEq for EntityType {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

/// A concrete entity: the caster, a mob, an item frame, etc. Equality is
/// reference identity, never structural.
#[derive(Debug, Clone)]
pub struct Entity {
    pub entity_type: Rc<EntityType>,
    pub name: String,
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

/// Tag identifying an [`Iota`] variant, used for typed `get` access and for
/// reporting type mismatches in a [`crate::error::Mishap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IotaType {
    Null,
    Garbage,
    Boolean,
    Double,
    String,
    Vector3,
    Entity,
    EntityType,
    Pattern,
    List,
    Continuation,
    IotaType,
}

impl fmt::Display for IotaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IotaType::Null => "null",
            IotaType::Garbage => "garbage",
            IotaType::Boolean => "boolean",
            IotaType::Double => "number",
            IotaType::String => "string",
            IotaType::Vector3 => "vector",
            IotaType::Entity => "entity",
            IotaType::EntityType => "entity type",
            IotaType::Pattern => "pattern",
            IotaType::List => "list",
            IotaType::Continuation => "continuation",
            IotaType::IotaType => "type",
        };
        write!(f, "{name}")
    }
}

/// A value in Hex's closed variant set.
///
/// There is deliberately no derived `PartialEq`: Hex's equality is
/// tolerance-aware for `Double`/`Vector3` and reference-identity-based for
/// `Entity`/`EntityType`/`Continuation`, so it is always spelled out via
/// [`Iota::equals`] rather than `==`.
#[derive(Debug, Clone)]
pub enum Iota {
    Null,
    Garbage,
    Boolean(bool),
    Double(f64),
    String(String),
    Vector3(f64, f64, f64),
    Entity(Rc<Entity>),
    EntityType(Rc<EntityType>),
    Pattern(Rc<Pattern>),
    List(Vec<Iota>),
    Continuation(Vec<Rc<dyn ContinuationFrame>>),
    IotaType(IotaType),
}

impl Iota {
    pub fn list(items: impl IntoIterator<Item = Iota>) -> Self {
        Iota::List(items.into_iter().collect())
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Iota::Null | Iota::Garbage => false,
            Iota::Boolean(b) => *b,
            Iota::Double(d) => *d != 0.0,
            Iota::String(s) => !s.is_empty(),
            // Open question resolved per spec: truthy iff *all three*
            // components are non-zero, not "any non-zero".
            Iota::Vector3(x, y, z) => *x != 0.0 && *y != 0.0 && *z != 0.0,
            Iota::Entity(_) | Iota::EntityType(_) => true,
            Iota::Pattern(_) => true,
            Iota::List(items) => !items.is_empty(),
            Iota::Continuation(_) => true,
            Iota::IotaType(_) => true,
        }
    }

    /// Equality, tolerating small floating-point differences for `Double`
    /// and `Vector3` (see [`TOLERANCE`]).
    pub fn equals(&self, other: &Iota) -> bool {
        match (self, other) {
            (Iota::Null, Iota::Null) => true,
            (Iota::Garbage, Iota::Garbage) => true,
            (Iota::Boolean(a), Iota::Boolean(b)) => a == b,
            (Iota::Double(a), Iota::Double(b)) => (a - b).abs() < TOLERANCE,
            (Iota::String(a), Iota::String(b)) => a == b,
            (Iota::Vector3(ax, ay, az), Iota::Vector3(bx, by, bz)) => {
                let dx = ax - bx;
                let dy = ay - by;
                let dz = az - bz;
                (dx * dx + dy * dy + dz * dz).sqrt() < TOLERANCE
            }
            (Iota::Entity(a), Iota::Entity(b)) => Rc::ptr_eq(a, b),
            (Iota::EntityType(a), Iota::EntityType(b)) => Rc::ptr_eq(a, b),
            (Iota::Pattern(a), Iota::Pattern(b)) => a.shape == b.shape,
            (Iota::List(a), Iota::List(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.equals(y))
            }
            (Iota::Continuation(a), Iota::Continuation(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b.iter())
                        .all(|(x, y)| Rc::ptr_eq(x, y))
            }
            (Iota::IotaType(a), Iota::IotaType(b)) => a == b,
            _ => false,
        }
    }

    pub fn type_tag(&self) -> IotaType {
        match self {
            Iota::Null => IotaType::Null,
            Iota::Garbage => IotaType::Garbage,
            Iota::Boolean(_) => IotaType::Boolean,
            Iota::Double(_) => IotaType::Double,
            Iota::String(_) => IotaType::String,
            Iota::Vector3(..) => IotaType::Vector3,
            Iota::Entity(_) => IotaType::Entity,
            Iota::EntityType(_) => IotaType::EntityType,
            Iota::Pattern(_) => IotaType::Pattern,
            Iota::List(_) => IotaType::List,
            Iota::Continuation(_) => IotaType::Continuation,
            Iota::IotaType(_) => IotaType::IotaType,
        }
    }

    /// Render as an ordered sequence of display atoms, per the display
    /// grammar: lists join their elements with commas, except that commas
    /// are omitted between two adjacent `Pattern` fragments.
    pub fn display_fragments(&self) -> Vec<DisplayAtom> {
        match self {
            Iota::Null => vec![DisplayAtom::Text("Null".to_string())],
            Iota::Garbage => vec![DisplayAtom::Text("Garbage".to_string())],
            Iota::Boolean(b) => vec![DisplayAtom::Text(b.to_string())],
            Iota::Double(d) => vec![DisplayAtom::Text(format_double(*d))],
            Iota::String(s) => vec![DisplayAtom::Text(format!("\"{s}\""))],
            Iota::Vector3(x, y, z) => vec![DisplayAtom::Text(format!(
                "({}, {}, {})",
                format_double(*x),
                format_double(*y),
                format_double(*z)
            ))],
            Iota::Entity(e) => vec![DisplayAtom::Text(e.name.clone())],
            Iota::EntityType(t) => vec![DisplayAtom::Text(t.name.clone())],
            Iota::Pattern(p) => vec![DisplayAtom::Text(format!("<{}>", p.shape))],
            Iota::List(items) => {
                let mut out = vec![DisplayAtom::Text("[".to_string())];
                for (i, item) in items.iter().enumerate() {
                    if i > 0 && !(is_pattern(&items[i - 1]) && is_pattern(item)) {
                        out.push(DisplayAtom::Text(", ".to_string()));
                    }
                    out.push(DisplayAtom::Nested(Box::new(item.clone())));
                }
                out.push(DisplayAtom::Text("]".to_string()));
                out
            }
            Iota::Continuation(frames) => {
                vec![DisplayAtom::Text(format!("Continuation[{} frames]", frames.len()))]
            }
            Iota::IotaType(t) => vec![DisplayAtom::Text(t.to_string())],
        }
    }
}

fn is_pattern(iota: &Iota) -> bool {
    matches!(iota, Iota::Pattern(_))
}

/// Format a `Double` with `en-US`-style thousands grouping and exactly two
/// decimal places.
fn format_double(d: f64) -> String {
    let negative = d < 0.0;
    let rounded = (d.abs() * 100.0).round() / 100.0;
    let int_part = rounded.trunc() as i64;
    let frac_part = ((rounded - rounded.trunc()) * 100.0).round().abs() as i64;

    let grouped = group_thousands(int_part);
    let sign = if negative { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part:02}")
}

fn group_thousands(n: i64) -> String {
    let digits = n.abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped.chars().rev().collect()
}

/// One atom of a rendered iota: literal text, or a nested iota (so a caller
/// can recursively flatten with its own separator policy).
#[derive(Debug, Clone)]
pub enum DisplayAtom {
    Text(String),
    Nested(Box<Iota>),
}

impl fmt::Display for Iota {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn render(atom: &DisplayAtom, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match atom {
                DisplayAtom::Text(s) => write!(f, "{s}"),
                DisplayAtom::Nested(i) => write!(f, "{i}"),
            }
        }
        for atom in self.display_fragments() {
            render(&atom, f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_tolerance_boundary() {
        let a = Iota::Double(1.0);
        let b = Iota::Double(1.0 + 9e-5);
        assert!(a.equals(&b));

        let c = Iota::Double(0.0);
        let d = Iota::Double(1e-4);
        assert!(!c.equals(&d));
    }

    #[test]
    fn list_equality_is_recursive_and_length_matching() {
        let a = Iota::list([Iota::Double(1.0), Iota::Double(2.0)]);
        let b = Iota::list([Iota::Double(1.0), Iota::Double(2.0)]);
        let c = Iota::list([Iota::Double(1.0)]);
        assert!(a.equals(&b));
        assert!(!a.equals(&c));
    }

    #[test]
    fn vector_truthy_requires_all_three_nonzero() {
        assert!(!Iota::Vector3(1.0, 1.0, 0.0).is_truthy());
        assert!(Iota::Vector3(1.0, 1.0, 1.0).is_truthy());
    }

    #[test]
    fn double_display_formats_two_decimals_with_grouping() {
        assert_eq!(format_double(1234.5), "1,234.50");
        assert_eq!(format_double(-0.2), "-0.20");
    }
}
