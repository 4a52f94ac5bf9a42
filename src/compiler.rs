//! The shorthand compiler: lowers a nested, heterogeneous literal tree into
//! the flat pattern sequence the VM executes.
//!
//! The lowering is recursive over an `escapeCount` parameter (starting at
//! 1, doubling at each `Seq` nesting level) that tracks how many layers of
//! quotation a `mustEscape` pattern (Introspection, Retrospection,
//! Consideration) needs to survive before it reaches stack depth 1 as data
//! rather than as a live control action.

use crate::error::ParseError;
use crate::iota::Iota;
use crate::registry;

/// One node of the heterogeneous literal tree accepted by [`patterns`].
#[derive(Debug, Clone)]
pub enum Literal {
    Null,
    Bool(bool),
    Number(f64),
    Vector(f64, f64, f64),
    Pattern(Iota),
    Seq(Vec<Literal>),
}

const AXIS_EPS: f64 = 1e-9;

/// Lower a sequence of top-level literals into a flat pattern sequence.
pub fn patterns(items: impl IntoIterator<Item = Literal>) -> Result<Vec<Iota>, ParseError> {
    lower_all(&items.into_iter().collect::<Vec<_>>(), 1)
}

fn lower_all(items: &[Literal], escape_count: u32) -> Result<Vec<Iota>, ParseError> {
    let mut out = Vec::new();
    for item in items {
        out.extend(lower_one(item, escape_count)?);
    }
    Ok(out)
}

fn lower_one(item: &Literal, escape_count: u32) -> Result<Vec<Iota>, ParseError> {
    match item {
        Literal::Null => Ok(vec![registry::nullary_reflection()]),
        Literal::Bool(true) => Ok(vec![registry::true_reflection()]),
        Literal::Bool(false) => Ok(vec![registry::false_reflection()]),
        Literal::Number(n) => lower_number(*n),
        Literal::Vector(x, y, z) => lower_vector(*x, *y, *z, escape_count),
        Literal::Pattern(iota) => Ok(lower_pattern(iota, escape_count)),
        Literal::Seq(xs) => lower_seq(xs, escape_count),
    }
}

fn lower_pattern(iota: &Iota, escape_count: u32) -> Vec<Iota> {
    let must_escape = matches!(iota, Iota::Pattern(p) if p.must_escape);
    if must_escape && escape_count > 1 {
        let mut out = vec![registry::consideration(); (escape_count - 1) as usize];
        out.push(iota.clone());
        out
    } else {
        vec![iota.clone()]
    }
}

fn lower_seq(xs: &[Literal], escape_count: u32) -> Result<Vec<Iota>, ParseError> {
    if xs.is_empty() {
        return Ok(vec![registry::vacant_reflection()]);
    }

    if xs.len() == 1 {
        match &xs[0] {
            Literal::Seq(inner) => {
                // A singleton list whose one element is itself a list: lower
                // the inner list at the *same* depth (no quotation is opened
                // here) and wrap the single resulting value.
                let mut out = lower_seq(inner, escape_count)?;
                out.push(registry::singles_purification());
                return Ok(out);
            }
            Literal::Pattern(iota) if matches!(iota, Iota::Pattern(p) if p.must_escape) => {
                // "CONSIDER x SINGLES": a must-escape pattern used as a bare
                // value needs to be force-escaped even with no quotation
                // open at all, hence the minimum of one Consideration; the
                // 2*escapeCount-1 count is what keeps this combinator
                // consistent when it itself sits inside further nesting.
                let count = 2 * escape_count - 1;
                let mut out = vec![registry::consideration(); count as usize];
                out.push(iota.clone());
                out.push(registry::singles_purification());
                return Ok(out);
            }
            _ => {}
        }
    }

    let mut out = vec![registry::introspection()];
    out.extend(lower_all(xs, escape_count * 2)?);
    out.push(registry::retrospection());
    Ok(out)
}

fn lower_number(n: f64) -> Result<Vec<Iota>, ParseError> {
    if (n - std::f64::consts::TAU).abs() < AXIS_EPS {
        return Ok(vec![registry::circles_reflection()]);
    }
    if (n - std::f64::consts::PI).abs() < AXIS_EPS {
        return Ok(vec![registry::arcs_reflection()]);
    }
    if (n - std::f64::consts::E).abs() < AXIS_EPS {
        return Ok(vec![registry::eulers_reflection()]);
    }
    if n.fract() != 0.0 {
        return Err(ParseError::NumberOutOfRange(n));
    }
    let v = n as i64;
    if v < crate::numtable::MIN_VALUE || v > crate::numtable::MAX_VALUE {
        return Err(ParseError::NumberOutOfRange(n));
    }
    Ok(vec![registry::numerical_reflection(v)])
}

fn lower_vector(x: f64, y: f64, z: f64, escape_count: u32) -> Result<Vec<Iota>, ParseError> {
    let axis = |target: (f64, f64, f64)| {
        (x - target.0).abs() < AXIS_EPS && (y - target.1).abs() < AXIS_EPS && (z - target.2).abs() < AXIS_EPS
    };

    if axis((1.0, 0.0, 0.0)) {
        return Ok(vec![registry::vector_plus_x()]);
    }
    if axis((0.0, 1.0, 0.0)) {
        return Ok(vec![registry::vector_plus_y()]);
    }
    if axis((0.0, 0.0, 1.0)) {
        return Ok(vec![registry::vector_plus_z()]);
    }
    if axis((-1.0, 0.0, 0.0)) {
        return Ok(vec![registry::vector_minus_x()]);
    }
    if axis((0.0, -1.0, 0.0)) {
        return Ok(vec![registry::vector_minus_y()]);
    }
    if axis((0.0, 0.0, -1.0)) {
        return Ok(vec![registry::vector_minus_z()]);
    }
    if axis((0.0, 0.0, 0.0)) {
        return Ok(vec![registry::vector_zero()]);
    }

    // Not an axis constant: emit patterns(x, y, z, VectorExaltation) at the
    // same depth; the three components are plain numbers, unaffected by
    // escapeCount.
    let _ = escape_count;
    let mut out = lower_number(x)?;
    out.extend(lower_number(y)?);
    out.extend(lower_number(z)?);
    out.push(registry::vector_exaltation());
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{introspection, minds_reflection};

    fn shapes(iotas: &[Iota]) -> Vec<Iota> {
        iotas.to_vec()
    }

    fn assert_same(actual: Vec<Iota>, expected: Vec<Iota>) {
        assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
        for (a, e) in actual.iter().zip(expected.iter()) {
            assert!(a.equals(e), "{a} != {e}");
        }
    }

    #[test]
    fn empty_call_lowers_to_nothing() {
        let out = patterns([]).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn empty_list_lowers_to_vacant_reflection() {
        let out = patterns([Literal::Seq(vec![])]).unwrap();
        assert_same(out, shapes(&[registry::vacant_reflection()]));
    }

    #[test]
    fn nested_empty_list_uses_singles_purification() {
        let out = patterns([Literal::Seq(vec![Literal::Seq(vec![])])]).unwrap();
        assert_same(
            out,
            shapes(&[registry::vacant_reflection(), registry::singles_purification()]),
        );
    }

    #[test]
    fn singleton_list_of_a_plain_pattern_uses_quotation() {
        let out = patterns([Literal::Seq(vec![Literal::Pattern(minds_reflection())])]).unwrap();
        assert_same(
            out,
            shapes(&[introspection(), minds_reflection(), registry::retrospection()]),
        );
    }

    #[test]
    fn nested_singleton_of_a_pattern_adds_singles_purification() {
        let out = patterns([Literal::Seq(vec![Literal::Seq(vec![Literal::Pattern(
            minds_reflection(),
        )])])])
        .unwrap();
        assert_same(
            out,
            shapes(&[
                introspection(),
                minds_reflection(),
                registry::retrospection(),
                registry::singles_purification(),
            ]),
        );
    }

    #[test]
    fn bare_must_escape_pattern_emits_itself() {
        let out = patterns([Literal::Pattern(introspection())]).unwrap();
        assert_same(out, shapes(&[introspection()]));
    }

    #[test]
    fn singleton_must_escape_pattern_uses_consider_singles() {
        let out = patterns([Literal::Seq(vec![Literal::Pattern(introspection())])]).unwrap();
        assert_same(
            out,
            shapes(&[
                registry::consideration(),
                introspection(),
                registry::singles_purification(),
            ]),
        );
    }

    #[test]
    fn must_escape_pattern_alongside_another_item_uses_plain_consideration_rule() {
        let out = patterns([Literal::Seq(vec![
            Literal::Pattern(introspection()),
            Literal::Pattern(minds_reflection()),
        ])])
        .unwrap();
        assert_same(
            out,
            shapes(&[
                introspection(),
                registry::consideration(),
                introspection(),
                minds_reflection(),
                registry::retrospection(),
            ]),
        );
    }

    #[test]
    fn nested_consider_singles_doubles_through_a_quotation() {
        let out = patterns([Literal::Seq(vec![Literal::Seq(vec![Literal::Pattern(
            introspection(),
        )])])])
        .unwrap();
        assert_same(
            out,
            shapes(&[
                registry::consideration(),
                introspection(),
                registry::singles_purification(),
                registry::singles_purification(),
            ]),
        );
    }

    #[test]
    fn consider_singles_nested_inside_a_two_element_quotation() {
        let out = patterns([Literal::Seq(vec![
            Literal::Seq(vec![Literal::Pattern(introspection())]),
            Literal::Pattern(minds_reflection()),
        ])])
        .unwrap();
        assert_same(
            out,
            shapes(&[
                introspection(),
                registry::consideration(),
                registry::consideration(),
                registry::consideration(),
                introspection(),
                registry::singles_purification(),
                minds_reflection(),
                registry::retrospection(),
            ]),
        );
    }

    #[test]
    fn vector_of_special_constants_lowers_to_three_reflections() {
        let out = patterns([Literal::Vector(
            std::f64::consts::TAU,
            std::f64::consts::PI,
            std::f64::consts::E,
        )])
        .unwrap();
        assert_same(
            out,
            shapes(&[
                registry::circles_reflection(),
                registry::arcs_reflection(),
                registry::eulers_reflection(),
                registry::vector_exaltation(),
            ]),
        );
    }

    #[test]
    fn out_of_range_number_is_a_parse_error() {
        let err = patterns([Literal::Number(1e9)]).unwrap_err();
        assert!(matches!(err, ParseError::NumberOutOfRange(_)));
    }

    #[test]
    fn non_integer_number_is_a_parse_error() {
        let err = patterns([Literal::Number(1.5)]).unwrap_err();
        assert!(matches!(err, ParseError::NumberOutOfRange(_)));
    }
}
