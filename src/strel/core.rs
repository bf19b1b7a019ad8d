//! Value domains and time intervals shared by the offline and online engines.
//!
//! A [`SignalDomain`] interprets the logical connectives over a value set:
//! `bool` gives boolean satisfaction, `f64` gives quantitative robustness and
//! [`AbstractInterval`] brackets values that are only partially known.

use crate::error::{MonitorError, Result};

use std::fmt::{Debug, Display};

/// Algebraic interpretation of the logical connectives over `Self`.
///
/// `(Self, conjunction, disjunction)` must form a bounded lattice with
/// bottom [`SignalDomain::min`] and top [`SignalDomain::max`]: both operations
/// are commutative, associative and idempotent, and `negation` is an
/// involution exchanging them.
pub trait SignalDomain: Clone + PartialEq + Debug + Send + Sync + 'static {
    fn conjunction(l: &Self, r: &Self) -> Self;
    fn disjunction(l: &Self, r: &Self) -> Self;
    fn negation(v: &Self) -> Self;
    /// Identity of `disjunction`, absorbing for `conjunction`.
    fn min() -> Self;
    /// Identity of `conjunction`, absorbing for `disjunction`.
    fn max() -> Self;

    fn equal_to(l: &Self, r: &Self) -> bool {
        l == r
    }

    /// Lattice order: `l <= r` iff `l ∨ r == r`.
    fn less_or_equal(l: &Self, r: &Self) -> bool {
        Self::equal_to(&Self::disjunction(l, r), r)
    }

    fn implies(antecedent: &Self, consequent: &Self) -> Self {
        Self::disjunction(&Self::negation(antecedent), consequent)
    }
}

impl SignalDomain for bool {
    fn conjunction(l: &bool, r: &bool) -> bool {
        *l && *r
    }
    fn disjunction(l: &bool, r: &bool) -> bool {
        *l || *r
    }
    fn negation(v: &bool) -> bool {
        !*v
    }
    fn min() -> bool {
        false
    }
    fn max() -> bool {
        true
    }
}

impl SignalDomain for f64 {
    fn conjunction(l: &f64, r: &f64) -> f64 {
        l.min(*r)
    }
    fn disjunction(l: &f64, r: &f64) -> f64 {
        l.max(*r)
    }
    fn negation(v: &f64) -> f64 {
        -*v
    }
    fn min() -> f64 {
        f64::NEG_INFINITY
    }
    fn max() -> f64 {
        f64::INFINITY
    }
    fn less_or_equal(l: &f64, r: &f64) -> bool {
        l <= r
    }
}

/// A closed bracket `[lower, upper]` over a domain, used by the online engine
/// to represent values that later updates may still narrow.
#[derive(Clone, Debug, PartialEq)]
pub struct AbstractInterval<R> {
    lower: R,
    upper: R,
}

impl<R: SignalDomain> AbstractInterval<R> {
    pub fn new(lower: R, upper: R) -> Result<Self> {
        if !R::less_or_equal(&lower, &upper) {
            return Err(MonitorError::argument(format!(
                "interval lower bound {lower:?} exceeds upper bound {upper:?}"
            )));
        }
        Ok(AbstractInterval { lower, upper })
    }

    /// The degenerate interval holding exactly `value`.
    pub fn point(value: R) -> Self {
        AbstractInterval {
            lower: value.clone(),
            upper: value,
        }
    }

    /// The interval carrying no information: `[min, max]`.
    pub fn unknown() -> Self {
        AbstractInterval {
            lower: R::min(),
            upper: R::max(),
        }
    }

    pub fn lower(&self) -> &R {
        &self.lower
    }

    pub fn upper(&self) -> &R {
        &self.upper
    }

    pub fn is_point(&self) -> bool {
        R::equal_to(&self.lower, &self.upper)
    }

    /// True when `other` lies inside `self`, i.e. replacing `self` by `other`
    /// is a refinement.
    pub fn contains(&self, other: &Self) -> bool {
        R::less_or_equal(&self.lower, &other.lower) && R::less_or_equal(&other.upper, &self.upper)
    }
}

impl<R: SignalDomain> SignalDomain for AbstractInterval<R> {
    fn conjunction(l: &Self, r: &Self) -> Self {
        AbstractInterval {
            lower: R::conjunction(&l.lower, &r.lower),
            upper: R::conjunction(&l.upper, &r.upper),
        }
    }

    fn disjunction(l: &Self, r: &Self) -> Self {
        AbstractInterval {
            lower: R::disjunction(&l.lower, &r.lower),
            upper: R::disjunction(&l.upper, &r.upper),
        }
    }

    fn negation(v: &Self) -> Self {
        AbstractInterval {
            lower: R::negation(&v.upper),
            upper: R::negation(&v.lower),
        }
    }

    fn min() -> Self {
        AbstractInterval::point(R::min())
    }

    fn max() -> Self {
        AbstractInterval::point(R::max())
    }
}

impl<R: Debug> Display for AbstractInterval<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}, {:?}]", self.lower, self.upper)
    }
}

/// Closed time bounds `[start, end]` of a temporal operator, relative to the
/// evaluation instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeInterval {
    start: f64,
    end: f64,
}

impl TimeInterval {
    pub fn new(start: f64, end: f64) -> Result<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(MonitorError::argument(format!(
                "interval bounds [{start}, {end}] must be finite"
            )));
        }
        if start < 0.0 || start > end {
            return Err(MonitorError::argument(format!(
                "interval bounds [{start}, {end}] must satisfy 0 <= start <= end"
            )));
        }
        Ok(TimeInterval { start, end })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }
}

impl Display for TimeInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}
