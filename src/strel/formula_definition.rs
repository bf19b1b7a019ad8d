//! Abstract syntax tree of temporal and spatio-temporal formulas.
//!
//! [`Formula`] is consumed by both the offline monitors and the online
//! compiler. Temporal nodes carry an optional [`TimeInterval`] (absent means
//! unbounded); spatial nodes name a distance function registered on the
//! monitor, which also supplies the distance bounds.

use crate::strel::core::TimeInterval;

use std::fmt::Display;

#[derive(Clone, Debug, PartialEq)]
pub enum Formula {
    /// Named atomic proposition, mapped from the input value by the monitor.
    Atomic(String),
    /// Negation: `¬f`.
    Not(Box<Formula>),
    /// Conjunction: `lhs ∧ rhs`.
    And(Box<Formula>, Box<Formula>),
    /// Disjunction: `lhs ∨ rhs`.
    Or(Box<Formula>, Box<Formula>),
    /// Implication: `lhs → rhs`, i.e. `¬lhs ∨ rhs`.
    Implies(Box<Formula>, Box<Formula>),
    /// Future eventually: `F[a,b] f`.
    Eventually(Option<TimeInterval>, Box<Formula>),
    /// Future globally: `G[a,b] f`.
    Globally(Option<TimeInterval>, Box<Formula>),
    /// Future until: `lhs U[a,b] rhs`.
    Until(Option<TimeInterval>, Box<Formula>, Box<Formula>),
    /// Past since: `lhs S[a,b] rhs`.
    Since(Option<TimeInterval>, Box<Formula>, Box<Formula>),
    /// Past eventually: `O[a,b] f`.
    Once(Option<TimeInterval>, Box<Formula>),
    /// Past globally: `H[a,b] f`.
    Historically(Option<TimeInterval>, Box<Formula>),
    /// `f` holds at some location within the distance bounds.
    Somewhere(String, Box<Formula>),
    /// `f` holds at every location within the distance bounds.
    Everywhere(String, Box<Formula>),
    /// `lhs` holds along a route to a location where `rhs` holds.
    Reach(String, Box<Formula>, Box<Formula>),
    /// A route leaving the distance bounds exists along which `f` holds.
    Escape(String, Box<Formula>),
}

impl Formula {
    pub fn atom(name: impl Into<String>) -> Self {
        Formula::Atomic(name.into())
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(f: Formula) -> Self {
        Formula::Not(Box::new(f))
    }

    pub fn and(lhs: Formula, rhs: Formula) -> Self {
        Formula::And(Box::new(lhs), Box::new(rhs))
    }

    pub fn or(lhs: Formula, rhs: Formula) -> Self {
        Formula::Or(Box::new(lhs), Box::new(rhs))
    }

    pub fn implies(lhs: Formula, rhs: Formula) -> Self {
        Formula::Implies(Box::new(lhs), Box::new(rhs))
    }

    pub fn eventually(interval: impl Into<Option<TimeInterval>>, f: Formula) -> Self {
        Formula::Eventually(interval.into(), Box::new(f))
    }

    pub fn globally(interval: impl Into<Option<TimeInterval>>, f: Formula) -> Self {
        Formula::Globally(interval.into(), Box::new(f))
    }

    pub fn until(interval: impl Into<Option<TimeInterval>>, lhs: Formula, rhs: Formula) -> Self {
        Formula::Until(interval.into(), Box::new(lhs), Box::new(rhs))
    }

    pub fn since(interval: impl Into<Option<TimeInterval>>, lhs: Formula, rhs: Formula) -> Self {
        Formula::Since(interval.into(), Box::new(lhs), Box::new(rhs))
    }

    pub fn once(interval: impl Into<Option<TimeInterval>>, f: Formula) -> Self {
        Formula::Once(interval.into(), Box::new(f))
    }

    pub fn historically(interval: impl Into<Option<TimeInterval>>, f: Formula) -> Self {
        Formula::Historically(interval.into(), Box::new(f))
    }

    pub fn somewhere(distance: impl Into<String>, f: Formula) -> Self {
        Formula::Somewhere(distance.into(), Box::new(f))
    }

    pub fn everywhere(distance: impl Into<String>, f: Formula) -> Self {
        Formula::Everywhere(distance.into(), Box::new(f))
    }

    pub fn reach(distance: impl Into<String>, lhs: Formula, rhs: Formula) -> Self {
        Formula::Reach(distance.into(), Box::new(lhs), Box::new(rhs))
    }

    pub fn escape(distance: impl Into<String>, f: Formula) -> Self {
        Formula::Escape(distance.into(), Box::new(f))
    }

    /// Direct subformulas, left to right.
    pub fn children(&self) -> Vec<&Formula> {
        match self {
            Formula::Atomic(_) => vec![],
            Formula::Not(f)
            | Formula::Eventually(_, f)
            | Formula::Globally(_, f)
            | Formula::Once(_, f)
            | Formula::Historically(_, f)
            | Formula::Somewhere(_, f)
            | Formula::Everywhere(_, f)
            | Formula::Escape(_, f) => vec![&**f],
            Formula::And(l, r)
            | Formula::Or(l, r)
            | Formula::Implies(l, r)
            | Formula::Until(_, l, r)
            | Formula::Since(_, l, r)
            | Formula::Reach(_, l, r) => vec![&**l, &**r],
        }
    }

    /// Atomic identifiers in first-occurrence order, without repetitions.
    pub fn atoms(&self) -> Vec<&str> {
        let mut atoms = Vec::new();
        self.collect(&mut |f| {
            if let Formula::Atomic(name) = f
                && !atoms.contains(&name.as_str())
            {
                atoms.push(name.as_str());
            }
        });
        atoms
    }

    /// Distance functions named by spatial operators.
    pub fn distances(&self) -> Vec<&str> {
        let mut distances = Vec::new();
        self.collect(&mut |f| {
            if let Some(name) = f.distance()
                && !distances.contains(&name)
            {
                distances.push(name);
            }
        });
        distances
    }

    /// Distance function of a spatial node.
    pub fn distance(&self) -> Option<&str> {
        match self {
            Formula::Somewhere(d, _)
            | Formula::Everywhere(d, _)
            | Formula::Reach(d, _, _)
            | Formula::Escape(d, _) => Some(d),
            _ => None,
        }
    }

    /// Interval of a temporal node, if bounded.
    pub fn interval(&self) -> Option<&TimeInterval> {
        match self {
            Formula::Eventually(i, _)
            | Formula::Globally(i, _)
            | Formula::Once(i, _)
            | Formula::Historically(i, _)
            | Formula::Until(i, _, _)
            | Formula::Since(i, _, _) => i.as_ref(),
            _ => None,
        }
    }

    pub fn is_spatial(&self) -> bool {
        self.distance().is_some() || self.children().iter().any(|f| f.is_spatial())
    }

    fn collect<'a>(&'a self, visit: &mut impl FnMut(&'a Formula)) {
        visit(self);
        for child in self.children() {
            child.collect(visit);
        }
    }
}

fn bounds(interval: &Option<TimeInterval>) -> String {
    interval.map_or_else(String::new, |i| i.to_string())
}

/// Renders formulas in compact mathematical notation, e.g.
/// `F[0, 10](x > 0)` or `(p) reach[hops] (q)`.
impl Display for Formula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Formula::Atomic(name) => write!(f, "{name}"),
            Formula::Not(g) => write!(f, "¬({g})"),
            Formula::And(l, r) => write!(f, "({l}) ∧ ({r})"),
            Formula::Or(l, r) => write!(f, "({l}) ∨ ({r})"),
            Formula::Implies(l, r) => write!(f, "({l}) → ({r})"),
            Formula::Eventually(i, g) => write!(f, "F{}({g})", bounds(i)),
            Formula::Globally(i, g) => write!(f, "G{}({g})", bounds(i)),
            Formula::Once(i, g) => write!(f, "O{}({g})", bounds(i)),
            Formula::Historically(i, g) => write!(f, "H{}({g})", bounds(i)),
            Formula::Until(i, l, r) => write!(f, "({l}) U{} ({r})", bounds(i)),
            Formula::Since(i, l, r) => write!(f, "({l}) S{} ({r})", bounds(i)),
            Formula::Somewhere(d, g) => write!(f, "somewhere[{d}]({g})"),
            Formula::Everywhere(d, g) => write!(f, "everywhere[{d}]({g})"),
            Formula::Reach(d, l, r) => write!(f, "({l}) reach[{d}] ({r})"),
            Formula::Escape(d, g) => write!(f, "escape[{d}]({g})"),
        }
    }
}
