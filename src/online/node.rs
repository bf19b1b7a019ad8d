//! Compilation of a [`Formula`] into a flat graph of operator nodes.
//!
//! Children always precede their parents, so propagating an update in id
//! order visits every node after its inputs. Structurally equal sub-formulas
//! share one node.

use crate::strel::core::TimeInterval;
use crate::strel::formula_definition::Formula;

pub(crate) type NodeId = usize;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Operator {
    Atomic(String),
    Not(NodeId),
    And(NodeId, NodeId),
    Or(NodeId, NodeId),
    Implies(NodeId, NodeId),
    Eventually(Option<TimeInterval>, NodeId),
    Globally(Option<TimeInterval>, NodeId),
    Once(Option<TimeInterval>, NodeId),
    Historically(Option<TimeInterval>, NodeId),
    Until(Option<TimeInterval>, NodeId, NodeId),
    Since(Option<TimeInterval>, NodeId, NodeId),
    Somewhere(String, NodeId),
    Everywhere(String, NodeId),
    Escape(String, NodeId),
    Reach(String, NodeId, NodeId),
}

impl Operator {
    pub(crate) fn children(&self) -> Vec<NodeId> {
        match self {
            Operator::Atomic(_) => vec![],
            Operator::Not(c)
            | Operator::Eventually(_, c)
            | Operator::Globally(_, c)
            | Operator::Once(_, c)
            | Operator::Historically(_, c)
            | Operator::Somewhere(_, c)
            | Operator::Everywhere(_, c)
            | Operator::Escape(_, c) => vec![*c],
            Operator::And(l, r)
            | Operator::Or(l, r)
            | Operator::Implies(l, r)
            | Operator::Until(_, l, r)
            | Operator::Since(_, l, r)
            | Operator::Reach(_, l, r) => vec![*l, *r],
        }
    }

    /// Spatial nodes read every location of their children at once.
    pub(crate) fn is_spatial(&self) -> bool {
        matches!(
            self,
            Operator::Somewhere(..)
                | Operator::Everywhere(..)
                | Operator::Escape(..)
                | Operator::Reach(..)
        )
    }
}

/// An operator with its time domain `[from, to)`; empty when `from >= to`.
#[derive(Clone, Debug)]
pub(crate) struct Node {
    pub(crate) operator: Operator,
    pub(crate) from: f64,
    pub(crate) to: f64,
}

impl Node {
    pub(crate) fn is_empty(&self) -> bool {
        self.from >= self.to
    }

    /// Output span whose values may change when the input changed on
    /// `[start, end)`, clipped to the domain.
    pub(crate) fn affected(&self, start: f64, end: f64) -> Option<(f64, f64)> {
        let (p, q) = match &self.operator {
            Operator::Eventually(Some(i), _) | Operator::Globally(Some(i), _) => {
                (start - i.end(), end - i.start())
            }
            Operator::Once(Some(i), _) | Operator::Historically(Some(i), _) => {
                (start + i.start(), end + i.end())
            }
            Operator::Eventually(None, _) | Operator::Globally(None, _) | Operator::Until(..) => {
                (self.from, end)
            }
            Operator::Once(None, _) | Operator::Historically(None, _) | Operator::Since(..) => {
                (start, self.to)
            }
            _ => (start, end),
        };
        let (p, q) = (p.max(self.from), q.min(self.to));
        (p < q).then_some((p, q))
    }
}

pub(crate) struct Compilation {
    pub(crate) nodes: Vec<Node>,
    pub(crate) root: NodeId,
}

/// Compiles `formula` against the time horizon `[0, horizon)`.
pub(crate) fn compile(formula: &Formula, horizon: f64) -> Compilation {
    let mut nodes = Vec::new();
    let root = insert(formula, horizon, &mut nodes);
    Compilation { nodes, root }
}

fn insert(formula: &Formula, horizon: f64, nodes: &mut Vec<Node>) -> NodeId {
    let mut child = |f: &Formula| insert(f, horizon, nodes);
    let operator = match formula {
        Formula::Atomic(name) => Operator::Atomic(name.clone()),
        Formula::Not(f) => Operator::Not(child(f)),
        Formula::And(l, r) => Operator::And(child(l), child(r)),
        Formula::Or(l, r) => Operator::Or(child(l), child(r)),
        Formula::Implies(l, r) => Operator::Implies(child(l), child(r)),
        Formula::Eventually(i, f) => Operator::Eventually(*i, child(f)),
        Formula::Globally(i, f) => Operator::Globally(*i, child(f)),
        Formula::Once(i, f) => Operator::Once(*i, child(f)),
        Formula::Historically(i, f) => Operator::Historically(*i, child(f)),
        Formula::Until(i, l, r) => Operator::Until(*i, child(l), child(r)),
        Formula::Since(i, l, r) => Operator::Since(*i, child(l), child(r)),
        Formula::Somewhere(d, f) => Operator::Somewhere(d.clone(), child(f)),
        Formula::Everywhere(d, f) => Operator::Everywhere(d.clone(), child(f)),
        Formula::Escape(d, f) => Operator::Escape(d.clone(), child(f)),
        Formula::Reach(d, l, r) => Operator::Reach(d.clone(), child(l), child(r)),
    };
    if let Some(existing) = nodes.iter().position(|n| n.operator == operator) {
        return existing;
    }
    let (from, to) = domain(&operator, nodes, horizon);
    nodes.push(Node { operator, from, to });
    nodes.len() - 1
}

fn intersect(a: (f64, f64), b: (f64, f64)) -> (f64, f64) {
    (a.0.max(b.0), a.1.min(b.1))
}

fn domain(operator: &Operator, nodes: &[Node], horizon: f64) -> (f64, f64) {
    let of = |id: &NodeId| (nodes[*id].from, nodes[*id].to);
    match operator {
        Operator::Atomic(_) => (0.0, horizon),
        Operator::Eventually(Some(i), c) | Operator::Globally(Some(i), c) => {
            let (lo, hi) = of(c);
            (lo, hi - i.end())
        }
        Operator::Once(Some(i), c) | Operator::Historically(Some(i), c) => {
            let (lo, hi) = of(c);
            (lo + i.end(), hi)
        }
        Operator::Until(Some(i), l, r) => {
            let (lo, hi) = of(r);
            intersect(intersect(of(l), of(r)), (lo, hi - i.end()))
        }
        Operator::Since(Some(i), l, r) => {
            let (lo, hi) = of(r);
            intersect(intersect(of(l), of(r)), (lo + i.end(), hi))
        }
        Operator::Not(c)
        | Operator::Eventually(None, c)
        | Operator::Globally(None, c)
        | Operator::Once(None, c)
        | Operator::Historically(None, c)
        | Operator::Somewhere(_, c)
        | Operator::Everywhere(_, c)
        | Operator::Escape(_, c) => of(c),
        Operator::And(l, r)
        | Operator::Or(l, r)
        | Operator::Implies(l, r)
        | Operator::Until(None, l, r)
        | Operator::Since(None, l, r)
        | Operator::Reach(_, l, r) => intersect(of(l), of(r)),
    }
}

/// Sorts and coalesces overlapping or touching spans.
pub(crate) fn merge(mut spans: Vec<(f64, f64)>) -> Vec<(f64, f64)> {
    spans.sort_by(|a, b| a.0.total_cmp(&b.0));
    let mut merged: Vec<(f64, f64)> = Vec::with_capacity(spans.len());
    for (s, e) in spans {
        match merged.last_mut() {
            Some(last) if s <= last.1 => last.1 = last.1.max(e),
            _ => merged.push((s, e)),
        }
    }
    merged
}
