//! Until and since.
//!
//! On a common segmentation with `p_k`, `q_k` constant on segment `k`, the
//! unbounded operators satisfy `u_k = q_k ∨ (p_k ∧ u_{k±1})`, scanned
//! backward for until and forward for since. The bounded forms conjoin that
//! result with a bounded eventually (resp. once) of the right operand.

use super::boolean::conjunction;
use super::temporal::{eventually, once};
use crate::signal::Signal;
use crate::strel::core::{SignalDomain, TimeInterval};

pub fn until<R: SignalDomain>(
    lhs: &Signal<R>,
    rhs: &Signal<R>,
    interval: Option<&TimeInterval>,
) -> Signal<R> {
    let unbounded = pair(lhs, rhs).iterate_backward(step::<R>, R::min());
    match interval {
        None => unbounded,
        Some(i) => conjunction(&unbounded, &eventually(rhs, Some(i))),
    }
}

pub fn since<R: SignalDomain>(
    lhs: &Signal<R>,
    rhs: &Signal<R>,
    interval: Option<&TimeInterval>,
) -> Signal<R> {
    let unbounded = pair(lhs, rhs).iterate_forward(step::<R>, R::min());
    match interval {
        None => unbounded,
        Some(i) => conjunction(&unbounded, &once(rhs, Some(i))),
    }
}

fn pair<R: SignalDomain>(lhs: &Signal<R>, rhs: &Signal<R>) -> Signal<(R, R)> {
    lhs.apply_binary(rhs, |p, q| (p.clone(), q.clone()))
}

fn step<R: SignalDomain>((p, q): &(R, R), acc: &R) -> R {
    R::disjunction(q, &R::conjunction(p, acc))
}
