//! Pointwise connectives.

use crate::signal::Signal;
use crate::strel::core::SignalDomain;

pub fn negation<R: SignalDomain>(signal: &Signal<R>) -> Signal<R> {
    signal.apply(R::negation)
}

pub fn conjunction<R: SignalDomain>(lhs: &Signal<R>, rhs: &Signal<R>) -> Signal<R> {
    lhs.apply_binary(rhs, R::conjunction)
}

pub fn disjunction<R: SignalDomain>(lhs: &Signal<R>, rhs: &Signal<R>) -> Signal<R> {
    lhs.apply_binary(rhs, R::disjunction)
}

pub fn implication<R: SignalDomain>(lhs: &Signal<R>, rhs: &Signal<R>) -> Signal<R> {
    lhs.apply_binary(rhs, R::implies)
}
