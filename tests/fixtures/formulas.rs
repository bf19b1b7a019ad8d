#![allow(dead_code)]

use ostrel::strel::core::TimeInterval;
use ostrel::strel::formula_definition::Formula;
use rstest::fixture;

// ---
// Formula Fixtures
// ---

fn interval(a: f64, b: f64) -> TimeInterval {
    TimeInterval::new(a, b).unwrap()
}

fn p() -> Formula {
    Formula::atom("p")
}

fn q() -> Formula {
    Formula::atom("q")
}

/// One formula per operator kind, over the atoms `p` and `q`.
#[fixture]
#[once]
pub fn temporal_formulas() -> Vec<Formula> {
    vec![
        p(),
        Formula::not(p()),
        Formula::and(p(), q()),
        Formula::or(p(), q()),
        Formula::implies(p(), q()),
        Formula::eventually(interval(0.5, 2.0), p()),
        Formula::eventually(None, p()),
        Formula::globally(interval(0.0, 1.5), p()),
        Formula::globally(None, p()),
        Formula::once(interval(1.0, 2.5), p()),
        Formula::once(None, p()),
        Formula::historically(interval(0.0, 1.0), p()),
        Formula::historically(None, p()),
        Formula::until(interval(0.5, 3.0), p(), q()),
        Formula::until(None, p(), q()),
        Formula::since(interval(0.0, 2.0), p(), q()),
        Formula::since(None, p(), q()),
        // shared subformulas compile once
        Formula::and(
            Formula::globally(interval(0.0, 1.0), Formula::or(p(), q())),
            Formula::eventually(interval(0.0, 2.0), Formula::globally(interval(0.0, 1.0), Formula::or(p(), q()))),
        ),
        Formula::implies(
            Formula::once(interval(0.0, 1.0), q()),
            Formula::until(interval(0.0, 2.0), Formula::not(p()), Formula::historically(None, q())),
        ),
    ]
}

/// One formula per spatial operator, mixed with temporal ones.
#[fixture]
#[once]
pub fn spatial_formulas() -> Vec<Formula> {
    vec![
        Formula::somewhere("near", p()),
        Formula::everywhere("near", p()),
        Formula::escape("far", p()),
        Formula::reach("far", p(), q()),
        Formula::somewhere("near", Formula::eventually(interval(0.0, 1.0), q())),
        Formula::globally(interval(0.0, 1.5), Formula::reach("far", Formula::not(q()), p())),
        Formula::and(Formula::everywhere("far", q()), Formula::once(None, Formula::escape("near", p()))),
    ]
}
