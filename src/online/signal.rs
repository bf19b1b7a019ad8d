use super::time_chain::TimeChain;
use super::update::Update;
use crate::error::Result;
use crate::signal::{Signal, TimeSignal};
use crate::strel::core::{AbstractInterval, SignalDomain};

/// A signal over intervals that starts fully unknown on its domain and is
/// narrowed as evidence arrives.
#[derive(Clone, Debug, PartialEq)]
pub struct OnlineSignal<R> {
    chain: TimeChain<AbstractInterval<R>>,
}

impl<R: SignalDomain> OnlineSignal<R> {
    /// Unknown everywhere on `[start, end)`.
    pub fn new(start: f64, end: f64) -> Self {
        OnlineSignal {
            chain: TimeChain::constant(start, end, AbstractInterval::unknown()),
        }
    }

    pub fn chain(&self) -> &TimeChain<AbstractInterval<R>> {
        &self.chain
    }

    /// The offline signal on `[from, to]`, clipped to the domain.
    pub fn slice(&self, from: f64, to: f64) -> Signal<AbstractInterval<R>> {
        self.chain.select(from, to).to_signal()
    }

    pub fn to_signal(&self) -> Signal<AbstractInterval<R>> {
        self.chain.to_signal()
    }
}

impl<R: SignalDomain> TimeSignal<AbstractInterval<R>> for OnlineSignal<R> {
    fn value_at(&self, time: f64) -> Option<&AbstractInterval<R>> {
        self.chain.value_at(time)
    }

    fn start(&self) -> Option<f64> {
        self.chain.start()
    }

    fn end(&self) -> Option<f64> {
        self.chain.end()
    }

    fn refine(&mut self, update: &Update<AbstractInterval<R>>) -> Result<bool> {
        self.chain
            .refine(update, |previous, proposed| previous.contains(proposed))
    }
}
