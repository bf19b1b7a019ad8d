//! Offline signal transforms, one per formula operator.
//!
//! Every transform is generic over the [`SignalDomain`](crate::strel::core::SignalDomain)
//! and is reused by the online engine on interval-valued signals.
//!
//! - [`boolean`]: pointwise connectives.
//! - [`sliding_window`]: monotonic-deque aggregation for bounded windows.
//! - [`temporal`]: eventually, globally, once and historically.
//! - [`until`]: until and since.
//! - [`spatial`]: the stepping loop behind the spatial operators.

pub mod boolean;
pub mod sliding_window;
pub mod spatial;
pub mod temporal;
pub mod until;
