//! Distance functions and capability flags for FLANN-style approximate nearest-neighbor indices.

mod capability;
mod functor;
mod number;
pub mod vectors;

pub use capability::Capabilities;
pub use functor::{Distance, Hamming, Metric};
pub use number::Number;
