#![doc = include_str!("../README.md")]
#![cfg(feature = "alloc")]
extern crate alloc;

pub mod analysis;
pub mod compression;
pub mod errors;
pub mod lap;
pub mod sigma;
pub mod traits;

/// Prelude module for the sigma-method crate.
pub mod prelude {
    pub use crate::{analysis::*, compression::*, errors::*, lap::*, sigma::*, traits::*};
}
