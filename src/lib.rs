//! ambrose - the assignment and marginal-summary substrate of a probabilistic graphical model
//! toolkit.
//!
//! Inference algorithms read and write variable state exclusively through the abstractions
//! defined here: `Assignment`s bind variables to values (with well-defined fallback rules),
//! `AssignmentIterator` enumerates joint value combinations over a factor's neighbors, and
//! `Summary`s collect the per-variable `Marginal`s an inference run produces.

extern crate indexmap;
#[macro_use]
extern crate itertools;
#[macro_use]
extern crate ndarray;
extern crate rand;

pub mod assignment;
pub mod factor;
pub mod summary;
pub mod util;
pub mod variable;

pub use util::{AmbroseError, Result};
