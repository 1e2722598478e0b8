//! Composable containers for values that may be absent ([`Optional`](optional::Optional)) and computations that
//! may fail ([`Attempt`](attempt::Attempt)), with a shared combinator vocabulary ([`query`]).

pub mod cause;
pub mod optional;
pub mod attempt;
pub mod query;

pub mod app;

pub mod prelude {
  pub use crate::attempt::Attempt;
  pub use crate::cause::{Cause, IllegalState, NoSuchElement, Panicked};
  pub use crate::comprehend;
  pub use crate::optional::{Absent, Optional};
  pub use crate::query::{Halt, Query, SequenceExt};
}
