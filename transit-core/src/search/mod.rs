//! Search-time queries consumed by the multi-criteria sweep.
//!
//! The sweep itself lives outside this crate. What it needs from here is
//! the search direction, the per-mode slack table and the two boarding
//! searches: a regular time-ordered one and one that honors constrained
//! transfers.

mod boarding;
mod direction;
mod slack;


pub use boarding::{Boarding, ConstrainedBoardingSearch, RegularBoardingSearch};
pub use direction::SearchDirection;
pub(crate) use slack::non_negative;
pub use slack::{SlackError, SlackKind, SlackProvider};
