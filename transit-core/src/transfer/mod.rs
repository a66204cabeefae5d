//! Constrained transfers.
//!
//! A constrained transfer overrides the default connection rules between
//! two calls: it can guarantee a connection, keep the rider seated, forbid
//! the pairing, or impose minimum and maximum transfer times. Rules anchor
//! at a station, a stop, a route at a stop position or a trip at a stop
//! position; when several rules apply, the most specific one wins and ties
//! go to the rule registered first.

mod constrained;
mod constraint;
mod error;
mod for_pattern;
mod point;
mod service;
mod timing;

pub use constrained::{ConstrainedTransfer, specificity_ranking};
pub use constraint::{TransferConstraint, TransferConstraintBuilder, TransferPriority};
pub use error::TransferError;
pub use for_pattern::{TransferForPattern, TransferForPatternByStopPos};
pub use point::{TransferLocation, TransferPoint};
pub use service::TransferService;
pub use timing::TransferTimingConfig;
