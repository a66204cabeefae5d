//! Constrained transfers: a from/to point pair with a constraint.

use super::{TransferConstraint, TransferPoint};

/// Specificity of a transfer between two points.
///
/// Each point contributes `rank - 1`, so a stop-to-stop rule scores 0 and a
/// trip-to-trip rule scores 4. Station points contribute -1.
///
/// # Examples
///
/// ```
/// use transit_core::domain::{StopHandle, TripId};
/// use transit_core::transfer::{specificity_ranking, TransferPoint};
///
/// let stop = TransferPoint::Stop { stop: StopHandle(0) };
/// let trip = TransferPoint::Trip { trip: TripId::new("T").unwrap(), stop_position: 0 };
/// assert_eq!(specificity_ranking(&stop, &stop), 0);
/// assert_eq!(specificity_ranking(&stop, &trip), 2);
/// assert_eq!(specificity_ranking(&trip, &trip), 4);
/// ```
pub fn specificity_ranking(from: &TransferPoint, to: &TransferPoint) -> i32 {
    (from.rank() - 1) + (to.rank() - 1)
}

/// A configured transfer rule; immutable after import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstrainedTransfer {
    from: TransferPoint,
    to: TransferPoint,
    constraint: TransferConstraint,
}

impl ConstrainedTransfer {
    pub fn new(from: TransferPoint, to: TransferPoint, constraint: TransferConstraint) -> Self {
        Self {
            from,
            to,
            constraint,
        }
    }

    pub fn from(&self) -> &TransferPoint {
        &self.from
    }

    pub fn to(&self) -> &TransferPoint {
        &self.to
    }

    pub fn constraint(&self) -> &TransferConstraint {
        &self.constraint
    }

    /// Tie-break score; higher is more specific.
    pub fn specificity_ranking(&self) -> i32 {
        specificity_ranking(&self.from, &self.to)
    }
}
