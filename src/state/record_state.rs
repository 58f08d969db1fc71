/// Record state definitions for the per-record fetch tier state machine
///
/// ```text
/// PENDING -> FAST_IN_FLIGHT -> DETAILED_IN_FLIGHT -> DONE
///    |              |                                 ^
///    +--------------+---------------------------------+
/// ```
///
/// A record never re-enters `FastInFlight` once it has left it.
use std::fmt;

/// Represents where a record is in the crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordState {
    /// Created from the input, not yet scheduled
    Pending,

    /// Fast-tier job issued, outcome not yet merged
    FastInFlight,

    /// Fast tier found no email; detailed-tier job issued
    DetailedInFlight,

    /// Frozen; no further fetch will be scheduled
    Done,
}

impl RecordState {
    /// Returns true if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns true if a job for this record is outstanding
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::FastInFlight | Self::DetailedInFlight)
    }

    /// Returns true if the state machine allows moving to `next`
    pub fn can_transition_to(&self, next: RecordState) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::FastInFlight)
                | (Self::Pending, Self::Done)
                | (Self::FastInFlight, Self::DetailedInFlight)
                | (Self::FastInFlight, Self::Done)
                | (Self::DetailedInFlight, Self::Done)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::FastInFlight => "fast_in_flight",
            Self::DetailedInFlight => "detailed_in_flight",
            Self::Done => "done",
        }
    }

    /// Returns all possible record states
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Pending,
            Self::FastInFlight,
            Self::DetailedInFlight,
            Self::Done,
        ]
    }
}

impl fmt::Display for RecordState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
