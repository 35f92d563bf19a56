//! Error types for range reconciliation.

use thiserror::Error;

/// Errors reported by the reconciliation protocol.
///
/// All failures are synchronous and fatal to the call that produced them.
/// A parse failure leaves the session in an undefined state; callers should
/// discard the `Reconciler` rather than retry the frame.
#[derive(Debug, Error)]
pub enum Error {
    /// Session id size outside `[8, 32]`.
    #[error("id size {0} outside the supported range [8, 32]")]
    IdSizeOutOfRange(usize),

    /// Nonzero frame size limit below the protocol minimum.
    #[error("frame size limit {0} is below the 1024-byte minimum")]
    FrameSizeLimitTooSmall(u64),

    /// An added id does not match the session id size exactly.
    #[error("id is {got} bytes, session id size is {expected}")]
    IdLengthMismatch { expected: usize, got: usize },

    /// An id or bound prefix longer than the 32-byte storage width.
    #[error("id of {0} bytes exceeds the 32-byte maximum")]
    IdTooLarge(usize),

    /// `add_item` or `seal` after the item set was sealed.
    #[error("item set is already sealed")]
    AlreadySealed,

    /// `initiate` or `reconcile` before the item set was sealed.
    #[error("item set is not sealed")]
    NotSealed,

    /// The initiator called the responder-style `reconcile`, which would
    /// silently drop the have/need ids it is owed.
    #[error("initiator must collect have/need ids when reconciling")]
    InitiatorWithoutSinks,

    /// A peer that never initiated asked for have/need ids.
    #[error("only the initiator collects have/need ids")]
    NotInitiator,

    /// A responder received an id-list response record; only the peer that
    /// sent the id list may receive one.
    #[error("unexpected id list response record")]
    UnexpectedResponse,

    /// The frame ended in the middle of the named field.
    #[error("frame ends prematurely while reading {0}")]
    Truncated(&'static str),

    /// A range record carried a mode outside the protocol's four.
    #[error("unknown range record mode {0}")]
    UnknownMode(u64),
}

/// Result type for reconciliation operations.
pub type Result<T> = std::result::Result<T, Error>;
