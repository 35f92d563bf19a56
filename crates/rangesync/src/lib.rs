//! # Rangesync
//!
//! Range-based set reconciliation: two peers, each holding a set of
//! `(timestamp, id)` items, discover the symmetric difference between
//! their sets in a handful of round-trips while exchanging only compact
//! fingerprints and sub-ranges.
//!
//! ## Overview
//!
//! Both peers sort their items by `(timestamp, id)`. The initiator carves
//! its set into ranges and sends one XOR fingerprint per range; wherever
//! the responder's fingerprint for the same range differs, the range is
//! split again, until the disagreeing ranges are small enough to enumerate
//! outright. Ids the peers hold one-sidedly surface at the initiator as
//! `have` (local only) and `need` (remote only).
//!
//! Ids are opaque to the protocol — typically content hashes — and the
//! underlying data never travels; what to do with the learned ids is the
//! application's business, as is moving the frames.
//!
//! ## Key Properties
//!
//! - **Bandwidth-proportional to the difference**: equal ranges cost one
//!   fingerprint, however many items they hold
//! - **Stateless wire**: each frame is self-delimiting and carries
//!   everything the peer needs to answer it
//! - **Bounded frames**: the initiator can cap frame size; suspended
//!   ranges resume on later rounds
//!
//! ## Usage
//!
//! ```rust
//! use rangesync::Reconciler;
//!
//! let mut alice = Reconciler::new(32)?;
//! let mut bob = Reconciler::new(32)?;
//!
//! alice.add_item(100, &[0x11; 32])?;
//! alice.seal()?;
//! bob.seal()?;
//!
//! let mut have = Vec::new();
//! let mut need = Vec::new();
//!
//! let mut frame = alice.initiate(0)?;
//! while !frame.is_empty() {
//!     let reply = bob.reconcile(&frame)?;
//!     frame = alice.reconcile_with_ids(&reply, &mut have, &mut need)?;
//! }
//!
//! // alice holds 0x11…11, bob holds nothing
//! assert_eq!(have.len(), 1);
//! assert!(need.is_empty());
//! # Ok::<(), rangesync::Error>(())
//! ```
//!
//! ## Message Flow
//!
//! ```text
//! Initiator                           Responder
//!   |-------- Fingerprints ------------->|
//!   |<------- Fingerprints / IdLists ----|
//!   |-------- IdLists ------------------>|
//!   |<------- IdListResponses -----------|
//!   |-------- (empty frame) ------------>|   converged
//! ```

pub mod bounds;
mod engine;
pub mod reconciler;
pub mod scheduler;
pub mod store;

pub use bounds::minimal_separating_bound;
pub use rangesync_core::{codec, Bound, Error, Fingerprint, Id, Item, Result, MAX_ID_SIZE, MIN_ID_SIZE};
pub use reconciler::{Reconciler, MIN_FRAME_SIZE_LIMIT};
pub use scheduler::{OutputScheduler, RangeOutput};
pub use store::ItemStore;
