//! # Rangesync Core
//!
//! Pure primitives for range-based set reconciliation.
//!
//! This crate contains no I/O, no storage, no networking. It is pure
//! computation over timestamped identifiers:
//!
//! - [`Id`] - an identifier of up to 32 bytes, stored zero-padded
//! - [`Item`] - a `(timestamp, id)` pair, the unit being reconciled
//! - [`Bound`] - a range delimiter whose id may be a short prefix
//! - [`Fingerprint`] - the XOR accumulator ranges are compared by
//! - [`codec`] - the self-delimiting wire format shared by both peers
//!
//! The protocol itself lives in the `rangesync` crate.

pub mod codec;
pub mod error;
pub mod item;

pub use error::{Error, Result};
pub use item::{Bound, Fingerprint, Id, Item, MAX_ID_SIZE, MIN_ID_SIZE};
