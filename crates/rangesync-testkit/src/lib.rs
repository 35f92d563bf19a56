//! # Rangesync Testkit
//!
//! Testing utilities for the rangesync protocol.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: item sets with hand-checked expected opening
//!   frames, for cross-implementation verification
//! - **Generators**: proptest strategies for ids, items, and peer sets
//! - **Fixtures**: deterministic content-hash item sets and sealed peers
//! - **Exchange driver**: an in-memory transport that runs two peers to
//!   convergence and reports what the initiator learned
//!
//! ## Driving a session
//!
//! ```rust
//! use rangesync_testkit::exchange::run_to_convergence;
//! use rangesync_testkit::fixtures::peer_with_range;
//!
//! let mut a = peer_with_range(16, 0, 100);
//! let mut b = peer_with_range(16, 50, 100);
//!
//! let report = run_to_convergence(&mut a, &mut b, 0, 32).unwrap();
//! assert_eq!(report.have.len(), 50);
//! assert_eq!(report.need.len(), 50);
//! ```
//!
//! ## Property testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use rangesync_testkit::generators::split_sets;
//!
//! proptest! {
//!     #[test]
//!     fn converges((shared, only_a, only_b) in split_sets(8, 50, 30)) {
//!         // build peers from shared + their unique halves, then
//!         // run_to_convergence and compare against the set difference
//!     }
//! }
//! ```

pub mod exchange;
pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use exchange::{run_to_convergence, ExchangeReport};
pub use fixtures::{content_id, peer_with_range, random_items, sealed_peer};
pub use vectors::{all_vectors, build_initiator, FrameVector};
