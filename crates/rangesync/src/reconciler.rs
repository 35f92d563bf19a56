//! The reconciler: one peer's session state and the public protocol
//! surface.

use std::collections::VecDeque;

use bytes::Bytes;
use rangesync_core::{Bound, Error, Id, Item, Result, MAX_ID_SIZE, MIN_ID_SIZE};

use crate::engine::RangeEngine;
use crate::scheduler::OutputScheduler;
use crate::store::ItemStore;

/// Smallest accepted nonzero frame size cap, in bytes.
pub const MIN_FRAME_SIZE_LIMIT: u64 = 1024;

/// One peer of a range-based set reconciliation session.
///
/// Construct with the session id size, add items, then [`seal`]. One peer
/// calls [`initiate`] and becomes the initiator; the other answers each
/// frame with [`reconcile`]. The initiator feeds every reply through
/// [`reconcile_with_ids`], accumulating the ids it holds one-sidedly
/// (`have`) and the ids the peer holds one-sidedly (`need`), until its
/// outbound frame comes back empty.
///
/// The reconciler never touches a transport: frames are plain byte strings
/// and moving them between peers is the caller's job.
///
/// [`seal`]: Reconciler::seal
/// [`initiate`]: Reconciler::initiate
/// [`reconcile`]: Reconciler::reconcile
/// [`reconcile_with_ids`]: Reconciler::reconcile_with_ids
pub struct Reconciler {
    id_size: usize,
    store: ItemStore,
    is_initiator: bool,
    scheduler: OutputScheduler,
}

impl Reconciler {
    /// Create a session over ids of exactly `id_size` bytes, 8 to 32.
    pub fn new(id_size: usize) -> Result<Self> {
        if !(MIN_ID_SIZE..=MAX_ID_SIZE).contains(&id_size) {
            return Err(Error::IdSizeOutOfRange(id_size));
        }
        Ok(Self {
            id_size,
            store: ItemStore::new(),
            is_initiator: false,
            scheduler: OutputScheduler::new(),
        })
    }

    pub fn id_size(&self) -> usize {
        self.id_size
    }

    /// Add one item. Fails once sealed, or when the id length differs from
    /// the session id size.
    pub fn add_item(&mut self, timestamp: u64, id: &[u8]) -> Result<()> {
        if id.len() != self.id_size {
            return Err(Error::IdLengthMismatch {
                expected: self.id_size,
                got: id.len(),
            });
        }
        self.store.add(Item::new(timestamp, Id::from_slice(id)?))
    }

    /// Sort and freeze the item set.
    pub fn seal(&mut self) -> Result<()> {
        self.store.seal()
    }

    /// Produce the opening frame and latch this peer as the initiator.
    ///
    /// `frame_size_limit` caps every frame this peer emits from here on:
    /// zero means unbounded, anything else must be at least 1024. The whole
    /// item range is split into the initial fingerprint tree; whatever the
    /// cap keeps out of the first frame is sent on later rounds.
    pub fn initiate(&mut self, frame_size_limit: u64) -> Result<Bytes> {
        if !self.store.is_sealed() {
            return Err(Error::NotSealed);
        }
        if frame_size_limit != 0 && frame_size_limit < MIN_FRAME_SIZE_LIMIT {
            return Err(Error::FrameSizeLimitTooSmall(frame_size_limit));
        }
        self.is_initiator = true;
        self.scheduler.set_frame_size_limit(frame_size_limit);

        let mut outputs = VecDeque::new();
        let engine = RangeEngine::new(&self.store, self.id_size, true);
        engine.split_range(0, self.store.len(), Bound::ZERO, Bound::MAX, &mut outputs);
        self.scheduler.enqueue(outputs);

        Ok(self.build_frame())
    }

    /// Consume a peer frame as the responder and produce the reply.
    ///
    /// Fails on the initiator, which must use [`reconcile_with_ids`] so the
    /// ids it learns are not dropped.
    ///
    /// [`reconcile_with_ids`]: Reconciler::reconcile_with_ids
    pub fn reconcile(&mut self, frame: &[u8]) -> Result<Bytes> {
        if self.is_initiator {
            return Err(Error::InitiatorWithoutSinks);
        }
        let mut have = Vec::new();
        let mut need = Vec::new();
        self.reconcile_inner(frame, &mut have, &mut need)
    }

    /// Consume a peer frame as the initiator, appending newly learned ids
    /// to `have` (held locally, missing remotely) and `need` (the reverse),
    /// and produce the next outbound frame. An empty frame means the
    /// session has converged.
    pub fn reconcile_with_ids(
        &mut self,
        frame: &[u8],
        have: &mut Vec<Id>,
        need: &mut Vec<Id>,
    ) -> Result<Bytes> {
        if !self.is_initiator {
            return Err(Error::NotInitiator);
        }
        self.reconcile_inner(frame, have, need)
    }

    fn reconcile_inner(
        &mut self,
        frame: &[u8],
        have: &mut Vec<Id>,
        need: &mut Vec<Id>,
    ) -> Result<Bytes> {
        if !self.store.is_sealed() {
            return Err(Error::NotSealed);
        }

        let mut outputs = VecDeque::new();
        let engine = RangeEngine::new(&self.store, self.id_size, self.is_initiator);
        engine.process_frame(frame, have, need, &mut outputs)?;
        self.scheduler.requeue_front(outputs);

        Ok(self.build_frame())
    }

    fn build_frame(&mut self) -> Bytes {
        let frame = self.scheduler.build_frame(self.id_size);
        tracing::debug!(
            bytes = frame.len(),
            pending = self.scheduler.pending_len(),
            "frame built"
        );
        frame
    }
}
