//! Two-peer exchange driver.
//!
//! The protocol never moves bytes itself; this driver plays the transport
//! for a pair of in-memory peers, which is all a test needs.

use rangesync::{Id, Reconciler, Result};

/// Outcome of driving a session to convergence.
#[derive(Debug, Default)]
pub struct ExchangeReport {
    /// Ids the initiator holds that the responder lacks.
    pub have: Vec<Id>,
    /// Ids the responder holds that the initiator lacks.
    pub need: Vec<Id>,
    /// Responder replies consumed before the initiator went quiet.
    pub rounds: usize,
    /// Byte length of every initiator frame, the opening one included.
    pub initiator_frames: Vec<usize>,
    /// Byte length of every responder frame.
    pub responder_frames: Vec<usize>,
}

/// Alternate frames between the peers until the initiator's outbound frame
/// is empty.
///
/// Panics after `max_rounds` replies without convergence so a broken
/// session fails a test instead of spinning.
pub fn run_to_convergence(
    initiator: &mut Reconciler,
    responder: &mut Reconciler,
    frame_size_limit: u64,
    max_rounds: usize,
) -> Result<ExchangeReport> {
    let mut report = ExchangeReport::default();

    let mut frame = initiator.initiate(frame_size_limit)?;
    report.initiator_frames.push(frame.len());

    while !frame.is_empty() {
        assert!(
            report.rounds < max_rounds,
            "no convergence after {max_rounds} rounds"
        );
        report.rounds += 1;

        let reply = responder.reconcile(&frame)?;
        report.responder_frames.push(reply.len());

        frame = initiator.reconcile_with_ids(&reply, &mut report.have, &mut report.need)?;
        report.initiator_frames.push(frame.len());
    }

    Ok(report)
}
