//! Pending-output queue and bounded frame assembly.

use std::collections::VecDeque;

use bytes::{Bytes, BytesMut};
use rangesync_core::{codec, Bound};

/// One per-range message awaiting transmission.
///
/// `payload` is the mode varint plus the mode body; the bounds travel
/// separately so the scheduler can gap-fill and cap as it frames.
#[derive(Debug, Clone)]
pub struct RangeOutput {
    pub start: Bound,
    pub end: Bound,
    pub payload: Bytes,
}

impl RangeOutput {
    pub fn new(start: Bound, end: Bound, payload: Bytes) -> Self {
        Self {
            start,
            end,
            payload,
        }
    }
}

/// Drains pending outputs into size-capped frames.
///
/// Outputs are framed in queue order. A gap between the frame's current
/// position and the next output's start materialises as a Skip record. The
/// frame ends when the queue runs dry, when the next output starts before
/// the current position (the queue is no longer monotonic with what was
/// already framed), or when the next record would push the frame over the
/// byte cap. Whatever was not framed stays queued for the next call.
#[derive(Debug, Default)]
pub struct OutputScheduler {
    pending: VecDeque<RangeOutput>,
    frame_size_limit: u64,
}

impl OutputScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the byte cap for every frame built from here on. Zero means
    /// unbounded.
    pub fn set_frame_size_limit(&mut self, limit: u64) {
        self.frame_size_limit = limit;
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Append outputs at the back of the queue.
    pub fn enqueue(&mut self, outputs: VecDeque<RangeOutput>) {
        self.pending.extend(outputs);
    }

    /// Prepend outputs ahead of everything queued, preserving their order.
    ///
    /// Fresh outputs from a reconcile pass go out before leftovers of a
    /// previous capped frame; this keeps each frame starting where its
    /// predecessor's bounds ended.
    pub fn requeue_front(&mut self, mut outputs: VecDeque<RangeOutput>) {
        while let Some(output) = outputs.pop_back() {
            self.pending.push_front(output);
        }
    }

    /// Serialise queued outputs into one frame. An empty frame signals
    /// convergence.
    pub fn build_frame(&mut self, id_size: usize) -> Bytes {
        let mut output = BytesMut::new();
        let mut curr_bound = Bound::ZERO;
        let mut last_timestamp = 0u64;

        while let Some(head) = self.pending.front() {
            if head.start < curr_bound {
                break;
            }

            let mut record = BytesMut::new();
            if curr_bound != head.start {
                codec::put_bound(&mut record, &head.start, id_size, &mut last_timestamp);
                codec::put_varint(&mut record, codec::MODE_SKIP);
            }
            codec::put_bound(&mut record, &head.end, id_size, &mut last_timestamp);
            record.extend_from_slice(&head.payload);

            if self.frame_size_limit > 0
                && (output.len() + record.len()) as u64 > self.frame_size_limit
            {
                break;
            }

            output.extend_from_slice(&record);
            curr_bound = head.end;
            self.pending.pop_front();
        }

        output.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BufMut;
    use rangesync_core::Id;

    fn payload(mode: u64, body: &[u8]) -> Bytes {
        let mut buf = BytesMut::new();
        codec::put_varint(&mut buf, mode);
        buf.put_slice(body);
        buf.freeze()
    }

    fn bound(timestamp: u64, id: &[u8]) -> Bound {
        Bound::new(timestamp, Id::from_slice(id).unwrap())
    }

    #[test]
    fn adjacent_outputs_need_no_skip() {
        let mut scheduler = OutputScheduler::new();
        scheduler.enqueue(VecDeque::from(vec![
            RangeOutput::new(Bound::ZERO, bound(5, b""), payload(1, &[0xaa; 8])),
            RangeOutput::new(bound(5, b""), Bound::MAX, payload(1, &[0xbb; 8])),
        ]));

        let frame = scheduler.build_frame(8);
        // ts=4+1, empty id, fingerprint; sentinel ts, empty id, fingerprint
        let mut expected = vec![0x06, 0x00, 0x01];
        expected.extend([0xaa; 8]);
        expected.extend([0x00, 0x00, 0x01]);
        expected.extend([0xbb; 8]);
        assert_eq!(frame.to_vec(), expected);
        assert_eq!(scheduler.pending_len(), 0);
    }

    #[test]
    fn gap_becomes_skip_record() {
        let mut scheduler = OutputScheduler::new();
        scheduler.enqueue(VecDeque::from(vec![RangeOutput::new(
            bound(10, b""),
            Bound::MAX,
            payload(2, &[0x00]),
        )]));

        let frame = scheduler.build_frame(8);
        // skip filler up to (10, ""), then the record itself
        assert_eq!(frame.to_vec(), vec![0x0b, 0x00, 0x00, 0x00, 0x00, 0x02, 0x00]);
    }

    #[test]
    fn non_monotonic_head_ends_frame() {
        let mut scheduler = OutputScheduler::new();
        scheduler.enqueue(VecDeque::from(vec![
            RangeOutput::new(bound(5, b""), Bound::MAX, payload(2, &[0x00])),
            RangeOutput::new(Bound::ZERO, bound(5, b""), payload(2, &[0x00])),
        ]));

        let frame = scheduler.build_frame(8);
        assert!(!frame.is_empty());
        // the out-of-order output waits for the next frame
        assert_eq!(scheduler.pending_len(), 1);
        let next = scheduler.build_frame(8);
        assert!(!next.is_empty());
        assert_eq!(scheduler.pending_len(), 0);
    }

    #[test]
    fn cap_defers_whole_records() {
        let mut scheduler = OutputScheduler::new();
        scheduler.set_frame_size_limit(1024);

        // each record is ~3 bytes of bound plus a 600-byte payload
        let big = vec![0u8; 600];
        scheduler.enqueue(VecDeque::from(vec![
            RangeOutput::new(Bound::ZERO, bound(1, b""), payload(2, &big)),
            RangeOutput::new(bound(1, b""), Bound::MAX, payload(2, &big)),
        ]));

        let first = scheduler.build_frame(8);
        assert!(first.len() <= 1024);
        assert_eq!(scheduler.pending_len(), 1);

        let second = scheduler.build_frame(8);
        assert!(second.len() <= 1024);
        assert_eq!(scheduler.pending_len(), 0);

        let done = scheduler.build_frame(8);
        assert!(done.is_empty());
    }

    #[test]
    fn empty_queue_builds_empty_frame() {
        let mut scheduler = OutputScheduler::new();
        assert!(scheduler.build_frame(8).is_empty());
    }
}
