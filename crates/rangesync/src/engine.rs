//! Range splitting and per-record frame processing.
//!
//! The engine turns a range of the local item set into outgoing records
//! (either an outright id enumeration or a tree level of bucket
//! fingerprints) and walks inbound frames record by record, narrowing the
//! remaining disagreement each pass.

use std::collections::{HashMap, VecDeque};

use bytes::{BufMut, BytesMut};
use rangesync_core::{codec, Bound, Error, Fingerprint, Id, Result};

use crate::bounds::minimal_separating_bound;
use crate::scheduler::RangeOutput;
use crate::store::ItemStore;

/// Fan-out of one fingerprint tree level.
const BUCKETS: usize = 16;

/// Ranges with fewer items than this are enumerated outright instead of
/// being fingerprinted into buckets.
const SPLIT_THRESHOLD: usize = BUCKETS * 2;

pub(crate) struct RangeEngine<'a> {
    store: &'a ItemStore,
    id_size: usize,
    is_initiator: bool,
}

impl<'a> RangeEngine<'a> {
    pub fn new(store: &'a ItemStore, id_size: usize, is_initiator: bool) -> Self {
        Self {
            store,
            id_size,
            is_initiator,
        }
    }

    /// Split `items[lower..upper]` into per-range outputs spanning
    /// `lower_bound..upper_bound`.
    ///
    /// Small ranges become a single id-list record. Larger ranges become
    /// one fingerprint record per bucket, with items spread across the
    /// buckets as evenly as possible and each interior boundary reduced to
    /// a minimal separating bound.
    pub fn split_range(
        &self,
        lower: usize,
        upper: usize,
        lower_bound: Bound,
        upper_bound: Bound,
        outputs: &mut VecDeque<RangeOutput>,
    ) {
        let items = self.store.items();
        let num_elems = upper - lower;

        if num_elems < SPLIT_THRESHOLD {
            let mut payload = BytesMut::new();
            codec::put_varint(&mut payload, codec::MODE_ID_LIST);
            codec::put_varint(&mut payload, num_elems as u64);
            for item in &items[lower..upper] {
                payload.put_slice(item.id.prefix(self.id_size).as_bytes());
            }
            outputs.push_back(RangeOutput::new(lower_bound, upper_bound, payload.freeze()));
            return;
        }

        let per_bucket = num_elems / BUCKETS;
        let buckets_with_extra = num_elems % BUCKETS;
        let mut curr = lower;
        let mut prev_bound = lower_bound;

        for i in 0..BUCKETS {
            let bucket_end = curr + per_bucket + usize::from(i < buckets_with_extra);
            let mut fingerprint = Fingerprint::new();
            while curr < bucket_end {
                fingerprint.xor_in(&items[curr].id);
                curr += 1;
            }

            let mut payload = BytesMut::new();
            codec::put_varint(&mut payload, codec::MODE_FINGERPRINT);
            payload.put_slice(fingerprint.truncated(self.id_size));

            let end = if i == BUCKETS - 1 {
                upper_bound
            } else {
                minimal_separating_bound(&items[curr - 1], &items[curr], self.id_size)
            };
            outputs.push_back(RangeOutput::new(prev_bound, end, payload.freeze()));
            prev_bound = end;
        }
    }

    /// Walk one inbound frame, producing follow-up outputs and, at the
    /// initiator, newly learned ids.
    ///
    /// Bounds are cumulative: each record covers the items between the
    /// previous record's bound and its own.
    pub fn process_frame(
        &self,
        frame: &[u8],
        have: &mut Vec<Id>,
        need: &mut Vec<Id>,
        outputs: &mut VecDeque<RangeOutput>,
    ) -> Result<()> {
        let mut reader = codec::Reader::new(frame);
        let mut prev_bound = Bound::ZERO;
        let mut prev_index = 0usize;
        let mut last_timestamp = 0u64;

        while !reader.is_empty() {
            let curr_bound = reader.bound(&mut last_timestamp)?;
            let mode = reader.varint("record mode")?;

            let lower = prev_index;
            let upper = self.store.upper_bound(lower, &curr_bound);

            match mode {
                codec::MODE_SKIP => {}
                codec::MODE_FINGERPRINT => {
                    self.match_fingerprint(&mut reader, lower, upper, prev_bound, curr_bound, outputs)?;
                }
                codec::MODE_ID_LIST => {
                    self.match_id_list(&mut reader, lower, upper, prev_bound, curr_bound, have, need, outputs)?;
                }
                codec::MODE_ID_LIST_RESPONSE => {
                    if !self.is_initiator {
                        return Err(Error::UnexpectedResponse);
                    }
                    self.absorb_response(&mut reader, lower, upper, have, need)?;
                }
                other => return Err(Error::UnknownMode(other)),
            }

            prev_index = upper;
            prev_bound = curr_bound;
        }

        Ok(())
    }

    /// Compare the peer's fingerprint for `items[lower..upper]` against our
    /// own; on mismatch, descend by splitting the range.
    fn match_fingerprint(
        &self,
        reader: &mut codec::Reader<'_>,
        lower: usize,
        upper: usize,
        lower_bound: Bound,
        upper_bound: Bound,
        outputs: &mut VecDeque<RangeOutput>,
    ) -> Result<()> {
        let theirs = reader.bytes(self.id_size, "fingerprint")?;

        let mut ours = Fingerprint::new();
        for item in &self.store.items()[lower..upper] {
            ours.xor_in(&item.id);
        }

        if ours.truncated(self.id_size) != theirs {
            tracing::trace!(lower, upper, "fingerprint mismatch, splitting range");
            self.split_range(lower, upper, lower_bound, upper_bound, outputs);
        }
        Ok(())
    }

    /// Diff the peer's id enumeration against `items[lower..upper]`.
    ///
    /// The initiator feeds the application sinks directly; the responder
    /// answers with an id-list response carrying its one-sided ids and a
    /// bitfield over the peer's offsets marking what it lacks.
    #[allow(clippy::too_many_arguments)]
    fn match_id_list(
        &self,
        reader: &mut codec::Reader<'_>,
        lower: usize,
        upper: usize,
        lower_bound: Bound,
        upper_bound: Bound,
        have: &mut Vec<Id>,
        need: &mut Vec<Id>,
        outputs: &mut VecDeque<RangeOutput>,
    ) -> Result<()> {
        let num_ids = reader.varint("id count")?;

        // duplicate ids in the enumeration collapse onto the first offset
        let mut theirs: HashMap<Id, (u64, bool)> = HashMap::new();
        for offset in 0..num_ids {
            let id = Id::from_slice(reader.bytes(self.id_size, "id list entry")?)?;
            theirs.entry(id).or_insert((offset, false));
        }

        let mut response_have: Vec<Id> = Vec::new();
        for item in &self.store.items()[lower..upper] {
            match theirs.get_mut(&item.id) {
                Some(entry) => entry.1 = true,
                None if self.is_initiator => have.push(item.id),
                None => response_have.push(item.id),
            }
        }

        let mut absent: Vec<(u64, Id)> = theirs
            .iter()
            .filter(|(_, &(_, seen))| !seen)
            .map(|(&id, &(offset, _))| (offset, id))
            .collect();
        absent.sort_unstable_by_key(|&(offset, _)| offset);

        if self.is_initiator {
            need.extend(absent.iter().map(|&(_, id)| id));
            return Ok(());
        }

        let offsets: Vec<u64> = absent.iter().map(|&(offset, _)| offset).collect();
        let bitfield = codec::encode_bitfield(&offsets);

        let mut payload = BytesMut::new();
        codec::put_varint(&mut payload, codec::MODE_ID_LIST_RESPONSE);
        codec::put_varint(&mut payload, response_have.len() as u64);
        for id in &response_have {
            payload.put_slice(id.as_bytes());
        }
        codec::put_varint(&mut payload, bitfield.len() as u64);
        payload.put_slice(&bitfield);

        outputs.push_back(RangeOutput::new(lower_bound, upper_bound, payload.freeze()));
        Ok(())
    }

    /// Absorb the responder's answer to an id list we sent: its one-sided
    /// ids become `need`, and its bitfield over our offsets marks which of
    /// `items[lower..upper]` it lacks.
    fn absorb_response(
        &self,
        reader: &mut codec::Reader<'_>,
        lower: usize,
        upper: usize,
        have: &mut Vec<Id>,
        need: &mut Vec<Id>,
    ) -> Result<()> {
        let num_ids = reader.varint("id count")?;
        for _ in 0..num_ids {
            need.push(Id::from_slice(reader.bytes(self.id_size, "response id")?)?);
        }

        let bitfield_len = reader.varint("bitfield length")?;
        let bitfield = reader.bytes(bitfield_len as usize, "bitfield")?;
        for (offset, item) in self.store.items()[lower..upper].iter().enumerate() {
            if codec::bitfield_lookup(bitfield, offset) {
                have.push(item.id);
            }
        }
        Ok(())
    }
}
