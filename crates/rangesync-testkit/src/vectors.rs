//! Golden wire vectors for cross-implementation verification.
//!
//! Every implementation of the protocol must produce these exact opening
//! frames for these item sets. The expected bytes were worked out by hand
//! from the wire format definition.

use rangesync::Reconciler;
use serde::{Deserialize, Serialize};

/// A golden frame vector: the initiator's items and the expected opening
/// frame, hex-encoded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameVector {
    pub name: String,
    pub id_size: usize,
    /// `(timestamp, hex id)` pairs fed to the initiator.
    pub items: Vec<(u64, String)>,
    /// Expected `initiate(0)` output, hex.
    pub expected_frame: String,
}

/// 33 items with distinct ascending timestamps: one fingerprint record per
/// bucket, every boundary a bare-timestamp bound, delta-encoded.
const TREE_DISTINCT_TIMESTAMPS: &str = concat!(
    "050001", "0000000000000003",
    "030001", "0000000000000007",
    "030001", "0000000000000003",
    "030001", "000000000000000f",
    "030001", "0000000000000003",
    "030001", "0000000000000007",
    "030001", "0000000000000003",
    "030001", "000000000000001f",
    "030001", "0000000000000003",
    "030001", "0000000000000007",
    "030001", "0000000000000003",
    "030001", "000000000000000f",
    "030001", "0000000000000003",
    "030001", "0000000000000007",
    "030001", "0000000000000003",
    "000001", "000000000000003f",
);

/// 33 items sharing one timestamp, ids differing in their first byte:
/// every interior boundary collapses to a one-byte id prefix.
const TREE_SHARED_TIMESTAMP: &str = concat!(
    "080103", "01", "0300000000000000",
    "010105", "01", "0700000000000000",
    "010107", "01", "0300000000000000",
    "010109", "01", "0f00000000000000",
    "01010b", "01", "0300000000000000",
    "01010d", "01", "0700000000000000",
    "01010f", "01", "0300000000000000",
    "010111", "01", "1f00000000000000",
    "010113", "01", "0300000000000000",
    "010115", "01", "0700000000000000",
    "010117", "01", "0300000000000000",
    "010119", "01", "0f00000000000000",
    "01011b", "01", "0300000000000000",
    "01011d", "01", "0700000000000000",
    "01011f", "01", "0300000000000000",
    "0000",   "01", "3f00000000000000",
);

/// Get all golden frame vectors.
pub fn all_vectors() -> Vec<FrameVector> {
    vec![
        FrameVector {
            name: "empty set".into(),
            id_size: 16,
            items: Vec::new(),
            // one zero-id id-list record spanning the whole domain
            expected_frame: "00000200".into(),
        },
        FrameVector {
            name: "singleton".into(),
            id_size: 8,
            items: vec![(100, "1122334455667788".into())],
            expected_frame: "000002011122334455667788".into(),
        },
        FrameVector {
            name: "fingerprint tree, distinct timestamps".into(),
            id_size: 8,
            items: (0..33u64)
                .map(|n| (n + 1, hex::encode(n.to_be_bytes())))
                .collect(),
            expected_frame: TREE_DISTINCT_TIMESTAMPS.into(),
        },
        FrameVector {
            name: "fingerprint tree, shared timestamp".into(),
            id_size: 8,
            items: (0..33u64)
                .map(|n| {
                    let mut id = [0u8; 8];
                    id[0] = n as u8;
                    (7, hex::encode(id))
                })
                .collect(),
            expected_frame: TREE_SHARED_TIMESTAMP.into(),
        },
    ]
}

/// Build the sealed initiator a vector describes.
pub fn build_initiator(vector: &FrameVector) -> Reconciler {
    let mut peer = Reconciler::new(vector.id_size).expect("valid id size");
    for (timestamp, id_hex) in &vector.items {
        let id = hex::decode(id_hex).expect("valid hex id");
        peer.add_item(*timestamp, &id).expect("unsealed");
    }
    peer.seal().expect("first seal");
    peer
}
