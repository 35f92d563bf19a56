//! Deterministic item-set fixtures.
//!
//! Fixture ids are content hashes, which is what reconciled ids typically
//! are in practice; fixture randomness is always seeded so every run sees
//! the same sets.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rangesync::Reconciler;
use sha2::{Digest, Sha256};

/// The id of fixture item `n`: a content hash truncated to `id_size`.
pub fn content_id(n: u64, id_size: usize) -> Vec<u8> {
    Sha256::digest(n.to_be_bytes())[..id_size].to_vec()
}

/// A sealed peer holding fixture items `first .. first + count`,
/// timestamped one second apart.
pub fn peer_with_range(id_size: usize, first: u64, count: u64) -> Reconciler {
    let mut peer = Reconciler::new(id_size).expect("valid id size");
    for n in first..first + count {
        peer.add_item(1_700_000_000 + n, &content_id(n, id_size))
            .expect("unsealed");
    }
    peer.seal().expect("first seal");
    peer
}

/// `count` randomly timestamped random-id items from a seeded rng.
pub fn random_items(seed: u64, count: usize, id_size: usize) -> Vec<(u64, Vec<u8>)> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let timestamp = rng.gen_range(0..1_000_000u64);
            let mut id = vec![0u8; id_size];
            rng.fill(&mut id[..]);
            (timestamp, id)
        })
        .collect()
}

/// Build a sealed peer over `(timestamp, id)` pairs.
pub fn sealed_peer(id_size: usize, items: &[(u64, Vec<u8>)]) -> Reconciler {
    let mut peer = Reconciler::new(id_size).expect("valid id size");
    for (timestamp, id) in items {
        peer.add_item(*timestamp, id).expect("unsealed");
    }
    peer.seal().expect("first seal");
    peer
}
