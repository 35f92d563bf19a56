//! Convergence properties of the reconciliation protocol.

use std::collections::BTreeSet;

use proptest::prelude::*;
use rangesync::{Id, Item, Reconciler};
use rangesync_testkit::exchange::run_to_convergence;
use rangesync_testkit::fixtures::{peer_with_range, random_items, sealed_peer};
use rangesync_testkit::generators::split_sets;

fn sealed_from_items(id_size: usize, items: &[Item]) -> Reconciler {
    let mut peer = Reconciler::new(id_size).expect("valid id size");
    for item in items {
        peer.add_item(item.timestamp, item.id.as_bytes())
            .expect("unsealed");
    }
    peer.seal().expect("first seal");
    peer
}

fn id_set(ids: &[Id]) -> BTreeSet<Id> {
    ids.iter().copied().collect()
}

/// The ids of `ours` whose items are absent from `theirs`.
fn one_sided_ids(ours: &[Item], theirs: &[Item]) -> BTreeSet<Id> {
    let their_items: BTreeSet<Item> = theirs.iter().copied().collect();
    ours.iter()
        .filter(|item| !their_items.contains(item))
        .map(|item| item.id)
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn random_sets_converge_with_correct_differences(
        (shared, only_a, only_b) in split_sets(8, 60, 40),
    ) {
        let a_items: Vec<Item> = shared.iter().chain(&only_a).copied().collect();
        let b_items: Vec<Item> = shared.iter().chain(&only_b).copied().collect();

        let mut a = sealed_from_items(8, &a_items);
        let mut b = sealed_from_items(8, &b_items);
        let report = run_to_convergence(&mut a, &mut b, 0, 32).unwrap();

        prop_assert_eq!(id_set(&report.have), one_sided_ids(&a_items, &b_items));
        prop_assert_eq!(id_set(&report.need), one_sided_ids(&b_items, &a_items));
    }

    #[test]
    fn identical_sets_learn_nothing(set in split_sets(8, 80, 0)) {
        let items = set.0;
        let mut a = sealed_from_items(8, &items);
        let mut b = sealed_from_items(8, &items);

        let report = run_to_convergence(&mut a, &mut b, 0, 32).unwrap();
        prop_assert!(report.have.is_empty());
        prop_assert!(report.need.is_empty());
        prop_assert_eq!(report.rounds, 1);
    }

    #[test]
    fn swapping_roles_swaps_have_and_need(
        (shared, only_a, only_b) in split_sets(8, 40, 25),
    ) {
        let a_items: Vec<Item> = shared.iter().chain(&only_a).copied().collect();
        let b_items: Vec<Item> = shared.iter().chain(&only_b).copied().collect();

        let mut a1 = sealed_from_items(8, &a_items);
        let mut b1 = sealed_from_items(8, &b_items);
        let forward = run_to_convergence(&mut a1, &mut b1, 0, 32).unwrap();

        let mut a2 = sealed_from_items(8, &a_items);
        let mut b2 = sealed_from_items(8, &b_items);
        let backward = run_to_convergence(&mut b2, &mut a2, 0, 32).unwrap();

        prop_assert_eq!(id_set(&forward.have), id_set(&backward.need));
        prop_assert_eq!(id_set(&forward.need), id_set(&backward.have));
    }

    #[test]
    fn insertion_order_is_irrelevant(
        (shared, only_a, _) in split_sets(8, 40, 20),
        seed in any::<u64>(),
    ) {
        let items: Vec<Item> = shared.iter().chain(&only_a).copied().collect();

        let mut shuffled = items.clone();
        // cheap seeded Fisher-Yates; proptest drives the seed
        let mut state = seed | 1;
        for i in (1..shuffled.len()).rev() {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            shuffled.swap(i, (state as usize) % (i + 1));
        }

        let mut p1 = sealed_from_items(8, &items);
        let mut p2 = sealed_from_items(8, &shuffled);
        prop_assert_eq!(p1.initiate(0).unwrap(), p2.initiate(0).unwrap());
    }

    #[test]
    fn capped_runs_match_uncapped_runs(
        (shared, only_a, only_b) in split_sets(8, 60, 40),
    ) {
        let a_items: Vec<Item> = shared.iter().chain(&only_a).copied().collect();
        let b_items: Vec<Item> = shared.iter().chain(&only_b).copied().collect();

        let mut a1 = sealed_from_items(8, &a_items);
        let mut b1 = sealed_from_items(8, &b_items);
        let uncapped = run_to_convergence(&mut a1, &mut b1, 0, 64).unwrap();

        let mut a2 = sealed_from_items(8, &a_items);
        let mut b2 = sealed_from_items(8, &b_items);
        let capped = run_to_convergence(&mut a2, &mut b2, 1024, 64).unwrap();

        prop_assert!(capped
            .initiator_frames
            .iter()
            .all(|&len| len <= 1024));
        prop_assert_eq!(id_set(&capped.have), id_set(&uncapped.have));
        prop_assert_eq!(id_set(&capped.need), id_set(&uncapped.need));
    }
}

#[test]
fn large_intersection_descends_logarithmically() {
    // 1000 shared content-hash items plus one extra on each side
    let mut a = Reconciler::new(16).unwrap();
    let mut b = Reconciler::new(16).unwrap();
    for n in 0..1000u64 {
        let id = rangesync_testkit::fixtures::content_id(n, 16);
        a.add_item(1_700_000_000 + n, &id).unwrap();
        b.add_item(1_700_000_000 + n, &id).unwrap();
    }
    let extra_a = rangesync_testkit::fixtures::content_id(5000, 16);
    let extra_b = rangesync_testkit::fixtures::content_id(5001, 16);
    a.add_item(1_700_002_000, &extra_a).unwrap();
    b.add_item(1_700_002_001, &extra_b).unwrap();
    a.seal().unwrap();
    b.seal().unwrap();

    let report = run_to_convergence(&mut a, &mut b, 0, 16).unwrap();

    assert_eq!(report.rounds, 2);
    assert_eq!(id_set(&report.have).len(), 1);
    assert_eq!(report.have[0].as_bytes(), &extra_a[..]);
    assert_eq!(id_set(&report.need).len(), 1);
    assert_eq!(report.need[0].as_bytes(), &extra_b[..]);

    // the whole exchange stays within a few fingerprint levels
    let total: usize = report
        .initiator_frames
        .iter()
        .chain(&report.responder_frames)
        .sum();
    assert!(total < 4096, "exchange used {total} bytes");
}

#[test]
fn frame_cap_resumption_over_disjoint_sets() {
    let a_items = random_items(1, 1500, 8);
    let b_items = random_items(2, 1500, 8);

    let mut a = sealed_peer(8, &a_items);
    let mut b = sealed_peer(8, &b_items);
    let report = run_to_convergence(&mut a, &mut b, 1024, 256).unwrap();

    assert!(report.initiator_frames.iter().all(|&len| len <= 1024));
    assert!(report.initiator_frames.len() > 2);
    assert_eq!(id_set(&report.have).len(), 1500);
    assert_eq!(id_set(&report.need).len(), 1500);
}

#[test]
fn offset_ranges_share_their_overlap() {
    let mut a = peer_with_range(32, 0, 400);
    let mut b = peer_with_range(32, 100, 400);

    let report = run_to_convergence(&mut a, &mut b, 0, 32).unwrap();
    assert_eq!(id_set(&report.have).len(), 100);
    assert_eq!(id_set(&report.need).len(), 100);
}
