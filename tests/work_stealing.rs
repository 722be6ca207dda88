//! Owner/thief scenarios
//!
//! The forest is unsynchronized, so these tests supply the mutual exclusion a
//! real scheduler would: the owner's forest sits behind a `parking_lot::Mutex`
//! and each steal happens under that lock. Task bodies live in a `slotmap`
//! table; the forests only move keys around.

use binomial_forest::{Adaptive, BinomialForest, Coarse, Fine, StealPolicy};
use parking_lot::Mutex;
use rustc_hash::FxHashSet;
use slotmap::{new_key_type, SlotMap};
use std::sync::Arc;
use std::thread;

new_key_type! {
    struct TaskKey;
}

#[derive(Debug)]
struct TaskBody {
    id: u32,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Owner pops while a thief thread steals, seeds and drains; every task must
/// be executed exactly once.
fn run_owner_and_thief<P: StealPolicy + 'static>(tasks: u32) {
    init_tracing();

    let mut table: SlotMap<TaskKey, TaskBody> = SlotMap::with_key();
    let mut forest = BinomialForest::alloc(16).unwrap();
    for id in 0..tasks {
        forest.push(table.insert(TaskBody { id })).unwrap();
    }

    let table = Arc::new(table);
    let shared = Arc::new(Mutex::new(forest));

    let thief = {
        let shared = Arc::clone(&shared);
        let table = Arc::clone(&table);
        thread::spawn(move || {
            let mut done = Vec::new();
            let mut local: Option<BinomialForest<TaskKey>> = None;
            loop {
                let stolen = shared.lock().steal::<P>();
                let Some(tree) = stolen else { break };
                // Reuse the drained forest when the tree fits it
                let mut seeded = match BinomialForest::seed(local.take(), tree) {
                    Ok(forest) => forest,
                    Err(rejected) => BinomialForest::seed(None, rejected.into_inner()).unwrap(),
                };
                done.extend(seeded.drain().map(|key| table[key].id));
                local = Some(seeded);
            }
            done
        })
    };

    let mut owner_done = Vec::new();
    loop {
        let next = shared.lock().pop();
        match next {
            Some(key) => owner_done.push(table[key].id),
            None => break,
        }
    }

    let thief_done = thief.join().unwrap();
    assert!(shared.lock().is_empty());

    let mut seen = FxHashSet::default();
    for id in owner_done.iter().chain(&thief_done) {
        assert!(seen.insert(*id), "{} task {} ran twice", P::NAME, id);
    }
    assert_eq!(seen.len() as u32, tasks);

    // The owner only ever sees its own tasks newest first
    assert!(owner_done.windows(2).all(|w| w[0] > w[1]));
}

#[test]
fn test_owner_and_fine_thief() {
    run_owner_and_thief::<Fine>(5000);
}

#[test]
fn test_owner_and_coarse_thief() {
    run_owner_and_thief::<Coarse>(5000);
}

#[test]
fn test_owner_and_adaptive_thief() {
    run_owner_and_thief::<Adaptive>(5000);
}

#[test]
fn test_thief_chain_splits_work() {
    // A stolen tree can itself be stolen from: each level of thieves takes
    // its share of what the previous one received.
    let mut table: SlotMap<TaskKey, TaskBody> = SlotMap::with_key();
    let mut root = BinomialForest::alloc(11).unwrap();
    for id in 0..1024 {
        root.push(table.insert(TaskBody { id })).unwrap();
    }

    let mut level = root;
    let mut shares = Vec::new();
    while level.len() > 1 {
        let tree = level.steal_1().unwrap();
        shares.push(level.len());
        level = BinomialForest::seed(None, tree).unwrap();
    }
    assert_eq!(shares, vec![512, 256, 128, 64, 32, 16, 8, 4, 2, 1]);
    assert_eq!(level.order(), 1);

    // The last thief holds the oldest task, and its key still resolves
    let last: Vec<u32> = level.drain().map(|key| table[key].id).collect();
    assert_eq!(last, vec![0]);
    assert_eq!(table.len(), 1024);
}
