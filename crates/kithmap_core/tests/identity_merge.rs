use kithmap_core::{Aggregator, ContactRecord, Platform};

fn record(platform: &Platform, names: &[&str], phones: &[&str]) -> ContactRecord {
    let mut record = platform.record();
    for name in names {
        record.add_name(*name);
    }
    for phone in phones {
        record.add_phone(*phone);
    }
    record
}

#[test]
fn merge_by_phone_is_platform_independent() {
    let telegram = Platform::new("telegram");
    let signal = Platform::new("signal");

    let first = record(&telegram, &["ada"], &["+15550100"]);
    let second = record(&signal, &["grace"], &["+15550100"]);

    let mut aggregator = Aggregator::new();
    aggregator.ingest([first, second]).unwrap();

    assert_eq!(aggregator.identities().len(), 1);
    let identity = &aggregator.identities()[0];
    assert!(identity.has_platform(&telegram));
    assert!(identity.has_platform(&signal));
    assert!(identity.names().contains("ada"));
    assert!(identity.names().contains("grace"));
}

#[test]
fn intra_platform_alias_collision_never_cross_merges() {
    let telegram = Platform::new("telegram");

    let first = record(&telegram, &["kim"], &[]);
    let second = record(&telegram, &["kim"], &[]);

    let mut aggregator = Aggregator::new();
    aggregator.ingest([first, second]).unwrap();

    assert_eq!(aggregator.identities().len(), 2);
    // The shared alias stays on both identities; only the index entry was
    // evicted and re-pointed at the newer identity.
    assert!(aggregator.identities()[0].names().contains("kim"));
    assert!(aggregator.identities()[1].names().contains("kim"));
}

#[test]
fn alias_and_community_sets_only_grow() {
    let telegram = Platform::new("telegram");
    let signal = Platform::new("signal");
    let g1 = telegram.community("g1", "Group One", false);
    let g2 = signal.community("g2", "Group Two", false);

    let mut first = record(&telegram, &["ada"], &["+15550100"]);
    first.add_community(g1);

    let mut aggregator = Aggregator::new();
    aggregator.ingest([first]).unwrap();

    let names_before = aggregator.identities()[0].names().len();
    let communities_before = aggregator.identities()[0].community_count();
    let registry_before = aggregator.community_count();

    let mut second = record(&signal, &["ada lovelace"], &["+15550100"]);
    second.add_community(g2);
    aggregator.ingest([second]).unwrap();

    let identity = &aggregator.identities()[0];
    assert!(identity.names().len() >= names_before);
    assert!(identity.community_count() >= communities_before);
    assert!(aggregator.community_count() >= registry_before);
    assert_eq!(identity.community_count(), 2);
    assert_eq!(aggregator.community_count(), 2);
}

// Ingestion order is part of the contract: the same evidence in a
// different order may group differently. Both orders must be reproducible,
// neither is "more correct".
#[test]
fn order_sensitivity_is_reproducible() {
    let p1 = Platform::new("p1");
    let p2 = Platform::new("p2");

    let a = record(&p1, &["x"], &[]);
    let b = record(&p2, &["x"], &[]);
    let c = record(&p1, &["x"], &["555"]);

    let outcome = |records: Vec<ContactRecord>| {
        let mut aggregator = Aggregator::new();
        aggregator.ingest(records).unwrap();
        let platform_counts: Vec<usize> = aggregator
            .identities()
            .iter()
            .map(|identity| identity.platforms().len())
            .collect();
        (aggregator.identities().len(), platform_counts)
    };

    let abc = outcome(vec![a.clone(), b.clone(), c.clone()]);
    let acb = outcome(vec![a.clone(), c.clone(), b.clone()]);

    // [A, B, C]: B merges into A's identity cross-platform, C collides
    // intra-platform and seeds its own identity.
    assert_eq!(abc, (2, vec![2, 1]));
    // [A, C, B]: C collides with A first, then B merges into C's identity
    // through the re-registered alias.
    assert_eq!(acb, (2, vec![1, 2]));

    // Same order, same outcome, every time.
    assert_eq!(abc, outcome(vec![a.clone(), b.clone(), c.clone()]));
    assert_eq!(acb, outcome(vec![a, c, b]));
}

#[test]
fn multi_match_updates_identities_independently_without_merging() {
    let telegram = Platform::new("telegram");
    let signal = Platform::new("signal");
    let matrix = Platform::new("matrix");

    let first = record(&telegram, &["ann"], &[]);
    let second = record(&signal, &["bob"], &["+15550777"]);

    let mut aggregator = Aggregator::new();
    aggregator.ingest([first, second]).unwrap();
    assert_eq!(aggregator.identities().len(), 2);

    // Relates to both: the alias points at the first identity, the phone
    // at the second.
    let bridge = record(&matrix, &["ann"], &["+15550777"]);
    aggregator.ingest([bridge]).unwrap();

    assert_eq!(aggregator.identities().len(), 2);
    for identity in aggregator.identities() {
        assert!(identity.has_platform(&matrix));
    }
    // The two identities remain distinct even though they now share
    // evidence.
    let first_id = aggregator.identities()[0].uuid();
    let second_id = aggregator.identities()[1].uuid();
    assert_ne!(first_id, second_id);
}

#[test]
fn reingesting_the_same_batch_is_stable() {
    let telegram = Platform::new("telegram");
    let signal = Platform::new("signal");
    let g1 = telegram.community("g1", "Group One", false);

    let mut first = record(&telegram, &["ada"], &["+15550100"]);
    first.add_community(g1.clone());
    let second = record(&signal, &["ada"], &["+15550100"]);
    let batch = vec![first, second];

    let mut aggregator = Aggregator::new();
    aggregator.ingest(batch.clone()).unwrap();
    let identities_before = aggregator.identities().len();
    let communities_before = aggregator.community_count();

    aggregator.ingest(batch).unwrap();

    assert_eq!(aggregator.identities().len(), identities_before);
    assert_eq!(aggregator.community_count(), communities_before);
}
