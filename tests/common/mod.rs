// Behaviour every backend must share; each test file runs these against its store.
#![allow(dead_code)]

use passgen::crypto::hash_password;
use passgen::{PasswordStore, PoolOptions};

pub fn scenario_options() -> PoolOptions {
    PoolOptions {
        digits: true,
        special: false,
        uppercase: false,
        lowercase: true,
    }
}

pub fn empty_store_searches_to_nothing(store: &dyn PasswordStore) {
    assert!(store.search(None).unwrap().is_empty());
    assert!(store.search(Some("anything")).unwrap().is_empty());
    assert!(store.verify("secret", None).unwrap().is_empty());
}

pub fn store_then_search_by_partial_label(store: &dyn PasswordStore) {
    let stored = store
        .store("Tr0ub4dor", "work", 9, scenario_options())
        .unwrap();
    assert_eq!(stored.label, "work");
    assert_eq!(stored.hash, hash_password("Tr0ub4dor"));
    assert_eq!(stored.length, 9);
    assert_eq!(stored.options, scenario_options());
    assert!(stored.created_at.ends_with('Z'));

    let found = store.search(Some("wor")).unwrap();
    assert_eq!(found, vec![stored]);
}

pub fn verify_round_trip(store: &dyn PasswordStore) {
    store
        .store("secret", "label-one", 12, PoolOptions::default())
        .unwrap();

    let matches = store.verify("secret", None).unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].label, "label-one");

    assert!(store.verify("not-the-secret", None).unwrap().is_empty());
    assert!(store.verify("secret", Some("other")).unwrap().is_empty());
    assert_eq!(store.verify("secret", Some("LABEL")).unwrap().len(), 1);
}

pub fn label_filter_is_case_insensitive(store: &dyn PasswordStore) {
    store.store("one", "Alpha", 8, PoolOptions::default()).unwrap();
    store.store("two", "beta", 8, PoolOptions::default()).unwrap();

    let labels = |query: Option<&str>| -> Vec<String> {
        store
            .search(query)
            .unwrap()
            .into_iter()
            .map(|e| e.label)
            .collect()
    };
    assert_eq!(labels(Some("alp")), vec!["Alpha"]);
    assert_eq!(labels(Some("BET")), vec!["beta"]);
    assert_eq!(labels(Some("")), vec!["Alpha", "beta"]);
    assert_eq!(labels(None), vec!["Alpha", "beta"]);
}

pub fn non_ascii_labels_fold_case(store: &dyn PasswordStore) {
    store.store("one", "Ärger", 8, PoolOptions::default()).unwrap();
    store.store("two", "ÉTÉ été", 8, PoolOptions::default()).unwrap();
    store.store("three", "plain", 8, PoolOptions::default()).unwrap();

    let labels = |query: &str| -> Vec<String> {
        store
            .search(Some(query))
            .unwrap()
            .into_iter()
            .map(|e| e.label)
            .collect()
    };
    assert_eq!(labels("ärg"), vec!["Ärger"]);
    assert_eq!(labels("ÄRG"), vec!["Ärger"]);
    assert_eq!(labels("été"), vec!["ÉTÉ été"]);
    assert_eq!(store.verify("one", Some("äRGER")).unwrap().len(), 1);
}

pub fn wildcards_in_query_are_literal(store: &dyn PasswordStore) {
    store.store("one", "50%_off", 8, PoolOptions::default()).unwrap();
    store.store("two", "500 off", 8, PoolOptions::default()).unwrap();

    let found = store.search(Some("%_")).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].label, "50%_off");
}

pub fn verify_returns_every_entry_with_the_hash(store: &dyn PasswordStore) {
    store.store("same", "first", 4, PoolOptions::default()).unwrap();
    store.store("different", "second", 9, PoolOptions::default()).unwrap();
    store.store("same", "third", 4, PoolOptions::default()).unwrap();

    let labels: Vec<_> = store
        .verify("same", None)
        .unwrap()
        .into_iter()
        .map(|e| e.label)
        .collect();
    assert_eq!(labels, vec!["first", "third"]);
}

pub fn delete_and_clear(store: &dyn PasswordStore) {
    let first = store.store("a", "keep-me", 1, PoolOptions::default()).unwrap();
    let second = store.store("b", "drop-me", 1, PoolOptions::default()).unwrap();

    assert!(store.delete(&second).unwrap());
    assert!(!store.delete(&second).unwrap());
    assert_eq!(store.search(None).unwrap(), vec![first]);

    store.store("c", "another", 1, PoolOptions::default()).unwrap();
    assert_eq!(store.clear().unwrap(), 2);
    assert!(store.search(None).unwrap().is_empty());
    assert_eq!(store.clear().unwrap(), 0);
}
