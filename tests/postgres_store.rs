// Runs only when PASSGEN_TEST_PG_DSN points at a disposable database.
mod common;

use passgen::{PasswordStore, RelationalStore};

fn postgres_store() -> Option<RelationalStore> {
    let dsn = std::env::var("PASSGEN_TEST_PG_DSN").ok()?;
    let store = RelationalStore::new(&dsn).unwrap();
    store.clear().unwrap();
    Some(store)
}

// One test so the shared table is never used concurrently
#[test]
fn postgres_backend_contract() {
    let Some(store) = postgres_store() else {
        eprintln!("PASSGEN_TEST_PG_DSN not set; skipping PostgreSQL tests");
        return;
    };

    let scenarios: [fn(&dyn PasswordStore); 8] = [
        common::empty_store_searches_to_nothing,
        common::store_then_search_by_partial_label,
        common::verify_round_trip,
        common::label_filter_is_case_insensitive,
        common::non_ascii_labels_fold_case,
        common::wildcards_in_query_are_literal,
        common::verify_returns_every_entry_with_the_hash,
        common::delete_and_clear,
    ];
    for scenario in scenarios {
        scenario(&store);
        store.clear().unwrap();
    }
}
