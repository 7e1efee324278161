//! Common test utilities for statement application tests
//!
//! Provides shared helper functions for:
//! - Creating seeded local stores
//! - Looking up documents by key

#![allow(dead_code)]

use docmod::local::LocalStore;
use serde_json::{json, Value};

pub fn create_seeded_store() -> LocalStore {
    let mut store = LocalStore::new();

    store.add_collection(
        "users",
        vec![
            json!({"_key": "alice", "name": "Alice", "age": 30, "dept": "eng", "tags": ["admin"]}),
            json!({"_key": "bob", "name": "Bob", "age": 25, "dept": "eng", "tags": []}),
            json!({"_key": "charlie", "name": "Charlie", "age": 35, "dept": "sales"}),
            json!({"_key": "diana", "name": "Diana", "age": 28, "dept": "marketing", "tags": "solo"}),
        ],
    );

    store.add_collection(
        "products",
        vec![
            json!({"_key": "p1", "name": "Widget", "price": 29.99, "stock": {"count": 3}}),
            json!({"_key": "p2", "name": "Gadget", "price": 49.99, "stock": {"count": 0}}),
        ],
    );

    store.add_collection("empty", vec![]);

    store
}

pub fn doc<'a>(store: &'a LocalStore, collection: &str, key: &str) -> &'a Value {
    store
        .documents(collection)
        .and_then(|docs| docs.iter().find(|d| d["_key"] == key))
        .expect("document not found")
}
