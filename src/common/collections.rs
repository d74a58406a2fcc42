//! Collection aliases used across the crate. Hash containers use the fx
//! hasher; ordered containers come from std.

pub type HashMap<K, V> = rustc_hash::FxHashMap<K, V>;
pub type HashSet<T> = rustc_hash::FxHashSet<T>;

pub use std::collections::BTreeMap;
