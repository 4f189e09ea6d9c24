// src/store.rs

//! # In-Memory Storage Engine
//!
//! One flat keyspace: every key maps to exactly one [`Value`] variant, so the
//! one-kind-per-key rule is enforced by the layout itself rather than by
//! convention. Expiry deadlines (absolute unix milliseconds) live in a second
//! map and are removed lazily: every operation sweeps expired keys before
//! answering, while already holding the store lock.
//!
//! Locking discipline: a single `Mutex` guards all state, and every public
//! method acquires it for its own duration only. One call is linearizable
//! with respect to all others; a command that issues several calls (a
//! multi-value LPUSH, for instance) can be observed mid-flight by other
//! connections. Callers must not assume whole-command atomicity.
//!
//! The store is constructed by the composition root and shared by reference;
//! there is no global instance.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

/// A key's payload. Exactly one variant per key.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    List(Vec<String>),
    Hash(HashMap<String, String>),
}

/// 当前 UNIX 毫秒
fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

/// Resolve a possibly-negative list index against `len`.
/// `-1` means the last element; an index still outside `[0, len)` after the
/// wrap is rejected, never clamped.
fn resolve_index(idx: i64, len: usize) -> Option<usize> {
    let idx = if idx < 0 { idx + len as i64 } else { idx };
    if idx >= 0 && idx < len as i64 {
        Some(idx as usize)
    } else {
        None
    }
}

#[derive(Default)]
struct Inner {
    data: HashMap<String, Value>,
    /// key -> absolute expiry deadline, unix ms
    expires: HashMap<String, i64>,
}

impl Inner {
    /// Remove every key whose deadline has passed. Runs under the lock at the
    /// head of each operation; there is no background sweeper in the engine.
    fn sweep(&mut self) {
        if self.expires.is_empty() {
            return;
        }
        let now = now_ms();
        let dead: Vec<String> = self
            .expires
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(key, _)| key.clone())
            .collect();
        for key in dead {
            self.data.remove(&key);
            self.expires.remove(&key);
        }
    }

    /// List slot for a mutation: creates an empty list for an absent key and
    /// replaces a value of another kind wholesale.
    fn list_slot(&mut self, key: &str) -> &mut Vec<String> {
        let slot = self
            .data
            .entry(key.to_owned())
            .or_insert_with(|| Value::List(Vec::new()));
        if !matches!(slot, Value::List(_)) {
            *slot = Value::List(Vec::new());
        }
        match slot {
            Value::List(items) => items,
            _ => unreachable!(),
        }
    }

    /// Hash slot for a mutation, same replacement rule as [`Inner::list_slot`].
    fn hash_slot(&mut self, key: &str) -> &mut HashMap<String, String> {
        let slot = self
            .data
            .entry(key.to_owned())
            .or_insert_with(|| Value::Hash(HashMap::new()));
        if !matches!(slot, Value::Hash(_)) {
            *slot = Value::Hash(HashMap::new());
        }
        match slot {
            Value::Hash(fields) => fields,
            _ => unreachable!(),
        }
    }
}

/// 存储引擎本体。`Arc<Store>` 共享，全部方法走同一把互斥锁。
#[derive(Default)]
pub struct Store {
    inner: Mutex<Inner>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    fn locked(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }

    // ---- Generic operations ----

    /// Drop every key, value and expiry.
    pub fn clear_all(&self) {
        let mut inner = self.locked();
        inner.data.clear();
        inner.expires.clear();
    }

    /// All present keys after the sweep. Order unspecified.
    pub fn keys(&self) -> Vec<String> {
        let mut inner = self.locked();
        inner.sweep();
        inner.data.keys().cloned().collect()
    }

    /// `"string" | "list" | "hash" | "none"`
    pub fn key_type(&self, key: &str) -> &'static str {
        let mut inner = self.locked();
        inner.sweep();
        match inner.data.get(key) {
            Some(Value::Str(_)) => "string",
            Some(Value::List(_)) => "list",
            Some(Value::Hash(_)) => "hash",
            None => "none",
        }
    }

    /// Remove a key of any kind plus its expiry. True iff a value was removed.
    pub fn remove_key(&self, key: &str) -> bool {
        let mut inner = self.locked();
        inner.sweep();
        inner.expires.remove(key);
        inner.data.remove(key).is_some()
    }

    /// Set a TTL of `ttl_secs` from now. Fails if the key holds no value.
    /// `ttl_secs <= 0` makes the key expire on its next access.
    pub fn set_expiry(&self, key: &str, ttl_secs: i64) -> bool {
        let mut inner = self.locked();
        inner.sweep();
        if !inner.data.contains_key(key) {
            return false;
        }
        let deadline = now_ms().saturating_add(ttl_secs.saturating_mul(1000));
        inner.expires.insert(key.to_owned(), deadline);
        true
    }

    /// Move `old` to `new`, overwriting any value at `new`. The old key's
    /// expiry moves with it; an expiry already sitting on `new` stays in
    /// place when the old key has none. False iff `old` is absent.
    pub fn rename(&self, old: &str, new: &str) -> bool {
        let mut inner = self.locked();
        inner.sweep();
        let Some(value) = inner.data.remove(old) else {
            return false;
        };
        inner.data.insert(new.to_owned(), value);
        if let Some(deadline) = inner.expires.remove(old) {
            inner.expires.insert(new.to_owned(), deadline);
        }
        true
    }

    // ---- String operations ----

    /// Unconditional overwrite, replacing a value of any kind.
    pub fn set_string(&self, key: &str, val: &str) {
        let mut inner = self.locked();
        inner.sweep();
        inner.data.insert(key.to_owned(), Value::Str(val.to_owned()));
    }

    /// None if the key is absent, expired, or holds another kind.
    pub fn get_string(&self, key: &str) -> Option<String> {
        let mut inner = self.locked();
        inner.sweep();
        match inner.data.get(key) {
            Some(Value::Str(val)) => Some(val.clone()),
            _ => None,
        }
    }

    // ---- List operations ----

    pub fn list_items(&self, key: &str) -> Vec<String> {
        let mut inner = self.locked();
        inner.sweep();
        match inner.data.get(key) {
            Some(Value::List(items)) => items.clone(),
            _ => Vec::new(),
        }
    }

    pub fn list_len(&self, key: &str) -> usize {
        let mut inner = self.locked();
        inner.sweep();
        match inner.data.get(key) {
            Some(Value::List(items)) => items.len(),
            _ => 0,
        }
    }

    pub fn list_push_front(&self, key: &str, val: &str) {
        let mut inner = self.locked();
        inner.sweep();
        inner.list_slot(key).insert(0, val.to_owned());
    }

    pub fn list_push_back(&self, key: &str, val: &str) {
        let mut inner = self.locked();
        inner.sweep();
        inner.list_slot(key).push(val.to_owned());
    }

    pub fn list_pop_front(&self, key: &str) -> Option<String> {
        let mut inner = self.locked();
        inner.sweep();
        match inner.data.get_mut(key) {
            Some(Value::List(items)) if !items.is_empty() => Some(items.remove(0)),
            _ => None,
        }
    }

    pub fn list_pop_back(&self, key: &str) -> Option<String> {
        let mut inner = self.locked();
        inner.sweep();
        match inner.data.get_mut(key) {
            Some(Value::List(items)) => items.pop(),
            _ => None,
        }
    }

    /// Remove occurrences of `val`:
    /// - `count == 0` removes every occurrence
    /// - `count > 0` removes the first `count` matches, head to tail
    /// - `count < 0` removes the last `|count|` matches, tail to head
    ///
    /// Returns the number actually removed.
    pub fn list_remove(&self, key: &str, count: i64, val: &str) -> usize {
        let mut inner = self.locked();
        inner.sweep();
        let Some(Value::List(items)) = inner.data.get_mut(key) else {
            return 0;
        };
        if count == 0 {
            let before = items.len();
            items.retain(|item| item != val);
            before - items.len()
        } else if count > 0 {
            let limit = count as usize;
            let mut removed = 0;
            let mut i = 0;
            while i < items.len() && removed < limit {
                if items[i] == val {
                    items.remove(i);
                    removed += 1;
                } else {
                    i += 1;
                }
            }
            removed
        } else {
            let limit = count.unsigned_abs() as usize;
            let mut removed = 0;
            let mut i = items.len();
            while i > 0 && removed < limit {
                i -= 1;
                if items[i] == val {
                    items.remove(i);
                    removed += 1;
                }
            }
            removed
        }
    }

    /// Element at `idx` (negative counts from the end). None when the key is
    /// absent, not a list, or the index resolves out of range.
    pub fn list_get(&self, key: &str, idx: i64) -> Option<String> {
        let mut inner = self.locked();
        inner.sweep();
        match inner.data.get(key) {
            Some(Value::List(items)) => {
                let i = resolve_index(idx, items.len())?;
                Some(items[i].clone())
            }
            _ => None,
        }
    }

    /// Overwrite the element at `idx`. False on absent key or out-of-range.
    pub fn list_set(&self, key: &str, idx: i64, val: &str) -> bool {
        let mut inner = self.locked();
        inner.sweep();
        match inner.data.get_mut(key) {
            Some(Value::List(items)) => match resolve_index(idx, items.len()) {
                Some(i) => {
                    items[i] = val.to_owned();
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    // ---- Hash operations ----

    pub fn hash_set(&self, key: &str, field: &str, val: &str) {
        let mut inner = self.locked();
        inner.sweep();
        inner.hash_slot(key).insert(field.to_owned(), val.to_owned());
    }

    pub fn hash_get(&self, key: &str, field: &str) -> Option<String> {
        let mut inner = self.locked();
        inner.sweep();
        match inner.data.get(key) {
            Some(Value::Hash(fields)) => fields.get(field).cloned(),
            _ => None,
        }
    }

    pub fn hash_field_exists(&self, key: &str, field: &str) -> bool {
        let mut inner = self.locked();
        inner.sweep();
        match inner.data.get(key) {
            Some(Value::Hash(fields)) => fields.contains_key(field),
            _ => false,
        }
    }

    pub fn hash_delete_field(&self, key: &str, field: &str) -> bool {
        let mut inner = self.locked();
        inner.sweep();
        match inner.data.get_mut(key) {
            Some(Value::Hash(fields)) => fields.remove(field).is_some(),
            _ => false,
        }
    }

    pub fn hash_get_all(&self, key: &str) -> Vec<(String, String)> {
        let mut inner = self.locked();
        inner.sweep();
        match inner.data.get(key) {
            Some(Value::Hash(fields)) => fields
                .iter()
                .map(|(f, v)| (f.clone(), v.clone()))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn hash_fields(&self, key: &str) -> Vec<String> {
        let mut inner = self.locked();
        inner.sweep();
        match inner.data.get(key) {
            Some(Value::Hash(fields)) => fields.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }

    pub fn hash_values(&self, key: &str) -> Vec<String> {
        let mut inner = self.locked();
        inner.sweep();
        match inner.data.get(key) {
            Some(Value::Hash(fields)) => fields.values().cloned().collect(),
            _ => Vec::new(),
        }
    }

    pub fn hash_len(&self, key: &str) -> usize {
        let mut inner = self.locked();
        inner.sweep();
        match inner.data.get(key) {
            Some(Value::Hash(fields)) => fields.len(),
            _ => 0,
        }
    }

    /// Write all pairs under a single lock acquisition.
    pub fn hash_set_multiple(&self, key: &str, pairs: &[(String, String)]) {
        let mut inner = self.locked();
        inner.sweep();
        let fields = inner.hash_slot(key);
        for (field, val) in pairs {
            fields.insert(field.clone(), val.clone());
        }
    }

    // ---- Snapshot access ----

    /// Clone of all entries under one lock acquisition, for the snapshot
    /// writer. No sweep: expired-but-unswept keys may appear, as in a dump
    /// taken by any other reader at the same instant.
    pub fn dump(&self) -> Vec<(String, Value)> {
        let inner = self.locked();
        inner
            .data
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Replace every value with `entries`. The expiry map is left untouched;
    /// snapshots carry no TTL state.
    pub fn replace_all(&self, entries: Vec<(String, Value)>) {
        let mut inner = self.locked();
        inner.data.clear();
        inner.data.extend(entries);
    }
}
