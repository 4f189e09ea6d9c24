// src/types/list.rs

//! # List Type Commands
//!
//! Redis-like list commands over the store's `Vec<String>` values:
//! `LGET`, `LLEN`, `LPUSH`, `RPUSH`, `LPOP`, `RPOP`, `LREM`, `LINDEX`, `LSET`.
//!
//! `LPUSH`/`RPUSH` accept several values and issue one store call per value.
//! Each call takes the store lock separately, so another connection can
//! observe the list between two of the pushes. Numeric arguments that fail to
//! parse produce command-specific error replies, never a not-found reply.

use crate::protocol::Reply;
use crate::store::Store;

/// LGET key: the whole list as an array. Missing key yields an empty array.
pub fn lget(args: &[String], store: &Store) -> Reply {
    if args.len() < 2 {
        return Reply::Error("LGET requires a key".into());
    }
    Reply::Array(store.list_items(&args[1]))
}

/// LLEN key: list length, 0 for a missing key.
pub fn llen(args: &[String], store: &Store) -> Reply {
    if args.len() < 2 {
        return Reply::Error("LLEN requires key".into());
    }
    Reply::Integer(store.list_len(&args[1]) as i64)
}

/// LPUSH key value [value ...]: push each value to the head in argument
/// order, then report the new length.
pub fn lpush(args: &[String], store: &Store) -> Reply {
    if args.len() < 3 {
        return Reply::Error("LPUSH requires key and value".into());
    }
    for val in &args[2..] {
        store.list_push_front(&args[1], val);
    }
    Reply::Integer(store.list_len(&args[1]) as i64)
}

/// RPUSH key value [value ...]: tail-end counterpart of [`lpush`].
pub fn rpush(args: &[String], store: &Store) -> Reply {
    if args.len() < 3 {
        return Reply::Error("RPUSH requires key and value".into());
    }
    for val in &args[2..] {
        store.list_push_back(&args[1], val);
    }
    Reply::Integer(store.list_len(&args[1]) as i64)
}

/// LPOP key: head element as bulk, `$-1` when empty or missing.
pub fn lpop(args: &[String], store: &Store) -> Reply {
    if args.len() < 2 {
        return Reply::Error("LPOP requires key".into());
    }
    Reply::Bulk(store.list_pop_front(&args[1]))
}

/// RPOP key: tail element as bulk, `$-1` when empty or missing.
pub fn rpop(args: &[String], store: &Store) -> Reply {
    if args.len() < 2 {
        return Reply::Error("RPOP requires key".into());
    }
    Reply::Bulk(store.list_pop_back(&args[1]))
}

/// LREM key count value: remove matching elements (count sign selects the
/// scan direction, 0 removes all); replies with the number removed.
pub fn lrem(args: &[String], store: &Store) -> Reply {
    if args.len() < 4 {
        return Reply::Error("LREM requires key, count and value".into());
    }
    let Ok(count) = args[2].parse::<i64>() else {
        return Reply::Error("Invalid count".into());
    };
    Reply::Integer(store.list_remove(&args[1], count, &args[3]) as i64)
}

/// LINDEX key index: element at index (negative wraps from the end).
pub fn lindex(args: &[String], store: &Store) -> Reply {
    if args.len() < 3 {
        return Reply::Error("LINDEX requires key and index".into());
    }
    let Ok(idx) = args[2].parse::<i64>() else {
        return Reply::Error("Invalid index".into());
    };
    Reply::Bulk(store.list_get(&args[1], idx))
}

/// LSET key index value: overwrite the element at index.
pub fn lset(args: &[String], store: &Store) -> Reply {
    if args.len() < 4 {
        return Reply::Error("LSET requires key, index and value".into());
    }
    let Ok(idx) = args[2].parse::<i64>() else {
        return Reply::Error("Invalid index".into());
    };
    if store.list_set(&args[1], idx, &args[3]) {
        Reply::Simple("OK".into())
    } else {
        Reply::Error("Index out of range".into())
    }
}
