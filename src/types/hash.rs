// src/types/hash.rs

//! Hash 类型命令
//!
//! HSET / HGET / HEXISTS / HDEL / HGETALL / HKEYS / HVALS / HLEN / HMSET。
//! HGETALL 返回 field,value 交替的扁平数组；field 顺序不作保证。
//! HMSET 的 field/value 必须成对出现，所有键值对在一次加锁内写入。

use crate::protocol::Reply;
use crate::store::Store;

/// HSET key field value → 恒为 `:1`
pub fn hset(args: &[String], store: &Store) -> Reply {
    if args.len() < 4 {
        return Reply::Error("HSET requires key, field and value".into());
    }
    store.hash_set(&args[1], &args[2], &args[3]);
    Reply::Integer(1)
}

/// HGET key field → bulk 值，field 不存在时 `$-1`
pub fn hget(args: &[String], store: &Store) -> Reply {
    if args.len() < 3 {
        return Reply::Error("HGET requires key and field".into());
    }
    Reply::Bulk(store.hash_get(&args[1], &args[2]))
}

/// HEXISTS key field → `:1` / `:0`
pub fn hexists(args: &[String], store: &Store) -> Reply {
    if args.len() < 3 {
        return Reply::Error("HEXISTS requires key and field".into());
    }
    Reply::Integer(store.hash_field_exists(&args[1], &args[2]) as i64)
}

/// HDEL key field → `:1` 删除了存在的 field，否则 `:0`
pub fn hdel(args: &[String], store: &Store) -> Reply {
    if args.len() < 3 {
        return Reply::Error("HDEL requires key and field".into());
    }
    Reply::Integer(store.hash_delete_field(&args[1], &args[2]) as i64)
}

/// HGETALL key → field,value 交替的扁平数组
pub fn hgetall(args: &[String], store: &Store) -> Reply {
    if args.len() < 2 {
        return Reply::Error("HGETALL requires key".into());
    }
    let mut flat = Vec::new();
    for (field, val) in store.hash_get_all(&args[1]) {
        flat.push(field);
        flat.push(val);
    }
    Reply::Array(flat)
}

/// HKEYS key → 所有 field
pub fn hkeys(args: &[String], store: &Store) -> Reply {
    if args.len() < 2 {
        return Reply::Error("HKEYS requires key".into());
    }
    Reply::Array(store.hash_fields(&args[1]))
}

/// HVALS key → 所有 value
pub fn hvals(args: &[String], store: &Store) -> Reply {
    if args.len() < 2 {
        return Reply::Error("HVALS requires key".into());
    }
    Reply::Array(store.hash_values(&args[1]))
}

/// HLEN key → field 个数，键不存在为 0
pub fn hlen(args: &[String], store: &Store) -> Reply {
    if args.len() < 2 {
        return Reply::Error("HLEN requires key".into());
    }
    Reply::Integer(store.hash_len(&args[1]) as i64)
}

/// HMSET key field value [field value ...] → `+OK`
/// key 之后的参数必须是偶数个。
pub fn hmset(args: &[String], store: &Store) -> Reply {
    if args.len() < 4 || args.len() % 2 == 1 {
        return Reply::Error("HMSET requires key followed by field value pairs".into());
    }
    let pairs: Vec<(String, String)> = args[2..]
        .chunks(2)
        .map(|pair| (pair[0].clone(), pair[1].clone()))
        .collect();
    store.hash_set_multiple(&args[1], &pairs);
    Reply::Simple("OK".into())
}
