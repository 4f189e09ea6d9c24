// src/types/string.rs

//! String 类型命令
//!
//! - SET key value → `+OK`，无条件整体覆盖（包括其它类型的旧值）
//! - GET key → bulk 值；键不存在、已过期或非 string 时返回 `$-1`

use crate::protocol::Reply;
use crate::store::Store;

pub fn set(args: &[String], store: &Store) -> Reply {
    if args.len() < 3 {
        return Reply::Error("SET requires key and value".into());
    }
    store.set_string(&args[1], &args[2]);
    Reply::Simple("OK".into())
}

pub fn get(args: &[String], store: &Store) -> Reply {
    if args.len() < 2 {
        return Reply::Error("GET requires key".into());
    }
    Reply::Bulk(store.get_string(&args[1]))
}
