// src/engine.rs

//! # 命令分发
//!
//! engine 是核心对外入口：
//! - 接收一条原始请求（字节已转为文本），经 protocol 解码为参数列表
//! - 首个 token 为命令名，大写化后路由到对应 handler
//! - handler 自行校验最小参数个数、解析数字参数，并返回一个 [`Reply`]
//! - 统一编码为 RESP 字节串返回给调用方
//!
//! 通用命令（PING / ECHO / FLUSHALL / KEYS / TYPE / DEL / EXPIRE / RENAME）
//! 在本模块实现；string / list / hash 命令委托给 `types` 下的子模块。
//! 任何一次调用恰好产生一条回复。

use crate::protocol::{self, Reply};
use crate::store::Store;
use crate::types::{hash, list, string};

/// 核心入口：原始请求 → 编码后的回复
pub fn execute(raw: &str, store: &Store) -> String {
    let args = protocol::parse(raw);
    dispatch(&args, store).encode()
}

/// 按命令名路由。空参数列表与未知命令都以错误回复收场，绝不 panic。
pub fn dispatch(args: &[String], store: &Store) -> Reply {
    if args.is_empty() {
        return Reply::Error("Empty command".into());
    }
    let cmd = args[0].to_uppercase();
    match cmd.as_str() {
        // --- General commands ---
        "PING" => Reply::Simple("PONG".into()),
        "ECHO" => cmd_echo(args),
        "FLUSHALL" => {
            store.clear_all();
            Reply::Simple("OK".into())
        }
        "KEYS" => Reply::Array(store.keys()),
        "TYPE" => cmd_type(args, store),
        "DEL" | "UNLINK" => cmd_del(args, store),
        "EXPIRE" => cmd_expire(args, store),
        "RENAME" => cmd_rename(args, store),

        // --- String commands ---
        "SET" => string::set(args, store),
        "GET" => string::get(args, store),

        // --- List commands ---
        "LGET" => list::lget(args, store),
        "LLEN" => list::llen(args, store),
        "LPUSH" => list::lpush(args, store),
        "RPUSH" => list::rpush(args, store),
        "LPOP" => list::lpop(args, store),
        "RPOP" => list::rpop(args, store),
        "LREM" => list::lrem(args, store),
        "LINDEX" => list::lindex(args, store),
        "LSET" => list::lset(args, store),

        // --- Hash commands ---
        "HSET" => hash::hset(args, store),
        "HGET" => hash::hget(args, store),
        "HEXISTS" => hash::hexists(args, store),
        "HDEL" => hash::hdel(args, store),
        "HGETALL" => hash::hgetall(args, store),
        "HKEYS" => hash::hkeys(args, store),
        "HVALS" => hash::hvals(args, store),
        "HLEN" => hash::hlen(args, store),
        "HMSET" => hash::hmset(args, store),

        _ => Reply::Error("Unknown command".into()),
    }
}

fn cmd_echo(args: &[String]) -> Reply {
    if args.len() < 2 {
        return Reply::Error("ECHO requires a message".into());
    }
    Reply::Bulk(Some(args[1].clone()))
}

fn cmd_type(args: &[String], store: &Store) -> Reply {
    if args.len() < 2 {
        return Reply::Error("TYPE requires key".into());
    }
    Reply::Simple(store.key_type(&args[1]).to_string())
}

fn cmd_del(args: &[String], store: &Store) -> Reply {
    if args.len() < 2 {
        return Reply::Error("DEL requires key".into());
    }
    Reply::Integer(store.remove_key(&args[1]) as i64)
}

fn cmd_expire(args: &[String], store: &Store) -> Reply {
    if args.len() < 3 {
        return Reply::Error("EXPIRE requires key and seconds".into());
    }
    let Ok(secs) = args[2].parse::<i64>() else {
        return Reply::Error("Invalid expiration time".into());
    };
    if store.set_expiry(&args[1], secs) {
        Reply::Simple("OK".into())
    } else {
        Reply::Error("Key not found".into())
    }
}

fn cmd_rename(args: &[String], store: &Store) -> Reply {
    if args.len() < 3 {
        return Reply::Error("RENAME requires old key and new key".into());
    }
    if store.rename(&args[1], &args[2]) {
        Reply::Simple("OK".into())
    } else {
        Reply::Error("Key not found or rename failed".into())
    }
}
