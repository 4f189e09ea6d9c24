// src/persistence.rs

//! 快照持久化：把整个键空间写成按行的文本快照，启动时读回。
//!
//! 格式（空白分隔，无转义）：
//! ```text
//! S <key> <value>
//! L <key> <elem> <elem> ...
//! H <key> <field>:<value> <field>:<value> ...
//! ```
//! 已知限制：value / elem / field 含空白或 ':' 时无法原样读回。为了与既有
//! 快照文件保持兼容，格式保持原样。过期时间不落盘。
//!
//! save / load 只在文件打开失败时报错；没有部分写检测，也没有原子替换。

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::time::{Duration, interval};

use crate::store::{Store, Value};

/// 全量快照写盘。写出顺序：S 行、L 行、H 行。
pub fn save_to_disk(store: &Store, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("failed to create snapshot file {:?}", path))?;
    let mut out = BufWriter::new(file);

    let mut entries = store.dump();
    entries.sort_by_key(|(_, value)| match value {
        Value::Str(_) => 0,
        Value::List(_) => 1,
        Value::Hash(_) => 2,
    });
    for (key, value) in &entries {
        match value {
            Value::Str(val) => writeln!(out, "S {} {}", key, val)?,
            Value::List(items) => {
                write!(out, "L {}", key)?;
                for item in items {
                    write!(out, " {}", item)?;
                }
                writeln!(out)?;
            }
            Value::Hash(fields) => {
                write!(out, "H {}", key)?;
                for (field, val) in fields {
                    write!(out, " {}:{}", field, val)?;
                }
                writeln!(out)?;
            }
        }
    }
    out.flush()?;
    Ok(())
}

/// 从快照文件重建所有 value；expiry 表不动。
///
/// 逐行解析：首 token 为记录类型，未识别的类型跳过；没有 key token 的行
/// 跳过；hash 中缺 ':' 的键值对跳过。文件打开失败时 store 保持原样。
pub fn load_from_disk(store: &Store, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("failed to open snapshot file {:?}", path))?;
    let reader = BufReader::new(file);

    let mut entries = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let mut tokens = line.split_whitespace();
        let (Some(record), Some(key)) = (tokens.next(), tokens.next()) else {
            continue;
        };
        match record {
            "S" => {
                let val = tokens.next().unwrap_or_default();
                entries.push((key.to_string(), Value::Str(val.to_string())));
            }
            "L" => {
                let items: Vec<String> = tokens.map(str::to_string).collect();
                entries.push((key.to_string(), Value::List(items)));
            }
            "H" => {
                let mut fields = HashMap::new();
                for pair in tokens {
                    if let Some((field, val)) = pair.split_once(':') {
                        fields.insert(field.to_string(), val.to_string());
                    }
                }
                entries.push((key.to_string(), Value::Hash(fields)));
            }
            _ => {}
        }
    }
    store.replace_all(entries);
    Ok(())
}

/// 周期快照任务：由组合根 spawn，按固定间隔落盘并记录结果。
/// 失败只打日志，不影响服务。
pub async fn snapshot_loop(store: Arc<Store>, path: PathBuf, interval_secs: u64) {
    let mut ticker = interval(Duration::from_secs(interval_secs.max(1)));
    ticker.tick().await; // 第一跳立即触发，跳过
    loop {
        ticker.tick().await;
        match save_to_disk(&store, &path) {
            Ok(()) => println!("Snapshot saved to {:?}", path),
            Err(e) => eprintln!("Snapshot failed: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_round_trip() -> Result<()> {
        let tmp = tempdir()?;
        let path = tmp.path().join("snapshot.kvdb");

        let store = Store::new();
        store.set_string("s1", "v1");
        store.list_push_back("l1", "a");
        store.list_push_back("l1", "b");
        store.hash_set("h1", "f1", "x");
        store.hash_set("h1", "f2", "y");

        save_to_disk(&store, &path)?;
        store.clear_all();
        assert!(store.keys().is_empty());
        load_from_disk(&store, &path)?;

        assert_eq!(store.get_string("s1"), Some("v1".into()));
        assert_eq!(store.list_items("l1"), vec!["a", "b"]);
        assert_eq!(store.hash_get("h1", "f1"), Some("x".into()));
        assert_eq!(store.hash_get("h1", "f2"), Some("y".into()));
        assert_eq!(store.keys().len(), 3);
        Ok(())
    }

    #[test]
    fn test_expiry_not_persisted() -> Result<()> {
        let tmp = tempdir()?;
        let path = tmp.path().join("snapshot.kvdb");

        let store = Store::new();
        store.set_string("k", "v");
        store.set_expiry("k", 10_000);
        save_to_disk(&store, &path)?;

        let fresh = Store::new();
        load_from_disk(&fresh, &path)?;
        // 新 store 里没有 TTL 痕迹，键永不过期
        assert_eq!(fresh.get_string("k"), Some("v".into()));
        Ok(())
    }

    #[test]
    fn test_load_skips_bad_records() -> Result<()> {
        let tmp = tempdir()?;
        let path = tmp.path().join("snapshot.kvdb");
        std::fs::write(
            &path,
            "S good val\nX unknown record\n\nL mylist a b\nH myhash f:v broken nope\nS\n",
        )?;

        let store = Store::new();
        load_from_disk(&store, &path)?;
        assert_eq!(store.get_string("good"), Some("val".into()));
        assert_eq!(store.list_items("mylist"), vec!["a", "b"]);
        // 缺 ':' 的对被跳过
        assert_eq!(store.hash_len("myhash"), 1);
        assert_eq!(store.hash_get("myhash", "f"), Some("v".into()));
        assert_eq!(store.key_type("unknown"), "none");
        assert_eq!(store.keys().len(), 3);
        Ok(())
    }

    #[test]
    fn test_load_missing_file_leaves_store_untouched() {
        let store = Store::new();
        store.set_string("k", "v");
        assert!(load_from_disk(&store, "/definitely/not/there.kvdb").is_err());
        assert_eq!(store.get_string("k"), Some("v".into()));
    }

    #[test]
    fn test_string_record_without_value_loads_empty() -> Result<()> {
        let tmp = tempdir()?;
        let path = tmp.path().join("snapshot.kvdb");
        std::fs::write(&path, "S lonely\n")?;

        let store = Store::new();
        load_from_disk(&store, &path)?;
        assert_eq!(store.get_string("lonely"), Some(String::new()));
        Ok(())
    }
}
