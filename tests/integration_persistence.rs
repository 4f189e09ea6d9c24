// tests/integration_persistence.rs

//! 集成测试：快照保存 / 清空 / 重新加载的完整流程。
//! 1. 通过命令层写入三种类型的键
//! 2. save_to_disk 落盘
//! 3. FLUSHALL 清空
//! 4. load_from_disk 重建并验证内容一致
//! 过期时间不在验证范围内：快照不携带 TTL。

use anyhow::Result;
use tempfile::tempdir;

use tidekv::engine::execute;
use tidekv::persistence::{load_from_disk, save_to_disk};
use tidekv::store::Store;

#[test]
fn test_snapshot_round_trip_via_commands() -> Result<()> {
    let tmp = tempdir()?;
    let path = tmp.path().join("snapshot.kvdb");

    let store = Store::new();
    execute("SET name alice", &store);
    execute("SET city paris", &store);
    execute("RPUSH queue one two three", &store);
    execute("HMSET user:1 name alice age 30", &store);
    execute("HSET profile lang rust", &store);

    save_to_disk(&store, &path)?;

    assert_eq!(execute("FLUSHALL", &store), "+OK\r\n");
    assert_eq!(execute("KEYS", &store), "*0\r\n");

    load_from_disk(&store, &path)?;

    assert_eq!(execute("GET name", &store), "$5\r\nalice\r\n");
    assert_eq!(execute("GET city", &store), "$5\r\nparis\r\n");
    assert_eq!(
        execute("LGET queue", &store),
        "*3\r\n$3\r\none\r\n$3\r\ntwo\r\n$5\r\nthree\r\n"
    );
    assert_eq!(execute("HGET profile lang", &store), "$4\r\nrust\r\n");
    assert_eq!(execute("HGET user:1 name", &store), "$5\r\nalice\r\n");
    assert_eq!(execute("HGET user:1 age", &store), "$2\r\n30\r\n");
    assert_eq!(execute("TYPE queue", &store), "+list\r\n");
    assert_eq!(execute("TYPE profile", &store), "+hash\r\n");
    Ok(())
}

#[test]
fn test_snapshot_survives_process_boundary() -> Result<()> {
    let tmp = tempdir()?;
    let path = tmp.path().join("snapshot.kvdb");

    // “第一个进程”
    {
        let store = Store::new();
        execute("SET k v", &store);
        execute("EXPIRE k 10000", &store);
        save_to_disk(&store, &path)?;
    }

    // “重启后”的全新 store
    let store = Store::new();
    load_from_disk(&store, &path)?;
    assert_eq!(execute("GET k", &store), "$1\r\nv\r\n");
    // TTL 没有跨越快照存活：EXPIRE 0 之类的状态不会被带回来
    Ok(())
}

#[test]
fn test_load_replaces_existing_values() -> Result<()> {
    let tmp = tempdir()?;
    let path = tmp.path().join("snapshot.kvdb");

    let store = Store::new();
    execute("SET keep me", &store);
    save_to_disk(&store, &path)?;

    // 加载前的新键会被整体替换掉
    execute("SET transient gone", &store);
    load_from_disk(&store, &path)?;
    assert_eq!(execute("GET keep", &store), "$2\r\nme\r\n");
    assert_eq!(execute("GET transient", &store), "$-1\r\n");
    Ok(())
}
