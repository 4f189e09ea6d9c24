// src/config.rs

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// 进程启动时从配置文件读到的全局配置
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Config {
    /// 监听端口（可被命令行 --port 覆盖）
    pub port: u16,
    /// 快照文件路径
    pub snapshot_path: String,
    /// 周期快照间隔（秒）
    pub snapshot_interval_secs: u64,
    /// 并发连接数上限
    pub max_connections: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 6379,
            snapshot_path: "snapshot.kvdb".to_string(),
            snapshot_interval_secs: 300,
            max_connections: 1024,
        }
    }
}

/// 从指定路径读取并反序列化 JSON 配置；文件不存在时写出默认配置
pub fn load<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path_ref = path.as_ref();

    if !path_ref.exists() {
        println!("Config file not found, creating default configuration...");
        let default_cfg = Config::default();
        let default_json = serde_json::to_string_pretty(&default_cfg)?;
        fs::write(path_ref, default_json)
            .with_context(|| format!("Failed to write default config {:?}", path_ref))?;
        println!("Default config created at {:?}", path_ref);
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path_ref)
        .with_context(|| format!("Failed to read config file {:?}", path_ref))?;
    let cfg: Config = serde_json::from_str(&data).context("Failed to parse config file")?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_creates_default() -> Result<()> {
        let tmp = tempdir()?;
        let path = tmp.path().join("config.json");
        let cfg = load(&path)?;
        assert_eq!(cfg.port, 6379);
        assert_eq!(cfg.snapshot_path, "snapshot.kvdb");
        assert!(path.exists());

        // 再读一次：走解析分支
        let cfg2 = load(&path)?;
        assert_eq!(cfg2.snapshot_interval_secs, cfg.snapshot_interval_secs);
        Ok(())
    }

    #[test]
    fn test_load_rejects_bad_json() -> Result<()> {
        let tmp = tempdir()?;
        let path = tmp.path().join("config.json");
        fs::write(&path, "{ not json")?;
        assert!(load(&path).is_err());
        Ok(())
    }
}
