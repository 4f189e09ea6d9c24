// src/lib.rs
//! tidekv 库：protocol / engine / store / types / persistence / server / config

pub mod protocol;     // RESP 协议编解码
pub mod engine;       // 命令分发
pub mod store;        // 内存存储引擎（string / list / hash + 过期）
pub mod types;        // 各数据类型的命令 handler
pub mod persistence;  // 全量快照持久化
pub mod server;       // 网络层
pub mod config;       // 配置
