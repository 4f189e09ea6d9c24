// src/types/mod.rs
//! 各数据类型的命令 handler：参数校验 + 调 store + 组装回复

pub mod hash;
pub mod list;
pub mod string;
