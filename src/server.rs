// src/server.rs

//! 网络层：
//! - 监听 TCP 连接
//! - 每个连接一个异步任务，连接总数受 Semaphore 上限约束
//! - 读请求字节，交给 engine 执行，把回复写回
//! - 关停信号到来后停止 accept，落一次最终快照；在途连接任务自然收尾

use anyhow::Result;
use std::future::Future;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    sync::Semaphore,
};

use crate::{engine, persistence, store::Store};

/// 核心循环：不断 accept 新连接并 spawn 出去，直到 shutdown future 完成。
pub async fn run(
    listener: TcpListener,
    store: Arc<Store>,
    max_connections: usize,
    snapshot_path: PathBuf,
    shutdown: impl Future,
) -> Result<()> {
    println!("tidekv server listening on {}", listener.local_addr()?);
    let limit = Arc::new(Semaphore::new(max_connections));

    tokio::select! {
        res = accept_loop(&listener, &store, &limit) => {
            res?;
        }
        _ = shutdown => {
            println!("Shutdown signal received");
        }
    }

    // 停止 accept 之后的最终快照
    match persistence::save_to_disk(&store, &snapshot_path) {
        Ok(()) => println!("Snapshot saved to {:?}", snapshot_path),
        Err(e) => eprintln!("Error saving snapshot: {}", e),
    }
    println!("Server shutdown complete");
    Ok(())
}

async fn accept_loop(
    listener: &TcpListener,
    store: &Arc<Store>,
    limit: &Arc<Semaphore>,
) -> Result<()> {
    loop {
        // 先拿连接配额，再 accept；配额用尽时在这里等待
        let permit = limit.clone().acquire_owned().await?;
        let (stream, peer) = listener.accept().await?;
        println!("Accepted connection from {}", peer);

        let store = store.clone();
        tokio::spawn(async move {
            if let Err(err) = handle_connection(stream, store).await {
                eprintln!("Connection error: {}", err);
            }
            drop(permit);
        });
    }
}

/// 单个连接的处理逻辑：一次 read 视作一条完整请求，不做跨包拼接。
/// 对端 EOF 或连接被重置时正常退出；错误回复不关闭连接。
async fn handle_connection(mut stream: TcpStream, store: Arc<Store>) -> Result<()> {
    let peer = stream.peer_addr()?;
    let mut buf = vec![0u8; 4096];

    loop {
        let n = match stream.read(&mut buf).await {
            Ok(0) => {
                println!("{} disconnected", peer);
                break;
            }
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::ConnectionReset => {
                println!("{} disconnected", peer);
                break;
            }
            Err(e) => return Err(e.into()),
        };

        let request = String::from_utf8_lossy(&buf[..n]);
        let reply = engine::execute(&request, &store);
        stream.write_all(reply.as_bytes()).await?;
    }
    Ok(())
}
