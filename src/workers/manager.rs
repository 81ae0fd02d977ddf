// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::workers::worker::Worker;
use std::sync::Arc;
use tokio::signal;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// 工作管理器
///
/// 持有共享的取消令牌和所有工作器的句柄。取消只在轮次边界生效，
/// 正在进行的一轮会执行完毕。
pub struct WorkerManager {
    token: CancellationToken,
    handles: Vec<JoinHandle<()>>,
}

impl WorkerManager {
    pub fn new(token: CancellationToken) -> Self {
        Self {
            token,
            handles: Vec::new(),
        }
    }

    /// 共享的取消令牌
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// 启动一个周期性工作器
    pub fn spawn<W>(&mut self, worker: Arc<W>)
    where
        W: Worker + 'static,
    {
        let token = self.token.clone();
        let handle = tokio::spawn(async move {
            info!("{} started", worker.name());

            let mut ticker = tokio::time::interval(worker.interval());
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    () = token.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                if let Err(e) = worker.run_once().await {
                    error!("{} tick failed: {}", worker.name(), e);
                }
            }

            info!("{} stopped", worker.name());
        });
        self.handles.push(handle);
    }

    /// 已启动的工作器数量
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// 发出取消信号并等待所有工作器退出
    pub async fn shutdown(&mut self) {
        info!("Shutting down workers...");
        self.token.cancel();

        for handle in self.handles.drain(..) {
            if let Err(e) = handle.await {
                error!("Worker task terminated abnormally: {}", e);
            }
        }

        info!("Workers shut down successfully");
    }

    /// 等待关闭信号并关闭工作进程
    pub async fn wait_for_shutdown(&mut self) {
        tokio::select! {
            result = signal::ctrl_c() => match result {
                Ok(()) => info!("Shutdown signal received"),
                Err(err) => error!("Unable to listen for shutdown signal: {}", err),
            },
            () = self.token.cancelled() => {}
        }

        self.shutdown().await;
    }
}
