// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use hookrelay::bootstrap::{build_cache, AppContext};
use hookrelay::config::settings::Settings;
use hookrelay::infrastructure::database::connection;
use hookrelay::utils::telemetry;
use hookrelay::workers::manager::WorkerManager;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting hookrelay...");

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);
    info!("Configuration loaded");

    hookrelay::infrastructure::metrics::init_metrics(&settings.metrics);

    // 3. Connect to database
    let db = connection::create_pool(&settings.database).await?;
    let db = Arc::new(db);
    info!("Database connection established");

    connection::run_migrations(db.as_ref()).await?;

    // 4. Subscription cache and services
    let cache = build_cache(&settings)?;
    let context = AppContext::new(db.clone(), cache, settings.clone());

    // 5. Start workers
    let token = CancellationToken::new();
    let mut worker_manager = WorkerManager::new(token.clone());
    context.start_workers(&mut worker_manager)?;

    // 6. Start HTTP server
    let app = context.router();
    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    let server_token = token.clone();
    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move { server_token.cancelled().await })
            .await
    });

    // 7. Wait for Ctrl-C, then stop workers and server
    worker_manager.wait_for_shutdown().await;
    server.await??;

    db.as_ref().clone().close().await?;
    info!("hookrelay stopped");
    Ok(())
}
