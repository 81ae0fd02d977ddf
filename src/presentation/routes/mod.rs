// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::presentation::handlers::{
    dead_letter_handler, delivery_handler, ingest_handler, scheduled_handler,
    subscription_handler,
};
use axum::{
    routing::{delete, get, post},
    Router,
};

/// 创建应用路由
///
/// 处理器依赖的服务通过 `Extension` 层注入
///
/// # 返回值
///
/// 返回配置好的路由
pub fn routes() -> Router {
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version));

    let ingest_routes = Router::new().route(
        "/ingest/{subscription_id}",
        post(ingest_handler::ingest),
    );

    let management_routes = Router::new()
        .route(
            "/subscriptions",
            post(subscription_handler::create_subscription)
                .get(subscription_handler::list_subscriptions),
        )
        .route(
            "/subscriptions/{id}",
            get(subscription_handler::get_subscription)
                .put(subscription_handler::update_subscription)
                .delete(subscription_handler::delete_subscription),
        )
        .route(
            "/subscriptions/{id}/deliveries",
            get(delivery_handler::list_recent_deliveries),
        )
        .route(
            "/subscriptions/{id}/dlq",
            get(dead_letter_handler::list_dead_letters),
        )
        .route("/deliveries/{task_id}", get(delivery_handler::get_delivery))
        .route(
            "/dlq/{id}/retry",
            post(dead_letter_handler::retry_dead_letter),
        )
        .route("/dlq/{id}", delete(dead_letter_handler::delete_dead_letter))
        .route(
            "/scheduled",
            post(scheduled_handler::create_scheduled).get(scheduled_handler::list_scheduled),
        )
        .route(
            "/scheduled/{id}",
            delete(scheduled_handler::delete_scheduled),
        );

    Router::new()
        .merge(public_routes)
        .merge(ingest_routes)
        .merge(management_routes)
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
///
/// # 返回值
///
/// 返回应用版本号
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
