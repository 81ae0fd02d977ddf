// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::MetricsSettings;
use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{info, warn};

/// 初始化Prometheus导出器
///
/// 未启用时不安装记录器，`metrics` 宏退化为空操作
pub fn init_metrics(settings: &MetricsSettings) {
    if !settings.enabled {
        return;
    }

    let addr: SocketAddr = match settings.listen_addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            warn!(
                "Invalid metrics listen address {}: {}",
                settings.listen_addr, e
            );
            return;
        }
    };

    // 端口被占用时只告警，不影响投递
    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        warn!("Failed to install Prometheus recorder: {}. This might happen if the port is already in use.", e);
        return;
    }

    describe_metrics();
    info!("Metrics exporter listening on {}", addr);
}

fn describe_metrics() {
    describe_counter!("delivery_attempts_total", "Total number of delivery attempts");
    describe_counter!("delivery_success_total", "Deliveries answered with a 2xx status");
    describe_counter!(
        "delivery_failed_total",
        "Failed delivery attempts, labelled by reason"
    );
    describe_counter!(
        "delivery_dead_letter_total",
        "Tasks promoted to the dead-letter store"
    );
    describe_histogram!(
        "delivery_duration_seconds",
        "Duration of a single delivery attempt"
    );
    describe_counter!(
        "scheduled_materialized_total",
        "Scheduled entries turned into delivery tasks"
    );
    describe_counter!("delivery_logs_pruned_total", "Delivery logs removed by cleanup");
    describe_counter!("subscription_cache_hits_total", "Subscription cache hits");
    describe_counter!("subscription_cache_misses_total", "Subscription cache misses");
}
