// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Pending pool scan
        manager
            .create_index(
                Index::create()
                    .name("idx_delivery_tasks_status_next_attempt")
                    .table(DeliveryTasks::Table)
                    .col(DeliveryTasks::Status)
                    .col(DeliveryTasks::NextAttemptAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_delivery_logs_task")
                    .table(DeliveryLogs::Table)
                    .col(DeliveryLogs::DeliveryTaskId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Retention pruning
        manager
            .create_index(
                Index::create()
                    .name("idx_delivery_logs_timestamp")
                    .table(DeliveryLogs::Table)
                    .col(DeliveryLogs::Timestamp)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_dead_letter_tasks_subscription")
                    .table(DeadLetterTasks::Table)
                    .col(DeadLetterTasks::SubscriptionId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_scheduled_webhooks_status_due")
                    .table(ScheduledWebhooks::Table)
                    .col(ScheduledWebhooks::Status)
                    .col(ScheduledWebhooks::ScheduledFor)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_scheduled_webhooks_status_due")
                    .table(ScheduledWebhooks::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_dead_letter_tasks_subscription")
                    .table(DeadLetterTasks::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_delivery_logs_timestamp")
                    .table(DeliveryLogs::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_delivery_logs_task")
                    .table(DeliveryLogs::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_delivery_tasks_status_next_attempt")
                    .table(DeliveryTasks::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum DeliveryTasks {
    Table,
    Status,
    NextAttemptAt,
}

#[derive(DeriveIden)]
enum DeliveryLogs {
    Table,
    DeliveryTaskId,
    Timestamp,
}

#[derive(DeriveIden)]
enum DeadLetterTasks {
    Table,
    SubscriptionId,
}

#[derive(DeriveIden)]
enum ScheduledWebhooks {
    Table,
    Status,
    ScheduledFor,
}
