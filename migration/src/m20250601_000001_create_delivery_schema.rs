// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm_migration::prelude::*;

/// 投递引擎初始模式迁移
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    /// 应用数据库迁移
    ///
    /// # 参数
    ///
    /// * `manager` - 数据库模式管理器
    ///
    /// # 返回值
    ///
    /// * `Ok(())` - 迁移成功
    /// * `Err(DbErr)` - 迁移失败
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 1. Subscriptions (no dependencies)
        manager
            .create_table(
                Table::create()
                    .table(Subscriptions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Subscriptions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Subscriptions::TargetUrl).string().not_null())
                    .col(ColumnDef::new(Subscriptions::Secret).string())
                    .col(ColumnDef::new(Subscriptions::EventTypes).string())
                    .col(
                        ColumnDef::new(Subscriptions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Subscriptions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // 2. Delivery tasks
        manager
            .create_table(
                Table::create()
                    .table(DeliveryTasks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DeliveryTasks::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DeliveryTasks::SubscriptionId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DeliveryTasks::Payload).text().not_null())
                    .col(
                        ColumnDef::new(DeliveryTasks::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(DeliveryTasks::AttemptCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(DeliveryTasks::LastAttemptAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(DeliveryTasks::NextAttemptAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(DeliveryTasks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // 3. Delivery logs (append-only)
        manager
            .create_table(
                Table::create()
                    .table(DeliveryLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DeliveryLogs::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DeliveryLogs::DeliveryTaskId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DeliveryLogs::SubscriptionId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DeliveryLogs::TargetUrl).string().not_null())
                    .col(
                        ColumnDef::new(DeliveryLogs::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DeliveryLogs::AttemptNumber)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DeliveryLogs::Outcome).string().not_null())
                    .col(ColumnDef::new(DeliveryLogs::HttpStatus).integer())
                    .col(ColumnDef::new(DeliveryLogs::ErrorDetails).text())
                    .to_owned(),
            )
            .await?;

        // 4. Dead letter tasks
        manager
            .create_table(
                Table::create()
                    .table(DeadLetterTasks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DeadLetterTasks::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DeadLetterTasks::OriginalTaskId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DeadLetterTasks::SubscriptionId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DeadLetterTasks::Payload).text().not_null())
                    .col(ColumnDef::new(DeadLetterTasks::TargetUrl).string())
                    .col(ColumnDef::new(DeadLetterTasks::Reason).text().not_null())
                    .col(
                        ColumnDef::new(DeadLetterTasks::AttemptCount)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DeadLetterTasks::FailedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DeadLetterTasks::LastAttemptAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(DeadLetterTasks::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(DeadLetterTasks::EventType).string())
                    .col(ColumnDef::new(DeadLetterTasks::ErrorDetails).text())
                    .to_owned(),
            )
            .await?;

        // 5. Scheduled webhooks
        manager
            .create_table(
                Table::create()
                    .table(ScheduledWebhooks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ScheduledWebhooks::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ScheduledWebhooks::SubscriptionId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ScheduledWebhooks::Payload).text().not_null())
                    .col(
                        ColumnDef::new(ScheduledWebhooks::ScheduledFor)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScheduledWebhooks::Recurrence)
                            .string()
                            .not_null()
                            .default("none"),
                    )
                    .col(
                        ColumnDef::new(ScheduledWebhooks::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(ScheduledWebhooks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ScheduledWebhooks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DeadLetterTasks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DeliveryLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DeliveryTasks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Subscriptions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Subscriptions {
    Table,
    Id,
    TargetUrl,
    Secret,
    EventTypes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum DeliveryTasks {
    Table,
    Id,
    SubscriptionId,
    Payload,
    Status,
    AttemptCount,
    LastAttemptAt,
    NextAttemptAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum DeliveryLogs {
    Table,
    Id,
    DeliveryTaskId,
    SubscriptionId,
    TargetUrl,
    Timestamp,
    AttemptNumber,
    Outcome,
    HttpStatus,
    ErrorDetails,
}

#[derive(DeriveIden)]
enum DeadLetterTasks {
    Table,
    Id,
    OriginalTaskId,
    SubscriptionId,
    Payload,
    TargetUrl,
    Reason,
    AttemptCount,
    FailedAt,
    LastAttemptAt,
    Status,
    EventType,
    ErrorDetails,
}

#[derive(DeriveIden)]
enum ScheduledWebhooks {
    Table,
    Id,
    SubscriptionId,
    Payload,
    ScheduledFor,
    Recurrence,
    Status,
    CreatedAt,
}
