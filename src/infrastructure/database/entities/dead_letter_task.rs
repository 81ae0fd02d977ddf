// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "dead_letter_tasks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub original_task_id: String,
    pub subscription_id: String,
    #[sea_orm(column_type = "Text")]
    pub payload: String,
    pub target_url: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub reason: String,
    pub attempt_count: i32,
    pub failed_at: DateTimeUtc,
    pub last_attempt_at: Option<DateTimeUtc>,
    pub status: String,
    pub event_type: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub error_details: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
