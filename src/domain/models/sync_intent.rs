// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::local_record::EntityType;

/// 同步意图（发件箱条目）
///
/// 在发起任何远程调用前持久化，由后台工作器至少投递一次。
/// `id` 同时作为幂等键。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncIntent {
    pub id: Uuid,
    pub brand_id: String,
    pub entity_type: EntityType,
    pub entity_id: Uuid,
    pub status: SyncIntentStatus,
    /// 已尝试次数
    pub attempt_count: i32,
    /// 最大尝试次数，达到后转为死信
    pub max_attempts: i32,
    pub next_attempt_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub delivered_at: Option<DateTime<Utc>>,
}

impl SyncIntent {
    pub fn new(
        brand_id: impl Into<String>,
        entity_type: EntityType,
        entity_id: Uuid,
        max_attempts: i32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            brand_id: brand_id.into(),
            entity_type,
            entity_id,
            status: SyncIntentStatus::Pending,
            attempt_count: 0,
            max_attempts,
            next_attempt_at: Some(now),
            last_error: None,
            created_at: now,
            updated_at: now,
            delivered_at: None,
        }
    }

    /// 下一次失败后是否应转为死信
    pub fn is_last_attempt(&self) -> bool {
        self.attempt_count + 1 >= self.max_attempts
    }
}

/// 同步意图状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SyncIntentStatus {
    /// 待投递
    #[default]
    Pending,
    /// 已投递
    Delivered,
    /// 投递失败，等待重试
    Failed,
    /// 已达最大尝试次数
    Dead,
}

impl fmt::Display for SyncIntentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncIntentStatus::Pending => write!(f, "pending"),
            SyncIntentStatus::Delivered => write!(f, "delivered"),
            SyncIntentStatus::Failed => write!(f, "failed"),
            SyncIntentStatus::Dead => write!(f, "dead"),
        }
    }
}
