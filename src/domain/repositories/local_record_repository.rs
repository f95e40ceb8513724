// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::local_record::{EntityType, LocalRecord, RecordRef};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::DbErr;
use thiserror::Error;

/// 仓库错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    /// 记录未找到
    #[error("Record not found")]
    NotFound,
    /// 存储的数据无法还原为领域模型
    #[error("Invalid stored data: {0}")]
    InvalidData(String),
}

/// 本地记录仓库特质
///
/// 同步只标注本地记录（Monday 条目ID、同步时间、状态），
/// 不负责记录的业务生命周期。
#[async_trait]
pub trait LocalRecordRepository: Send + Sync {
    /// 写入一条本地记录
    async fn insert(&self, record: &LocalRecord) -> Result<LocalRecord, RepositoryError>;

    /// 根据引用查找记录
    async fn find(&self, record_ref: RecordRef) -> Result<Option<LocalRecord>, RepositoryError>;

    /// 查找品牌下绑定了指定 Monday 条目的线索
    ///
    /// 按 `owner_brand_id` 过滤
    async fn find_leads_by_item(
        &self,
        brand_id: &str,
        monday_item_id: &str,
    ) -> Result<Vec<RecordRef>, RepositoryError>;

    /// 查找品牌下绑定了指定 Monday 条目的订单
    async fn find_orders_by_item(
        &self,
        brand_id: &str,
        monday_item_id: &str,
    ) -> Result<Vec<RecordRef>, RepositoryError>;

    /// 更新状态和同步时间（线索、订单）
    async fn update_status(
        &self,
        record_ref: RecordRef,
        status: &str,
        synced_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError>;

    /// 记录出站同步结果：Monday 条目ID和同步时间
    async fn mark_synced(
        &self,
        record_ref: RecordRef,
        monday_item_id: &str,
        synced_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError>;

    /// 列出品牌下尚未同步过的记录
    async fn find_unsynced(
        &self,
        brand_id: &str,
        entity_type: EntityType,
    ) -> Result<Vec<RecordRef>, RepositoryError>;
}
