// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::domain::models::brand_integration::BoardIds;
use crate::domain::models::local_record::EntityType;
use crate::domain::repositories::brand_integration_repository::BrandIntegrationRepository;
use crate::domain::services::monday_api::MondayApi;
use crate::domain::services::sync_service::SyncError;

/// 新建看板的可见性
const BOARD_KIND: &str = "private";

/// 一块待创建看板的模板
#[derive(Debug, Clone, Copy)]
pub struct BoardTemplate {
    pub name: &'static str,
    pub entity_type: EntityType,
    /// (列标题, 列类型)
    pub columns: &'static [(&'static str, &'static str)],
}

/// 品牌默认看板，状态列由 Monday.com 自动创建
///
/// 线索看板由运营方手工配置，不在此列
pub const BOARD_TEMPLATES: [BoardTemplate; 4] = [
    BoardTemplate {
        name: "Green Truth Invoices",
        entity_type: EntityType::Invoice,
        columns: &[
            ("Amount", "numbers"),
            ("Due Date", "date"),
            ("Dispensary", "text"),
            ("Invoice PDF", "file"),
        ],
    },
    BoardTemplate {
        name: "Green Truth Activations",
        entity_type: EntityType::Activation,
        columns: &[
            ("Date", "date"),
            ("Location", "location"),
            ("Type", "status"),
            ("Notes", "long_text"),
            ("Rep", "people"),
        ],
    },
    BoardTemplate {
        name: "Green Truth Sales",
        entity_type: EntityType::Order,
        columns: &[
            ("Total Amount", "numbers"),
            ("Commission", "numbers"),
            ("Rep", "people"),
            ("Items", "long_text"),
            ("Date", "date"),
        ],
    },
    BoardTemplate {
        name: "Green Truth Accounts",
        entity_type: EntityType::Account,
        columns: &[
            ("License", "text"),
            ("Address", "location"),
            ("Stage", "status"),
            ("Last Visit", "date"),
            ("Active Brands", "tags"),
        ],
    },
];

/// 看板创建报告
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionReport {
    /// 本次创建的看板
    pub board_ids: BoardIds,
    /// 创建失败而跳过的看板或列，形如 `Board` 或 `Board/Column`
    pub skipped: Vec<String>,
}

/// 看板创建服务
#[derive(Clone)]
pub struct BoardProvisioner {
    integrations: Arc<dyn BrandIntegrationRepository>,
    monday: Arc<dyn MondayApi>,
}

impl BoardProvisioner {
    pub fn new(
        integrations: Arc<dyn BrandIntegrationRepository>,
        monday: Arc<dyn MondayApi>,
    ) -> Self {
        Self {
            integrations,
            monday,
        }
    }

    /// 为品牌创建四块默认看板并保存看板ID
    ///
    /// 单个看板或列失败时记录警告并继续，
    /// 已保存的其它看板ID不受影响。
    pub async fn provision(&self, brand_id: &str) -> Result<ProvisionReport, SyncError> {
        let mut settings = self
            .integrations
            .find(brand_id)
            .await?
            .filter(|s| s.is_connected())
            .ok_or_else(|| SyncError::NotConnected(brand_id.to_string()))?;
        let token = settings
            .token()
            .ok_or_else(|| SyncError::NotConnected(brand_id.to_string()))?
            .to_string();

        let mut report = ProvisionReport::default();

        for template in BOARD_TEMPLATES.iter() {
            let board_id = match self
                .monday
                .create_board(&token, template.name, BOARD_KIND)
                .await
            {
                Ok(id) => id,
                Err(e) => {
                    error!("Error creating {} board for {}: {}", template.name, brand_id, e);
                    report.skipped.push(template.name.to_string());
                    continue;
                }
            };

            for (title, column_type) in template.columns {
                if let Err(e) = self
                    .monday
                    .create_column(&token, &board_id, title, column_type)
                    .await
                {
                    warn!(
                        "Failed to create column {} on board {}: {}",
                        title, board_id, e
                    );
                    report.skipped.push(format!("{}/{}", template.name, title));
                }
            }

            info!("Created {} board {} for brand {}", template.name, board_id, brand_id);
            report.board_ids.set(template.entity_type, board_id.clone());
            settings.board_ids.set(template.entity_type, board_id);
        }

        if report.board_ids.any_configured() {
            self.integrations.upsert(&settings).await?;
        }

        Ok(report)
    }
}
