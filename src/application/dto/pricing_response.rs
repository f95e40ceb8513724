// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Serialize;

use crate::domain::models::shift::{Region, ShiftCost};

/// 班次费用响应，金额为美元
///
/// 内部以美分计算，只在这里换算
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShiftCostDto {
    pub region: Region,
    pub billable_hours: u32,
    pub base_fee: f64,
    pub mileage_cost: f64,
    pub toll_cost: f64,
    pub total: f64,
}

fn dollars(cents: i64) -> f64 {
    cents as f64 / 100.0
}

impl From<ShiftCost> for ShiftCostDto {
    fn from(cost: ShiftCost) -> Self {
        Self {
            region: cost.region,
            billable_hours: cost.billable_hours,
            base_fee: dollars(cost.base_fee),
            mileage_cost: dollars(cost.mileage_cost),
            toll_cost: dollars(cost.toll_cost),
            total: dollars(cost.total),
        }
    }
}
