// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 代理班次
///
/// 计费输入，金额以美元表示，计算时转换为美分。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgencyShift {
    /// 班次时长（小时）
    #[serde(rename = "hoursWorked", alias = "hours", default)]
    pub hours: f64,
    /// 区域描述，例如 "NYC"、"LI"、"Westchester"、"Upstate NY"
    #[serde(default)]
    pub region: Option<String>,
    /// 行驶里程
    #[serde(rename = "milesTraveled", alias = "miles", default)]
    pub miles: f64,
    /// 过路费（美元）
    #[serde(rename = "tollAmount", alias = "tolls", default)]
    pub tolls: f64,
}

/// 计费区域
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Region {
    Nyc,
    Li,
    Upstate,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::Nyc => write!(f, "NYC"),
            Region::Li => write!(f, "LI"),
            Region::Upstate => write!(f, "UPSTATE"),
        }
    }
}

/// 班次费用明细（美分）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftCost {
    pub region: Region,
    pub billable_hours: u32,
    pub base_fee: i64,
    pub mileage_cost: i64,
    pub toll_cost: i64,
    pub total: i64,
}
