// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::shift::{AgencyShift, Region, ShiftCost};
use thiserror::Error;

/// 最少计费时长（小时）
pub const MIN_BILLABLE_HOURS: u32 = 2;

/// 基础费用覆盖的最长时长（小时）
pub const BASE_TIER_MAX_HOURS: u32 = 5;

/// 超时每小时费用（美分）
pub const OVERTIME_HOURLY_CENTS: i64 = 4_000;

/// 默认里程费率：每英里 0.70 美元，以千分之一美元（mill）表示
pub const DEFAULT_MILEAGE_RATE_MILLS: i64 = 700;

/// 单项金额上限（美分），低于 2^53 以保证浮点换算精确
pub const MAX_CHARGE_CENTS: i64 = 1_000_000_000_000_000;

/// 计费错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PricingError {
    #[error("miles must be a non-negative number, got {0}")]
    InvalidMiles(f64),
    #[error("tolls must be a non-negative number, got {0}")]
    InvalidTolls(f64),
    #[error("mileage rate must be a non-negative number, got {0}")]
    InvalidMileageRate(f64),
    #[error("{0} exceeds the maximum chargeable amount")]
    AmountTooLarge(&'static str),
}

/// 非负美分金额转为整数，超出上限时报错
fn to_cents(cents: f64, what: &'static str) -> Result<i64, PricingError> {
    if cents > MAX_CHARGE_CENTS as f64 {
        return Err(PricingError::AmountTooLarge(what));
    }
    Ok(cents.max(0.0) as i64)
}

/// 规范化区域描述
///
/// 大小写不敏感的子串匹配：含 `LI`、`DOWNSTATE` 或 `WESTCHESTER` 为 LI，
/// 随后含 `UPSTATE` 则覆盖为 UPSTATE，其余一律为 NYC。
/// 对输出再次调用结果不变。
pub fn normalize_region(region: Option<&str>) -> Region {
    let upper = match region {
        Some(r) => r.to_uppercase(),
        None => return Region::Nyc,
    };

    let mut normalized = Region::Nyc;
    if upper.contains("LI") || upper.contains("DOWNSTATE") || upper.contains("WESTCHESTER") {
        normalized = Region::Li;
    }
    // UPSTATE overrides any earlier match
    if upper.contains("UPSTATE") {
        normalized = Region::Upstate;
    }
    normalized
}

/// 区域基础费用表（2、3、4、5 小时，美分）
fn base_tiers(region: Region) -> [i64; 4] {
    match region {
        Region::Nyc => [12_000, 16_000, 20_000, 24_000],
        Region::Li => [14_000, 18_000, 22_000, 26_000],
        Region::Upstate => [16_000, 20_000, 24_000, 28_000],
    }
}

/// 计费时长：四舍五入（.5 进位），最少 2 小时
///
/// 非有限值按 0 处理
pub fn billable_hours(hours: f64) -> u32 {
    let rounded = if hours.is_finite() {
        (hours + 0.5).floor()
    } else {
        0.0
    };
    if rounded <= MIN_BILLABLE_HOURS as f64 {
        MIN_BILLABLE_HOURS
    } else if rounded >= u32::MAX as f64 {
        u32::MAX
    } else {
        rounded as u32
    }
}

/// 代理班次计费器
#[derive(Debug, Clone, Copy)]
pub struct PricingService {
    mileage_rate_mills: i64,
}

impl Default for PricingService {
    fn default() -> Self {
        Self {
            mileage_rate_mills: DEFAULT_MILEAGE_RATE_MILLS,
        }
    }
}

impl PricingService {
    /// 以美元/英里创建计费器
    pub fn new(mileage_rate: f64) -> Result<Self, PricingError> {
        if !mileage_rate.is_finite() || mileage_rate < 0.0 {
            return Err(PricingError::InvalidMileageRate(mileage_rate));
        }
        Ok(Self {
            mileage_rate_mills: (mileage_rate * 1000.0).round() as i64,
        })
    }

    /// 计算代理班次费用
    ///
    /// 同样的输入总是得到同样的输出，金额以美分计算。
    pub fn calculate_agency_shift_cost(&self, shift: &AgencyShift) -> Result<ShiftCost, PricingError> {
        if !shift.miles.is_finite() || shift.miles < 0.0 {
            return Err(PricingError::InvalidMiles(shift.miles));
        }
        if !shift.tolls.is_finite() || shift.tolls < 0.0 {
            return Err(PricingError::InvalidTolls(shift.tolls));
        }

        let region = normalize_region(shift.region.as_deref());
        let hours = billable_hours(shift.hours);
        let tiers = base_tiers(region);

        let base_fee = if hours <= BASE_TIER_MAX_HOURS {
            tiers[(hours - MIN_BILLABLE_HOURS) as usize]
        } else {
            // u32 hours times the hourly rate always fits in i64
            let overtime = i64::from(hours - BASE_TIER_MAX_HOURS);
            tiers[3] + overtime * OVERTIME_HOURLY_CENTS
        };

        // miles * mills / 10 is cents; the epsilon absorbs float noise before the ceiling
        let mileage_cost = to_cents(
            (shift.miles * self.mileage_rate_mills as f64 / 10.0 - 1e-9).ceil(),
            "mileage cost",
        )?;
        let toll_cost = to_cents((shift.tolls * 100.0).round(), "toll amount")?;

        let total = base_fee
            .checked_add(mileage_cost)
            .and_then(|sum| sum.checked_add(toll_cost))
            .filter(|sum| *sum <= MAX_CHARGE_CENTS)
            .ok_or(PricingError::AmountTooLarge("total"))?;

        Ok(ShiftCost {
            region,
            billable_hours: hours,
            base_fee,
            mileage_cost,
            toll_cost,
            total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shift(hours: f64, region: &str, miles: f64, tolls: f64) -> AgencyShift {
        AgencyShift {
            hours,
            region: Some(region.to_string()),
            miles,
            tolls,
        }
    }

    fn total(s: &AgencyShift) -> i64 {
        PricingService::default()
            .calculate_agency_shift_cost(s)
            .unwrap()
            .total
    }

    #[test]
    fn test_reference_totals() {
        assert_eq!(total(&shift(3.0, "NYC", 0.0, 0.0)), 16_000);
        assert_eq!(total(&shift(6.0, "NYC", 0.0, 0.0)), 28_000);
        assert_eq!(total(&shift(2.0, "LI", 0.0, 0.0)), 14_000);
        assert_eq!(total(&shift(2.0, "Westchester", 0.0, 0.0)), 14_000);
        assert_eq!(total(&shift(3.0, "NYC", 10.0, 15.0)), 18_200);
        assert_eq!(total(&shift(1.0, "NYC", 0.0, 0.0)), 12_000);
    }

    #[test]
    fn test_minimum_floor() {
        for hours in [0.0, 0.4, 1.0, 1.49, 2.0, -3.0, f64::NAN] {
            assert_eq!(billable_hours(hours), 2, "hours = {}", hours);
        }
        assert_eq!(billable_hours(2.5), 3);
        assert_eq!(billable_hours(2.49), 2);
    }

    #[test]
    fn test_upstate_and_overtime() {
        let cost = PricingService::default()
            .calculate_agency_shift_cost(&shift(7.0, "Upstate NY", 0.0, 0.0))
            .unwrap();
        assert_eq!(cost.region, Region::Upstate);
        assert_eq!(cost.base_fee, 28_000 + 2 * 4_000);
    }

    #[test]
    fn test_missing_region_is_nyc() {
        let s = AgencyShift {
            hours: 4.0,
            ..Default::default()
        };
        assert_eq!(total(&s), 20_000);
    }

    #[test]
    fn test_normalize_region_idempotent() {
        for input in ["nyc", "Long Island", "downstate", "Upstate", "Westchester", "", "Queens"] {
            let once = normalize_region(Some(input));
            let twice = normalize_region(Some(&once.to_string()));
            assert_eq!(once, twice, "input = {}", input);
        }
    }

    #[test]
    fn test_mileage_rounds_up_to_cent() {
        let cost = PricingService::new(0.725)
            .unwrap()
            .calculate_agency_shift_cost(&shift(2.0, "NYC", 1.0, 0.0))
            .unwrap();
        // 72.5 cents rounds up
        assert_eq!(cost.mileage_cost, 73);
    }

    #[test]
    fn test_negative_inputs_rejected() {
        let service = PricingService::default();
        assert!(matches!(
            service.calculate_agency_shift_cost(&shift(3.0, "NYC", -1.0, 0.0)),
            Err(PricingError::InvalidMiles(_))
        ));
        assert!(matches!(
            service.calculate_agency_shift_cost(&shift(3.0, "NYC", 0.0, f64::INFINITY)),
            Err(PricingError::InvalidTolls(_))
        ));
        assert!(PricingService::new(-0.1).is_err());
    }

    #[test]
    fn test_huge_amounts_rejected_without_overflow() {
        let service = PricingService::default();
        assert_eq!(
            service.calculate_agency_shift_cost(&shift(3.0, "NYC", 1e300, 1e300)),
            Err(PricingError::AmountTooLarge("mileage cost"))
        );
        assert_eq!(
            service.calculate_agency_shift_cost(&shift(3.0, "NYC", 0.0, 1e300)),
            Err(PricingError::AmountTooLarge("toll amount"))
        );

        // Each part fits, the sum does not
        let max_dollars = MAX_CHARGE_CENTS as f64 / 100.0;
        assert_eq!(
            service.calculate_agency_shift_cost(&shift(3.0, "NYC", 0.0, max_dollars)),
            Err(PricingError::AmountTooLarge("total"))
        );

        // Absurd hours still price through the overtime rate
        let cost = service
            .calculate_agency_shift_cost(&shift(f64::MAX, "NYC", 0.0, 0.0))
            .unwrap();
        assert_eq!(cost.billable_hours, u32::MAX);
    }
}
