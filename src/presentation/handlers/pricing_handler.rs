// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use axum::extract::{Extension, Json};

use crate::application::dto::pricing_response::ShiftCostDto;
use crate::domain::models::shift::AgencyShift;
use crate::domain::services::pricing_service::PricingService;
use crate::presentation::errors::AppError;

/// 计算代理班次费用，响应金额为美元
pub async fn agency_shift_cost(
    Extension(pricing): Extension<PricingService>,
    Json(shift): Json<AgencyShift>,
) -> Result<Json<ShiftCostDto>, AppError> {
    let cost = pricing.calculate_agency_shift_cost(&shift)?;
    Ok(Json(ShiftCostDto::from(cost)))
}
