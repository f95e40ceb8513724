// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod health_check;
pub mod helpers;
pub mod integration_api_test;
pub mod outbound_sync_test;
pub mod pricing_api_test;
pub mod redis_reservoir_test;
pub mod sync_outbox_test;
pub mod webhook_test;
