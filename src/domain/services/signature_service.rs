// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::{error, warn};

type HmacSha256 = Hmac<Sha256>;

/// Webhook 签名校验器
///
/// Monday.com 在 `Authorization` 头中发送原始请求体的
/// HMAC-SHA256 十六进制摘要。
#[derive(Clone, Default)]
pub struct SignatureVerifier {
    secret: Option<String>,
}

impl std::fmt::Debug for SignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureVerifier")
            .field("configured", &self.is_configured())
            .finish()
    }
}

impl SignatureVerifier {
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }

    /// 计算请求体的小写十六进制签名
    ///
    /// 未配置密钥时返回 `None`
    pub fn sign(&self, body: &[u8]) -> Option<String> {
        let secret = self.secret.as_ref()?;
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
        mac.update(body);
        Some(hex::encode(mac.finalize().into_bytes()))
    }

    /// 校验签名
    ///
    /// 未配置密钥、缺少头、长度不符或内容不符时一律拒绝。
    /// 比较在常量时间内完成。
    pub fn verify(&self, body: &[u8], authorization: Option<&str>) -> bool {
        let expected = match self.sign(body) {
            Some(expected) => expected,
            None => {
                error!("Monday signing secret is not configured");
                return false;
            }
        };

        let provided = match authorization {
            Some(value) => value.trim(),
            None => {
                warn!("Webhook request without Authorization header");
                return false;
            }
        };

        if provided.len() != expected.len() {
            return false;
        }

        provided.as_bytes().ct_eq(expected.as_bytes()).into()
    }
}
