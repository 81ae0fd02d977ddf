// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use hmac::{digest::InvalidLength, Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// 签名头前缀
pub const SIGNATURE_PREFIX: &str = "sha256=";

/// 计算负载签名，格式为 `sha256=<hex>`
pub fn sign(payload: &[u8], secret: &str) -> Result<String, InvalidLength> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())?;
    mac.update(payload);
    Ok(format!(
        "{}{}",
        SIGNATURE_PREFIX,
        hex::encode(mac.finalize().into_bytes())
    ))
}

/// 校验 `sha256=<hex>` 格式的签名
///
/// 比较在常数时间内完成；格式不符或十六进制非法一律视为校验失败
pub fn verify(payload: &[u8], secret: &str, signature: &str) -> bool {
    let Some(hex_part) = signature.trim().strip_prefix(SIGNATURE_PREFIX) else {
        return false;
    };
    let Ok(expected) = hex::decode(hex_part) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(payload);
    mac.verify_slice(&expected).is_ok()
}
