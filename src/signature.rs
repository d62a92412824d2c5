use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{MexcError, Result};

type HmacSha256 = Hmac<Sha256>;

/// 쿼리 문자열 서명 (HMAC-SHA256, 소문자 hex)
///
/// payload는 실제로 전송되는 url-encoded 쿼리 문자열과 바이트 단위로 같아야 합니다.
pub fn sign(secret: &[u8], payload: &[u8]) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| MexcError::InvalidKey(e.to_string()))?;
    mac.update(payload);

    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// hex 서명 검증 (상수 시간 비교)
pub fn verify(secret: &[u8], payload: &[u8], signature: &str) -> bool {
    let Ok(expected) = hex::decode(signature) else {
        return false;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(secret) else {
        return false;
    };
    mac.update(payload);

    mac.verify_slice(&expected).is_ok()
}
