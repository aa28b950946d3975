//! ID 生成
//!
//! 订阅 ID 使用 10 位 62 进制短 ID，事件 ID 使用 UUID v4。

use rand::Rng;

/// 62 进制字符集
const BASE62_CHARS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// 短 ID 长度
const ID_LENGTH: usize = 10;

/// 生成 10 位 62 进制短 ID
///
/// ```
/// use chips_router::utils::id::generate_id;
///
/// let id = generate_id();
/// assert_eq!(id.len(), 10);
/// ```
pub fn generate_id() -> String {
    let mut rng = rand::thread_rng();
    (0..ID_LENGTH)
        .map(|_| BASE62_CHARS[rng.gen_range(0..BASE62_CHARS.len())] as char)
        .collect()
}

/// 验证短 ID 格式
pub fn is_valid_id(id: &str) -> bool {
    id.len() == ID_LENGTH && id.chars().all(|c| c.is_ascii_alphanumeric())
}

/// 生成 UUID v4 格式的 ID
pub fn generate_uuid() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_id_format() {
        for _ in 0..100 {
            assert!(is_valid_id(&generate_id()));
        }
    }

    #[test]
    fn test_generate_id_unique() {
        let ids: HashSet<String> = (0..1000).map(|_| generate_id()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_is_valid_id() {
        assert!(is_valid_id("a1B2c3D4e5"));
        assert!(!is_valid_id("too-short"));
        assert!(!is_valid_id("a1B2c3D4e-"));
    }

    #[test]
    fn test_generate_uuid() {
        assert_eq!(generate_uuid().len(), 36);
    }
}
