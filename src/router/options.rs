//! `:options` 选项串解析
//!
//! 选项串以 `&` 分隔，每项为 `key=value` 或裸 `key`（值为 `true`）。
//! 既不含 `&` 也不含 `=` 的串视为单个不透明值原样传递。
//! 同一键出现多次时后写覆盖先写。

use serde_json::{Map, Value};

/// 选项串解析结果
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedOptions {
    /// 键值映射
    Map(Map<String, Value>),
    /// 不透明的单个位置值
    Opaque(String),
}

impl ParsedOptions {
    /// 转换为 JSON 值
    pub fn into_value(self) -> Value {
        match self {
            ParsedOptions::Map(map) => Value::Object(map),
            ParsedOptions::Opaque(s) => Value::String(s),
        }
    }

    /// 转换为映射；不透明值放在 `options` 键下
    pub fn into_map(self) -> Map<String, Value> {
        match self {
            ParsedOptions::Map(map) => map,
            ParsedOptions::Opaque(s) => {
                let mut map = Map::new();
                map.insert("options".to_string(), Value::String(s));
                map
            }
        }
    }
}

/// 解析选项串
///
/// ```
/// use chips_router::router::options::{parse_options, ParsedOptions};
/// use serde_json::json;
///
/// let parsed = parse_options(Some("foo=1&bar")).into_value();
/// assert_eq!(parsed, json!({"foo": "1", "bar": true}));
///
/// assert_eq!(
///     parse_options(Some("justastring")),
///     ParsedOptions::Opaque("justastring".to_string())
/// );
/// ```
pub fn parse_options(raw: Option<&str>) -> ParsedOptions {
    let raw = match raw {
        Some(s) if !s.is_empty() => s,
        _ => return ParsedOptions::Map(Map::new()),
    };

    if !raw.contains('&') && !raw.contains('=') {
        return ParsedOptions::Opaque(raw.to_string());
    }

    let mut map = Map::new();
    for item in raw.split('&').filter(|item| !item.is_empty()) {
        let mut parts = item.split('=');
        let key = parts.next().unwrap_or_default();
        let value = match parts.next() {
            Some(v) => Value::String(v.to_string()),
            None => Value::Bool(true),
        };
        map.insert(key.to_string(), value);
    }
    ParsedOptions::Map(map)
}
