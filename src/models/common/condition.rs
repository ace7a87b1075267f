use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use crate::errors::{LangCenterError, Result};
use crate::utils::validate;

/// Phép so sánh mà API bảng tổng quát hỗ trợ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/condition.ts")]
pub enum Compare {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Lte,
    #[serde(rename = "like")]
    Like,
}

impl std::fmt::Display for Compare {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Compare::Eq => "=",
            Compare::Ne => "!=",
            Compare::Gt => ">",
            Compare::Gte => ">=",
            Compare::Lt => "<",
            Compare::Lte => "<=",
            Compare::Like => "like",
        };
        write!(f, "{s}")
    }
}

/// Một bộ ba điều kiện `{key, value, compare}`
///
/// Thứ tự trường phải giữ nguyên vì backend đọc JSON theo đúng dạng này.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/condition.ts")]
pub struct Condition {
    pub key: String,
    pub value: Value,
    pub compare: Compare,
}

/// Tập điều kiện, các bộ ba được AND với nhau
#[derive(Debug, Clone, Default)]
pub struct ConditionSet {
    conditions: Vec<Condition>,
}

impl ConditionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Thêm một điều kiện, kiểm tra khóa trước khi đưa lên URL
    pub fn with(mut self, key: &str, compare: Compare, value: impl Into<Value>) -> Result<Self> {
        if !validate::is_valid_condition_key(key) {
            return Err(LangCenterError::validation(format!(
                "Khóa điều kiện không hợp lệ: '{key}'"
            )));
        }
        self.conditions.push(Condition {
            key: key.to_string(),
            value: value.into(),
            compare,
        });
        Ok(self)
    }

    pub fn eq(self, key: &str, value: impl Into<Value>) -> Result<Self> {
        self.with(key, Compare::Eq, value)
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// Chuỗi JSON đặt vào tham số truy vấn `condition`
    pub fn to_query_value(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.conditions)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format_is_key_value_compare_triples() {
        let set = ConditionSet::new()
            .eq("class_id", 7)
            .unwrap()
            .eq("is_deleted", false)
            .unwrap();
        assert_eq!(
            set.to_query_value().unwrap(),
            r#"[{"key":"class_id","value":7,"compare":"="},{"key":"is_deleted","value":false,"compare":"="}]"#
        );
    }

    #[test]
    fn test_compare_operators_serialize_as_symbols() {
        let set = ConditionSet::new()
            .with("exam_date", Compare::Gte, "2026-01-01")
            .unwrap()
            .with("name", Compare::Like, "IELTS")
            .unwrap();
        let json = set.to_query_value().unwrap();
        assert!(json.contains(r#""compare":">=""#));
        assert!(json.contains(r#""compare":"like""#));
    }

    #[test]
    fn test_invalid_key_is_rejected() {
        let err = ConditionSet::new().eq("class_id; DROP", 1).unwrap_err();
        assert_eq!(err.code(), "E001");

        let err = ConditionSet::new().eq("ClassId", 1).unwrap_err();
        assert_eq!(err.code(), "E001");
    }

    #[test]
    fn test_empty_set_serializes_to_empty_array() {
        let set = ConditionSet::new();
        assert!(set.is_empty());
        assert_eq!(set.to_query_value().unwrap(), "[]");
    }
}
