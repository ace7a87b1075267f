use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

use crate::models::skills::requests::SkillUpdateData;

static CONDITION_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9_]*$").expect("Invalid condition key regex"));

/// Khóa điều kiện chỉ được là tên cột dạng snake_case
///
/// Chuỗi điều kiện được nối thẳng vào URL, nên khóa lạ bị chặn từ phía client.
pub fn is_valid_condition_key(key: &str) -> bool {
    CONDITION_KEY_RE.is_match(key)
}

/// Kết quả kiểm tra dữ liệu bài thi
#[derive(Debug, Clone)]
pub struct ExamValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ExamValidationResult {
    pub fn error_message(&self) -> String {
        self.errors.join("; ")
    }
}

/// Kiểm tra dữ liệu form trước khi gọi API
///
/// Quy tắc:
/// - tên bài thi không được để trống
/// - mỗi loại kỹ năng chỉ xuất hiện một lần
/// - điểm tối đa và trọng số phải dương, thứ tự không âm
pub fn validate_exam_payload(name: &str, skills: &[SkillUpdateData]) -> ExamValidationResult {
    let mut errors = Vec::new();

    // 1. Tên bài thi
    if name.trim().is_empty() {
        errors.push("Tên bài thi không được để trống".to_string());
    }

    // 2. Trùng loại kỹ năng
    let mut seen = BTreeSet::new();
    for skill in skills {
        if !seen.insert(skill.skill_type) {
            errors.push(format!(
                "Kỹ năng {} bị trùng trong danh sách",
                skill.skill_type.label()
            ));
        }
    }

    // 3. Số liệu của từng kỹ năng
    for skill in skills {
        if skill.max_score <= 0.0 {
            errors.push(format!(
                "Điểm tối đa của kỹ năng {} phải lớn hơn 0",
                skill.skill_type.label()
            ));
        }
        if skill.weight <= 0.0 {
            errors.push(format!(
                "Trọng số của kỹ năng {} phải lớn hơn 0",
                skill.skill_type.label()
            ));
        }
        if skill.order_index < 0 {
            errors.push(format!(
                "Thứ tự của kỹ năng {} không được âm",
                skill.skill_type.label()
            ));
        }
    }

    ExamValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::skills::entities::SkillType;

    fn skill(skill_type: SkillType, max_score: f64, weight: f64) -> SkillUpdateData {
        SkillUpdateData {
            id: None,
            skill_type,
            max_score,
            weight,
            order_index: 0,
        }
    }

    #[test]
    fn test_valid_payload() {
        let skills = vec![
            skill(SkillType::Listening, 40.0, 1.0),
            skill(SkillType::Reading, 60.0, 1.5),
        ];
        let result = validate_exam_payload("IELTS giữa khóa", &skills);
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_empty_name() {
        let result = validate_exam_payload("   ", &[]);
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Tên bài thi không được để trống".to_string())
        );
    }

    #[test]
    fn test_duplicate_skill_type() {
        let skills = vec![
            skill(SkillType::Listening, 40.0, 1.0),
            skill(SkillType::Listening, 50.0, 1.0),
        ];
        let result = validate_exam_payload("Thi thử", &skills);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.contains("bị trùng")));
    }

    #[test]
    fn test_non_positive_score_and_weight() {
        let skills = vec![skill(SkillType::Writing, 0.0, -1.0)];
        let result = validate_exam_payload("Thi thử", &skills);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.contains("Điểm tối đa")));
        assert!(result.errors.iter().any(|e| e.contains("Trọng số")));
    }

    #[test]
    fn test_condition_keys() {
        assert!(is_valid_condition_key("class_id"));
        assert!(is_valid_condition_key("exam_date"));
        assert!(!is_valid_condition_key("ClassId"));
        assert!(!is_valid_condition_key("class id"));
        assert!(!is_valid_condition_key("1_id"));
        assert!(!is_valid_condition_key(""));
    }
}
