use std::collections::BTreeMap;
use std::collections::BTreeSet;

use crate::models::skills::entities::{ExamSkill, SkillRowState, SkillType};
use crate::models::skills::requests::SkillUpdateData;

// Một dòng chờ ghi: dữ liệu mong muốn kèm ID dòng sẵn có trên máy chủ
#[derive(Debug, Clone)]
pub struct SkillWrite {
    pub row_id: i64,
    pub data: SkillUpdateData,
}

/// Kết quả phân loại thay đổi kỹ năng
///
/// Năm nhóm rời nhau: mỗi loại kỹ năng được yêu cầu rơi vào đúng một
/// trong bốn nhóm reactivate/update/add/keep, còn to_delete chứa các
/// kỹ năng đang hoạt động nhưng không còn được yêu cầu.
#[derive(Debug, Clone, Default)]
pub struct SkillChangeSet {
    pub to_delete: Vec<ExamSkill>,
    pub to_reactivate: Vec<SkillWrite>,
    pub to_update: Vec<SkillWrite>,
    pub to_add: Vec<SkillUpdateData>,
    pub to_keep: Vec<ExamSkill>,
}

impl SkillChangeSet {
    /// Tập thay đổi chỉ gồm thêm mới, dùng khi tạo bài thi
    pub fn additions(desired: &[SkillUpdateData]) -> Self {
        Self {
            to_add: desired.to_vec(),
            ..Self::default()
        }
    }

    /// Không còn gì phải ghi lên máy chủ
    pub fn is_noop(&self) -> bool {
        self.to_delete.is_empty()
            && self.to_reactivate.is_empty()
            && self.to_update.is_empty()
            && self.to_add.is_empty()
    }

    /// Tóm tắt một dòng để ghi log
    pub fn summary(&self) -> String {
        format!(
            "delete={} reactivate={} update={} add={} keep={}",
            self.to_delete.len(),
            self.to_reactivate.len(),
            self.to_update.len(),
            self.to_add.len(),
            self.to_keep.len()
        )
    }
}

// Các trường số liệu do người dùng nhập, so sánh bằng là đủ vì giá trị
// đi thẳng từ form, không qua phép tính nào.
fn differs(row: &ExamSkill, data: &SkillUpdateData) -> bool {
    row.max_score != data.max_score
        || row.weight != data.weight
        || row.order_index != data.order_index
}

/// Phân loại thay đổi giữa trạng thái trên máy chủ và trạng thái mong muốn
///
/// `current` có thể chứa cả dòng đã xóa mềm; `desired` là tập kỹ năng
/// muốn hoạt động sau khi lưu, đã được kiểm tra trùng loại từ trước.
///
/// Quy tắc cho từng loại được yêu cầu:
/// - có dòng đang hoạt động: số liệu khác thì cập nhật, giống thì giữ nguyên
/// - chỉ có dòng đã xóa mềm: kích hoạt lại dòng đó, giữ nguyên ID cũ
/// - chưa có dòng nào: thêm mới
///
/// Dòng đang hoạt động mà loại không còn được yêu cầu sẽ bị xóa mềm.
/// Dòng đã xóa mềm và không được yêu cầu lại thì để nguyên.
pub fn analyze_skill_changes(
    current: &[SkillRowState],
    desired: &[SkillUpdateData],
) -> SkillChangeSet {
    let mut active: BTreeMap<SkillType, &ExamSkill> = BTreeMap::new();
    let mut tombstoned: BTreeMap<SkillType, (i64, &ExamSkill)> = BTreeMap::new();

    for row in current {
        match row {
            SkillRowState::Active(skill) => {
                active.insert(skill.skill_type, skill);
            }
            SkillRowState::Tombstoned { id, last_known } => {
                // Nhiều dòng xóa mềm cùng loại thì giữ dòng mới nhất
                let entry = tombstoned.entry(last_known.skill_type).or_insert((*id, last_known));
                if *id > entry.0 {
                    *entry = (*id, last_known);
                }
            }
        }
    }

    let mut changes = SkillChangeSet::default();

    for data in desired {
        if let Some(row) = active.get(&data.skill_type) {
            if differs(row, data) {
                changes.to_update.push(SkillWrite {
                    row_id: row.id,
                    data: data.clone(),
                });
            } else {
                changes.to_keep.push((*row).clone());
            }
        } else if let Some((row_id, _)) = tombstoned.get(&data.skill_type) {
            changes.to_reactivate.push(SkillWrite {
                row_id: *row_id,
                data: data.clone(),
            });
        } else {
            changes.to_add.push(data.clone());
        }
    }

    // Lưới an toàn: nếu một loại vừa nằm trong to_add vừa có dòng đang
    // hoạt động thì chuyển sang to_update để không vi phạm ràng buộc
    // duy nhất trên (exam_id, skill_type).
    let mut safe_add = Vec::with_capacity(changes.to_add.len());
    for data in changes.to_add.drain(..) {
        if let Some(row) = active.get(&data.skill_type) {
            changes.to_update.push(SkillWrite {
                row_id: row.id,
                data,
            });
        } else {
            safe_add.push(data);
        }
    }
    changes.to_add = safe_add;

    let requested: BTreeSet<SkillType> = desired.iter().map(|d| d.skill_type).collect();
    for (skill_type, row) in &active {
        if !requested.contains(skill_type) {
            changes.to_delete.push((*row).clone());
        }
    }

    changes
}
