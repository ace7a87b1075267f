pub mod exams;
pub mod recovery;
pub mod skills;

pub use exams::ExamService;
pub use recovery::RecoveryService;
pub use skills::SkillService;
