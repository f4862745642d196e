//! Submission entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle of a submission.
///
/// Draft → Submitted → Graded. Late is set externally; no state is
/// derived from the assignment due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum SubmissionStatus {
    #[sea_orm(string_value = "Draft")]
    Draft,
    #[sea_orm(string_value = "Submitted")]
    Submitted,
    #[sea_orm(string_value = "Graded")]
    Graded,
    #[sea_orm(string_value = "Late")]
    Late,
}

impl Default for SubmissionStatus {
    fn default() -> Self {
        Self::Submitted
    }
}

/// One student's work for one assignment. The pair is unique; a
/// re-submission overwrites rather than duplicates.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "submission")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub assignment_id: String,

    #[sea_orm(indexed)]
    pub student_id: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub text: Option<String>,

    #[sea_orm(nullable)]
    pub grade: Option<f64>,

    #[sea_orm(column_type = "Text", nullable)]
    pub feedback: Option<String>,

    pub status: SubmissionStatus,

    pub submitted_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub graded_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assignment::Entity",
        from = "Column::AssignmentId",
        to = "super::assignment::Column::Id",
        on_delete = "Cascade"
    )]
    Assignment,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::StudentId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Student,

    #[sea_orm(has_many = "super::submission_file::Entity")]
    Files,
}

impl Related<super::assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::submission_file::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Files.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
