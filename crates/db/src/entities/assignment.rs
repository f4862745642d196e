//! Assignment entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of coursework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum AssignmentType {
    #[sea_orm(string_value = "Assignment")]
    Assignment,
    #[sea_orm(string_value = "Quiz")]
    Quiz,
    #[sea_orm(string_value = "Exam")]
    Exam,
    /// Reference material with no submission expected.
    #[sea_orm(string_value = "Material")]
    Material,
}

impl Default for AssignmentType {
    fn default() -> Self {
        Self::Assignment
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "assignment")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub course_id: String,

    pub title: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    /// When the work is due. Informational only; nothing transitions
    /// automatically when it passes.
    #[sea_orm(nullable)]
    pub due_date: Option<DateTimeWithTimeZone>,

    #[sea_orm(nullable)]
    pub points_possible: Option<f64>,

    pub assignment_type: AssignmentType,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::CourseId",
        to = "super::course::Column::Id",
        on_delete = "Cascade"
    )]
    Course,

    #[sea_orm(has_many = "super::submission::Entity")]
    Submissions,

    #[sea_orm(has_many = "super::assignment_material::Entity")]
    Materials,
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::submission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submissions.def()
    }
}

impl Related<super::assignment_material::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Materials.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
