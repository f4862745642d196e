//! Enrollment entity - tracks which students are in which courses.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Status of an enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum EnrollmentStatus {
    /// Enrolled and participating.
    #[sea_orm(string_value = "Active")]
    Active,
    /// Enrollment suspended or withdrawn.
    #[sea_orm(string_value = "Inactive")]
    Inactive,
    /// Awaiting approval.
    #[sea_orm(string_value = "Pending")]
    Pending,
}

impl Default for EnrollmentStatus {
    fn default() -> Self {
        Self::Active
    }
}

/// One (course, student) membership. The pair is unique.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "enrollment")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub course_id: String,

    #[sea_orm(indexed)]
    pub student_id: String,

    /// Status of the enrollment.
    pub status: EnrollmentStatus,

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

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::StudentId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Student,
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
