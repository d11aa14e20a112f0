//! `SeaORM` Entity for employees table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub code: String,
    pub full_name: String,
    pub join_date: Option<Date>,
    pub exit_date: Option<Date>,
    pub holiday_group: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tenants::Entity",
        from = "Column::TenantId",
        to = "super::tenants::Column::Id"
    )]
    Tenants,
    #[sea_orm(has_many = "super::employee_work_schedule::Entity")]
    WorkSchedule,
    #[sea_orm(has_many = "super::employee_leave_entitlements::Entity")]
    LeaveEntitlements,
    #[sea_orm(has_many = "super::leave_applications::Entity")]
    LeaveApplications,
    #[sea_orm(has_many = "super::leave_adjustments::Entity")]
    LeaveAdjustments,
}

impl Related<super::tenants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenants.def()
    }
}

impl Related<super::employee_work_schedule::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkSchedule.def()
    }
}

impl Related<super::employee_leave_entitlements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LeaveEntitlements.def()
    }
}

impl Related<super::leave_applications::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LeaveApplications.def()
    }
}

impl Related<super::leave_adjustments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LeaveAdjustments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
