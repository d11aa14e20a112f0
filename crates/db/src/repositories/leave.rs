//! Leave repository: loads tenant leave books and persists leave writes.
//!
//! Every method opens its own tenant-scoped transaction. Reads load the whole
//! tenant into a [`TenantLeaveBook`] so balances are computed against one
//! consistent snapshot; writes commit atomically or not at all.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use leavebook_core::calendar::{
    CalendarPolicy, Holiday, HolidayCalendar, HolidayKind, WeeklySchedule, WorkScheduleDay,
    weekday_index,
};
use leavebook_core::entitlement::{
    EntitlementError, EntitlementGrid, EntitlementTable, LeaveEntitlement, StoredLeaveDefault,
};
use leavebook_core::leave::{
    Employee, LeaveAdjustment, LeaveApplication, LeaveError, LeaveService, NewLeaveAdjustment,
    NewLeaveApplication, TenantLeaveBook,
};
use leavebook_shared::AppError;
use leavebook_shared::types::{
    EmployeeId, HolidayId, LeaveDefaultId, LeaveEntitlementId, PageRequest, PageResponse, TenantId,
};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::entities::{
    employee_leave_entitlements, employee_work_schedule, employees, holidays, leave_adjustments,
    leave_applications, leave_defaults,
};
use crate::tenant::TenantExt;

/// Error types for leave persistence.
#[derive(Debug, thiserror::Error)]
pub enum LeaveRepoError {
    /// Employee not found in the tenant.
    #[error("Employee not found: {0}")]
    EmployeeNotFound(Uuid),

    /// Calendar year outside the supported date range.
    #[error("Invalid calendar year: {0}")]
    InvalidYear(i32),

    /// A holiday already exists for the group and date.
    #[error("Holiday already exists for group '{group_code}' on {date}")]
    DuplicateHoliday {
        /// Holiday group.
        group_code: String,
        /// Holiday date.
        date: NaiveDate,
    },

    /// Leave rule violation.
    #[error(transparent)]
    Leave(#[from] LeaveError),

    /// Stored entitlement configuration could not be read.
    #[error(transparent)]
    Entitlement(#[from] EntitlementError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<LeaveRepoError> for AppError {
    fn from(err: LeaveRepoError) -> Self {
        match err {
            LeaveRepoError::EmployeeNotFound(_) => Self::NotFound(err.to_string()),
            LeaveRepoError::InvalidYear(_) => Self::Validation(err.to_string()),
            LeaveRepoError::DuplicateHoliday { .. } => Self::Conflict(err.to_string()),
            LeaveRepoError::Leave(e) => e.into(),
            LeaveRepoError::Entitlement(e) => LeaveError::Entitlement(e).into(),
            LeaveRepoError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Leave repository.
#[derive(Debug, Clone)]
pub struct LeaveRepository {
    db: DatabaseConnection,
}

impl LeaveRepository {
    /// Creates a new leave repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Loads every leave record of a tenant in one transaction.
    ///
    /// Malformed entitlement tables, out-of-band entitlement rows and
    /// unreadable application rows are skipped with a warning; they read as
    /// missing configuration or unrecorded leave.
    pub async fn load_book(&self, tenant_id: TenantId) -> Result<TenantLeaveBook, LeaveRepoError> {
        let conn = self.db.with_tenant(tenant_id).await?;
        let txn = conn.transaction();
        let tid = tenant_id.into_inner();
        let mut book = TenantLeaveBook::new(tenant_id);

        let employee_rows = employees::Entity::find()
            .filter(employees::Column::TenantId.eq(tid))
            .order_by_asc(employees::Column::FullName)
            .all(txn)
            .await?;
        for row in employee_rows {
            book.insert_employee(row.into());
        }

        let schedule_rows = employee_work_schedule::Entity::find()
            .filter(employee_work_schedule::Column::TenantId.eq(tid))
            .all(txn)
            .await?;
        let mut schedules: HashMap<EmployeeId, Vec<WorkScheduleDay>> = HashMap::new();
        for row in schedule_rows {
            let day = WorkScheduleDay::try_from(row).map_err(LeaveError::from)?;
            schedules.entry(day.employee_id).or_default().push(day);
        }
        for (employee_id, days) in schedules {
            let schedule = WeeklySchedule::from_rows(&days).map_err(LeaveError::from)?;
            book.set_schedule(employee_id, schedule);
        }

        for row in holidays::Entity::find()
            .filter(holidays::Column::TenantId.eq(tid))
            .all(txn)
            .await?
        {
            book.add_holiday(row.into());
        }

        for table in load_tables(txn, tid).await? {
            book.insert_table(table);
        }

        let entitlement_rows = employee_leave_entitlements::Entity::find()
            .filter(employee_leave_entitlements::Column::TenantId.eq(tid))
            .all(txn)
            .await?;
        let mut grids: HashMap<EmployeeId, EntitlementGrid> = HashMap::new();
        for row in entitlement_rows {
            let id = row.id;
            match LeaveEntitlement::try_from(row) {
                Ok(e) => grids
                    .entry(e.employee_id)
                    .or_insert_with(|| EntitlementGrid::new(e.employee_id))
                    .set(&e.leave_type, e.year_of_service, e.days),
                Err(err) => warn!(entitlement_id = %id, error = %err, "skipping entitlement row"),
            }
        }
        for grid in grids.into_values() {
            book.set_grid(grid);
        }

        let application_rows = leave_applications::Entity::find()
            .filter(leave_applications::Column::TenantId.eq(tid))
            .all(txn)
            .await?;
        for application in readable_applications(application_rows) {
            book.record_application(application);
        }

        for row in leave_adjustments::Entity::find()
            .filter(leave_adjustments::Column::TenantId.eq(tid))
            .all(txn)
            .await?
        {
            book.record_adjustment(row.into());
        }

        conn.commit().await?;

        debug!(
            tenant_id = %tenant_id,
            employees = book.employees().count(),
            leave_types = book.leave_types().len(),
            "loaded tenant leave book"
        );
        Ok(book)
    }

    /// Reads one tenant entitlement table.
    pub async fn leave_default(
        &self,
        tenant_id: TenantId,
        leave_type: &str,
    ) -> Result<Option<EntitlementTable>, LeaveRepoError> {
        let conn = self.db.with_tenant(tenant_id).await?;
        let row = find_leave_default(conn.transaction(), tenant_id.into_inner(), leave_type).await?;
        conn.commit().await?;
        row.map(|r| EntitlementTable::from_stored(&r.into()))
            .transpose()
            .map_err(Into::into)
    }

    /// Lists an employee's applications, newest first, optionally limited to
    /// those starting in one calendar year.
    pub async fn list_applications(
        &self,
        tenant_id: TenantId,
        employee_id: EmployeeId,
        year: Option<i32>,
        page: PageRequest,
    ) -> Result<PageResponse<LeaveApplication>, LeaveRepoError> {
        let mut query = leave_applications::Entity::find()
            .filter(leave_applications::Column::TenantId.eq(tenant_id.into_inner()))
            .filter(leave_applications::Column::EmployeeId.eq(employee_id.into_inner()));
        if let Some(year) = year {
            let (first, last) = year_bounds(year)?;
            query = query
                .filter(leave_applications::Column::StartDate.gte(first))
                .filter(leave_applications::Column::StartDate.lte(last));
        }

        let conn = self.db.with_tenant(tenant_id).await?;
        let txn = conn.transaction();
        let total = query.clone().count(txn).await?;
        let rows = query
            .order_by_desc(leave_applications::Column::StartDate)
            .order_by_desc(leave_applications::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(txn)
            .await?;
        conn.commit().await?;

        let data = rows
            .into_iter()
            .map(LeaveApplication::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PageResponse::new(data, page, total))
    }

    /// Lists an employee's adjustments, newest first.
    pub async fn list_adjustments(
        &self,
        tenant_id: TenantId,
        employee_id: EmployeeId,
        page: PageRequest,
    ) -> Result<PageResponse<LeaveAdjustment>, LeaveRepoError> {
        let query = leave_adjustments::Entity::find()
            .filter(leave_adjustments::Column::TenantId.eq(tenant_id.into_inner()))
            .filter(leave_adjustments::Column::EmployeeId.eq(employee_id.into_inner()));

        let conn = self.db.with_tenant(tenant_id).await?;
        let txn = conn.transaction();
        let total = query.clone().count(txn).await?;
        let rows = query
            .order_by_desc(leave_adjustments::Column::Date)
            .order_by_desc(leave_adjustments::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(txn)
            .await?;
        conn.commit().await?;

        let data = rows.into_iter().map(LeaveAdjustment::from).collect();
        Ok(PageResponse::new(data, page, total))
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Validates and stores a leave application, computing `days_used` from
    /// the employee's calendar as it stands now.
    pub async fn submit_application(
        &self,
        tenant_id: TenantId,
        input: NewLeaveApplication,
        default_leave_type: &str,
    ) -> Result<LeaveApplication, LeaveRepoError> {
        let conn = self.db.with_tenant(tenant_id).await?;
        let txn = conn.transaction();

        let employee = find_employee(txn, tenant_id, input.employee_id).await?;
        let policy = load_calendar(txn, &employee).await?;
        let app = LeaveService::prepare_application(
            tenant_id,
            input,
            &policy,
            default_leave_type,
            Utc::now(),
        )?;

        leave_applications::ActiveModel {
            id: Set(app.id.into_inner()),
            tenant_id: Set(tenant_id.into_inner()),
            employee_id: Set(app.employee_id.into_inner()),
            leave_type: Set(app.leave_type.clone()),
            start_date: Set(app.span.start),
            start_half: Set(app.span.start_half.as_str().to_string()),
            end_date: Set(app.span.end),
            end_half: Set(app.span.end_half.as_str().to_string()),
            days_used: Set(app.days_used),
            status: Set(app.status.as_str().to_string()),
            remarks: Set(app.remarks.clone()),
            created_at: Set(app.created_at.fixed_offset()),
        }
        .insert(txn)
        .await?;

        conn.commit().await?;
        info!(
            tenant_id = %tenant_id,
            application_id = %app.id,
            days_used = %app.days_used,
            "leave application submitted"
        );
        Ok(app)
    }

    /// Stores a manual balance adjustment.
    pub async fn record_adjustment(
        &self,
        tenant_id: TenantId,
        input: NewLeaveAdjustment,
        default_leave_type: &str,
    ) -> Result<LeaveAdjustment, LeaveRepoError> {
        let conn = self.db.with_tenant(tenant_id).await?;
        let txn = conn.transaction();

        find_employee(txn, tenant_id, input.employee_id).await?;
        let adj =
            LeaveService::prepare_adjustment(tenant_id, input, default_leave_type, Utc::now())?;

        leave_adjustments::ActiveModel {
            id: Set(adj.id.into_inner()),
            tenant_id: Set(tenant_id.into_inner()),
            employee_id: Set(adj.employee_id.into_inner()),
            leave_type: Set(adj.leave_type.clone()),
            date: Set(adj.date),
            delta_days: Set(adj.delta_days),
            remarks: Set(adj.remarks.clone()),
            created_at: Set(adj.created_at.fixed_offset()),
        }
        .insert(txn)
        .await?;

        conn.commit().await?;
        info!(
            tenant_id = %tenant_id,
            adjustment_id = %adj.id,
            delta_days = %adj.delta_days,
            "leave adjustment recorded"
        );
        Ok(adj)
    }

    /// Replaces one employee's entitlement grid with the tenant tables.
    pub async fn load_defaults(
        &self,
        tenant_id: TenantId,
        employee_id: EmployeeId,
    ) -> Result<EntitlementGrid, LeaveRepoError> {
        let conn = self.db.with_tenant(tenant_id).await?;
        let txn = conn.transaction();

        find_employee(txn, tenant_id, employee_id).await?;
        let tables = load_tables(txn, tenant_id.into_inner()).await?;
        let grid = EntitlementGrid::load_defaults(employee_id, &tables);
        replace_grid(txn, tenant_id, &grid).await?;

        conn.commit().await?;
        info!(
            tenant_id = %tenant_id,
            employee_id = %employee_id,
            leave_types = tables.len(),
            "loaded default entitlements"
        );
        Ok(grid)
    }

    /// Replaces every employee's entitlement grid with the tenant tables.
    /// Returns the number of employees updated.
    pub async fn load_defaults_for_tenant(&self, tenant_id: TenantId) -> Result<usize, LeaveRepoError> {
        let conn = self.db.with_tenant(tenant_id).await?;
        let txn = conn.transaction();

        let tables = load_tables(txn, tenant_id.into_inner()).await?;
        let employee_ids: Vec<Uuid> = employees::Entity::find()
            .filter(employees::Column::TenantId.eq(tenant_id.into_inner()))
            .select_only()
            .column(employees::Column::Id)
            .into_tuple()
            .all(txn)
            .await?;
        for &id in &employee_ids {
            let grid = EntitlementGrid::load_defaults(EmployeeId::from_uuid(id), &tables);
            replace_grid(txn, tenant_id, &grid).await?;
        }

        conn.commit().await?;
        info!(
            tenant_id = %tenant_id,
            employees = employee_ids.len(),
            leave_types = tables.len(),
            "loaded default entitlements for tenant"
        );
        Ok(employee_ids.len())
    }

    /// Replaces an employee's stored grid with `grid`.
    pub async fn save_entitlement_grid(
        &self,
        tenant_id: TenantId,
        grid: &EntitlementGrid,
    ) -> Result<(), LeaveRepoError> {
        let conn = self.db.with_tenant(tenant_id).await?;
        let txn = conn.transaction();
        find_employee(txn, tenant_id, grid.employee_id()).await?;
        replace_grid(txn, tenant_id, grid).await?;
        conn.commit().await?;
        Ok(())
    }

    /// Replaces an employee's weekly schedule with seven explicit rows.
    pub async fn save_work_schedule(
        &self,
        tenant_id: TenantId,
        employee_id: EmployeeId,
        schedule: &WeeklySchedule,
    ) -> Result<(), LeaveRepoError> {
        let conn = self.db.with_tenant(tenant_id).await?;
        let txn = conn.transaction();
        find_employee(txn, tenant_id, employee_id).await?;

        employee_work_schedule::Entity::delete_many()
            .filter(employee_work_schedule::Column::EmployeeId.eq(employee_id.into_inner()))
            .exec(txn)
            .await?;
        let rows = schedule
            .to_rows(employee_id)
            .into_iter()
            .map(|day| employee_work_schedule::ActiveModel {
                id: Set(Uuid::now_v7()),
                tenant_id: Set(tenant_id.into_inner()),
                employee_id: Set(employee_id.into_inner()),
                weekday: Set(weekday_index(day.weekday)),
                working: Set(day.working),
                day_type: Set(day.day_type.as_str().to_string()),
            });
        employee_work_schedule::Entity::insert_many(rows)
            .exec(txn)
            .await?;

        conn.commit().await?;
        Ok(())
    }

    /// Inserts or replaces a tenant entitlement table.
    pub async fn upsert_leave_default(
        &self,
        tenant_id: TenantId,
        table: &EntitlementTable,
    ) -> Result<(), LeaveRepoError> {
        let conn = self.db.with_tenant(tenant_id).await?;
        let txn = conn.transaction();
        save_table(txn, tenant_id.into_inner(), table).await?;
        conn.commit().await?;
        Ok(())
    }

    /// Returns the table for a leave type, creating it with `seed_days` in
    /// every band and the reset policy if the tenant has none.
    pub async fn ensure_leave_default(
        &self,
        tenant_id: TenantId,
        leave_type: &str,
        seed_days: Decimal,
    ) -> Result<EntitlementTable, LeaveRepoError> {
        let leave_type = LeaveService::normalize_leave_type(leave_type, "")?;
        let conn = self.db.with_tenant(tenant_id).await?;
        let txn = conn.transaction();
        let tid = tenant_id.into_inner();

        let table = match find_leave_default(txn, tid, &leave_type).await? {
            Some(row) => EntitlementTable::from_stored(&row.into())?,
            None => {
                let table = EntitlementTable::seeded(leave_type, seed_days);
                save_table(txn, tid, &table).await?;
                info!(tenant_id = %tenant_id, leave_type = %table.leave_type, "seeded leave type");
                table
            }
        };

        conn.commit().await?;
        Ok(table)
    }

    /// Adds a holiday to a group.
    pub async fn add_holiday(
        &self,
        tenant_id: TenantId,
        group_code: &str,
        name: &str,
        date: NaiveDate,
        kind: HolidayKind,
    ) -> Result<Holiday, LeaveRepoError> {
        let group_code = group_code.trim();
        let conn = self.db.with_tenant(tenant_id).await?;
        let txn = conn.transaction();

        let existing = holidays::Entity::find()
            .filter(holidays::Column::TenantId.eq(tenant_id.into_inner()))
            .filter(holidays::Column::GroupCode.eq(group_code))
            .filter(holidays::Column::Date.eq(date))
            .one(txn)
            .await?;
        if existing.is_some() {
            return Err(LeaveRepoError::DuplicateHoliday {
                group_code: group_code.to_string(),
                date,
            });
        }

        let row = holidays::ActiveModel {
            id: Set(HolidayId::new().into_inner()),
            tenant_id: Set(tenant_id.into_inner()),
            group_code: Set(group_code.to_string()),
            name: Set(name.trim().to_string()),
            date: Set(date),
            is_half_day: Set(kind == HolidayKind::Half),
        }
        .insert(txn)
        .await?;
        conn.commit().await?;
        Ok(row.into())
    }
}

/// Converts application rows, dropping the ones the engine cannot read
/// (unknown status, bad half-day marker, reversed range).
fn readable_applications(rows: Vec<leave_applications::Model>) -> Vec<LeaveApplication> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.id;
            LeaveApplication::try_from(row)
                .map_err(|err| warn!(application_id = %id, error = %err, "skipping application row"))
                .ok()
        })
        .collect()
}

// ============================================================================
// Transaction helpers
// ============================================================================

fn year_bounds(year: i32) -> Result<(NaiveDate, NaiveDate), LeaveRepoError> {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .zip(NaiveDate::from_ymd_opt(year, 12, 31))
        .ok_or(LeaveRepoError::InvalidYear(year))
}

async fn find_employee<C: ConnectionTrait>(
    db: &C,
    tenant_id: TenantId,
    employee_id: EmployeeId,
) -> Result<Employee, LeaveRepoError> {
    employees::Entity::find_by_id(employee_id.into_inner())
        .filter(employees::Column::TenantId.eq(tenant_id.into_inner()))
        .one(db)
        .await?
        .map(Employee::from)
        .ok_or(LeaveRepoError::EmployeeNotFound(employee_id.into_inner()))
}

async fn load_calendar<C: ConnectionTrait>(
    db: &C,
    employee: &Employee,
) -> Result<CalendarPolicy, LeaveRepoError> {
    let days = employee_work_schedule::Entity::find()
        .filter(employee_work_schedule::Column::EmployeeId.eq(employee.id.into_inner()))
        .all(db)
        .await?
        .into_iter()
        .map(WorkScheduleDay::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(LeaveError::from)?;
    let schedule = WeeklySchedule::from_rows(&days).map_err(LeaveError::from)?;

    let group_holidays: Vec<Holiday> = holidays::Entity::find()
        .filter(holidays::Column::TenantId.eq(employee.tenant_id.into_inner()))
        .filter(holidays::Column::GroupCode.eq(employee.holiday_group.as_str()))
        .all(db)
        .await?
        .into_iter()
        .map(Holiday::from)
        .collect();

    Ok(CalendarPolicy::new(
        schedule,
        HolidayCalendar::for_group(&group_holidays, &employee.holiday_group),
    ))
}

async fn find_leave_default<C: ConnectionTrait>(
    db: &C,
    tenant_id: Uuid,
    leave_type: &str,
) -> Result<Option<leave_defaults::Model>, DbErr> {
    leave_defaults::Entity::find()
        .filter(leave_defaults::Column::TenantId.eq(tenant_id))
        .filter(leave_defaults::Column::LeaveType.eq(leave_type.trim()))
        .one(db)
        .await
}

/// Reads every tenant table, skipping malformed ones with a warning.
async fn load_tables<C: ConnectionTrait>(
    db: &C,
    tenant_id: Uuid,
) -> Result<Vec<EntitlementTable>, DbErr> {
    let rows = leave_defaults::Entity::find()
        .filter(leave_defaults::Column::TenantId.eq(tenant_id))
        .order_by_asc(leave_defaults::Column::LeaveType)
        .all(db)
        .await?;

    let mut tables = Vec::with_capacity(rows.len());
    for row in rows {
        let stored = StoredLeaveDefault::from(row);
        match EntitlementTable::from_stored(&stored) {
            Ok(table) => tables.push(table),
            Err(err) => warn!(
                leave_type = %stored.leave_type,
                error = %err,
                "skipping unreadable leave default"
            ),
        }
    }
    Ok(tables)
}

async fn save_table<C: ConnectionTrait>(
    db: &C,
    tenant_id: Uuid,
    table: &EntitlementTable,
) -> Result<(), DbErr> {
    let stored = table.to_stored();
    let now = Utc::now().fixed_offset();

    match find_leave_default(db, tenant_id, &stored.leave_type).await? {
        Some(existing) => {
            let mut active: leave_defaults::ActiveModel = existing.into();
            active.prorated = Set(stored.prorated);
            active.yearly_reset = Set(stored.yearly_reset);
            active.table_json = Set(stored.table_json);
            active.updated_at = Set(now);
            active.update(db).await?;
        }
        None => {
            leave_defaults::ActiveModel {
                id: Set(LeaveDefaultId::new().into_inner()),
                tenant_id: Set(tenant_id),
                leave_type: Set(stored.leave_type),
                prorated: Set(stored.prorated),
                yearly_reset: Set(stored.yearly_reset),
                table_json: Set(stored.table_json),
                updated_at: Set(now),
            }
            .insert(db)
            .await?;
        }
    }
    Ok(())
}

async fn replace_grid<C: ConnectionTrait>(
    db: &C,
    tenant_id: TenantId,
    grid: &EntitlementGrid,
) -> Result<(), DbErr> {
    let employee_id = grid.employee_id().into_inner();
    employee_leave_entitlements::Entity::delete_many()
        .filter(employee_leave_entitlements::Column::EmployeeId.eq(employee_id))
        .exec(db)
        .await?;

    let rows: Vec<employee_leave_entitlements::ActiveModel> = grid
        .to_rows()
        .into_iter()
        .map(|e| employee_leave_entitlements::ActiveModel {
            id: Set(LeaveEntitlementId::new().into_inner()),
            tenant_id: Set(tenant_id.into_inner()),
            employee_id: Set(employee_id),
            year_of_service: Set(i32::from(e.year_of_service.get())),
            leave_type: Set(e.leave_type),
            days: Set(e.days),
        })
        .collect();
    if !rows.is_empty() {
        employee_leave_entitlements::Entity::insert_many(rows)
            .exec(db)
            .await?;
    }
    Ok(())
}
