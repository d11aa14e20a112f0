//! Initial leave schema.
//!
//! Creates the tenant, employee, calendar and leave tables together with the
//! row-level security policies that scope every row to
//! `app.current_tenant_id`.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: TENANTS & EMPLOYEES
        // ============================================================
        db.execute_unprepared(TENANTS_SQL).await?;
        db.execute_unprepared(EMPLOYEES_SQL).await?;

        // ============================================================
        // PART 2: CALENDAR
        // ============================================================
        db.execute_unprepared(WORK_SCHEDULE_SQL).await?;
        db.execute_unprepared(HOLIDAYS_SQL).await?;

        // ============================================================
        // PART 3: ENTITLEMENTS
        // ============================================================
        db.execute_unprepared(LEAVE_DEFAULTS_SQL).await?;
        db.execute_unprepared(ENTITLEMENTS_SQL).await?;

        // ============================================================
        // PART 4: LEAVE RECORDS
        // ============================================================
        db.execute_unprepared(APPLICATIONS_SQL).await?;
        db.execute_unprepared(ADJUSTMENTS_SQL).await?;

        // ============================================================
        // PART 5: ROW-LEVEL SECURITY
        // ============================================================
        db.execute_unprepared(RLS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_SQL).await?;
        Ok(())
    }
}

const TENANTS_SQL: &str = r"
CREATE TABLE tenants (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const EMPLOYEES_SQL: &str = r"
CREATE TABLE employees (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    tenant_id UUID NOT NULL REFERENCES tenants(id) ON DELETE CASCADE,
    code VARCHAR(50) NOT NULL,
    full_name VARCHAR(255) NOT NULL,
    join_date DATE,
    exit_date DATE,
    holiday_group VARCHAR(50) NOT NULL DEFAULT '',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_employee_code UNIQUE (tenant_id, code)
);

CREATE INDEX idx_employees_tenant ON employees(tenant_id, full_name);
";

const WORK_SCHEDULE_SQL: &str = r"
CREATE TABLE employee_work_schedule (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    tenant_id UUID NOT NULL REFERENCES tenants(id) ON DELETE CASCADE,
    employee_id UUID NOT NULL REFERENCES employees(id) ON DELETE CASCADE,
    weekday INTEGER NOT NULL,
    working BOOLEAN NOT NULL DEFAULT true,
    day_type VARCHAR(10) NOT NULL DEFAULT 'Full',
    CONSTRAINT uq_emp_weekday UNIQUE (employee_id, weekday),
    CONSTRAINT chk_weekday CHECK (weekday BETWEEN 0 AND 6)
);
";

const HOLIDAYS_SQL: &str = r"
CREATE TABLE holidays (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    tenant_id UUID NOT NULL REFERENCES tenants(id) ON DELETE CASCADE,
    group_code VARCHAR(50) NOT NULL DEFAULT '',
    name VARCHAR(255) NOT NULL,
    date DATE NOT NULL,
    is_half_day BOOLEAN NOT NULL DEFAULT false,
    CONSTRAINT uq_holiday UNIQUE (tenant_id, group_code, date)
);

CREATE INDEX idx_holidays_group_date ON holidays(tenant_id, group_code, date);
";

const LEAVE_DEFAULTS_SQL: &str = r"
CREATE TABLE leave_defaults (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    tenant_id UUID NOT NULL REFERENCES tenants(id) ON DELETE CASCADE,
    leave_type VARCHAR(100) NOT NULL,
    prorated BOOLEAN NOT NULL DEFAULT false,
    yearly_reset BOOLEAN NOT NULL DEFAULT true,
    table_json TEXT NOT NULL DEFAULT '{}',
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_leave_default UNIQUE (tenant_id, leave_type)
);
";

const ENTITLEMENTS_SQL: &str = r"
CREATE TABLE employee_leave_entitlements (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    tenant_id UUID NOT NULL REFERENCES tenants(id) ON DELETE CASCADE,
    employee_id UUID NOT NULL REFERENCES employees(id) ON DELETE CASCADE,
    year_of_service INTEGER NOT NULL,
    leave_type VARCHAR(100) NOT NULL,
    days NUMERIC NOT NULL DEFAULT 0,
    CONSTRAINT uq_emp_yos_type UNIQUE (employee_id, year_of_service, leave_type),
    CONSTRAINT chk_year_of_service CHECK (year_of_service BETWEEN 1 AND 50)
);
";

const APPLICATIONS_SQL: &str = r"
CREATE TABLE leave_applications (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    tenant_id UUID NOT NULL REFERENCES tenants(id) ON DELETE CASCADE,
    employee_id UUID NOT NULL REFERENCES employees(id) ON DELETE CASCADE,
    leave_type VARCHAR(100) NOT NULL,
    start_date DATE NOT NULL,
    start_half VARCHAR(2) NOT NULL DEFAULT 'AM',
    end_date DATE NOT NULL,
    end_half VARCHAR(2) NOT NULL DEFAULT 'PM',
    days_used NUMERIC NOT NULL,
    status VARCHAR(20) NOT NULL DEFAULT 'Approved',
    remarks TEXT NOT NULL DEFAULT '',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_leave_range CHECK (end_date >= start_date),
    CONSTRAINT chk_start_half CHECK (start_half IN ('AM', 'PM')),
    CONSTRAINT chk_end_half CHECK (end_half IN ('AM', 'PM')),
    CONSTRAINT chk_status CHECK (status IN ('Approved', 'Pending', 'Rejected', 'Cancelled'))
);

CREATE INDEX idx_leave_applications_employee ON leave_applications(employee_id, leave_type, start_date DESC);
";

const ADJUSTMENTS_SQL: &str = r"
CREATE TABLE leave_adjustments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    tenant_id UUID NOT NULL REFERENCES tenants(id) ON DELETE CASCADE,
    employee_id UUID NOT NULL REFERENCES employees(id) ON DELETE CASCADE,
    leave_type VARCHAR(100) NOT NULL,
    date DATE NOT NULL,
    delta_days NUMERIC NOT NULL,
    remarks TEXT NOT NULL DEFAULT '',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_leave_adjustments_employee ON leave_adjustments(employee_id, leave_type, date DESC);
";

const RLS_SQL: &str = r"
-- ============================================================
-- ROW-LEVEL SECURITY POLICIES
-- Application sets context per transaction: SET LOCAL app.current_tenant_id = 'uuid';
-- ============================================================

ALTER TABLE tenants ENABLE ROW LEVEL SECURITY;
ALTER TABLE employees ENABLE ROW LEVEL SECURITY;
ALTER TABLE employee_work_schedule ENABLE ROW LEVEL SECURITY;
ALTER TABLE holidays ENABLE ROW LEVEL SECURITY;
ALTER TABLE leave_defaults ENABLE ROW LEVEL SECURITY;
ALTER TABLE employee_leave_entitlements ENABLE ROW LEVEL SECURITY;
ALTER TABLE leave_applications ENABLE ROW LEVEL SECURITY;
ALTER TABLE leave_adjustments ENABLE ROW LEVEL SECURITY;

ALTER TABLE tenants FORCE ROW LEVEL SECURITY;
ALTER TABLE employees FORCE ROW LEVEL SECURITY;
ALTER TABLE employee_work_schedule FORCE ROW LEVEL SECURITY;
ALTER TABLE holidays FORCE ROW LEVEL SECURITY;
ALTER TABLE leave_defaults FORCE ROW LEVEL SECURITY;
ALTER TABLE employee_leave_entitlements FORCE ROW LEVEL SECURITY;
ALTER TABLE leave_applications FORCE ROW LEVEL SECURITY;
ALTER TABLE leave_adjustments FORCE ROW LEVEL SECURITY;

CREATE POLICY tenant_isolation ON tenants
    USING (id = current_setting('app.current_tenant_id', true)::UUID);

CREATE POLICY tenant_isolation ON employees
    USING (tenant_id = current_setting('app.current_tenant_id', true)::UUID);

CREATE POLICY tenant_isolation ON employee_work_schedule
    USING (tenant_id = current_setting('app.current_tenant_id', true)::UUID);

CREATE POLICY tenant_isolation ON holidays
    USING (tenant_id = current_setting('app.current_tenant_id', true)::UUID);

CREATE POLICY tenant_isolation ON leave_defaults
    USING (tenant_id = current_setting('app.current_tenant_id', true)::UUID);

CREATE POLICY tenant_isolation ON employee_leave_entitlements
    USING (tenant_id = current_setting('app.current_tenant_id', true)::UUID);

CREATE POLICY tenant_isolation ON leave_applications
    USING (tenant_id = current_setting('app.current_tenant_id', true)::UUID);

CREATE POLICY tenant_isolation ON leave_adjustments
    USING (tenant_id = current_setting('app.current_tenant_id', true)::UUID);
";

const DROP_SQL: &str = r"
DROP TABLE IF EXISTS leave_adjustments CASCADE;
DROP TABLE IF EXISTS leave_applications CASCADE;
DROP TABLE IF EXISTS employee_leave_entitlements CASCADE;
DROP TABLE IF EXISTS leave_defaults CASCADE;
DROP TABLE IF EXISTS holidays CASCADE;
DROP TABLE IF EXISTS employee_work_schedule CASCADE;
DROP TABLE IF EXISTS employees CASCADE;
DROP TABLE IF EXISTS tenants CASCADE;
";
