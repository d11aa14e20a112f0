//! Demo data seeder for Leavebook development and testing.
//!
//! Seeds a demo tenant with employees, a holiday calendar, the default leave
//! type and materialized entitlement grids. Safe to run repeatedly.
//!
//! Usage: cargo run --bin seeder

use std::str::FromStr;

use anyhow::Context;
use chrono::{NaiveDate, Utc, Weekday};
use leavebook_core::calendar::{DayType, HolidayKind, WeeklySchedule};
use leavebook_core::entitlement::{CarryRule, EntitlementTable};
use leavebook_db::entities::{employees, tenants};
use leavebook_db::tenant::TenantConnection;
use leavebook_db::{LeaveRepoError, LeaveRepository, connect_with};
use leavebook_shared::AppConfig;
use leavebook_shared::types::{EmployeeId, TenantId};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

/// Demo tenant ID (consistent for all seeds)
const DEMO_TENANT_ID: &str = "00000000-0000-0000-0000-000000000001";

/// Demo employees: (id, code, name, join date, holiday group)
const DEMO_EMPLOYEES: [(&str, &str, &str, &str, &str); 3] = [
    ("00000000-0000-0000-0000-000000000101", "E001", "Alice Tan", "2020-01-01", "HQ"),
    ("00000000-0000-0000-0000-000000000102", "E002", "Bob Lim", "2023-07-15", "HQ"),
    ("00000000-0000-0000-0000-000000000103", "E003", "Chitra Devi", "2016-03-01", "BRANCH"),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    let seed_days = Decimal::from_str(config.leave.seed_days_per_year.trim())
        .context("leave.seed_days_per_year must be a decimal")?;

    println!("Connecting to database...");
    let db = connect_with(&config.database).await?;
    let tenant_id = TenantId::from_uuid(Uuid::parse_str(DEMO_TENANT_ID)?);

    println!("Seeding demo tenant...");
    seed_tenant(&db, tenant_id).await?;

    let repo = LeaveRepository::new(db);

    println!("Seeding leave types...");
    repo.ensure_leave_default(tenant_id, &config.leave.default_leave_type, seed_days)
        .await?;
    let sick = EntitlementTable {
        carry: CarryRule::reset(),
        ..EntitlementTable::seeded("Sick Leave", Decimal::from(14))
    };
    repo.upsert_leave_default(tenant_id, &sick).await?;
    let carry_over = EntitlementTable {
        carry: CarryRule::bring_capped(Decimal::from(5)),
        ..EntitlementTable::seeded("Carry-Over Leave", Decimal::from(7))
    };
    repo.upsert_leave_default(tenant_id, &carry_over).await?;

    println!("Seeding holidays...");
    seed_holidays(&repo, tenant_id).await?;

    println!("Seeding work schedules...");
    // Alice works a half day on Saturdays.
    let alice = EmployeeId::from_uuid(Uuid::parse_str(DEMO_EMPLOYEES[0].0)?);
    let schedule = WeeklySchedule::new().with(Weekday::Sat, true, DayType::Half);
    repo.save_work_schedule(tenant_id, alice, &schedule).await?;

    println!("Loading default entitlements...");
    let updated = repo.load_defaults_for_tenant(tenant_id).await?;
    println!("  Updated {updated} employees");

    println!("Seeding complete!");
    Ok(())
}

/// Seeds the demo tenant and its employees.
async fn seed_tenant(db: &DatabaseConnection, tenant_id: TenantId) -> anyhow::Result<()> {
    let conn = TenantConnection::begin(db, tenant_id).await?;
    let txn = conn.transaction();
    let now = Utc::now().fixed_offset();

    if tenants::Entity::find_by_id(tenant_id.into_inner())
        .one(txn)
        .await?
        .is_some()
    {
        println!("  Demo tenant already exists, skipping...");
        conn.rollback().await?;
        return Ok(());
    }

    tenants::ActiveModel {
        id: Set(tenant_id.into_inner()),
        name: Set("Demo Tenant".to_string()),
        created_at: Set(now),
    }
    .insert(txn)
    .await?;

    for (id, code, name, joined, group) in DEMO_EMPLOYEES {
        employees::ActiveModel {
            id: Set(Uuid::parse_str(id)?),
            tenant_id: Set(tenant_id.into_inner()),
            code: Set(code.to_string()),
            full_name: Set(name.to_string()),
            join_date: Set(Some(NaiveDate::from_str(joined)?)),
            exit_date: Set(None),
            holiday_group: Set(group.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(txn)
        .await?;
        println!("  Created employee {code}: {name}");
    }

    conn.commit().await?;
    Ok(())
}

/// Seeds a small holiday calendar for both groups.
///
/// Holidays that already exist are skipped; any other failure aborts the seed.
async fn seed_holidays(repo: &LeaveRepository, tenant_id: TenantId) -> anyhow::Result<()> {
    let holidays = [
        ("HQ", "New Year's Day", (2024, 1, 1), HolidayKind::Full),
        ("HQ", "Labour Day", (2024, 5, 1), HolidayKind::Full),
        ("HQ", "Christmas Eve", (2024, 12, 24), HolidayKind::Half),
        ("HQ", "Christmas Day", (2024, 12, 25), HolidayKind::Full),
        ("BRANCH", "New Year's Day", (2024, 1, 1), HolidayKind::Full),
        ("BRANCH", "Founders Day", (2024, 8, 12), HolidayKind::Full),
    ];

    for (group, name, (y, m, d), kind) in holidays {
        let date = NaiveDate::from_ymd_opt(y, m, d).context("invalid holiday date")?;
        match repo.add_holiday(tenant_id, group, name, date, kind).await {
            Ok(_) => println!("  Created holiday {group} {date}: {name}"),
            Err(LeaveRepoError::DuplicateHoliday { .. }) => {
                println!("  Holiday {group} {date} already exists, skipping...");
            }
            Err(e) => return Err(e).with_context(|| format!("Failed to seed holiday {group} {date}")),
        }
    }
    Ok(())
}
