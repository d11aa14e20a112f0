//! Tenant context for row-level security.
//!
//! Every repository operation runs inside a transaction that first sets
//! `app.current_tenant_id` with `SET LOCAL`, so the tenant policies created by
//! the migration only ever expose that tenant's rows.

use sea_orm::{ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr, TransactionTrait};
use leavebook_shared::types::TenantId;

fn tenant_context_sql(tenant_id: TenantId) -> String {
    format!("SET LOCAL app.current_tenant_id = '{tenant_id}'")
}

/// A transaction scoped to one tenant.
pub struct TenantConnection {
    tenant_id: TenantId,
    txn: DatabaseTransaction,
}

impl TenantConnection {
    /// Begins a transaction and sets the tenant context for it.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started or the context
    /// cannot be set.
    pub async fn begin(db: &DatabaseConnection, tenant_id: TenantId) -> Result<Self, DbErr> {
        let txn = db.begin().await?;
        txn.execute_unprepared(&tenant_context_sql(tenant_id))
            .await?;
        Ok(Self { tenant_id, txn })
    }

    /// The tenant this transaction is scoped to.
    #[must_use]
    pub const fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    /// Returns the underlying transaction for executing queries.
    #[must_use]
    pub fn transaction(&self) -> &DatabaseTransaction {
        &self.txn
    }

    /// Commits the transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails.
    pub async fn commit(self) -> Result<(), DbErr> {
        self.txn.commit().await
    }

    /// Rolls back the transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the rollback fails.
    pub async fn rollback(self) -> Result<(), DbErr> {
        self.txn.rollback().await
    }
}

/// Extension trait for opening tenant-scoped transactions.
#[async_trait::async_trait]
pub trait TenantExt {
    /// Begins a transaction scoped to `tenant_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started.
    async fn with_tenant(&self, tenant_id: TenantId) -> Result<TenantConnection, DbErr>;
}

#[async_trait::async_trait]
impl TenantExt for DatabaseConnection {
    async fn with_tenant(&self, tenant_id: TenantId) -> Result<TenantConnection, DbErr> {
        TenantConnection::begin(self, tenant_id).await
    }
}
