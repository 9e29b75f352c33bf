use uuid::Uuid;

use crate::error::TenantError;

/// Tenant binding carried through a request (C9). Every store call downstream of a handler
/// takes one of these rather than threading a bare `Uuid`, so a call that forgot to bind a
/// tenant fails loudly instead of silently scanning cross-tenant (§4.5, §4.8).
#[derive(Debug, Clone, Copy)]
pub enum TenantContext {
    Bound(Uuid),
    /// Used only by background jobs (retention compaction) and audited admin operations.
    AdminBypass,
}

impl TenantContext {
    pub fn bound(tenant_id: Uuid) -> Self {
        Self::Bound(tenant_id)
    }

    /// The tenant to filter on, or `None` when operating in admin bypass across all tenants.
    pub fn tenant_filter(&self) -> Option<Uuid> {
        match self {
            Self::Bound(id) => Some(*id),
            Self::AdminBypass => None,
        }
    }

    /// Fails with [`TenantError::TenantNotBound`] unless a tenant is actually bound; used by
    /// request-scoped paths where admin bypass is not a valid caller.
    pub fn require_bound(&self) -> Result<Uuid, TenantError> {
        match self {
            Self::Bound(id) => Ok(*id),
            Self::AdminBypass => Err(TenantError::TenantNotBound),
        }
    }
}
