//! Persistence contract for the registry.
//!
//! All store operations are async and take a [`CallContext`]; an
//! implementation must stop work and return `Cancelled` or
//! `DeadlineExceeded` when the context says so.

use crate::context::CallContext;
use crate::error::StoreResult;
use crate::models::permission::{Permission, PermissionKey};

/// 1-based page window. Both fields are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Returns `None` if either `page` or `limit` is zero.
    pub fn new(page: u32, limit: u32) -> Option<Self> {
        (page > 0 && limit > 0).then_some(Self { page, limit })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Rows to skip: `(page - 1) * limit`.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

/// A paginated result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub limit: u32,
    pub total_count: u64,
    /// `ceil(total_count / limit)`, never less than 1.
    pub last_page: u64,
}

impl<T> PaginatedResult<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total_count: u64) -> Self {
        let last_page = total_count.div_ceil(u64::from(request.limit)).max(1);
        Self {
            items,
            page: request.page,
            limit: request.limit,
            total_count,
            last_page,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedResult<U> {
        PaginatedResult {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            limit: self.limit,
            total_count: self.total_count,
            last_page: self.last_page,
        }
    }
}

/// Durable storage for registered permissions.
///
/// Listing operations return rows newest first, ties broken by service
/// then action, together with the total number of matching rows.
pub trait PermissionStore: Send + Sync {
    /// Insert every pair that is not stored yet. Existing pairs are left
    /// untouched. Either all new pairs are stored or none are.
    fn insert_many(
        &self,
        ctx: &CallContext,
        pairs: &[PermissionKey],
    ) -> impl Future<Output = StoreResult<()>> + Send;
    fn exists_by_service_and_action(
        &self,
        ctx: &CallContext,
        service: &str,
        action: &str,
    ) -> impl Future<Output = StoreResult<bool>> + Send;
    fn list_by_service(
        &self,
        ctx: &CallContext,
        service: &str,
        page: PageRequest,
    ) -> impl Future<Output = StoreResult<(Vec<Permission>, u64)>> + Send;
    fn list_all(
        &self,
        ctx: &CallContext,
        page: PageRequest,
    ) -> impl Future<Output = StoreResult<(Vec<Permission>, u64)>> + Send;
    fn count_by_service(
        &self,
        ctx: &CallContext,
        service: &str,
    ) -> impl Future<Output = StoreResult<u64>> + Send;
    fn count_all(&self, ctx: &CallContext) -> impl Future<Output = StoreResult<u64>> + Send;
}
