//! Uniform paging over a remote endpoint or an in-memory collection.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::api::client::ListingsClient;
use crate::api::models::{Listing, PaginatedResponse};
use crate::api::query::{TableName, to_query_params};
use crate::core::filter::FilterSpec;
use crate::core::identity;
use crate::core::plan::QueryPlan;
use crate::core::sort::SortSpec;
use crate::error::{AppError, StorageError, ValidationError};

/// One page worth of query. `page` is 1-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: usize,
    pub page_size: usize,
    pub filter: FilterSpec,
    pub sort: SortSpec,
}

impl PageRequest {
    /// Pages below 1 are clamped to 1. A zero page size is rejected.
    pub fn new(
        page: usize,
        page_size: usize,
        filter: FilterSpec,
        sort: SortSpec,
    ) -> Result<Self, ValidationError> {
        if page_size == 0 {
            return Err(ValidationError::ZeroPageSize);
        }
        Ok(Self {
            page: page.max(1),
            page_size,
            filter,
            sort,
        })
    }

    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PageResult {
    pub rows: Vec<Listing>,
    /// Matching rows across all pages.
    pub total_count: usize,
}

impl PageResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn total_pages(&self, page_size: usize) -> usize {
        total_pages(self.total_count, page_size)
    }
}

/// `max(1, ceil(total / page_size))`.
pub fn total_pages(total_count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    total_count.div_ceil(page_size).max(1)
}

#[async_trait]
pub trait ListingSource: Send + Sync {
    async fn fetch_page(&self, request: &PageRequest) -> Result<PageResult, AppError>;

    /// Short label used in logs.
    fn describe(&self) -> String;
}

/// Pages served by the paginated HTTP endpoint.
pub struct RemoteSource {
    client: ListingsClient,
    table: String,
}

impl RemoteSource {
    /// The table name is checked on every fetch, not here, so a bad name
    /// surfaces as an empty page instead of failing construction.
    pub fn new(client: ListingsClient, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

#[async_trait]
impl ListingSource for RemoteSource {
    async fn fetch_page(&self, request: &PageRequest) -> Result<PageResult, AppError> {
        let table: TableName = self.table.parse()?;
        let params = to_query_params(table, request);
        let body = self.client.fetch_paginated(&params).await?;

        let rows = identity::ingest(body.data);
        let total_count = match body.count {
            Some(count) => usize::try_from(count).unwrap_or(usize::MAX),
            None => request.offset() + rows.len(),
        };
        debug!(
            "{}: page {} returned {} of {} rows",
            self.describe(),
            request.page,
            rows.len(),
            total_count
        );

        Ok(PageResult { rows, total_count })
    }

    fn describe(&self) -> String {
        format!("remote:{}", self.table)
    }
}

/// Pages computed from a collection already held in memory.
#[derive(Debug, Clone)]
pub struct LocalSource {
    rows: Arc<Vec<Listing>>,
}

impl LocalSource {
    pub fn new(rows: Vec<Listing>) -> Self {
        Self {
            rows: Arc::new(identity::ingest(rows)),
        }
    }

    /// Load a JSON array of listings, or a `{"data": [...]}` envelope.
    pub fn from_json_file(path: &Path) -> Result<Self, AppError> {
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| StorageError::FileIo {
            path: display.clone(),
            source,
        })?;
        Ok(Self::new(parse_collection(&raw, &display)?))
    }

    pub fn rows(&self) -> &[Listing] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn parse_collection(raw: &str, path: &str) -> Result<Vec<Listing>, StorageError> {
    let parse_error = |e: serde_json::Error| StorageError::CollectionParseError {
        path: path.to_string(),
        message: e.to_string(),
    };

    if raw.trim_start().starts_with('[') {
        serde_json::from_str::<Vec<Listing>>(raw).map_err(parse_error)
    } else {
        serde_json::from_str::<PaginatedResponse>(raw)
            .map(|envelope| envelope.data)
            .map_err(parse_error)
    }
}

#[async_trait]
impl ListingSource for LocalSource {
    async fn fetch_page(&self, request: &PageRequest) -> Result<PageResult, AppError> {
        let plan = QueryPlan::new(&request.filter, &request.sort);
        Ok(plan.execute(&self.rows, request.page, request.page_size))
    }

    fn describe(&self) -> String {
        format!("local:{} rows", self.rows.len())
    }
}
