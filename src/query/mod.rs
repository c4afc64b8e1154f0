// src/query/mod.rs
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::dataset::{Dataset, Record};

pub mod paginate;

pub use paginate::paginate;

pub const DEFAULT_OFFSET: i64 = 0;
pub const DEFAULT_LIMIT: i64 = 10;

/// Offset/limit pair as it arrived on the request, echoed back unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: i64,
    pub limit: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            offset: DEFAULT_OFFSET,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Exact-match predicate over a single record field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    Category(String),
    Supplier(String),
}

impl Filter {
    /// Case-sensitive equality, no trimming.
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Filter::Category(v) => record.item_type == *v,
            Filter::Supplier(v) => record.supplier == *v,
        }
    }

    pub fn describe(&self, total: usize) -> String {
        match self {
            Filter::Category(v) => format!("Found {} items of type {}", total, v),
            Filter::Supplier(v) => format!("Found {} items from supplier {}", total, v),
        }
    }
}

/// Response body shared by every listing endpoint.
#[derive(Debug, Serialize)]
pub struct Page<'a> {
    pub status: &'static str,
    pub timestamp: String,
    pub count: usize,
    pub total: usize,
    pub offset: i64,
    pub limit: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: Vec<&'a Record>,
}

impl<'a> Page<'a> {
    fn new(data: Vec<&'a Record>, total: usize, req: PageRequest, message: Option<String>) -> Self {
        Self {
            status: "success",
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            count: data.len(),
            total,
            offset: req.offset,
            limit: req.limit,
            message,
            data,
        }
    }
}

/// Read-only queries over a shared, already loaded dataset.
#[derive(Debug, Clone)]
pub struct QueryService {
    dataset: Arc<Dataset>,
}

impl QueryService {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self { dataset }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// One page of the unfiltered dataset.
    pub fn list_all(&self, req: PageRequest) -> Page<'_> {
        let all = self.dataset.records();
        let data = paginate(all, req.offset, req.limit).iter().collect();
        Page::new(data, all.len(), req, None)
    }

    /// Filter first, then paginate the matches. `total` counts every match.
    pub fn filter(&self, filter: &Filter, req: PageRequest) -> Page<'_> {
        let matched: Vec<&Record> = self
            .dataset
            .records()
            .iter()
            .filter(|r| filter.matches(r))
            .collect();
        let data = paginate(&matched, req.offset, req.limit).to_vec();
        Page::new(data, matched.len(), req, Some(filter.describe(matched.len())))
    }

    pub fn filter_by_category(&self, category: &str, req: PageRequest) -> Page<'_> {
        self.filter(&Filter::Category(category.to_string()), req)
    }

    pub fn filter_by_supplier(&self, supplier: &str, req: PageRequest) -> Page<'_> {
        self.filter(&Filter::Supplier(supplier.to_string()), req)
    }
}
