//! List filters and pagination for dashboard tables.
//!
//! Filters are conjunctive: every set field must match. `search` is a
//! case-insensitive substring match over the record's text columns.

use serde::{Deserialize, Serialize};

use robodepot_core::{DomainError, DomainResult, Entity, RobotId};
use robodepot_fleet::{Robot, RobotStatus};
use robodepot_inventory::InventoryItem;
use robodepot_tasks::{Priority, Task, TaskStatus};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RobotQuery {
    pub status: Option<RobotStatus>,
    pub search: Option<String>,
}

impl RobotQuery {
    pub fn matches(&self, robot: &Robot) -> bool {
        self.status.is_none_or(|s| robot.status() == s)
            && search_hits(
                self.search.as_deref(),
                &[robot.id().as_str(), robot.name(), robot.location()],
            )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskQuery {
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub assigned_robot: Option<RobotId>,
    pub search: Option<String>,
}

impl TaskQuery {
    pub fn matches(&self, task: &Task) -> bool {
        let id = task.id().to_string();
        self.status.is_none_or(|s| task.status() == s)
            && self.priority.is_none_or(|p| task.priority() == p)
            && self
                .assigned_robot
                .as_ref()
                .is_none_or(|r| task.assigned_robot() == Some(r))
            && search_hits(
                self.search.as_deref(),
                &[id.as_str(), task.source(), task.destination()],
            )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemQuery {
    /// Exact category match, ignoring case.
    pub category: Option<String>,
    pub low_stock_only: bool,
    pub search: Option<String>,
}

impl ItemQuery {
    pub fn matches(&self, item: &InventoryItem) -> bool {
        self.category
            .as_deref()
            .is_none_or(|c| item.category().eq_ignore_ascii_case(c.trim()))
            && (!self.low_stock_only || item.is_low_stock())
            && search_hits(
                self.search.as_deref(),
                &[item.id().as_str(), item.name(), item.category()],
            )
    }
}

fn search_hits(search: Option<&str>, columns: &[&str]) -> bool {
    let needle = match search.map(str::trim) {
        None | Some("") => return true,
        Some(s) => s.to_lowercase(),
    };
    columns.iter().any(|c| c.to_lowercase().contains(&needle))
}

/// 1-based page request.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPageRequest")]
pub struct PageRequest {
    page: usize,
    per_page: usize,
}

#[derive(Deserialize)]
struct RawPageRequest {
    page: usize,
    per_page: usize,
}

impl TryFrom<RawPageRequest> for PageRequest {
    type Error = DomainError;

    fn try_from(raw: RawPageRequest) -> Result<Self, Self::Error> {
        Self::new(raw.page, raw.per_page)
    }
}

impl PageRequest {
    pub const DEFAULT_PER_PAGE: usize = 10;

    pub fn new(page: usize, per_page: usize) -> DomainResult<Self> {
        if page == 0 {
            return Err(DomainError::validation("page numbers start at 1"));
        }
        if per_page == 0 {
            return Err(DomainError::validation("per_page must be at least 1"));
        }
        Ok(Self { page, per_page })
    }

    pub fn first(per_page: usize) -> DomainResult<Self> {
        Self::new(1, per_page)
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    /// Cut one page out of an already-filtered list.
    pub fn apply<T>(&self, items: Vec<T>) -> Page<T> {
        let total = items.len();
        let total_pages = total.div_ceil(self.per_page);
        let start = (self.page - 1).saturating_mul(self.per_page);

        let items = items.into_iter().skip(start).take(self.per_page).collect();

        Page {
            items,
            page: self.page,
            per_page: self.per_page,
            total,
            total_pages,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: Self::DEFAULT_PER_PAGE,
        }
    }
}

/// One page of results plus the numbers a pager needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}
