//! Aggregate statistics behind the dashboard's stat cards and charts.

use std::collections::BTreeMap;

use serde::Serialize;

use robodepot_fleet::{Robot, RobotStatus};
use robodepot_inventory::{InventoryItem, Money};
use robodepot_tasks::{Priority, Task, TaskStatus};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RobotStats {
    pub total: usize,
    pub idle: usize,
    pub busy: usize,
    pub charging: usize,
    /// Mean battery percentage; 0.0 for an empty fleet.
    pub average_battery: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryBreakdown {
    pub category: String,
    pub items: usize,
    pub quantity: u64,
    pub value: Money,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InventoryStats {
    pub items: usize,
    pub low_stock: usize,
    pub total_value: Money,
    /// Ordered by category name.
    pub by_category: Vec<CategoryBreakdown>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub robots: RobotStats,
    pub tasks: TaskStats,
    pub inventory: InventoryStats,
}

impl DashboardSummary {
    pub fn compute(robots: &[Robot], tasks: &[Task], inventory: &[InventoryItem]) -> Self {
        Self {
            robots: RobotStats::compute(robots),
            tasks: TaskStats::compute(tasks),
            inventory: InventoryStats::compute(inventory),
        }
    }
}

impl RobotStats {
    fn compute(robots: &[Robot]) -> Self {
        let mut stats = RobotStats {
            total: robots.len(),
            ..RobotStats::default()
        };
        let mut battery_sum: u64 = 0;

        for r in robots {
            match r.status() {
                RobotStatus::Idle => stats.idle += 1,
                RobotStatus::Busy => stats.busy += 1,
                RobotStatus::Charging => stats.charging += 1,
            }
            battery_sum += u64::from(r.battery().percent());
        }

        if !robots.is_empty() {
            stats.average_battery = battery_sum as f64 / robots.len() as f64;
        }
        stats
    }
}

impl TaskStats {
    fn compute(tasks: &[Task]) -> Self {
        let mut stats = TaskStats {
            total: tasks.len(),
            ..TaskStats::default()
        };

        for t in tasks {
            match t.status() {
                TaskStatus::Pending => stats.pending += 1,
                TaskStatus::InProgress => stats.in_progress += 1,
                TaskStatus::Completed => stats.completed += 1,
            }
            match t.priority() {
                Priority::High => stats.high += 1,
                Priority::Medium => stats.medium += 1,
                Priority::Low => stats.low += 1,
            }
        }
        stats
    }
}

impl InventoryStats {
    fn compute(inventory: &[InventoryItem]) -> Self {
        let mut categories: BTreeMap<&str, CategoryBreakdown> = BTreeMap::new();

        for item in inventory {
            let entry = categories
                .entry(item.category())
                .or_insert_with(|| CategoryBreakdown {
                    category: item.category().to_string(),
                    items: 0,
                    quantity: 0,
                    value: Money::ZERO,
                });
            entry.items += 1;
            entry.quantity += u64::from(item.quantity());
            entry.value = entry.value.saturating_add(item.total_value());
        }

        InventoryStats {
            items: inventory.len(),
            low_stock: inventory.iter().filter(|i| i.is_low_stock()).count(),
            total_value: inventory.iter().map(InventoryItem::total_value).sum(),
            by_category: categories.into_values().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::Seed;

    #[test]
    fn builtin_seed_summary() {
        let seed = Seed::builtin().unwrap();
        let s = DashboardSummary::compute(&seed.robots, &seed.tasks, &seed.inventory);

        assert_eq!(s.robots.total, 8);
        assert_eq!((s.robots.idle, s.robots.busy, s.robots.charging), (3, 3, 2));
        assert!((s.robots.average_battery - 56.0).abs() < 1e-9);

        assert_eq!(s.tasks.total, 8);
        assert_eq!((s.tasks.pending, s.tasks.in_progress, s.tasks.completed), (3, 3, 2));
        assert_eq!((s.tasks.high, s.tasks.medium, s.tasks.low), (3, 3, 2));

        assert_eq!(s.inventory.items, 10);
        assert_eq!(s.inventory.low_stock, 4);

        let categories: Vec<&str> = s
            .inventory
            .by_category
            .iter()
            .map(|c| c.category.as_str())
            .collect();
        assert_eq!(categories, vec!["Electronics", "Packaging", "Safety", "Spare Parts", "Storage"]);

        let per_category: Money = s.inventory.by_category.iter().map(|c| c.value).sum();
        assert_eq!(per_category, s.inventory.total_value);
    }

    #[test]
    fn empty_collections_summarize_to_zero() {
        let s = DashboardSummary::compute(&[], &[], &[]);
        assert_eq!(s, DashboardSummary::default());
    }
}
