//! Plain-text and JSON rendering of the dashboard panels.

use std::fmt;

use serde::Serialize;

use robodepot_core::Entity;
use robodepot_events::EventBus;
use robodepot_fleet::Robot;
use robodepot_inventory::InventoryItem;
use robodepot_store::{
    ActivityEntry, ActivityFeed, DashboardSummary, DomainStore, ItemQuery, Page, PageRequest,
    RobotQuery, StoreEnvelope, TaskQuery,
};
use robodepot_tasks::Task;

/// Everything one dashboard frame shows, borrowed from the store.
#[derive(Debug, Serialize)]
pub struct DashboardView<'a> {
    pub summary: DashboardSummary,
    pub robots: Page<&'a Robot>,
    pub tasks: Page<&'a Task>,
    pub low_stock: Vec<&'a InventoryItem>,
    pub inventory: Page<&'a InventoryItem>,
    pub activity: Vec<&'a ActivityEntry>,
}

impl<'a> DashboardView<'a> {
    pub fn build<B>(
        store: &'a DomainStore<B>,
        feed: &'a ActivityFeed,
        robot_query: &RobotQuery,
        page: PageRequest,
    ) -> Self
    where
        B: EventBus<StoreEnvelope>,
    {
        Self {
            summary: store.summary(),
            robots: page.apply(store.find_robots(robot_query)),
            tasks: page.apply(store.find_tasks(&TaskQuery::default())),
            low_stock: store.low_stock_items(),
            inventory: page.apply(store.find_items(&ItemQuery::default())),
            activity: feed.latest(page.per_page()),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_text(&self) -> String {
        self.to_string()
    }

    fn write_text<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        let s = &self.summary;
        writeln!(out, "== Warehouse overview ==")?;
        writeln!(
            out,
            "Robots: {} total | {} idle | {} busy | {} charging | avg battery {:.1}%",
            s.robots.total, s.robots.idle, s.robots.busy, s.robots.charging, s.robots.average_battery
        )?;
        writeln!(
            out,
            "Tasks: {} total | {} pending | {} in progress | {} completed",
            s.tasks.total, s.tasks.pending, s.tasks.in_progress, s.tasks.completed
        )?;
        writeln!(
            out,
            "Inventory: {} items | {} low stock | value {}",
            s.inventory.items, s.inventory.low_stock, s.inventory.total_value
        )?;

        writeln!(out)?;
        writeln!(out, "== Robots {} ==", pager(&self.robots))?;
        for r in &self.robots.items {
            writeln!(
                out,
                "{:<5} {:<12} {:<9} {:>5}  {}",
                r.id(),
                r.name(),
                r.status(),
                r.battery(),
                r.location()
            )?;
        }

        writeln!(out)?;
        writeln!(out, "== Tasks {} ==", pager(&self.tasks))?;
        for t in &self.tasks.items {
            let robot = t.assigned_robot().map(|r| r.as_str()).unwrap_or("-");
            writeln!(
                out,
                "{:<5} {:<12} {:<7} {} -> {} [{}]",
                t.id(),
                t.status(),
                t.priority(),
                t.source(),
                t.destination(),
                robot
            )?;
        }

        writeln!(out)?;
        writeln!(out, "== Inventory {} ==", pager(&self.inventory))?;
        for i in &self.inventory.items {
            writeln!(
                out,
                "{:<5} {:<22} {:<12} {:>6} / {:<6} {:>10}",
                i.id(),
                i.name(),
                i.category(),
                i.quantity(),
                i.reorder_threshold(),
                i.total_value()
            )?;
        }

        writeln!(out)?;
        writeln!(out, "== Low stock ({}) ==", self.low_stock.len())?;
        for i in &self.low_stock {
            writeln!(
                out,
                "{:<5} {} ({} left, reorder at {})",
                i.id(),
                i.name(),
                i.quantity(),
                i.reorder_threshold()
            )?;
        }

        writeln!(out)?;
        writeln!(out, "== By category ==")?;
        for c in &s.inventory.by_category {
            writeln!(out, "{:<12} {:>3} items {:>7} units {:>10}", c.category, c.items, c.quantity, c.value)?;
        }

        if !self.activity.is_empty() {
            writeln!(out)?;
            writeln!(out, "== Recent activity ==")?;
            for e in &self.activity {
                writeln!(out, "#{:<4} {}  {}", e.sequence, e.occurred_at.format("%H:%M:%S"), e.message)?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for DashboardView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_text(f)
    }
}

fn pager<T>(page: &Page<T>) -> String {
    format!(
        "(page {} of {}, {} total)",
        page.page,
        page.total_pages.max(1),
        page.total
    )
}
