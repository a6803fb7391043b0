//! Scripted warehouse shift used by `ROBODEPOT_DEMO=1`.
//!
//! Drives the store through its public mutations the way operators would from
//! the dashboard, so the activity feed has something to show.

use robodepot_core::{DomainResult, Entity, RobotId, TaskId};
use robodepot_events::EventBus;
use robodepot_fleet::{RobotPatch, RobotStatus};
use robodepot_inventory::ItemPatch;
use robodepot_store::{DomainStore, StoreEnvelope, TaskQuery};
use robodepot_tasks::{NewTask, Priority, TaskStatus};

/// Battery percentage below which an idle robot is sent to charge.
const LOW_BATTERY: u8 = 20;

/// Run one shift; returns how many writes were made.
pub fn run_shift<B>(store: &mut DomainStore<B>) -> DomainResult<usize>
where
    B: EventBus<StoreEnvelope>,
{
    let mut writes = 0;

    writes += finish_one_in_progress(store)?;
    writes += send_low_batteries_to_charge(store)?;
    writes += dispatch_pending(store)?;
    writes += restock(store)?;

    let id = store.add_task(NewTask::new(Priority::Low, "Returns", "Rack C2"))?;
    tracing::info!(task_id = %id, "demo: queued returns sweep");
    writes += 1;

    Ok(writes)
}

/// Complete the first in-progress task and free its robot if it still exists.
fn finish_one_in_progress<B>(store: &mut DomainStore<B>) -> DomainResult<usize>
where
    B: EventBus<StoreEnvelope>,
{
    let query = TaskQuery {
        status: Some(TaskStatus::InProgress),
        ..TaskQuery::default()
    };
    let Some(task_id) = store.find_tasks(&query).first().map(|t| *t.id()) else {
        return Ok(0);
    };

    let robot_id = store.assignee(&task_id)?.map(|r| r.id().clone());
    store.update_task_status(&task_id, TaskStatus::Completed)?;

    match robot_id {
        Some(robot) => {
            store.update_robot_status(&robot, RobotStatus::Idle)?;
            Ok(2)
        }
        None => Ok(1),
    }
}

fn send_low_batteries_to_charge<B>(store: &mut DomainStore<B>) -> DomainResult<usize>
where
    B: EventBus<StoreEnvelope>,
{
    let low: Vec<RobotId> = store
        .available_robots()
        .into_iter()
        .filter(|r| r.battery().percent() < LOW_BATTERY)
        .map(|r| r.id().clone())
        .collect();

    for id in &low {
        store.update_robot_status(id, RobotStatus::Charging)?;
    }
    Ok(low.len())
}

/// Hand pending tasks, most urgent first, to the idle robots with the most charge.
fn dispatch_pending<B>(store: &mut DomainStore<B>) -> DomainResult<usize>
where
    B: EventBus<StoreEnvelope>,
{
    let mut pending: Vec<(Priority, TaskId)> = store
        .find_tasks(&TaskQuery {
            status: Some(TaskStatus::Pending),
            ..TaskQuery::default()
        })
        .into_iter()
        .map(|t| (t.priority(), *t.id()))
        .collect();
    pending.sort();

    let mut robots: Vec<(u8, RobotId)> = store
        .available_robots()
        .into_iter()
        .map(|r| (r.battery().percent(), r.id().clone()))
        .collect();
    robots.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));

    let mut writes = 0;
    for ((_, task_id), (_, robot_id)) in pending.into_iter().zip(robots) {
        store.assign_task(&task_id, Some(robot_id.clone()))?;
        store.update_robot(
            &robot_id,
            RobotPatch {
                status: Some(RobotStatus::Busy),
                ..RobotPatch::default()
            },
        )?;
        store.update_task_status(&task_id, TaskStatus::InProgress)?;
        writes += 3;
    }
    Ok(writes)
}

/// Top every low-stock item up to twice its reorder threshold.
fn restock<B>(store: &mut DomainStore<B>) -> DomainResult<usize>
where
    B: EventBus<StoreEnvelope>,
{
    let orders: Vec<_> = store
        .low_stock_items()
        .into_iter()
        .map(|i| (i.id().clone(), i64::from(i.reorder_threshold()) * 2))
        .collect();

    for (id, quantity) in &orders {
        store.update_inventory_item(id, ItemPatch::quantity(*quantity))?;
    }
    Ok(orders.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use robodepot_store::Seed;

    #[test]
    fn shift_clears_low_stock_and_pending_work() {
        let mut store = DomainStore::new(Seed::builtin().unwrap()).unwrap();
        let sub = store.subscribe();

        let writes = run_shift(&mut store).unwrap();

        assert!(store.low_stock_items().is_empty());
        assert_eq!(sub.drain().len(), writes);

        let t1 = store.task(&TaskId::from_raw(1)).unwrap();
        assert_eq!(t1.status(), TaskStatus::Completed);
        assert_eq!(
            store.robot(&RobotId::new("R1").unwrap()).unwrap().status(),
            RobotStatus::Idle
        );

        // Highest priority goes to the idle robot with the most charge.
        let t5 = store.task(&TaskId::from_raw(5)).unwrap();
        assert_eq!(t5.status(), TaskStatus::InProgress);
        assert_eq!(t5.assigned_robot().map(|r| r.as_str()), Some("R5"));

        // The newly queued task is the only pending one left.
        let pending = store.find_tasks(&TaskQuery {
            status: Some(TaskStatus::Pending),
            ..TaskQuery::default()
        });
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id(), &TaskId::from_raw(9));
    }
}
