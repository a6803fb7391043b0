use std::sync::Arc;

use robodepot_core::{DomainError, Entity, EntityKind, ItemId, RobotId, TaskId};
use robodepot_events::{EventBus, InMemoryEventBus};
use robodepot_fleet::RobotStatus;
use robodepot_inventory::ItemPatch;
use robodepot_store::{DomainStore, Seed, StoreEnvelope, StoreEvent};
use robodepot_tasks::{NewTask, Priority, TaskStatus};

fn seeded() -> DomainStore {
    DomainStore::new(Seed::builtin().expect("bundled seed parses")).expect("bundled seed is valid")
}

fn robot(id: &str) -> RobotId {
    RobotId::new(id).unwrap()
}

fn item(id: &str) -> ItemId {
    ItemId::new(id).unwrap()
}

#[test]
fn busy_robot_set_idle_shows_up_as_available() {
    let mut store = seeded();
    let r1 = store.robot(&robot("R1")).unwrap();
    assert_eq!(r1.status(), RobotStatus::Busy);
    assert_eq!(r1.battery().percent(), 40);
    assert!(store.available_robots().iter().all(|r| r.id() != &robot("R1")));

    store.update_robot_status(&robot("R1"), RobotStatus::Idle).unwrap();

    assert!(store.available_robots().iter().any(|r| r.id() == &robot("R1")));
}

#[test]
fn restocked_item_drops_off_low_stock() {
    let mut store = seeded();
    let i1 = store.item(&item("I1")).unwrap();
    assert_eq!((i1.quantity(), i1.reorder_threshold()), (5, 10));
    assert!(store.low_stock_items().iter().any(|i| i.id() == &item("I1")));

    store.update_inventory_item(&item("I1"), ItemPatch::quantity(12)).unwrap();

    assert!(store.low_stock_items().iter().all(|i| i.id() != &item("I1")));
}

#[test]
fn observers_see_fresh_state_when_notified() {
    let mut store = seeded();
    let sub = store.subscribe();

    let id = store
        .add_task(NewTask::new(Priority::High, "Dock 1", "Rack A2").assigned_to(robot("R2")))
        .unwrap();
    store.update_task_status(&id, TaskStatus::InProgress).unwrap();

    let envs = sub.drain();
    assert_eq!(envs.len(), 2);
    for env in &envs {
        assert_eq!(env.entity(), EntityKind::Task);
        let task_id: TaskId = env.entity_id().parse().unwrap();
        // By the time the envelope is read, the store already holds the write.
        assert!(store.task(&task_id).is_some());
    }
    match envs[1].payload() {
        StoreEvent::TaskStatusChanged(e) => {
            assert_eq!((e.from, e.to), (TaskStatus::Pending, TaskStatus::InProgress));
            assert_eq!(store.task(&e.task_id).unwrap().status(), e.to);
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[test]
fn not_found_is_recoverable() {
    let mut store = seeded();
    let before = store.snapshot();

    let err = store.update_robot_status(&robot("R99"), RobotStatus::Busy).unwrap_err();
    assert!(err.is_not_found());
    let err = store.update_task_status(&TaskId::from_raw(999), TaskStatus::Completed).unwrap_err();
    assert_eq!(err, DomainError::not_found(EntityKind::Task, "T999"));

    assert_eq!(store.snapshot(), before);

    // The store keeps working after a rejected call.
    store.update_robot_status(&robot("R2"), RobotStatus::Busy).unwrap();
    assert_eq!(store.sequence(), 1);
}

#[test]
fn shared_bus_handle_reaches_external_observers() {
    let bus: Arc<InMemoryEventBus<StoreEnvelope>> = Arc::new(InMemoryEventBus::new());
    let external = bus.subscribe();
    let mut store = DomainStore::from_seed(Seed::builtin().unwrap(), Arc::clone(&bus)).unwrap();

    store.update_robot_status(&robot("R3"), RobotStatus::Idle).unwrap();

    let env = external.try_recv().unwrap();
    assert_eq!(env.entity_id(), "R3");
    assert_eq!(env.sequence_number(), 1);
}

#[test]
fn snapshot_reseeds_an_equivalent_store() {
    let mut store = seeded();
    store.update_inventory_item(&item("I4"), ItemPatch::quantity(30)).unwrap();
    let id = store.add_task(NewTask::new(Priority::Low, "A", "B")).unwrap();

    let mut reloaded = DomainStore::new(store.snapshot()).unwrap();

    assert_eq!(reloaded.low_stock_items().len(), store.low_stock_items().len());
    let next = reloaded.add_task(NewTask::new(Priority::Low, "C", "D")).unwrap();
    assert_eq!(Some(next), id.next());
}
