use super::*;
use crate::{Blackboard, LehmerRandom, ManualTimeKeeper, Semaphore, StaticEntry};
use std::cell::Cell;
use std::rc::Rc;

fn manual_factory() -> (TaskFactory, Rc<ManualTimeKeeper>) {
    let clock = Rc::new(ManualTimeKeeper::new());
    (TaskFactory::new(clock.clone()), clock)
}

#[test]
fn sequence_of_calls() {
    let factory = TaskFactory::default();
    let log = Rc::new(Cell::new(0u32));
    let (a, b) = (log.clone(), log.clone());
    let mut seq = factory.sequence(vec![
        factory.call(move |_| {
            a.set(a.get() + 1);
            Status::Success
        }),
        factory.call(move |_| {
            b.set(b.get() + 10);
            Status::Success
        }),
    ]);
    assert_eq!(seq.update(0.1), Status::Success);
    assert_eq!(log.get(), 11);
}

#[test]
fn enter_if_checks_the_guard_only_before_entry() {
    let factory = TaskFactory::default();
    let gate = Rc::new(Cell::new(true));
    let gate_reader = gate.clone();
    let ticks = Rc::new(Cell::new(0u32));
    let ticks_inner = ticks.clone();

    let mut task = factory.enter_if(
        factory.pred(move || gate_reader.get()),
        factory.call(move |_| {
            ticks_inner.set(ticks_inner.get() + 1);
            if ticks_inner.get() < 3 {
                Status::Running
            } else {
                Status::Success
            }
        }),
    );

    assert_eq!(task.update(0.1), Status::Running);
    // The guard drops, but the sequence already moved past it.
    gate.set(false);
    assert_eq!(task.update(0.1), Status::Running);
    assert_eq!(task.update(0.1), Status::Success);
    assert_eq!(ticks.get(), 3);

    // A fresh pass checks the guard again.
    assert_eq!(task.update(0.1), Status::Fail);
}

#[test]
fn run_while_reevaluates_every_tick() {
    let factory = TaskFactory::default();
    let gate = Rc::new(Cell::new(true));
    let gate_reader = gate.clone();
    let mut task = factory.run_while(
        factory.pred(move || gate_reader.get()),
        factory.call(|_| Status::Running),
    );
    assert_eq!(task.update(0.1), Status::Running);
    gate.set(false);
    assert_eq!(task.update(0.1), Status::Fail);
}

#[test]
fn exit_if_inverts_the_guard() {
    let factory = TaskFactory::default();
    let abort = Rc::new(Cell::new(false));
    let abort_reader = abort.clone();
    let mut task = factory.exit_if(
        factory.pred(move || abort_reader.get()),
        factory.call(|_| Status::Running),
    );
    assert_eq!(task.update(0.1), Status::Running);
    abort.set(true);
    assert_eq!(task.update(0.1), Status::Fail);
}

#[test]
fn with_repeat_delay_uses_the_factory_clock() {
    let (factory, clock) = manual_factory();
    let mut task = factory.with_repeat_delay(
        StaticEntry::new(100.0f64),
        factory.call(|_| Status::Success),
    );
    assert_eq!(task.update(0.1), Status::Success);
    clock.advance(50.0);
    assert_eq!(task.update(0.1), Status::Fail);
    clock.advance(51.0);
    assert_eq!(task.update(0.1), Status::Success);
}

#[test]
fn wait_runs_until_the_time_elapses() {
    let factory = TaskFactory::default();
    let mut task = factory.wait(StaticEntry::new(1.0f64));
    assert_eq!(task.update(0.6), Status::Running);
    assert_eq!(task.update(0.6), Status::Success);
}

#[test]
fn select_randomly_pairs_tasks_with_weights() {
    let factory = TaskFactory::default();
    let mut task = factory.select_randomly(
        Box::new(LehmerRandom::new()),
        vec![
            (factory.call(|_| Status::Fail), 1),
            (factory.call(|_| Status::Success), 1),
        ],
    );
    // Whichever child is drawn first, the succeeding one decides the tick.
    assert_eq!(task.update(0.1), Status::Success);
}

#[test]
fn with_semaphore_gates_two_trees() {
    let factory = TaskFactory::default();
    let sem = Semaphore::shared("door", 1);
    let mut first = factory.with_semaphore(sem.clone(), factory.call(|_| Status::Running));
    let mut second = factory.with_semaphore(sem.clone(), factory.call(|_| Status::Success));
    assert_eq!(first.update(0.1), Status::Running);
    assert_eq!(second.update(0.1), Status::Fail);
    first.deactivate();
    assert_eq!(second.update(0.1), Status::Success);
}

#[test]
fn predicate_combinators() {
    let factory = TaskFactory::default();
    let mut bb = Blackboard::new();
    bb.entry("a").store(1u32);

    let both = factory.and(vec![
        factory.entry_exists(bb.entry("a")),
        factory.entry_not_exists(bb.entry("b")),
    ]);
    assert!(both.evaluate());

    let either = factory.or(vec![
        factory.entry_exists(bb.entry("b")),
        factory.not(factory.entry_equals(bb.entry("a"), 2u32)),
    ]);
    assert!(either.evaluate());
}

#[test]
fn store_and_remove_entries() {
    let factory = TaskFactory::default();
    let mut bb = Blackboard::new();
    let mut store = factory.store_entry(bb.entry("key"), "value");
    let mut remove = factory.remove_entry(bb.entry("key"));
    assert_eq!(store.update(0.1), Status::Success);
    assert!(bb.contains("key"));
    assert_eq!(remove.update(0.1), Status::Success);
    assert!(!bb.contains("key"));
}

#[test]
fn no_op_succeeds() {
    let factory = TaskFactory::default();
    assert_eq!(factory.no_op().update(0.1), Status::Success);
}

#[test]
fn repeat_runs_the_child_n_times() {
    let factory = TaskFactory::default();
    let count = Rc::new(Cell::new(0u32));
    let inner = count.clone();
    let mut task = factory.repeat(
        2,
        factory.call(move |_| {
            inner.set(inner.get() + 1);
            Status::Success
        }),
    );
    assert_eq!(task.update(0.1), Status::Running);
    assert_eq!(task.update(0.1), Status::Running);
    assert_eq!(task.update(0.1), Status::Success);
    assert_eq!(count.get(), 3);
}
