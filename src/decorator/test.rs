use super::*;
use crate::{
    ConstPredicate, FunctionPredicate, ManualTimeKeeper, ScopedResource, Semaphore, StaticEntry,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Plays a fixed script of statuses, repeating the last one, and counts
/// updates and deactivations.
struct ScriptedTask {
    script: Vec<Status>,
    index: usize,
    updates: Rc<Cell<u32>>,
    deactivations: Rc<Cell<u32>>,
    state: TaskState,
}

impl ScriptedTask {
    fn new(script: Vec<Status>) -> Self {
        Self {
            script,
            index: 0,
            updates: Rc::new(Cell::new(0)),
            deactivations: Rc::new(Cell::new(0)),
            state: TaskState::new(),
        }
    }

    fn updates(&self) -> Rc<Cell<u32>> {
        self.updates.clone()
    }

    fn deactivations(&self) -> Rc<Cell<u32>> {
        self.deactivations.clone()
    }
}

impl Task for ScriptedTask {
    fn state(&self) -> &TaskState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut TaskState {
        &mut self.state
    }

    fn type_name(&self) -> &'static str {
        "ScriptedTask"
    }

    fn update(&mut self, _dt: f64) -> Status {
        self.updates.set(self.updates.get() + 1);
        let status = self.script[self.index.min(self.script.len() - 1)];
        self.index += 1;
        self.state.record(status)
    }

    fn deactivate(&mut self) {
        self.deactivations.set(self.deactivations.get() + 1);
    }
}

#[test]
fn looping_break_on_success() {
    let child = ScriptedTask::new(vec![Status::Running, Status::Running, Status::Success]);
    let mut looping = LoopingDecorator::new(BreakPolicy::OnSuccess, 0, Box::new(child));
    assert_eq!(looping.update(0.1), Status::Running);
    assert_eq!(looping.update(0.1), Status::Running);
    assert_eq!(looping.update(0.1), Status::Success);
}

#[test]
fn looping_break_never_with_count() {
    let child = ScriptedTask::new(vec![Status::Success]);
    let mut looping = LoopingDecorator::new(BreakPolicy::Never, 3, Box::new(child));
    assert_eq!(looping.update(0.1), Status::Running);
    assert_eq!(looping.update(0.1), Status::Running);
    assert_eq!(looping.update(0.1), Status::Running);
    assert_eq!(looping.update(0.1), Status::Success);
}

#[test]
fn looping_break_on_fail() {
    let child = ScriptedTask::new(vec![Status::Success, Status::Fail]);
    let mut looping = LoopingDecorator::new(BreakPolicy::OnFail, 0, Box::new(child));
    assert_eq!(looping.update(0.1), Status::Running);
    assert_eq!(looping.update(0.1), Status::Success);
}

#[test]
fn looping_break_on_complete() {
    let child = ScriptedTask::new(vec![Status::Running, Status::Fail]);
    let mut looping = LoopingDecorator::new(BreakPolicy::OnComplete, 0, Box::new(child));
    assert_eq!(looping.update(0.1), Status::Running);
    assert_eq!(looping.update(0.1), Status::Success);
}

#[test]
fn looping_count_restarts_after_break() {
    let child = ScriptedTask::new(vec![Status::Success]);
    let mut looping = LoopingDecorator::new(BreakPolicy::Never, 1, Box::new(child));
    assert_eq!(looping.update(0.1), Status::Running);
    assert_eq!(looping.update(0.1), Status::Success);
    // The loop counter was reset, so a fresh run loops again.
    assert_eq!(looping.update(0.1), Status::Running);
    assert_eq!(looping.update(0.1), Status::Success);
}

#[test]
fn predicate_filter_blocks_without_ticking_the_child() {
    let child = ScriptedTask::new(vec![Status::Success]);
    let updates = child.updates();
    let mut filter = PredicateFilter::new(Box::new(ConstPredicate::FALSE), Box::new(child));
    assert_eq!(filter.update(0.1), Status::Fail);
    assert_eq!(updates.get(), 0);
}

#[test]
fn predicate_filter_propagates_the_child() {
    let child = ScriptedTask::new(vec![Status::Running, Status::Fail]);
    let mut filter = PredicateFilter::new(Box::new(ConstPredicate::TRUE), Box::new(child));
    assert_eq!(filter.update(0.1), Status::Running);
    assert_eq!(filter.update(0.1), Status::Fail);
}

#[test]
fn predicate_filter_interrupts_a_running_child() {
    let flag = Rc::new(Cell::new(true));
    let inner = flag.clone();
    let child = ScriptedTask::new(vec![Status::Running]);
    let deactivations = child.deactivations();
    let mut filter = PredicateFilter::new(
        Box::new(FunctionPredicate::new(move || inner.get())),
        Box::new(child),
    );
    assert_eq!(filter.update(0.1), Status::Running);
    flag.set(false);
    assert_eq!(filter.update(0.1), Status::Fail);
    assert_eq!(deactivations.get(), 1);
}

#[test]
fn delay_filter_rate_limits_completions() {
    let clock = Rc::new(ManualTimeKeeper::new());
    let child = ScriptedTask::new(vec![Status::Success]);
    let updates = child.updates();
    let mut filter = DelayFilter::new(
        Box::new(StaticEntry::new(100.0f64)),
        clock.clone(),
        Box::new(child),
    );

    assert_eq!(filter.update(0.1), Status::Success);
    assert_eq!(updates.get(), 1);

    clock.advance(50.0);
    assert_eq!(filter.update(0.1), Status::Fail);
    assert_eq!(updates.get(), 1);

    clock.advance(51.0);
    assert_eq!(filter.update(0.1), Status::Success);
    assert_eq!(updates.get(), 2);
}

#[test]
fn delay_filter_only_arms_on_success() {
    let clock = Rc::new(ManualTimeKeeper::new());
    let child = ScriptedTask::new(vec![Status::Fail, Status::Success]);
    let mut filter = DelayFilter::new(
        Box::new(StaticEntry::new(100.0f64)),
        clock.clone(),
        Box::new(child),
    );
    assert_eq!(filter.update(0.1), Status::Fail);
    // The failure did not arm the delay.
    assert_eq!(filter.update(0.1), Status::Success);
    // The success did.
    assert_eq!(filter.update(0.1), Status::Fail);
}

#[test]
fn delay_filter_lets_a_running_child_continue() {
    let clock = Rc::new(ManualTimeKeeper::new());
    let child = ScriptedTask::new(vec![Status::Running, Status::Success]);
    let mut filter = DelayFilter::new(
        Box::new(StaticEntry::new(100.0f64)),
        clock.clone(),
        Box::new(child),
    );
    assert_eq!(filter.update(0.1), Status::Running);
    assert_eq!(filter.update(0.1), Status::Success);
    assert_eq!(filter.update(0.1), Status::Fail);
}

/// Records acquire/release ordering into a shared log.
struct LoggingResource {
    tag: &'static str,
    log: Rc<RefCell<Vec<String>>>,
}

impl ScopedResource for LoggingResource {
    fn acquire(&mut self) {
        self.log.borrow_mut().push(format!("+{}", self.tag));
    }

    fn release(&mut self) {
        self.log.borrow_mut().push(format!("-{}", self.tag));
    }
}

#[test]
fn scope_acquires_once_and_releases_on_completion() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let child = ScriptedTask::new(vec![Status::Running, Status::Success]);
    let mut scope = ScopeDecorator::new(
        Box::new(child),
        vec![
            Rc::new(RefCell::new(LoggingResource {
                tag: "a",
                log: log.clone(),
            })),
            Rc::new(RefCell::new(LoggingResource {
                tag: "b",
                log: log.clone(),
            })),
        ],
    );

    assert_eq!(scope.update(0.1), Status::Running);
    assert_eq!(*log.borrow(), vec!["+a", "+b"]);
    // No reacquisition while the child keeps running.
    assert_eq!(scope.update(0.1), Status::Success);
    assert_eq!(*log.borrow(), vec!["+a", "+b", "-a", "-b"]);
}

#[test]
fn scope_releases_when_interrupted() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let child = ScriptedTask::new(vec![Status::Running]);
    let deactivations = child.deactivations();
    let mut scope = ScopeDecorator::new(
        Box::new(child),
        vec![Rc::new(RefCell::new(LoggingResource {
            tag: "a",
            log: log.clone(),
        }))],
    );
    assert_eq!(scope.update(0.1), Status::Running);
    scope.deactivate();
    assert_eq!(*log.borrow(), vec!["+a", "-a"]);
    assert_eq!(deactivations.get(), 1);
    // A fresh activation re-enters the scope.
    assert_eq!(scope.update(0.1), Status::Running);
    assert_eq!(*log.borrow(), vec!["+a", "-a", "+a"]);
}

#[test]
fn semaphore_decorator_gates_concurrent_holders() {
    let sem = Semaphore::shared("door", 1);
    let first_child = ScriptedTask::new(vec![Status::Running, Status::Success]);
    let second_child = ScriptedTask::new(vec![Status::Success]);
    let second_updates = second_child.updates();
    let mut first = SemaphoreDecorator::new(sem.clone(), Box::new(first_child));
    let mut second = SemaphoreDecorator::new(sem.clone(), Box::new(second_child));

    assert_eq!(first.update(0.1), Status::Running);
    // The semaphore is held; the second task cannot even start.
    assert_eq!(second.update(0.1), Status::Fail);
    assert_eq!(second_updates.get(), 0);

    // Completion releases the semaphore, so the retry succeeds.
    assert_eq!(first.update(0.1), Status::Success);
    assert!(!sem.borrow().is_acquired());
    assert_eq!(second.update(0.1), Status::Success);
}

#[test]
fn semaphore_decorator_releases_when_interrupted() {
    let sem = Semaphore::shared("door", 1);
    let child = ScriptedTask::new(vec![Status::Running]);
    let deactivations = child.deactivations();
    let mut gate = SemaphoreDecorator::new(sem.clone(), Box::new(child));
    assert_eq!(gate.update(0.1), Status::Running);
    assert!(sem.borrow().is_acquired());
    gate.deactivate();
    assert!(!sem.borrow().is_acquired());
    assert_eq!(deactivations.get(), 1);
}

#[test]
fn semaphore_decorator_description_names_the_semaphore() {
    let sem = Semaphore::shared("door", 1);
    let child = ScriptedTask::new(vec![Status::Success]);
    let gate = SemaphoreDecorator::new(sem, Box::new(child));
    assert_eq!(gate.description(), "SemaphoreDecorator:door");
}
