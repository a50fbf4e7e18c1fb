//! Fluent construction helpers for every node type.
//!
//! The factory hands out `Box<dyn Task>` so helpers compose directly:
//!
//! ```rust
//! use behavior_tree_engine::{Blackboard, Status, Task, TaskFactory};
//!
//! let mut bb = Blackboard::default();
//! let factory = TaskFactory::default();
//! let mut patrol = factory.loop_until_success(factory.sequence(vec![
//!     factory.call(|_dt| Status::Success),
//!     factory.store_entry(bb.entry("waypoint"), 3u32),
//! ]));
//! assert_eq!(patrol.update(0.1), Status::Success);
//! assert_eq!(bb.entry("waypoint").value::<u32>().as_deref(), Some(&3));
//! ```

use crate::{
    AndPredicate, BlackboardEntry, BreakPolicy, DelayFilter, DelayTask, Entry, EntryEqualsPred,
    EntryExistsPred, EntryNotExistsPred, FunctionPredicate, FunctionTask, LoopingDecorator,
    NoOpTask, NotPredicate, OrPredicate, ParallelPolicy, ParallelSelector, Predicate,
    PredicateFilter, PredicateTask, PrioritySelector, RandomStream, RemoveEntryTask,
    ScopeDecorator, SemaphoreDecorator, SequenceSelector, SharedResource, SharedSemaphore,
    Status, StoreEntryTask, Task, TimeKeeper, WallClockTimeKeeper, WeightedSelector,
    WeightedTask,
};
use std::rc::Rc;

/// Assembles tasks, selectors, decorators and predicates into trees.
pub struct TaskFactory {
    time_keeper: Rc<dyn TimeKeeper>,
}

impl TaskFactory {
    pub fn new(time_keeper: Rc<dyn TimeKeeper>) -> Self {
        Self { time_keeper }
    }

    pub fn time_keeper(&self) -> Rc<dyn TimeKeeper> {
        self.time_keeper.clone()
    }

    /// Runs the given task while the predicate is true.
    pub fn run_while(&self, pred: Box<dyn Predicate>, task: Box<dyn Task>) -> Box<dyn Task> {
        Box::new(PredicateFilter::new(pred, task))
    }

    /// Runs the given task if the predicate is true.
    ///
    /// Unlike [`TaskFactory::run_while`], the predicate is only evaluated
    /// before entering the task: this builds the sequence
    /// `[predicate, task]`, and once the task is running the sequence
    /// resumes past the guard.
    pub fn enter_if(&self, pred: Box<dyn Predicate>, task: Box<dyn Task>) -> Box<dyn Task> {
        self.sequence(vec![self.pred_task(pred), task])
    }

    /// Stops running the task when the predicate becomes true.
    pub fn exit_if(&self, pred: Box<dyn Predicate>, task: Box<dyn Task>) -> Box<dyn Task> {
        self.run_while(self.not(pred), task)
    }

    /// Runs the given task holding the given scoped resources. The
    /// resources are acquired before the task runs and released when it
    /// completes or gets interrupted, like a `using` statement (or
    /// try/finally) in a structured language.
    pub fn using(&self, resources: Vec<SharedResource>, task: Box<dyn Task>) -> Box<dyn Task> {
        Box::new(ScopeDecorator::new(task, resources))
    }

    /// Runs children in sequence until one fails, or all succeed.
    pub fn sequence(&self, children: Vec<Box<dyn Task>>) -> Box<dyn Task> {
        Box::new(SequenceSelector::new(children))
    }

    /// Runs all children concurrently until the policy decides.
    pub fn parallel(
        &self,
        policy: ParallelPolicy,
        children: Vec<Box<dyn Task>>,
    ) -> Box<dyn Task> {
        Box::new(ParallelSelector::new(policy, children))
    }

    /// Runs a task a specified number of times.
    pub fn repeat(&self, count: u32, task: Box<dyn Task>) -> Box<dyn Task> {
        Box::new(LoopingDecorator::new(BreakPolicy::Never, count, task))
    }

    /// Loops a task forever.
    pub fn loop_forever(&self, task: Box<dyn Task>) -> Box<dyn Task> {
        Box::new(LoopingDecorator::new(BreakPolicy::Never, 0, task))
    }

    /// Loops a task until it succeeds.
    pub fn loop_until_success(&self, task: Box<dyn Task>) -> Box<dyn Task> {
        Box::new(LoopingDecorator::new(BreakPolicy::OnSuccess, 0, task))
    }

    /// Loops a task until it fails.
    pub fn loop_until_fail(&self, task: Box<dyn Task>) -> Box<dyn Task> {
        Box::new(LoopingDecorator::new(BreakPolicy::OnFail, 0, task))
    }

    /// Loops a task until it succeeds or fails.
    pub fn loop_until_complete(&self, task: Box<dyn Task>) -> Box<dyn Task> {
        Box::new(LoopingDecorator::new(BreakPolicy::OnComplete, 0, task))
    }

    /// Runs a task, and ensures that it won't be re-run until a minimum
    /// amount of time has elapsed since its last success.
    pub fn with_repeat_delay(
        &self,
        min_delay: impl Entry + 'static,
        task: Box<dyn Task>,
    ) -> Box<dyn Task> {
        Box::new(DelayFilter::new(
            Box::new(min_delay),
            self.time_keeper.clone(),
            task,
        ))
    }

    /// Runs the first task that returns a non-FAIL status. Higher priority
    /// tasks (those earlier in the list) can interrupt lower priority
    /// tasks that are running.
    pub fn select_with_priority(&self, children: Vec<Box<dyn Task>>) -> Box<dyn Task> {
        Box::new(PrioritySelector::new(children))
    }

    /// Randomly selects a task to run, weighted by the second tuple field.
    pub fn select_randomly(
        &self,
        rng: Box<dyn RandomStream>,
        children_and_weights: Vec<(Box<dyn Task>, u32)>,
    ) -> Box<dyn Task> {
        let children = children_and_weights
            .into_iter()
            .map(|(task, weight)| WeightedTask::new(task, weight))
            .collect();
        Box::new(WeightedSelector::new(rng, children))
    }

    /// Waits the entry-supplied amount of time.
    pub fn wait(&self, time: impl Entry + 'static) -> Box<dyn Task> {
        Box::new(DelayTask::new(Box::new(time)))
    }

    /// Calls a function.
    pub fn call(&self, f: impl FnMut(f64) -> Status + 'static) -> Box<dyn Task> {
        Box::new(FunctionTask::new(f))
    }

    /// Runs a task if the given semaphore is successfully acquired.
    pub fn with_semaphore(
        &self,
        semaphore: SharedSemaphore,
        task: Box<dyn Task>,
    ) -> Box<dyn Task> {
        Box::new(SemaphoreDecorator::new(semaphore, task))
    }

    /// Removes the given entry's value from its blackboard.
    pub fn remove_entry(&self, entry: BlackboardEntry) -> Box<dyn Task> {
        Box::new(RemoveEntryTask::new(entry))
    }

    /// Stores a value in the blackboard.
    pub fn store_entry<T: 'static>(&self, entry: BlackboardEntry, value: T) -> Box<dyn Task> {
        Box::new(StoreEntryTask::new(entry, value))
    }

    /// Does nothing, successfully.
    pub fn no_op(&self) -> Box<dyn Task> {
        Box::new(NoOpTask::new(Status::Success))
    }

    /// Exposes a predicate through the task status contract, for use as a
    /// sequence child.
    pub fn pred_task(&self, pred: Box<dyn Predicate>) -> Box<dyn Task> {
        Box::new(PredicateTask::new(pred))
    }

    /// Returns !pred.
    pub fn not(&self, pred: Box<dyn Predicate>) -> Box<dyn Predicate> {
        Box::new(NotPredicate::new(pred))
    }

    /// ANDs the given preds together.
    pub fn and(&self, preds: Vec<Box<dyn Predicate>>) -> Box<dyn Predicate> {
        Box::new(AndPredicate::new(preds))
    }

    /// ORs the given preds together.
    pub fn or(&self, preds: Vec<Box<dyn Predicate>>) -> Box<dyn Predicate> {
        Box::new(OrPredicate::new(preds))
    }

    /// A predicate that calls the given function.
    pub fn pred(&self, f: impl Fn() -> bool + 'static) -> Box<dyn Predicate> {
        Box::new(FunctionPredicate::new(f))
    }

    /// Tests the existence of the given entry.
    pub fn entry_exists(&self, entry: impl Entry + 'static) -> Box<dyn Predicate> {
        Box::new(EntryExistsPred::new(Box::new(entry)))
    }

    /// Tests that the given entry does not exist.
    pub fn entry_not_exists(&self, entry: impl Entry + 'static) -> Box<dyn Predicate> {
        Box::new(EntryNotExistsPred::new(Box::new(entry)))
    }

    /// Tests that the given entry holds the given value.
    pub fn entry_equals<T: PartialEq + 'static>(
        &self,
        entry: impl Entry + 'static,
        value: T,
    ) -> Box<dyn Predicate> {
        Box::new(EntryEqualsPred::new(Box::new(entry), value))
    }
}

impl Default for TaskFactory {
    fn default() -> Self {
        Self::new(Rc::new(WallClockTimeKeeper::new()))
    }
}

#[cfg(test)]
mod test;
