//! # behavior-tree-engine
//!
//! A behavior tree execution engine for autonomous agents and stateful
//! workflows.
//!
//!
//! ## Overview
//!
//! A behavior tree models the decision logic of an agent as a tree of
//! composable tasks. The whole tree is "ticked" once per time step by
//! calling [`BehaviorTree::update`] with the elapsed time, and every node
//! reports one of [`Status::Running`], [`Status::Success`] or
//! [`Status::Fail`]. Nodes that return `Running` keep their internal state
//! and are resumed by the next tick, so long-lived work is driven forward
//! by many small, non-blocking update calls.
//!
//! The node set is fixed and closed:
//!
//! * Composite selectors owning several children:
//!   [`SequenceSelector`], [`IterateSelector`], [`SuccessSelector`],
//!   [`PrioritySelector`], [`ParallelSelector`] and [`WeightedSelector`].
//! * Decorators owning exactly one child:
//!   [`LoopingDecorator`], [`PredicateFilter`], [`DelayFilter`],
//!   [`ScopeDecorator`] and [`SemaphoreDecorator`].
//! * Leaf tasks performing concrete effects: [`FunctionTask`],
//!   [`DelayTask`], [`NoOpTask`], [`StoreEntryTask`] and
//!   [`RemoveEntryTask`].
//! * Stateless boolean [`Predicate`]s, composed with and/or/not and adapted
//!   into tasks by [`PredicateTask`].
//!
//! Tasks communicate through a [`Blackboard`], a map of named, lazily
//! created value slots, and arbitrate exclusive access to shared resources
//! with counting [`Semaphore`]s. The [`TaskFactory`] assembles all of the
//! above into trees with a compact builder vocabulary.
//!
//!
//! ## How it looks like
//!
//! ```rust
//! use behavior_tree_engine::{
//!     Blackboard, BehaviorTree, Status, TaskFactory,
//! };
//!
//! let mut bb = Blackboard::default();
//! bb.entry("hungry").store(true);
//!
//! let factory = TaskFactory::default();
//! let root = factory.sequence(vec![
//!     factory.enter_if(
//!         factory.entry_equals(bb.entry("hungry"), true),
//!         factory.store_entry(bb.entry("meal"), "stew"),
//!     ),
//!     factory.remove_entry(bb.entry("hungry")),
//! ]);
//!
//! let mut tree = BehaviorTree::new(root);
//! assert_eq!(tree.update(0.1), Status::Success);
//! assert!(!bb.contains("hungry"));
//! assert_eq!(bb.entry("meal").value::<&str>().as_deref(), Some(&"stew"));
//! ```
//!
//!
//! ## Defining your own task
//!
//! The core of the library is the [`Task`] trait. Each task embeds a
//! [`TaskState`] for the bookkeeping every node carries (optional name and
//! the status of the most recent update, which the debug trace reads).
//!
//! ```rust
//! use behavior_tree_engine::{Status, Task, TaskState};
//!
//! struct Countdown {
//!     remaining: u32,
//!     state: TaskState,
//! }
//!
//! impl Task for Countdown {
//!     fn state(&self) -> &TaskState {
//!         &self.state
//!     }
//!
//!     fn state_mut(&mut self) -> &mut TaskState {
//!         &mut self.state
//!     }
//!
//!     fn type_name(&self) -> &'static str {
//!         "Countdown"
//!     }
//!
//!     fn update(&mut self, _dt: f64) -> Status {
//!         let status = if self.remaining == 0 {
//!             Status::Success
//!         } else {
//!             self.remaining -= 1;
//!             Status::Running
//!         };
//!         self.state.record(status)
//!     }
//! }
//!
//! let mut task = Countdown { remaining: 1, state: TaskState::new() };
//! assert_eq!(task.update(0.1), Status::Running);
//! assert_eq!(task.update(0.1), Status::Success);
//! ```
//!
//!
//! ## The stateful task contract
//!
//! Nodes that keep state across ticks follow a reset discipline: whenever
//! an update yields a non-`Running` status the node resets itself before
//! its next activation, and [`Task::deactivate`] forces the same reset if
//! the node is abandoned while still `Running`. [`TaskState`] expresses the
//! discipline with two helpers so every node spells it the same way:
//!
//! ```rust,ignore
//! fn update(&mut self, dt: f64) -> Status {
//!     let status = self.update_task(dt);
//!     if self.state.complete(status) {
//!         self.reset();
//!     }
//!     status
//! }
//!
//! fn deactivate(&mut self) {
//!     if self.state.interrupt() {
//!         self.reset();
//!     }
//! }
//! ```
//!
//! Deactivation cascades: a composite's `reset` deactivates any child that
//! may still be running, releasing scoped resources and semaphores exactly
//! as a natural completion would.
//!
//!
//! ## Concurrency model
//!
//! Execution is single threaded and cooperative. "Parallel" and "weighted"
//! selection visit several children synchronously within one update call;
//! nothing preempts and no node blocks. The only shared mutable state is
//! the blackboard and the semaphores, which is safe because update calls
//! are never concurrent. Do not re-enter `update` on a tree from within
//! one of its own tasks; the engine does not guard against it.
//!
//!
//! ## Debug trace
//!
//! Setting [`BehaviorTree::debug`] renders the whole tree after every tick,
//! one line per node, nesting shown with a repeated `- ` marker:
//!
//! ```text
//! [SequenceSelector]:RUNNING
//! - ["fetch" FunctionTask]:SUCCESS
//! - [DelayTask]:RUNNING
//! - [NoOpTask]:INACTIVE
//! ```
//!
//! [`BehaviorTree::debug_print`] additionally emits the trace through the
//! [`log`] facade at debug level. This is slow and intended for
//! development only.

mod blackboard;
mod decorator;
mod factory;
mod leaf;
mod pred;
mod random;
mod resource;
mod selector;
mod symbol;
mod time;
mod tree;

pub use crate::blackboard::{Blackboard, BlackboardEntry, Entry, StaticEntry};
pub use crate::decorator::{
    BreakPolicy, DelayFilter, LoopingDecorator, PredicateFilter, ScopeDecorator,
    SemaphoreDecorator,
};
pub use crate::factory::TaskFactory;
pub use crate::leaf::{DelayTask, FunctionTask, NoOpTask, RemoveEntryTask, StoreEntryTask};
pub use crate::pred::{
    AndPredicate, ConstPredicate, EntryEqualsPred, EntryExistsPred, EntryNotExistsPred,
    FunctionPredicate, NotPredicate, OrPredicate, Predicate, PredicateTask,
};
pub use crate::random::{LehmerRandom, RandomStream, Randoms, ThreadRandom};
pub use crate::resource::{ScopedResource, Semaphore, SharedResource, SharedSemaphore};
pub use crate::selector::{
    IterateSelector, ParallelPolicy, ParallelSelector, PrioritySelector, SequenceSelector,
    SuccessSelector, WeightedSelector, WeightedTask,
};
pub use crate::symbol::Symbol;
pub use crate::time::{ManualTimeKeeper, TimeKeeper, WallClockTimeKeeper};
pub use crate::tree::BehaviorTree;

/// The status a task reports from one update call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Status {
    /// The task has not been updated during the current tick. `update`
    /// never returns this; it only shows up in the debug trace for nodes
    /// the tick did not reach.
    #[default]
    Inactive,
    /// The task needs more ticks to complete.
    Running,
    /// The task completed successfully.
    Success,
    /// The task failed. This is the routine, logical failure that
    /// composites route on; it never aborts the tick.
    Fail,
}

impl Status {
    /// The uppercase name used by the debug trace.
    pub fn name(self) -> &'static str {
        match self {
            Status::Inactive => "INACTIVE",
            Status::Running => "RUNNING",
            Status::Success => "SUCCESS",
            Status::Fail => "FAIL",
        }
    }

    pub fn is_running(self) -> bool {
        matches!(self, Status::Running)
    }

    /// True for `Success` and `Fail`.
    pub fn is_complete(self) -> bool {
        matches!(self, Status::Success | Status::Fail)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Bookkeeping embedded in every task: the optional node name, the status
/// of the most recent update and the running flag the stateful contract
/// relies on.
#[derive(Debug, Default)]
pub struct TaskState {
    name: Option<String>,
    last: Status,
    running: bool,
}

impl TaskState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    pub fn last(&self) -> Status {
        self.last
    }

    /// Records the status of a stateless update.
    pub fn record(&mut self, status: Status) -> Status {
        self.last = status;
        status
    }

    /// Records the status of a stateful update and returns true when the
    /// task just stopped running, in which case the caller must reset.
    pub fn complete(&mut self, status: Status) -> bool {
        self.last = status;
        self.running = status.is_running();
        !self.running
    }

    /// Returns true when a deactivation caught the task mid-run, in which
    /// case the caller must reset.
    pub fn interrupt(&mut self) -> bool {
        let was_running = self.running;
        self.running = false;
        was_running
    }

    /// Back to `Inactive`, called by the tree before a traced tick.
    pub fn clear(&mut self) {
        self.last = Status::Inactive;
    }
}

/// A node of the behavior tree.
///
/// Composites and decorators own their children exclusively (no back
/// references, so cycles cannot be built), and the whole tree is owned by
/// whoever holds the root.
pub trait Task {
    fn state(&self) -> &TaskState;

    fn state_mut(&mut self) -> &mut TaskState;

    /// The node type shown by [`Task::description`].
    fn type_name(&self) -> &'static str;

    /// Drives the task forward by `dt` seconds worth of work.
    fn update(&mut self, dt: f64) -> Status;

    /// Cancels the task. A task interrupted while `Running` performs the
    /// same cleanup a natural completion would.
    fn deactivate(&mut self) {}

    /// Child nodes, for the debug trace walk. Leaves have none.
    fn children(&self) -> Vec<&dyn Task> {
        Vec::new()
    }

    fn children_mut(&mut self) -> Vec<&mut (dyn Task + 'static)> {
        Vec::new()
    }

    fn last_status(&self) -> Status {
        self.state().last()
    }

    fn description(&self) -> String {
        match self.state().name() {
            Some(name) => format!("\"{}\" {}", name, self.type_name()),
            None => self.type_name().to_string(),
        }
    }
}

/// Builder-style conveniences available on every sized task.
pub trait TaskExt: Task + Sized {
    /// Names the node; the name shows up in [`Task::description`] and the
    /// debug trace.
    fn named(mut self, name: impl Into<String>) -> Self {
        self.state_mut().set_name(name);
        self
    }
}

impl<T: Task + Sized> TaskExt for T {}
