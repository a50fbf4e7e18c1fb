//! Decorators: tasks that own exactly one child and modulate how, when or
//! whether it runs.

use crate::{
    Entry, Predicate, PredicateTask, SharedResource, SharedSemaphore, Status, Task, TaskState,
    TimeKeeper,
};
use std::rc::Rc;

/// When a [`LoopingDecorator`] stops re-entering its child.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BreakPolicy {
    Never,
    OnSuccess,
    OnFail,
    OnComplete,
}

impl BreakPolicy {
    fn name(self) -> &'static str {
        match self {
            BreakPolicy::Never => "BREAK_NEVER",
            BreakPolicy::OnSuccess => "BREAK_ON_SUCCESS",
            BreakPolicy::OnFail => "BREAK_ON_FAIL",
            BreakPolicy::OnComplete => "BREAK_ON_COMPLETE",
        }
    }
}

/// Re-enters its child on every tick after the child completes, until the
/// break policy matches or an optional iteration count is reached
/// (0 = unbounded).
///
/// The child is never re-entered synchronously: a completed iteration that
/// does not break reports `Running` and the next iteration starts on the
/// next tick.
pub struct LoopingDecorator {
    task: Box<dyn Task>,
    policy: BreakPolicy,
    target_loop_count: u32,
    cur_loop_count: u32,
    state: TaskState,
}

impl LoopingDecorator {
    pub fn new(policy: BreakPolicy, loop_count: u32, task: Box<dyn Task>) -> Self {
        Self {
            task,
            policy,
            target_loop_count: loop_count,
            cur_loop_count: 0,
            state: TaskState::new(),
        }
    }

    pub fn reset(&mut self) {
        self.cur_loop_count = 0;
        self.task.deactivate();
    }

    fn update_task(&mut self, dt: f64) -> Status {
        let status = self.task.update(dt);
        if status.is_running() {
            return Status::Running;
        }

        let break_now = match self.policy {
            BreakPolicy::OnComplete => true,
            BreakPolicy::OnSuccess => status == Status::Success,
            BreakPolicy::OnFail => status == Status::Fail,
            BreakPolicy::Never => false,
        };
        if break_now {
            return Status::Success;
        }
        if self.target_loop_count > 0 {
            let reached = self.cur_loop_count >= self.target_loop_count;
            self.cur_loop_count += 1;
            if reached {
                return Status::Success;
            }
        }
        Status::Running
    }
}

impl Task for LoopingDecorator {
    fn state(&self) -> &TaskState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut TaskState {
        &mut self.state
    }

    fn type_name(&self) -> &'static str {
        "LoopingDecorator"
    }

    fn update(&mut self, dt: f64) -> Status {
        let status = self.update_task(dt);
        if self.state.complete(status) {
            self.reset();
        }
        status
    }

    fn deactivate(&mut self) {
        if self.state.interrupt() {
            self.reset();
        }
    }

    fn children(&self) -> Vec<&dyn Task> {
        vec![self.task.as_ref()]
    }

    fn children_mut(&mut self) -> Vec<&mut (dyn Task + 'static)> {
        vec![self.task.as_mut()]
    }

    fn description(&self) -> String {
        let base = match self.state.name() {
            Some(name) => format!("\"{}\" {}", name, self.type_name()),
            None => self.type_name().to_string(),
        };
        format!("{} {}", base, self.policy.name())
    }
}

/// Runs the child only while a predicate holds.
///
/// The predicate is evaluated first on every tick; when it fails the
/// decorator fails without giving the child any time that tick, and a
/// child caught mid-run is deactivated through the reset path.
pub struct PredicateFilter {
    pred: PredicateTask,
    task: Box<dyn Task>,
    state: TaskState,
}

impl PredicateFilter {
    pub fn new(pred: Box<dyn Predicate>, task: Box<dyn Task>) -> Self {
        Self {
            pred: PredicateTask::new(pred),
            task,
            state: TaskState::new(),
        }
    }

    pub fn reset(&mut self) {
        self.task.deactivate();
    }

    fn update_task(&mut self, dt: f64) -> Status {
        // Update rather than evaluate, so the predicate's status shows in
        // the trace.
        if self.pred.update(dt) != Status::Success {
            return Status::Fail;
        }
        self.task.update(dt)
    }
}

impl Task for PredicateFilter {
    fn state(&self) -> &TaskState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut TaskState {
        &mut self.state
    }

    fn type_name(&self) -> &'static str {
        "PredicateFilter"
    }

    fn update(&mut self, dt: f64) -> Status {
        let status = self.update_task(dt);
        if self.state.complete(status) {
            self.reset();
        }
        status
    }

    fn deactivate(&mut self) {
        if self.state.interrupt() {
            self.reset();
        }
    }

    fn children(&self) -> Vec<&dyn Task> {
        vec![self.task.as_ref()]
    }

    fn children_mut(&mut self) -> Vec<&mut (dyn Task + 'static)> {
        vec![self.task.as_mut()]
    }
}

/// Prevents the child from being run more than once in the given interval.
///
/// While the child is not running and less than `min_delay` has elapsed
/// since the last successful completion, the decorator fails without
/// ticking the child. Only a `Success` arms the delay.
pub struct DelayFilter {
    task: Box<dyn Task>,
    min_delay: Box<dyn Entry>,
    time_keeper: Rc<dyn TimeKeeper>,
    task_running: bool,
    last_completion_time: f64,
    state: TaskState,
}

impl DelayFilter {
    pub fn new(
        min_delay: Box<dyn Entry>,
        time_keeper: Rc<dyn TimeKeeper>,
        task: Box<dyn Task>,
    ) -> Self {
        Self {
            task,
            min_delay,
            time_keeper,
            task_running: false,
            last_completion_time: f64::NEG_INFINITY,
            state: TaskState::new(),
        }
    }

    pub fn reset(&mut self) {
        if self.task_running {
            self.task.deactivate();
            self.task_running = false;
        }
    }

    fn update_task(&mut self, dt: f64) -> Status {
        let now = self.time_keeper.time_now();
        let min_delay = self.min_delay.value::<f64>().map_or(0.0, |delay| *delay);
        if !self.task_running && (now - self.last_completion_time) < min_delay {
            // Can't run.
            return Status::Fail;
        }

        let status = self.task.update(dt);
        self.task_running = status.is_running();
        if status == Status::Success {
            self.last_completion_time = now;
        }
        status
    }
}

impl Task for DelayFilter {
    fn state(&self) -> &TaskState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut TaskState {
        &mut self.state
    }

    fn type_name(&self) -> &'static str {
        "DelayFilter"
    }

    fn update(&mut self, dt: f64) -> Status {
        let status = self.update_task(dt);
        if self.state.complete(status) {
            self.reset();
        }
        status
    }

    fn deactivate(&mut self) {
        if self.state.interrupt() {
            self.reset();
        }
    }

    fn children(&self) -> Vec<&dyn Task> {
        vec![self.task.as_ref()]
    }

    fn children_mut(&mut self) -> Vec<&mut (dyn Task + 'static)> {
        vec![self.task.as_mut()]
    }
}

/// Holds an ordered list of scoped resources for the duration of the
/// child's run, like a `using` statement wrapped around the child.
///
/// All resources are acquired, in order, on the first tick after
/// (re)activation and released in the same order when the child completes
/// or the scope is reset.
pub struct ScopeDecorator {
    task: Box<dyn Task>,
    resources: Vec<SharedResource>,
    entered: bool,
    state: TaskState,
}

impl ScopeDecorator {
    pub fn new(task: Box<dyn Task>, resources: Vec<SharedResource>) -> Self {
        Self {
            task,
            resources,
            entered: false,
            state: TaskState::new(),
        }
    }

    pub fn add_resource(&mut self, resource: SharedResource) {
        self.resources.push(resource);
    }

    pub fn reset(&mut self) {
        if self.entered {
            self.entered = false;
            for resource in &self.resources {
                resource.borrow_mut().release();
            }
        }
        self.task.deactivate();
    }

    fn update_task(&mut self, dt: f64) -> Status {
        if !self.entered {
            self.entered = true;
            for resource in &self.resources {
                resource.borrow_mut().acquire();
            }
        }
        self.task.update(dt)
    }
}

impl Task for ScopeDecorator {
    fn state(&self) -> &TaskState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut TaskState {
        &mut self.state
    }

    fn type_name(&self) -> &'static str {
        "ScopeDecorator"
    }

    fn update(&mut self, dt: f64) -> Status {
        let status = self.update_task(dt);
        if self.state.complete(status) {
            self.reset();
        }
        status
    }

    fn deactivate(&mut self) {
        if self.state.interrupt() {
            self.reset();
        }
    }

    fn children(&self) -> Vec<&dyn Task> {
        vec![self.task.as_ref()]
    }

    fn children_mut(&mut self) -> Vec<&mut (dyn Task + 'static)> {
        vec![self.task.as_mut()]
    }
}

/// A mutex-style gate on a single semaphore.
///
/// The first tick after activation attempts the acquire; failure fails the
/// decorator for that tick without running the child, and the acquire is
/// retried on the next tick. The semaphore is released on completion or
/// reset.
pub struct SemaphoreDecorator {
    task: Box<dyn Task>,
    semaphore: SharedSemaphore,
    acquired: bool,
    state: TaskState,
}

impl SemaphoreDecorator {
    pub fn new(semaphore: SharedSemaphore, task: Box<dyn Task>) -> Self {
        Self {
            task,
            semaphore,
            acquired: false,
            state: TaskState::new(),
        }
    }

    pub fn reset(&mut self) {
        if self.acquired {
            self.semaphore.borrow_mut().release();
            self.acquired = false;
        }
        self.task.deactivate();
    }

    fn update_task(&mut self, dt: f64) -> Status {
        if !self.acquired {
            self.acquired = self.semaphore.borrow_mut().acquire();
            if !self.acquired {
                return Status::Fail;
            }
        }
        self.task.update(dt)
    }
}

impl Task for SemaphoreDecorator {
    fn state(&self) -> &TaskState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut TaskState {
        &mut self.state
    }

    fn type_name(&self) -> &'static str {
        "SemaphoreDecorator"
    }

    fn update(&mut self, dt: f64) -> Status {
        let status = self.update_task(dt);
        if self.state.complete(status) {
            self.reset();
        }
        status
    }

    fn deactivate(&mut self) {
        if self.state.interrupt() {
            self.reset();
        }
    }

    fn children(&self) -> Vec<&dyn Task> {
        vec![self.task.as_ref()]
    }

    fn children_mut(&mut self) -> Vec<&mut (dyn Task + 'static)> {
        vec![self.task.as_mut()]
    }

    fn description(&self) -> String {
        let base = match self.state.name() {
            Some(name) => format!("\"{}\" {}", name, self.type_name()),
            None => self.type_name().to_string(),
        };
        format!("{}:{}", base, self.semaphore.borrow().name())
    }
}

#[cfg(test)]
mod test;
