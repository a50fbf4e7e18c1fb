//! Leaf tasks: concrete effects with no children.

use crate::{BlackboardEntry, Entry, Status, Task, TaskState};
use std::any::Any;
use std::rc::Rc;

/// Calls a closure every update and reports whatever it returns.
pub struct FunctionTask<F> {
    f: F,
    state: TaskState,
}

impl<F: FnMut(f64) -> Status> FunctionTask<F> {
    pub fn new(f: F) -> Self {
        Self {
            f,
            state: TaskState::new(),
        }
    }
}

impl<F: FnMut(f64) -> Status> Task for FunctionTask<F> {
    fn state(&self) -> &TaskState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut TaskState {
        &mut self.state
    }

    fn type_name(&self) -> &'static str {
        "FunctionTask"
    }

    fn update(&mut self, dt: f64) -> Status {
        let status = (self.f)(dt);
        self.state.record(status)
    }
}

/// Runs for an entry-supplied number of seconds, then succeeds.
///
/// The target duration is sampled once on activation, so a changing entry
/// only affects the next run. A missing entry waits zero seconds; negative
/// durations clamp to zero.
pub struct DelayTask {
    time: Box<dyn Entry>,
    this_time: Option<f64>,
    elapsed: f64,
    state: TaskState,
}

impl DelayTask {
    pub fn new(time: Box<dyn Entry>) -> Self {
        Self {
            time,
            this_time: None,
            elapsed: 0.0,
            state: TaskState::new(),
        }
    }

    pub fn reset(&mut self) {
        self.this_time = None;
    }

    fn update_task(&mut self, dt: f64) -> Status {
        let target = match self.this_time {
            Some(target) => target,
            None => {
                self.elapsed = 0.0;
                let target = self.time.value::<f64>().map_or(0.0, |time| time.max(0.0));
                self.this_time = Some(target);
                target
            }
        };
        self.elapsed += dt;
        if self.elapsed >= target {
            Status::Success
        } else {
            Status::Running
        }
    }
}

impl Task for DelayTask {
    fn state(&self) -> &TaskState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut TaskState {
        &mut self.state
    }

    fn type_name(&self) -> &'static str {
        "DelayTask"
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
}

/// Does nothing and reports a fixed status.
pub struct NoOpTask {
    status: Status,
    state: TaskState,
}

impl NoOpTask {
    pub fn new(status: Status) -> Self {
        Self {
            status,
            state: TaskState::new(),
        }
    }
}

impl Task for NoOpTask {
    fn state(&self) -> &TaskState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut TaskState {
        &mut self.state
    }

    fn type_name(&self) -> &'static str {
        "NoOpTask"
    }

    fn update(&mut self, _dt: f64) -> Status {
        self.state.record(self.status)
    }
}

/// Stores a value in a blackboard entry every update.
pub struct StoreEntryTask {
    entry: BlackboardEntry,
    value: Rc<dyn Any>,
    state: TaskState,
}

impl StoreEntryTask {
    pub fn new<T: 'static>(entry: BlackboardEntry, value: T) -> Self {
        Self {
            entry,
            value: Rc::new(value),
            state: TaskState::new(),
        }
    }
}

impl Task for StoreEntryTask {
    fn state(&self) -> &TaskState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut TaskState {
        &mut self.state
    }

    fn type_name(&self) -> &'static str {
        "StoreEntryTask"
    }

    fn update(&mut self, _dt: f64) -> Status {
        self.entry.store_shared(self.value.clone());
        self.state.record(Status::Success)
    }
}

/// Removes the value from a blackboard entry.
pub struct RemoveEntryTask {
    entry: BlackboardEntry,
    state: TaskState,
}

impl RemoveEntryTask {
    pub fn new(entry: BlackboardEntry) -> Self {
        Self {
            entry,
            state: TaskState::new(),
        }
    }
}

impl Task for RemoveEntryTask {
    fn state(&self) -> &TaskState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut TaskState {
        &mut self.state
    }

    fn type_name(&self) -> &'static str {
        "RemoveEntryTask"
    }

    fn update(&mut self, _dt: f64) -> Status {
        self.entry.remove();
        self.state.record(Status::Success)
    }
}
