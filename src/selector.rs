//! Composite selectors: tasks that own several children and combine their
//! statuses per a fixed policy.
//!
//! All selectors visit children in declaration order. A child returning
//! `Running` suspends the selector without losing progress; the next tick
//! resumes from the recorded position.

use crate::{RandomStream, Randoms, Status, Task, TaskState};

/// Executes child tasks in sequence. Succeeds when all children have
/// succeeded, fails as soon as any child fails.
///
/// A chain of instantly succeeding children all run within one update
/// call. `Running` and `Fail` return immediately; the child index survives
/// a `Running` result so the sequence resumes where it left off.
pub struct SequenceSelector {
    children: Vec<Box<dyn Task>>,
    cur_child: Option<usize>,
    child_idx: usize,
    state: TaskState,
}

impl SequenceSelector {
    pub fn new(children: Vec<Box<dyn Task>>) -> Self {
        Self {
            children,
            cur_child: None,
            child_idx: 0,
            state: TaskState::new(),
        }
    }

    pub fn add_task(&mut self, task: Box<dyn Task>) -> &mut Self {
        self.children.push(task);
        self
    }

    pub fn reset(&mut self) {
        if let Some(index) = self.cur_child.take() {
            self.children[index].deactivate();
        }
        self.child_idx = 0;
    }

    fn update_task(&mut self, dt: f64) -> Status {
        while self.child_idx < self.children.len() {
            self.cur_child = Some(self.child_idx);
            let status = self.children[self.child_idx].update(dt);
            if status == Status::Success {
                // The child completed. Move on to the next.
                self.cur_child = None;
                self.child_idx += 1;
            } else {
                // RUNNING or FAIL return immediately.
                return status;
            }
        }

        // All our children have completed successfully.
        Status::Success
    }
}

impl Default for SequenceSelector {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Task for SequenceSelector {
    fn state(&self) -> &TaskState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut TaskState {
        &mut self.state
    }

    fn type_name(&self) -> &'static str {
        "SequenceSelector"
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
        self.children.iter().map(|child| child.as_ref()).collect()
    }

    fn children_mut(&mut self) -> Vec<&mut (dyn Task + 'static)> {
        self.children
            .iter_mut()
            .map(|child| child.as_mut())
            .collect()
    }
}

/// A sequence variant that advances past both successes and failures; it
/// runs every child regardless of outcome. Only `Running` pauses it, and
/// it always completes with `Success`.
pub struct IterateSelector {
    children: Vec<Box<dyn Task>>,
    cur_child: Option<usize>,
    child_idx: usize,
    state: TaskState,
}

impl IterateSelector {
    pub fn new(children: Vec<Box<dyn Task>>) -> Self {
        Self {
            children,
            cur_child: None,
            child_idx: 0,
            state: TaskState::new(),
        }
    }

    pub fn add_task(&mut self, task: Box<dyn Task>) -> &mut Self {
        self.children.push(task);
        self
    }

    pub fn reset(&mut self) {
        if let Some(index) = self.cur_child.take() {
            self.children[index].deactivate();
        }
        self.child_idx = 0;
    }

    fn update_task(&mut self, dt: f64) -> Status {
        while self.child_idx < self.children.len() {
            self.cur_child = Some(self.child_idx);
            let status = self.children[self.child_idx].update(dt);
            if status.is_complete() {
                self.cur_child = None;
                self.child_idx += 1;
            } else {
                return status;
            }
        }
        Status::Success
    }
}

impl Default for IterateSelector {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Task for IterateSelector {
    fn state(&self) -> &TaskState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut TaskState {
        &mut self.state
    }

    fn type_name(&self) -> &'static str {
        "IterateSelector"
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
        self.children.iter().map(|child| child.as_ref()).collect()
    }

    fn children_mut(&mut self) -> Vec<&mut (dyn Task + 'static)> {
        self.children
            .iter_mut()
            .map(|child| child.as_mut())
            .collect()
    }
}

/// A sequence variant that advances past failures only. The first child to
/// succeed or keep running decides the result, and exhausting the list
/// still yields `Success`.
pub struct SuccessSelector {
    children: Vec<Box<dyn Task>>,
    cur_child: Option<usize>,
    child_idx: usize,
    state: TaskState,
}

impl SuccessSelector {
    pub fn new(children: Vec<Box<dyn Task>>) -> Self {
        Self {
            children,
            cur_child: None,
            child_idx: 0,
            state: TaskState::new(),
        }
    }

    pub fn add_task(&mut self, task: Box<dyn Task>) -> &mut Self {
        self.children.push(task);
        self
    }

    pub fn reset(&mut self) {
        if let Some(index) = self.cur_child.take() {
            self.children[index].deactivate();
        }
        self.child_idx = 0;
    }

    fn update_task(&mut self, dt: f64) -> Status {
        while self.child_idx < self.children.len() {
            self.cur_child = Some(self.child_idx);
            let status = self.children[self.child_idx].update(dt);
            if status == Status::Fail {
                self.cur_child = None;
                self.child_idx += 1;
                continue;
            }
            return status;
        }
        Status::Success
    }
}

impl Default for SuccessSelector {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Task for SuccessSelector {
    fn state(&self) -> &TaskState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut TaskState {
        &mut self.state
    }

    fn type_name(&self) -> &'static str {
        "SuccessSelector"
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
        self.children.iter().map(|child| child.as_ref()).collect()
    }

    fn children_mut(&mut self) -> Vec<&mut (dyn Task + 'static)> {
        self.children
            .iter_mut()
            .map(|child| child.as_mut())
            .collect()
    }
}

/// Tries every child in priority order, every update, until one does not
/// fail.
///
/// Since children are always run in priority order (index 0 highest), a
/// higher priority task can interrupt a lower priority one that began
/// running on a previous update. The interrupted task is deactivated only
/// after the winner has already been updated this tick.
pub struct PrioritySelector {
    children: Vec<Box<dyn Task>>,
    running_task: Option<usize>,
    state: TaskState,
}

impl PrioritySelector {
    pub fn new(children: Vec<Box<dyn Task>>) -> Self {
        Self {
            children,
            running_task: None,
            state: TaskState::new(),
        }
    }

    pub fn add_task(&mut self, task: Box<dyn Task>) -> &mut Self {
        self.children.push(task);
        self
    }

    pub fn reset(&mut self) {
        if let Some(index) = self.running_task.take() {
            self.children[index].deactivate();
        }
    }

    fn update_task(&mut self, dt: f64) -> Status {
        // Iterate all children till we find one that doesn't fail.
        let mut status = Status::Success;
        for index in 0..self.children.len() {
            status = self.children[index].update(dt);

            if status != Status::Fail {
                // Did we interrupt a lower priority task that was already
                // running? The loser is deactivated *after* the winner was
                // updated.
                if let Some(prev) = self.running_task {
                    if prev != index {
                        self.children[prev].deactivate();
                    }
                }
                self.running_task = status.is_running().then_some(index);
                break;
            }
        }

        status
    }
}

impl Default for PrioritySelector {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Task for PrioritySelector {
    fn state(&self) -> &TaskState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut TaskState {
        &mut self.state
    }

    fn type_name(&self) -> &'static str {
        "PrioritySelector"
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
        self.children.iter().map(|child| child.as_ref()).collect()
    }

    fn children_mut(&mut self) -> Vec<&mut (dyn Task + 'static)> {
        self.children
            .iter_mut()
            .map(|child| child.as_mut())
            .collect()
    }
}

/// How a [`ParallelSelector`] combines its children's statuses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParallelPolicy {
    /// SUCCESS if all succeed. FAIL if any fail.
    AllSuccess,
    /// SUCCESS if any succeed. FAIL if all fail.
    AnySuccess,
    /// SUCCESS if all fail. FAIL if any succeed.
    AllFail,
    /// SUCCESS if any fail. FAIL if all succeed.
    AnyFail,
    /// SUCCESS when all succeed or fail.
    AllComplete,
    /// SUCCESS when any succeed or fail.
    AnyComplete,
}

/// Updates all children, every update, until the policy's condition is
/// met.
///
/// The per-tick scan exits as soon as a deciding child status is observed,
/// so children after the decider are not updated that tick. `AllComplete`
/// has no deciding child and always sweeps the whole list.
pub struct ParallelSelector {
    policy: ParallelPolicy,
    children: Vec<Box<dyn Task>>,
    state: TaskState,
}

impl ParallelSelector {
    pub fn new(policy: ParallelPolicy, children: Vec<Box<dyn Task>>) -> Self {
        Self {
            policy,
            children,
            state: TaskState::new(),
        }
    }

    pub fn policy(&self) -> ParallelPolicy {
        self.policy
    }

    pub fn add_task(&mut self, task: Box<dyn Task>) -> &mut Self {
        self.children.push(task);
        self
    }

    pub fn reset(&mut self) {
        for child in &mut self.children {
            child.deactivate();
        }
    }

    fn update_task(&mut self, dt: f64) -> Status {
        let mut running_children = false;
        let mut fails = 0;
        let mut successes = 0;
        for child in &mut self.children {
            match child.update(dt) {
                Status::Success => {
                    successes += 1;
                    match self.policy {
                        ParallelPolicy::AnySuccess | ParallelPolicy::AnyComplete => {
                            return Status::Success
                        }
                        ParallelPolicy::AllFail => return Status::Fail,
                        _ => (),
                    }
                }
                Status::Fail => {
                    fails += 1;
                    match self.policy {
                        ParallelPolicy::AnyFail | ParallelPolicy::AnyComplete => {
                            return Status::Success
                        }
                        ParallelPolicy::AllSuccess => return Status::Fail,
                        _ => (),
                    }
                }
                _ => running_children = true,
            }
        }
        if self.policy == ParallelPolicy::AnySuccess && fails == self.children.len() {
            return Status::Fail;
        }
        if self.policy == ParallelPolicy::AnyFail && successes == self.children.len() {
            return Status::Fail;
        }
        if running_children {
            Status::Running
        } else {
            Status::Success
        }
    }
}

impl Task for ParallelSelector {
    fn state(&self) -> &TaskState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut TaskState {
        &mut self.state
    }

    fn type_name(&self) -> &'static str {
        "ParallelSelector"
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
        self.children.iter().map(|child| child.as_ref()).collect()
    }

    fn children_mut(&mut self) -> Vec<&mut (dyn Task + 'static)> {
        self.children
            .iter_mut()
            .map(|child| child.as_mut())
            .collect()
    }
}

/// A task paired with the weight that determines how likely it is to be
/// selected relative to the other tasks in a [`WeightedSelector`].
pub struct WeightedTask {
    task: Box<dyn Task>,
    weight: u32,
    /// Transient, valid only during one selection scan.
    skip: bool,
}

impl WeightedTask {
    pub fn new(task: Box<dyn Task>, weight: u32) -> Self {
        Self {
            task,
            weight,
            skip: false,
        }
    }

    pub fn weight(&self) -> u32 {
        self.weight
    }
}

/// Chooses which task to run at random.
///
/// Each task's weight determines how likely it is to be selected relative
/// to the others; equal weights make the selection uniform. A failing
/// choice is excluded and another draw is made within the same update
/// call, until something does not fail or every child has been tried.
pub struct WeightedSelector {
    rands: Randoms,
    children: Vec<WeightedTask>,
    cur_child: Option<usize>,
    state: TaskState,
}

impl WeightedSelector {
    pub fn new(rng: Box<dyn RandomStream>, children: Vec<WeightedTask>) -> Self {
        Self {
            rands: Randoms::new(rng),
            children,
            cur_child: None,
            state: TaskState::new(),
        }
    }

    pub fn add_task(&mut self, task: WeightedTask) -> &mut Self {
        self.children.push(task);
        self
    }

    pub fn reset(&mut self) {
        if let Some(index) = self.cur_child.take() {
            self.children[index].task.deactivate();
        }
    }

    fn update_task(&mut self, dt: f64) -> Status {
        // Are we already running a task?
        if let Some(index) = self.cur_child {
            let status = self.children[index].task.update(dt);

            // The task completed.
            if !status.is_running() {
                self.cur_child = None;
            }

            // Exit immediately, unless our task failed, in which case
            // we'll try to select another one below. The failed task is
            // not re-tried during this tick.
            if status != Status::Fail {
                return status;
            }
            self.children[index].skip = true;
        }

        loop {
            let Some(index) = self.choose_next_child() else {
                break;
            };
            // Skip this task on our next call to choose_next_child.
            self.children[index].skip = true;

            let status = self.children[index].task.update(dt);
            if status.is_running() {
                self.cur_child = Some(index);
            }

            // Exit immediately, unless our task failed, in which case
            // we'll try to select another one.
            if status != Status::Fail {
                self.reset_skipped_status();
                return status;
            }
        }

        self.reset_skipped_status();

        // All of our tasks failed.
        Status::Fail
    }

    /// One streaming draw over the unskipped children: the running total
    /// of weights grows per candidate, and a candidate replaces the
    /// current pick when a number drawn below the total lands under its
    /// own weight. The first candidate is picked outright.
    fn choose_next_child(&mut self) -> Option<usize> {
        let rands = &mut self.rands;
        let mut pick = None;
        let mut total = 0u32;
        for (index, child) in self.children.iter().enumerate() {
            if child.skip {
                continue;
            }
            total += child.weight;
            if pick.is_none() || rands.get_number(total as f64) < child.weight as f64 {
                pick = Some(index);
            }
        }
        pick
    }

    fn reset_skipped_status(&mut self) {
        for child in &mut self.children {
            child.skip = false;
        }
    }
}

impl Task for WeightedSelector {
    fn state(&self) -> &TaskState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut TaskState {
        &mut self.state
    }

    fn type_name(&self) -> &'static str {
        "WeightedSelector"
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
        self.children
            .iter()
            .map(|child| child.task.as_ref())
            .collect()
    }

    fn children_mut(&mut self) -> Vec<&mut (dyn Task + 'static)> {
        self.children
            .iter_mut()
            .map(|child| child.task.as_mut())
            .collect()
    }
}
