//! Stateless boolean checks, composable with and/or/not.
//!
//! A predicate derives its result purely from `evaluate`; it holds no
//! cross-tick state of its own, though it may read external mutable state
//! such as a blackboard entry. [`PredicateTask`] adapts a predicate into
//! the task status contract (`true` maps to SUCCESS).

use crate::{Entry, Status, Task, TaskState};

pub trait Predicate {
    fn evaluate(&self) -> bool;

    fn type_name(&self) -> &'static str;
}

/// A fixed boolean.
pub struct ConstPredicate {
    value: bool,
}

impl ConstPredicate {
    pub const TRUE: ConstPredicate = ConstPredicate { value: true };
    pub const FALSE: ConstPredicate = ConstPredicate { value: false };

    pub const fn new(value: bool) -> Self {
        Self { value }
    }
}

impl Predicate for ConstPredicate {
    fn evaluate(&self) -> bool {
        self.value
    }

    fn type_name(&self) -> &'static str {
        "ConstPredicate"
    }
}

/// Calls a closure.
pub struct FunctionPredicate<F> {
    f: F,
}

impl<F: Fn() -> bool> FunctionPredicate<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F: Fn() -> bool> Predicate for FunctionPredicate<F> {
    fn evaluate(&self) -> bool {
        (self.f)()
    }

    fn type_name(&self) -> &'static str {
        "FunctionPredicate"
    }
}

pub struct NotPredicate {
    pred: Box<dyn Predicate>,
}

impl NotPredicate {
    pub fn new(pred: Box<dyn Predicate>) -> Self {
        Self { pred }
    }
}

impl Predicate for NotPredicate {
    fn evaluate(&self) -> bool {
        !self.pred.evaluate()
    }

    fn type_name(&self) -> &'static str {
        "NotPredicate"
    }
}

/// True iff every inner predicate is true. Empty is true.
pub struct AndPredicate {
    preds: Vec<Box<dyn Predicate>>,
}

impl AndPredicate {
    pub fn new(preds: Vec<Box<dyn Predicate>>) -> Self {
        Self { preds }
    }

    pub fn add_pred(&mut self, pred: Box<dyn Predicate>) {
        self.preds.push(pred);
    }
}

impl Predicate for AndPredicate {
    fn evaluate(&self) -> bool {
        self.preds.iter().all(|pred| pred.evaluate())
    }

    fn type_name(&self) -> &'static str {
        "AndPredicate"
    }
}

/// True iff any inner predicate is true. Empty is false.
pub struct OrPredicate {
    preds: Vec<Box<dyn Predicate>>,
}

impl OrPredicate {
    pub fn new(preds: Vec<Box<dyn Predicate>>) -> Self {
        Self { preds }
    }

    pub fn add_pred(&mut self, pred: Box<dyn Predicate>) {
        self.preds.push(pred);
    }
}

impl Predicate for OrPredicate {
    fn evaluate(&self) -> bool {
        self.preds.iter().any(|pred| pred.evaluate())
    }

    fn type_name(&self) -> &'static str {
        "OrPredicate"
    }
}

pub struct EntryExistsPred {
    entry: Box<dyn Entry>,
}

impl EntryExistsPred {
    pub fn new(entry: Box<dyn Entry>) -> Self {
        Self { entry }
    }
}

impl Predicate for EntryExistsPred {
    fn evaluate(&self) -> bool {
        self.entry.exists()
    }

    fn type_name(&self) -> &'static str {
        "EntryExistsPred"
    }
}

pub struct EntryNotExistsPred {
    entry: Box<dyn Entry>,
}

impl EntryNotExistsPred {
    pub fn new(entry: Box<dyn Entry>) -> Self {
        Self { entry }
    }
}

impl Predicate for EntryNotExistsPred {
    fn evaluate(&self) -> bool {
        !self.entry.exists()
    }

    fn type_name(&self) -> &'static str {
        "EntryNotExistsPred"
    }
}

/// True iff the entry exists and holds a value of type `T` equal to the
/// expected one. A missing or differently typed value evaluates false
/// rather than raising an error.
pub struct EntryEqualsPred<T> {
    entry: Box<dyn Entry>,
    expected: T,
}

impl<T: PartialEq + 'static> EntryEqualsPred<T> {
    pub fn new(entry: Box<dyn Entry>, expected: T) -> Self {
        Self { entry, expected }
    }
}

impl<T: PartialEq + 'static> Predicate for EntryEqualsPred<T> {
    fn evaluate(&self) -> bool {
        self.entry
            .value::<T>()
            .map_or(false, |val| *val == self.expected)
    }

    fn type_name(&self) -> &'static str {
        "EntryEqualsPred"
    }
}

/// Exposes a predicate through the task status contract.
pub struct PredicateTask {
    pred: Box<dyn Predicate>,
    state: TaskState,
}

impl PredicateTask {
    pub fn new(pred: Box<dyn Predicate>) -> Self {
        Self {
            pred,
            state: TaskState::new(),
        }
    }
}

impl Task for PredicateTask {
    fn state(&self) -> &TaskState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut TaskState {
        &mut self.state
    }

    fn type_name(&self) -> &'static str {
        self.pred.type_name()
    }

    fn update(&mut self, _dt: f64) -> Status {
        let status = if self.pred.evaluate() {
            Status::Success
        } else {
            Status::Fail
        };
        self.state.record(status)
    }
}
