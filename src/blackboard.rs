//! The key/value store tasks communicate through.
//!
//! A [`Blackboard`] maps interned [`Symbol`] keys to value slots. Slots are
//! created lazily on first access and never deleted; removing a value
//! stores the absence sentinel (`None`) in the slot, so every handle that
//! was ever obtained for a key keeps observing the same storage.
//!
//! Values are type erased as `Rc<dyn Any>`, with typed access through
//! `value::<T>()`. A read with the wrong type behaves like a missing
//! value rather than an error.

use crate::Symbol;
use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Read access to a named value, shared by blackboard-backed and constant
/// entries.
pub trait Entry {
    /// True iff a value (not the absence sentinel) is stored.
    fn exists(&self) -> bool;

    /// The stored value, type erased.
    fn get_any(&self) -> Option<Rc<dyn Any>>;
}

impl dyn Entry {
    /// Typed read. `None` when the entry is absent or holds a value of a
    /// different type.
    pub fn value<T: 'static>(&self) -> Option<Rc<T>> {
        self.get_any().and_then(|val| val.downcast::<T>().ok())
    }
}

/// The canonical mutable entry: a cheaply clonable handle on one
/// blackboard slot.
#[derive(Clone, Default)]
pub struct BlackboardEntry {
    slot: Rc<RefCell<Option<Rc<dyn Any>>>>,
}

impl BlackboardEntry {
    pub fn exists(&self) -> bool {
        self.slot.borrow().is_some()
    }

    /// Typed read. `None` when the entry is absent or holds a value of a
    /// different type.
    pub fn value<T: 'static>(&self) -> Option<Rc<T>> {
        self.get_any().and_then(|val| val.downcast::<T>().ok())
    }

    /// Stores a value for this entry.
    pub fn store<T: 'static>(&self, value: T) {
        self.store_shared(Rc::new(value));
    }

    /// Stores an already shared value without another allocation.
    pub fn store_shared(&self, value: Rc<dyn Any>) {
        *self.slot.borrow_mut() = Some(value);
    }

    /// Stores the absence sentinel. The slot itself survives, so other
    /// handles keep observing it.
    pub fn remove(&self) {
        *self.slot.borrow_mut() = None;
    }
}

impl Entry for BlackboardEntry {
    fn exists(&self) -> bool {
        BlackboardEntry::exists(self)
    }

    fn get_any(&self) -> Option<Rc<dyn Any>> {
        self.slot.borrow().clone()
    }
}

/// An immutable entry wrapping a constant. Always exists.
pub struct StaticEntry {
    value: Rc<dyn Any>,
}

impl StaticEntry {
    pub fn new<T: 'static>(value: T) -> Self {
        Self {
            value: Rc::new(value),
        }
    }
}

impl Entry for StaticEntry {
    fn exists(&self) -> bool {
        true
    }

    fn get_any(&self) -> Option<Rc<dyn Any>> {
        Some(self.value.clone())
    }
}

/// Named, lazily created mutable slots holding arbitrary values.
///
/// ```rust
/// use behavior_tree_engine::Blackboard;
///
/// let mut bb = Blackboard::default();
/// bb.entry("gold").store(12u32);
/// assert_eq!(bb.entry("gold").value::<u32>().as_deref(), Some(&12));
/// bb.entry("gold").remove();
/// assert!(!bb.contains("gold"));
/// ```
#[derive(Default)]
pub struct Blackboard {
    slots: HashMap<Symbol, BlackboardEntry>,
}

impl Blackboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// The entry for `key`, creating an empty slot on first access. The
    /// returned handle stays connected to the blackboard.
    pub fn entry(&mut self, key: impl Into<Symbol>) -> BlackboardEntry {
        self.slots.entry(key.into()).or_default().clone()
    }

    /// True iff the slot was created and currently holds a value.
    pub fn contains(&self, key: impl Into<Symbol>) -> bool {
        self.slots
            .get(&key.into())
            .map_or(false, BlackboardEntry::exists)
    }

    /// Wraps a constant as an [`Entry`].
    pub fn static_entry<T: 'static>(value: T) -> StaticEntry {
        StaticEntry::new(value)
    }
}
