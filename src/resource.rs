//! Resource arbitration without real concurrency primitives.
//!
//! Safety here relies purely on call ordering within a single tick; see
//! the concurrency notes in the crate docs.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A semaphore handle shared between the decorators gating on it.
pub type SharedSemaphore = Rc<RefCell<Semaphore>>;

/// A scoped resource handle shared between the scopes using it.
pub type SharedResource = Rc<RefCell<dyn ScopedResource>>;

/// Used with `ScopeDecorator` to run logic when a task is entered and
/// exited.
pub trait ScopedResource {
    /// Called when the scope is entered. Modify state, acquire resources.
    fn acquire(&mut self);

    /// Called when the scope is exited. Restore state, release resources.
    fn release(&mut self);
}

/// A bounded counting gate: at most `max_users` concurrent holders.
///
/// Acquisition is manual and never blocks; a failed [`Semaphore::acquire`]
/// simply returns false and the caller retries on a later tick.
pub struct Semaphore {
    name: String,
    max_users: u32,
    ref_count: u32,
}

impl Semaphore {
    pub fn new(name: impl Into<String>, max_users: u32) -> Self {
        Self {
            name: name.into(),
            max_users,
            ref_count: 0,
        }
    }

    /// A semaphore ready to be shared between several decorators.
    pub fn shared(name: impl Into<String>, max_users: u32) -> SharedSemaphore {
        Rc::new(RefCell::new(Self::new(name, max_users)))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_acquired(&self) -> bool {
        self.ref_count > 0
    }

    /// Takes one slot if any is free. Returns whether the caller now holds
    /// the semaphore.
    pub fn acquire(&mut self) -> bool {
        if self.ref_count < self.max_users {
            self.ref_count += 1;
            true
        } else {
            log::trace!(
                "semaphore {} at capacity ({}/{})",
                self.name,
                self.ref_count,
                self.max_users
            );
            false
        }
    }

    /// Returns one slot.
    ///
    /// # Panics
    ///
    /// Panics when no slot is held. An unmatched release is a programming
    /// error, not a recoverable failure.
    pub fn release(&mut self) {
        assert!(
            self.ref_count > 0,
            "semaphore {}: release with refCount 0",
            self.name
        );
        self.ref_count -= 1;
    }
}

impl fmt::Display for Semaphore {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[name={}, refCount={}]", self.name, self.ref_count)
    }
}

#[cfg(test)]
mod test {
    use super::Semaphore;

    #[test]
    fn bounded_acquire() {
        let mut sem = Semaphore::new("door", 1);
        assert!(sem.acquire());
        assert!(sem.is_acquired());
        assert!(!sem.acquire());
        sem.release();
        assert!(sem.acquire());
    }

    #[test]
    fn multiple_users() {
        let mut sem = Semaphore::new("well", 2);
        assert!(sem.acquire());
        assert!(sem.acquire());
        assert!(!sem.acquire());
        sem.release();
        assert!(sem.acquire());
    }

    #[test]
    #[should_panic(expected = "refCount 0")]
    fn unmatched_release_is_fatal() {
        let mut sem = Semaphore::new("door", 1);
        sem.release();
    }

    #[test]
    fn display_shows_name_and_refcount() {
        let mut sem = Semaphore::new("door", 1);
        sem.acquire();
        assert_eq!(sem.to_string(), "[name=door, refCount=1]");
    }
}
