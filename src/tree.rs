//! The tree driver: owns a root task, relays ticks and optionally renders
//! a human readable trace.

use crate::{Status, Task};

/// Owns the root of a task tree and drives it with [`BehaviorTree::update`].
pub struct BehaviorTree {
    root: Box<dyn Task>,
    /// If true, every update renders a human readable description of the
    /// tree state. This is slow and should not be enabled in production.
    pub debug: bool,
    /// If both this and `debug` are true, the tree status is also emitted
    /// through `log::debug!` every update.
    pub debug_print: bool,
    last_tree_status: String,
}

impl BehaviorTree {
    pub fn new(root: Box<dyn Task>) -> Self {
        Self {
            root,
            debug: false,
            debug_print: false,
            last_tree_status: String::new(),
        }
    }

    /// The rendered status of the tree as of the last update. Empty unless
    /// `debug` is set.
    pub fn tree_status(&self) -> &str {
        &self.last_tree_status
    }

    pub fn root(&self) -> &dyn Task {
        self.root.as_ref()
    }

    /// Ticks the whole tree once.
    pub fn update(&mut self, dt: f64) -> Status {
        if self.debug {
            clear_status(self.root.as_mut());
        }

        let status = self.root.update(dt);

        if self.debug {
            self.last_tree_status = status_string(self.root.as_ref(), 0);
            if self.debug_print {
                log::debug!("{}", self.last_tree_status);
            }
        }

        status
    }

    /// Cancels the whole tree, cascading cleanup through every node that
    /// is still running.
    pub fn deactivate(&mut self) {
        self.root.deactivate();
    }
}

/// Nodes the tick does not reach show as INACTIVE in the trace.
fn clear_status(task: &mut dyn Task) {
    task.state_mut().clear();
    for child in task.children_mut() {
        clear_status(child);
    }
}

/// One line per node, `[description]:STATUSNAME`, depth shown with a
/// repeated `- ` marker.
fn status_string(task: &dyn Task, depth: usize) -> String {
    let mut out = String::new();
    if depth > 0 {
        out.push('\n');
        for _ in 0..depth {
            out.push_str("- ");
        }
    }

    out.push('[');
    out.push_str(&task.description());
    out.push_str("]:");
    out.push_str(task.last_status().name());

    for child in task.children() {
        out.push_str(&status_string(child, depth + 1));
    }

    out
}
