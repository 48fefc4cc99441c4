//! The presentation seam.
//!
//! The engine narrates what it needs and shows working geometry through a
//! [`Presenter`]; embedders wire this to their status line and map pane.

use std::cell::RefCell;
use std::rc::Rc;

use fieldkit_geom::Polyline;

/// Sink for engine feedback.
pub trait Presenter {
    /// Prompt or progress text for the status line.
    fn status(&mut self, text: &str);

    /// Non-fatal problem worth the user's attention.
    fn warn(&mut self, text: &str);

    /// Working geometry to echo on the map (drawn segments, candidates).
    fn preview(&mut self, curve: &Polyline);

    /// Drop any echoed working geometry.
    fn clear(&mut self);
}

/// Presenter that discards everything.
#[derive(Debug, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn status(&mut self, _text: &str) {}
    fn warn(&mut self, _text: &str) {}
    fn preview(&mut self, _curve: &Polyline) {}
    fn clear(&mut self) {}
}

#[derive(Debug, Default)]
struct Record {
    statuses: Vec<String>,
    warnings: Vec<String>,
    previews: usize,
}

/// Presenter that records everything, for tests and headless runs.
///
/// Cloning yields another handle onto the same record.
#[derive(Debug, Clone, Default)]
pub struct RecordingPresenter {
    record: Rc<RefCell<Record>>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn statuses(&self) -> Vec<String> {
        self.record.borrow().statuses.clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.record.borrow().warnings.clone()
    }

    pub fn last_status(&self) -> Option<String> {
        self.record.borrow().statuses.last().cloned()
    }

    pub fn preview_count(&self) -> usize {
        self.record.borrow().previews
    }
}

impl Presenter for RecordingPresenter {
    fn status(&mut self, text: &str) {
        self.record.borrow_mut().statuses.push(text.to_string());
    }

    fn warn(&mut self, text: &str) {
        self.record.borrow_mut().warnings.push(text.to_string());
    }

    fn preview(&mut self, _curve: &Polyline) {
        self.record.borrow_mut().previews += 1;
    }

    fn clear(&mut self) {}
}
