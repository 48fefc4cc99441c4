//! The device-input seam.
//!
//! The engine never blocks: it pulls points and curves from an
//! [`InputSource`] and, when nothing is queued, returns with its state
//! machine parked exactly where it stopped. The embedder queues more input
//! and calls the verb again with `Mode::Resume`.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use fieldkit_geom::{Point, Polyline};

/// Pointer button accompanying a picked point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// The pick/confirm button.
    Primary,
    /// Any other button; tools treat it as "done here" or refuse it.
    Secondary,
}

/// Source of pointer input for the engine.
pub trait InputSource {
    /// Next picked point, or `None` when the device has nothing queued.
    fn next_point(&mut self) -> Option<(Point, Button)>;

    /// Next drawn curve, or `None` when the device has nothing queued.
    fn next_curve(&mut self) -> Option<Polyline>;
}

#[derive(Debug, Default)]
struct Queues {
    points: VecDeque<(Point, Button)>,
    curves: VecDeque<Polyline>,
}

/// A scripted input source backed by shared queues.
///
/// Cloning yields another handle onto the same queues, so a test (or a UI
/// event loop) can keep feeding input to an engine that owns the other
/// handle.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    queues: Rc<RefCell<Queues>>,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_point(&self, x: f64, y: f64) {
        self.queues
            .borrow_mut()
            .points
            .push_back((Point::new(x, y), Button::Primary));
    }

    pub fn push_click(&self, x: f64, y: f64, button: Button) {
        self.queues
            .borrow_mut()
            .points
            .push_back((Point::new(x, y), button));
    }

    pub fn push_curve(&self, points: Vec<(f64, f64)>) {
        let line = Polyline::from_points(points.into_iter().map(Point::from).collect());
        self.queues.borrow_mut().curves.push_back(line);
    }

    pub fn is_drained(&self) -> bool {
        let q = self.queues.borrow();
        q.points.is_empty() && q.curves.is_empty()
    }
}

impl InputSource for ScriptedInput {
    fn next_point(&mut self) -> Option<(Point, Button)> {
        self.queues.borrow_mut().points.pop_front()
    }

    fn next_curve(&mut self) -> Option<Polyline> {
        self.queues.borrow_mut().curves.pop_front()
    }
}
