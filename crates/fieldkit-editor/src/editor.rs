//! The `AreaEditor`: one entry point per verb, one active machine at a
//! time.
//!
//! Calls return `Ok(true)` when an edit was registered, `Ok(false)` when
//! the machine parked waiting for input (queue more and call the verb with
//! `Mode::Resume`), and an error when the request was refused.

use tracing::debug;

use fieldkit_core::{AttributeSet, EditorConfig, EditSet};

use crate::error::{rejected, Result};
use crate::field_store::{FieldDescriptor, FieldStore};
use crate::input::InputSource;
use crate::machines::divide::DivideMachine;
use crate::machines::draw::DrawMachine;
use crate::machines::hole::HoleMachine;
use crate::machines::merge::MergeMachine;
use crate::machines::modify::ModifyMachine;
use crate::machines::move_areas::MoveMachine;
use crate::machines::Ctx;
use crate::mode::Mode;
use crate::presenter::Presenter;
use crate::undo::UndoLedger;

enum Verb {
    Idle,
    Draw(DrawMachine),
    Hole(HoleMachine),
    Modify(ModifyMachine),
    Divide(DivideMachine),
    Move(MoveMachine),
    Merge(MergeMachine),
}

/// The interactive area-editing engine.
pub struct AreaEditor {
    set: EditSet,
    cfg: EditorConfig,
    undo: UndoLedger,
    input: Box<dyn InputSource>,
    presenter: Box<dyn Presenter>,
    store: Box<dyn FieldStore>,
    verb: Verb,
}

impl AreaEditor {
    pub fn new(
        cfg: EditorConfig,
        input: Box<dyn InputSource>,
        presenter: Box<dyn Presenter>,
        store: Box<dyn FieldStore>,
    ) -> Self {
        Self {
            set: EditSet::new(),
            cfg,
            undo: UndoLedger::new(),
            input,
            presenter,
            store,
            verb: Verb::Idle,
        }
    }

    /// Replaces the working edit set, dropping undo history.
    pub fn load(&mut self, set: EditSet) {
        self.set = set;
        self.undo.clear();
        self.verb = Verb::Idle;
    }

    pub fn edit_set(&self) -> &EditSet {
        &self.set
    }

    pub fn config(&self) -> &EditorConfig {
        &self.cfg
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.depth()
    }

    pub fn is_dirty(&self) -> bool {
        self.undo.is_dirty()
    }

    /// Rolls back the most recent edit group. Refused while a group is
    /// still open (finish or cancel the edit first).
    pub fn undo(&mut self) -> Result<Option<String>> {
        if self.undo.is_frozen() {
            return rejected("finish or cancel the edit in progress");
        }
        Ok(self.undo.undo(&mut self.set))
    }

    /// Writes the edit set to the field store and marks it clean.
    pub fn commit_field(&mut self, desc: &FieldDescriptor, tag: &str) -> Result<()> {
        self.store.commit(desc, &self.set, tag)?;
        self.undo.mark_saved();
        Ok(())
    }

    /// Toggles label co-movement.
    ///
    /// Permitted while picking; refused mid-transform, with a one-time
    /// warning per move session.
    pub fn set_move_labels(&mut self, enabled: bool) -> Result<()> {
        if let Verb::Move(m) = &mut self.verb {
            if !m.at_pick() {
                if !m.label_warned {
                    self.presenter
                        .warn("finish the transform before changing label handling");
                    m.label_warned = true;
                }
                return rejected("label handling is fixed during a transform");
            }
        }
        self.cfg.move_labels = enabled;
        Ok(())
    }

    /// Draw new areas.
    pub fn draw(&mut self, mode: Mode, attrs: Option<&AttributeSet>) -> Result<bool> {
        match mode {
            Mode::Begin => {
                self.cancel_active()?;
                self.verb = Verb::Draw(DrawMachine::new(attrs.cloned().unwrap_or_default()));
                self.pump()
            }
            Mode::Resume => match self.verb {
                Verb::Draw(_) => self.pump(),
                _ => rejected("draw is not active"),
            },
            Mode::Set => match &mut self.verb {
                Verb::Draw(m) => {
                    m.attrs = attrs.cloned().unwrap_or_default();
                    Ok(false)
                }
                _ => rejected("draw is not active"),
            },
            Mode::PresetOutline(ring) => {
                if !matches!(self.verb, Verb::Draw(_)) {
                    self.cancel_active()?;
                    self.verb = Verb::Draw(DrawMachine::new(attrs.cloned().unwrap_or_default()));
                }
                let (verb, mut ctx) = self.parts();
                let Verb::Draw(m) = verb else { unreachable!() };
                m.place(&mut ctx, ring)
            }
            Mode::Cancel | Mode::CancelAll => self.cancel_active().map(|_| false),
            _ => rejected("mode not supported by draw"),
        }
    }

    /// Punch holes through areas.
    pub fn add_hole(&mut self, mode: Mode) -> Result<bool> {
        match mode {
            Mode::Begin => {
                self.cancel_active()?;
                self.verb = Verb::Hole(HoleMachine::new());
                self.pump()
            }
            Mode::Resume => match self.verb {
                Verb::Hole(_) => self.pump(),
                _ => rejected("hole is not active"),
            },
            Mode::Clear => match &mut self.verb {
                Verb::Hole(m) => {
                    m.reset();
                    Ok(false)
                }
                _ => rejected("hole is not active"),
            },
            Mode::Cancel | Mode::CancelAll => self.cancel_active().map(|_| false),
            _ => rejected("mode not supported by hole"),
        }
    }

    /// Reshape boundaries, holes and dividing lines; relabel and delete.
    pub fn modify(&mut self, mode: Mode, attrs: Option<&AttributeSet>) -> Result<bool> {
        match mode {
            Mode::Begin => {
                self.cancel_active()?;
                self.verb = Verb::Modify(ModifyMachine::new());
                self.pump()
            }
            Mode::Resume => match self.verb {
                Verb::Modify(_) => self.pump(),
                _ => rejected("modify is not active"),
            },
            Mode::Set => {
                let (verb, mut ctx) = self.parts();
                let Verb::Modify(m) = verb else {
                    return rejected("modify is not active");
                };
                match attrs {
                    Some(attrs) => m.set_attributes(&mut ctx, attrs),
                    None => m.confirm(&mut ctx),
                }
            }
            Mode::Delete => {
                let (verb, mut ctx) = self.parts();
                let Verb::Modify(m) = verb else {
                    return rejected("modify is not active");
                };
                m.delete(&mut ctx)
            }
            Mode::DeleteHole => {
                let (verb, mut ctx) = self.parts();
                let Verb::Modify(m) = verb else {
                    return rejected("modify is not active");
                };
                m.delete_hole(&mut ctx)
            }
            Mode::Stack(dir) => {
                let (verb, mut ctx) = self.parts();
                let Verb::Modify(m) = verb else {
                    return rejected("modify is not active");
                };
                m.stack(&mut ctx, dir)
            }
            Mode::Clear => match &mut self.verb {
                Verb::Modify(m) => {
                    m.reset();
                    Ok(false)
                }
                _ => rejected("modify is not active"),
            },
            Mode::Cancel | Mode::CancelAll => {
                self.release_frozen()?;
                if let Verb::Modify(m) = &mut self.verb {
                    m.reset();
                }
                Ok(false)
            }
            _ => rejected("mode not supported by modify"),
        }
    }

    /// Divide areas into attributed pieces; rejoin the last divide.
    pub fn divide(&mut self, mode: Mode, attrs: Option<&AttributeSet>) -> Result<bool> {
        match mode {
            Mode::Begin => {
                self.cancel_active()?;
                self.verb = Verb::Divide(DivideMachine::new());
                self.pump()
            }
            Mode::Resume => match self.verb {
                Verb::Divide(_) => self.pump(),
                _ => rejected("divide is not active"),
            },
            Mode::Set => {
                let (verb, mut ctx) = self.parts();
                let Verb::Divide(m) = verb else {
                    return rejected("divide is not active");
                };
                m.set_attrs(&mut ctx, attrs)
            }
            Mode::Rejoin => {
                let (verb, mut ctx) = self.parts();
                let Verb::Divide(m) = verb else {
                    return rejected("divide is not active");
                };
                m.rejoin(&mut ctx)
            }
            Mode::Cancel | Mode::CancelAll => {
                self.release_frozen()?;
                if let Verb::Divide(m) = &mut self.verb {
                    m.reset();
                }
                Ok(false)
            }
            _ => rejected("mode not supported by divide"),
        }
    }

    /// Move, copy, paste, transform and restack areas.
    pub fn move_areas(&mut self, mode: Mode) -> Result<bool> {
        if matches!(mode, Mode::Begin) {
            self.cancel_active()?;
            self.verb = Verb::Move(MoveMachine::new());
            return self.pump();
        }
        if matches!(mode, Mode::Cancel) {
            self.release_frozen()?;
            if let Verb::Move(m) = &mut self.verb {
                m.cancel();
            }
            return Ok(false);
        }
        if matches!(mode, Mode::CancelAll) {
            self.release_frozen()?;
            if let Verb::Move(m) = &mut self.verb {
                m.cancel_all();
            }
            return Ok(false);
        }
        let (verb, mut ctx) = self.parts();
        let Verb::Move(m) = verb else {
            return rejected("move is not active");
        };
        match mode {
            Mode::Resume => m.run(&mut ctx),
            Mode::Clear => {
                m.clear_picks();
                Ok(false)
            }
            Mode::SelectAll => m.select_all(&mut ctx),
            Mode::DrawOutline => m.draw_outline(&mut ctx),
            Mode::PresetOutline(ring) => m.preset_outline(&mut ctx, &ring),
            Mode::Translate => m.translate(&mut ctx),
            Mode::Rotate => m.rotate(&mut ctx),
            Mode::Cut => m.cut(&mut ctx),
            Mode::Copy => m.copy(&mut ctx),
            Mode::Paste => m.paste(&mut ctx),
            Mode::Stack(dir) => m.stack(&mut ctx, dir),
            _ => rejected("mode not supported by move"),
        }
    }

    /// Merge areas in from another field.
    pub fn merge(&mut self, mode: Mode) -> Result<bool> {
        if matches!(mode, Mode::Begin) {
            self.cancel_active()?;
            self.verb = Verb::Merge(MergeMachine::new());
            return self.pump();
        }
        if matches!(mode, Mode::Cancel) {
            self.release_frozen()?;
            if let Verb::Merge(m) = &mut self.verb {
                m.cancel();
            }
            return Ok(false);
        }
        if matches!(mode, Mode::CancelAll) {
            self.release_frozen()?;
            if let Verb::Merge(m) = &mut self.verb {
                m.cancel_all();
            }
            return Ok(false);
        }
        if let Mode::Fetch(desc) = mode {
            if !matches!(self.verb, Verb::Merge(_)) {
                self.cancel_active()?;
                self.verb = Verb::Merge(MergeMachine::new());
            }
            let Self {
                set,
                cfg,
                undo,
                input,
                presenter,
                store,
                verb,
            } = self;
            let mut ctx = Ctx {
                set,
                cfg,
                undo,
                input: input.as_mut(),
                presenter: presenter.as_mut(),
            };
            let Verb::Merge(m) = verb else { unreachable!() };
            return m.fetch(&mut ctx, store.as_ref(), &desc);
        }
        let (verb, mut ctx) = self.parts();
        let Verb::Merge(m) = verb else {
            return rejected("merge is not active");
        };
        match mode {
            Mode::Resume => m.run(&mut ctx),
            Mode::Clear => {
                m.clear_picks();
                Ok(false)
            }
            Mode::Merge => m.merge_now(&mut ctx),
            Mode::Translate => m.translate(&mut ctx),
            Mode::Rotate => m.rotate(&mut ctx),
            _ => rejected("mode not supported by merge"),
        }
    }

    /// Runs the active machine against the queued input.
    fn pump(&mut self) -> Result<bool> {
        let (verb, mut ctx) = self.parts();
        match verb {
            Verb::Idle => Ok(false),
            Verb::Draw(m) => m.run(&mut ctx),
            Verb::Hole(m) => m.run(&mut ctx),
            Verb::Modify(m) => m.run(&mut ctx),
            Verb::Divide(m) => m.run(&mut ctx),
            Verb::Move(m) => m.run(&mut ctx),
            Verb::Merge(m) => m.run(&mut ctx),
        }
    }

    /// Tears down the active verb, restoring any open edit group.
    fn cancel_active(&mut self) -> Result<()> {
        self.release_frozen()?;
        if !matches!(self.verb, Verb::Idle) {
            debug!("active verb cancelled");
        }
        self.verb = Verb::Idle;
        Ok(())
    }

    fn release_frozen(&mut self) -> Result<()> {
        if self.undo.is_frozen() {
            self.undo.reject(&mut self.set)?;
        }
        Ok(())
    }

    fn parts(&mut self) -> (&mut Verb, Ctx<'_>) {
        let Self {
            set,
            cfg,
            undo,
            input,
            presenter,
            verb,
            ..
        } = self;
        (
            verb,
            Ctx {
                set,
                cfg,
                undo,
                input: input.as_mut(),
                presenter: presenter.as_mut(),
            },
        )
    }
}
