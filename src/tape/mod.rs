//! A small reverse-mode taping engine.
//!
//! Operations on [`ADouble`] values are recorded into a [`Tape`] between
//! [`trace_on`] and [`trace_off`]. The finished tape is kept under its
//! [`TapeTag`] and can be evaluated again at new inputs with [`function`],
//! [`gradient`] and [`jacobian`].
//!
//! Recording state is per thread. Two threads can record under the same tag
//! without seeing each other.

mod adouble;
mod driver;

pub use adouble::ADouble;
pub use driver::{function, gradient, jacobian};

use std::{
    cell::RefCell,
    collections::HashMap,
    marker::PhantomData,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use daggy::{Dag, NodeIndex, Walker};

use crate::{
    error::{Error, Result, TapeTag},
    ntraits::RecordingContext,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Op {
    /// The n-th independent variable.
    Independent(usize),
    Const(f64),
    Add,
    Sub,
    Mul,
    Div,
    Neg,
    Powi(i32),
    Powf,
    Sin,
    Cos,
    Exp,
    Ln,
    Sqrt,
}

impl Op {
    #[inline]
    pub(crate) fn eval(self, a: f64, b: f64) -> f64 {
        match self {
            Op::Independent(_) | Op::Const(_) => a,
            Op::Add => a + b,
            Op::Sub => a - b,
            Op::Mul => a * b,
            Op::Div => a / b,
            Op::Neg => -a,
            Op::Powi(n) => a.powi(n),
            Op::Powf => a.powf(b),
            Op::Sin => a.sin(),
            Op::Cos => a.cos(),
            Op::Exp => a.exp(),
            Op::Ln => a.ln(),
            Op::Sqrt => a.sqrt(),
        }
    }

    /// Partial derivatives with respect to both arguments, given the
    /// arguments and the result.
    #[inline]
    pub(crate) fn partials(self, a: f64, b: f64, out: f64) -> (f64, f64) {
        match self {
            Op::Independent(_) | Op::Const(_) => (0.0, 0.0),
            Op::Add => (1.0, 1.0),
            Op::Sub => (1.0, -1.0),
            Op::Mul => (b, a),
            Op::Div => (1.0 / b, -a / (b * b)),
            Op::Neg => (-1.0, 0.0),
            Op::Powi(0) => (0.0, 0.0),
            Op::Powi(n) => (n as f64 * a.powi(n - 1), 0.0),
            Op::Powf => (b * a.powf(b - 1.0), out * a.ln()),
            Op::Sin => (a.cos(), 0.0),
            Op::Cos => (-a.sin(), 0.0),
            Op::Exp => (out, 0.0),
            Op::Ln => (1.0 / a, 0.0),
            Op::Sqrt => (0.5 / out, 0.0),
        }
    }

    #[inline]
    pub(crate) fn is_binary(self) -> bool {
        matches!(self, Op::Add | Op::Sub | Op::Mul | Op::Div | Op::Powf)
    }
}

/// Which argument of an operation an edge feeds.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Slot {
    Lhs,
    Rhs,
}

/// A recorded computation. Node indices follow recording order, which is
/// also a valid evaluation order.
pub struct Tape {
    tag: TapeTag,
    pub(crate) graph: Dag<Op, Slot>,
    pub(crate) independents: Vec<NodeIndex>,
    pub(crate) dependents: Vec<NodeIndex>,
}

impl Tape {
    fn new(tag: TapeTag) -> Self {
        Self {
            tag,
            graph: Dag::new(),
            independents: Vec::new(),
            dependents: Vec::new(),
        }
    }

    #[inline]
    pub fn tag(&self) -> TapeTag {
        self.tag
    }

    #[inline]
    pub fn num_operations(&self) -> usize {
        self.graph.node_count()
    }

    #[inline]
    pub fn num_independents(&self) -> usize {
        self.independents.len()
    }

    #[inline]
    pub fn num_dependents(&self) -> usize {
        self.dependents.len()
    }

    pub(crate) fn args(&self, node: NodeIndex) -> (Option<NodeIndex>, Option<NodeIndex>) {
        let mut args = (None, None);
        for (edge, parent) in self.graph.parents(node).iter(&self.graph) {
            match self.graph.edge_weight(edge) {
                Some(Slot::Lhs) => args.0 = Some(parent),
                Some(Slot::Rhs) => args.1 = Some(parent),
                None => {}
            }
        }
        args
    }

    pub fn stats(&self) -> TapeStats {
        TapeStats {
            tag: self.tag,
            operations: self.num_operations(),
            independents: self.num_independents(),
            dependents: self.num_dependents(),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TapeStats {
    pub tag: TapeTag,
    pub operations: usize,
    pub independents: usize,
    pub dependents: usize,
}

/// Position of an active value on the tape being recorded.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Location {
    recording: u64,
    node: NodeIndex,
}

pub(crate) struct Recorder {
    id: u64,
    tape: Tape,
    corrupted: bool,
}

impl Recorder {
    /// Node of `location` if it belongs to this recording.
    #[inline]
    pub(crate) fn node(&self, location: Option<Location>) -> Option<NodeIndex> {
        location
            .filter(|location| location.recording == self.id)
            .map(|location| location.node)
    }

    #[inline]
    pub(crate) fn locate(&self, node: NodeIndex) -> Location {
        Location {
            recording: self.id,
            node,
        }
    }

    pub(crate) fn push_independent(&mut self) -> NodeIndex {
        let position = self.tape.independents.len();
        let node = self.tape.graph.add_node(Op::Independent(position));
        self.tape.independents.push(node);
        log::trace!("independent {} at node {}", position, node.index());
        node
    }

    pub(crate) fn push_dependent(&mut self, node: NodeIndex) {
        log::trace!("dependent {} at node {}", self.tape.dependents.len(), node.index());
        self.tape.dependents.push(node);
    }

    #[inline]
    pub(crate) fn push_const(&mut self, value: f64) -> NodeIndex {
        self.tape.graph.add_node(Op::Const(value))
    }

    #[inline]
    pub(crate) fn push_unary(&mut self, op: Op, arg: NodeIndex) -> NodeIndex {
        let (_, node) = self.tape.graph.add_child(arg, Slot::Lhs, op);
        node
    }

    pub(crate) fn push_binary(&mut self, op: Op, lhs: NodeIndex, rhs: NodeIndex) -> NodeIndex {
        let (_, node) = self.tape.graph.add_child(lhs, Slot::Lhs, op);
        // node is a fresh sink, so this edge can't close a cycle
        if self.tape.graph.add_edge(rhs, node, Slot::Rhs).is_err() {
            self.corrupted = true;
        }
        node
    }
}

#[derive(Default)]
struct Engine {
    recording: Option<Recorder>,
    tapes: HashMap<TapeTag, Arc<Tape>>,
}

// recording ids are process wide so an ADouble carried to another thread
// never matches that thread's recording
static NEXT_RECORDING: AtomicU64 = AtomicU64::new(0);

thread_local! {
    static ENGINE: RefCell<Engine> = RefCell::new(Engine::default());
}

/// Runs `f` against the active recording, if there is one.
#[inline]
pub(crate) fn with_recorder<R>(f: impl FnOnce(&mut Recorder) -> R) -> Option<R> {
    ENGINE.with(|engine| engine.borrow_mut().recording.as_mut().map(f))
}

/// Starts recording on this thread under `tag`.
pub fn trace_on(tag: TapeTag) -> Result<()> {
    ENGINE.with(|engine| {
        let mut engine = engine.borrow_mut();
        if let Some(recorder) = &engine.recording {
            return Err(Error::AlreadyRecording(recorder.tape.tag));
        }
        let id = NEXT_RECORDING.fetch_add(1, Ordering::Relaxed);
        engine.recording = Some(Recorder {
            id,
            tape: Tape::new(tag),
            corrupted: false,
        });
        log::debug!("trace_on {}", tag);
        Ok(())
    })
}

/// Stops recording and stores the tape under its tag, replacing any tape
/// previously recorded under the same tag.
pub fn trace_off() -> Result<TapeStats> {
    ENGINE.with(|engine| {
        let mut engine = engine.borrow_mut();
        let recorder = engine.recording.take().ok_or(Error::NotRecording)?;
        let tag = recorder.tape.tag;
        if recorder.corrupted {
            return Err(Error::Corrupted(tag));
        }
        let stats = recorder.tape.stats();
        log::debug!(
            "trace_off {}: {} operations, {} independents, {} dependents",
            tag,
            stats.operations,
            stats.independents,
            stats.dependents
        );
        engine.tapes.insert(tag, Arc::new(recorder.tape));
        Ok(stats)
    })
}

/// Tag of the tape recording on this thread.
#[inline]
pub fn active_tape() -> Option<TapeTag> {
    ENGINE.with(|engine| engine.borrow().recording.as_ref().map(|r| r.tape.tag))
}

/// A finished tape recorded on this thread.
pub fn tape(tag: TapeTag) -> Result<Arc<Tape>> {
    ENGINE.with(|engine| engine.borrow().tapes.get(&tag).cloned().ok_or(Error::UnknownTape(tag)))
}

/// Recording state of the current thread.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ThreadTape;

impl RecordingContext for ThreadTape {
    #[inline]
    fn active_tape(&self) -> Option<TapeTag> {
        active_tape()
    }
}

/// Keeps a trace open until [`Trace::finish`] or drop.
///
/// The trace belongs to the thread that began it, so the guard is not
/// `Send`:
///
/// ```compile_fail
/// fn assert_send<T: Send>() {}
/// assert_send::<ntraits::Trace>();
/// ```
pub struct Trace {
    finished: bool,
    _thread: PhantomData<*const ()>,
}

impl Trace {
    pub fn begin(tag: TapeTag) -> Result<Self> {
        trace_on(tag)?;
        Ok(Self {
            finished: false,
            _thread: PhantomData,
        })
    }

    pub fn finish(mut self) -> Result<TapeStats> {
        self.finished = true;
        trace_off()
    }
}

impl Drop for Trace {
    fn drop(&mut self) {
        if !self.finished {
            if let Err(err) = trace_off() {
                log::warn!("trace dropped without finishing cleanly: {}", err);
            }
        }
    }
}

#[cfg(test)]
#[path = "./tape_test.rs"]
mod tests;
