//! The name→value environment, an arena of frames.
//!
//! Frames form parent chains: a function call allocates a child of the frame
//! the function was defined in, giving lexical scope without an ownership
//! graph. Lookup walks the chain; binding always happens in the given frame,
//! so writes inside a call never leak into enclosing frames.

use crate::{
  collections::{HashMap, String as SmartString},
  value::Value,
};

/// The identifier of a frame within an [Environment]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameId(usize);

/// An arena of name→value frames
///
/// Frames are never freed during a run, a function value may keep any frame
/// reachable as its parent.
pub struct Environment<'a> {
  frames: Vec<Frame<'a>>,
}

struct Frame<'a> {
  parent: Option<FrameId>,
  variables: HashMap<SmartString, Value<'a>>,
}

impl<'a> Environment<'a> {
  /// Create an environment with only the global frame
  pub(crate) fn new() -> Self {
    Self {
      frames: vec![Frame {
        parent: None,
        variables: HashMap::default(),
      }],
    }
  }

  /// The global frame, the root of every parent chain
  pub(crate) fn global(&self) -> FrameId {
    FrameId(0)
  }

  /// Allocate a new empty frame with the given parent
  pub(crate) fn push_frame(&mut self, parent: FrameId) -> FrameId {
    let id = FrameId(self.frames.len());
    self.frames.push(Frame {
      parent: Some(parent),
      variables: HashMap::default(),
    });
    id
  }

  /// Bind a name in the given frame, replacing any existing binding there
  pub(crate) fn define(&mut self, frame: FrameId, name: impl Into<SmartString>, value: Value<'a>) {
    self.frames[frame.0].variables.insert(name.into(), value);
  }

  /// Look a name up in the given frame, then along its parent chain
  pub(crate) fn lookup(&self, frame: FrameId, name: &str) -> Option<&Value<'a>> {
    let mut current = Some(frame);

    while let Some(id) = current {
      let frame = &self.frames[id.0];
      if let Some(value) = frame.variables.get(name) {
        return Some(value);
      }
      current = frame.parent;
    }

    None
  }
}
