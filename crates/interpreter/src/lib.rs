//! # Interpreter
//! The two execution engines for Gecco code and the pipeline between them:
//! a tree-walking interpreter which runs the AST directly, and a bytecode
//! compiler with a stack-based virtual machine.
//!
//! Both engines share their runtime values, operator semantics, frame-arena
//! environment, and the native-function table, so they agree on observable
//! output for every program.

mod bytecode;
mod compiler;
mod context;
mod environment;
mod error;
mod interpreter;
mod stdlib;
mod value;
mod vm;

/// More efficient datastructures than in standard library
pub(crate) mod collections {
  pub use rustc_hash::FxHashMap as HashMap;
  pub use smartstring::alias::String;
}


pub use bytecode::{Chunk, DecodeError, Function};
pub use compiler::compile;
pub use context::Context;
pub use error::RuntimeError;
pub use interpreter::Interpreter;
pub use stdlib::NativeFunction;
pub use value::{Closure, CompiledClosure, Value};
pub use vm::VM;
