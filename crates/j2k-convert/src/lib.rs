//! The conversion engine and pass catalog.
//!
//! A host builds a Java-shaped tree, wires up an external resolver, and runs
//! [`ConversionEngine`] with [`default_conversions`] over the roots. What
//! comes out is a Kotlin-shaped tree plus diagnostics for everything the
//! passes could not translate.

pub mod context;
pub mod engine;
pub mod expr_ty;
pub mod passes;

pub use context::{ConversionContext, ConverterSettings};
pub use engine::{Conversion, ConversionEngine, EngineError, RunState};
pub use passes::default_conversions;
