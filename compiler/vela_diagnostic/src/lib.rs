//! Diagnostic system for rich error reporting.
//!
//! Errors are reported, not thrown: every pass writes into a bounded
//! [`DiagnosticQueue`] and runs to completion. Each diagnostic carries an
//! error code, a severity, a message, and one or two labeled source spans;
//! the emitter renders them as annotated snippets.

pub mod emitter;

mod diagnostic;
mod error_code;
mod queue;
mod source_map;

pub use diagnostic::{Diagnostic, Label, LabelStyle, Severity};
pub use error_code::{ErrorCode, Phase};
pub use queue::{DiagnosticQueue, DEFAULT_CAPACITY};
pub use source_map::{LineCol, SourceFile};
