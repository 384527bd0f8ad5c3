//! EC IR - the immutable instruction table the interpreter runs over.
//!
//! EC source is line-oriented: one statement per line, the first
//! whitespace-delimited word selecting the command. This crate resolves that
//! word once per line into a closed [`Keyword`] set, so the validator, the
//! block scanner and the engine all agree on what each line is.
//!
//! # Architecture
//!
//! ```text
//! source text
//!     │
//!     ▼
//! Program::parse() ──► Vec<SourceLine> (text + LineHead + args)
//!     │
//!     ├──► validate()          one forward pass, per-kind depth counters
//!     └──► find_block_end()    on-demand forward scans used by the engine
//! ```

mod block;
mod keyword;
mod program;
mod validate;

pub use block::{BlockKind, BranchPoint, Edge, IfBranches};
pub use keyword::Keyword;
pub use program::{LineHead, Program, SourceLine};
pub use validate::validate;
