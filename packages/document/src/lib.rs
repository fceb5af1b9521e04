//! # Flowconf Document
//!
//! Text-level document model for pipeline configuration files.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ raw text (owned by the editor surface)      │
//! └─────────────────────────────────────────────┘
//!          ↓ parse()              ↓ resolve_context()
//! ┌──────────────────────┐  ┌──────────────────────────┐
//! │ ParsedDocument       │  │ CursorContext            │
//! │ mapping/seq/scalar   │  │ section/component/path   │
//! │ tree for validators  │  │ for completion + hover   │
//! └──────────────────────┘  └──────────────────────────┘
//! ```
//!
//! The context resolver and position mapper work on the raw text with an
//! indentation heuristic, so they stay useful while the document is
//! mid-edit and unparseable.

pub mod context;
pub mod kind;
pub mod parse;
pub mod position;
pub mod source;

pub use context::{resolve_context, CursorContext};
pub use kind::ComponentKind;
pub use parse::{parse, ParseError, ParseResult, ParsedDocument};
pub use position::find_position;
pub use source::Position;
