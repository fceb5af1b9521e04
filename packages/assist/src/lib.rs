//! # Flowconf Assist
//!
//! Editor intelligence over the document text: context-aware completion
//! suggestions and inline property documentation.
//!
//! Both providers run per keystroke against the context resolver and
//! the schema cache; a missing schema means fewer suggestions, never an
//! error. Lines and columns at this API are 0-based, matching what the
//! editor surface hands over.

mod completion;
mod hover;
mod navigate;

pub use completion::{CompletionItem, CompletionProvider};
pub use hover::{Hover, HoverProvider};
pub use navigate::resolve_node;
