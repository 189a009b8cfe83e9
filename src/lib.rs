//! Batch-edit element text across a set of XML documents.
//!
//! Load a batch of files, pick a tag, then either numerically increment the
//! matched elements' text or replace it with a literal value, and write each
//! document back to its original path in the encoding it was read with.
//!
//! ```no_run
//! use xml_batch_edit::Session;
//!
//! let mut session = Session::new();
//! let outcome = session.load(&["a.xml", "b.xml"])?;
//! println!("{} files loaded", outcome.loaded);
//! for result in session.increment("count", 1)? {
//!     if let Err(err) = result.result {
//!         eprintln!("{}: {}", result.path.display(), err);
//!     }
//! }
//! # Ok::<(), xml_batch_edit::Error>(())
//! ```
//!
//! The document tree itself is also public: [`Document`] parses XML into an
//! arena of elements, [`Element`] is a `Copy` handle into it, and
//! [`Document::write_with_encoding`] serializes back out through
//! [`encoding_rs`].

mod document;
pub mod edit;
mod element;
pub mod encoding;
mod error;
mod parser;
mod session;
pub mod tags;

pub use crate::document::{Document, Node, ReadOptions};
pub use crate::edit::Operation;
pub use crate::element::{Element, ElementData};
pub use crate::error::{Error, Result};
pub use crate::parser::decode_entities;
pub use crate::session::{FileFailure, FileOutcome, LoadOutcome, LoadedDocument, Session};
pub use crate::tags::TagIndex;
