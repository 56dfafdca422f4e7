//! domkit - structural DOM surgery over an in-memory document
//!
//! Helpers for finding, creating, wrapping and unwrapping elements while
//! keeping sibling order intact. BODY is the boundary: nothing at or above it
//! is ever wrapped, unwrapped or removed.
//!
//! ## Core Design
//!
//! ```text
//! wrap_deeply ──> wrap_around ──> accessor / factory
//! unwrap ───────> nesting ──────> accessor
//!                       │
//!                  Document (DomArena, NodeId = u32)
//! ```
//!
//! ## Example
//!
//! ```
//! use domkit::{wrap_around, unwrap, Document, UnwrapOptions};
//!
//! let mut doc = Document::from_json_str(
//!     r#"{"tag":"body","children":[{"tag":"b"},{"tag":"span"},{"tag":"i"}]}"#,
//! )?;
//! let div = wrap_around(&mut doc, "span", "div", None)?;
//! assert_eq!(domkit::nesting_depth(&doc, "span"), Some(1));
//!
//! assert_eq!(unwrap(&mut doc, "span", UnwrapOptions::default())?, Some(div));
//! assert_eq!(domkit::nesting_depth(&doc, "span"), Some(0));
//! # Ok::<(), domkit::DomError>(())
//! ```

pub mod accessor;
pub mod arena;
pub mod console;
pub mod document;
pub mod element_ref;
pub mod error;
pub mod factory;
pub mod nesting;
pub mod pipeline;
pub mod serializer;
pub mod style;
pub mod types;
pub mod unwrap;
pub mod utils;
pub mod wrap;

pub use accessor::{resolve, resolve_all, NodeRef};
pub use arena::{AdjacentPosition, DomArena};
pub use console::Console;
pub use document::Document;
pub use element_ref::{ElementRef, Selector};
pub use error::{DomError, Result};
pub use factory::{create, create_all};
pub use nesting::{ancestor_chain, ancestors, nesting_depth, print_ancestors};
pub use pipeline::{Insertion, Position};
pub use serializer::{DomSerializer, SerializerConfig};
pub use style::{apply_style, inline_style_dump, print_inline_styles, style_all};
pub use types::*;
pub use unwrap::{unwrap, UnwrapOptions};
pub use wrap::{parse_wrapper_specs, wrap_around, wrap_deeply};
