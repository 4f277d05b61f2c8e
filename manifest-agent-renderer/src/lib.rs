//! # manifest-agent-renderer
//!
//! Compiles manifest filename templates and renders them into concrete
//! filenames or into patterns that recognize already-written manifests.
//!
//! ## Usage
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use manifest_agent_renderer::{CompiledTemplate, RenderValues};
//!
//! let template = CompiledTemplate::compile("manifest-{hvr_integ_tstamp}.json", &BTreeMap::new())
//!     .expect("valid template");
//! let name = template
//!     .render(RenderValues { table_name: None, integ_tstamp: Some("20231114221320") })
//!     .expect("all placeholders bound");
//! assert_eq!(name, "manifest-20231114221320.json");
//! assert!(template.recognizer(None).unwrap().is_match(&name));
//! ```

pub mod error;
pub mod template;

pub use error::TemplateError;
pub use template::{CompiledTemplate, RenderValues, Token};
