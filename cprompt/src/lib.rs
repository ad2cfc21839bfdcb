//! Prompt templates stored as text assets under a root directory.
//!
//! ```rust,no_run
//! use cprompt::{TemplateStore, TemplateVars};
//!
//! let store = TemplateStore::new("prompts")
//!     .expect("template root should exist")
//!     .with_default_tag("gemini-3-flash-preview");
//! let wrapped = store
//!     .resolve("core/boss_wrapper", None, &TemplateVars::new().with("message", "status report"))
//!     .expect("wrapper should render");
//! println!("{wrapped}");
//! ```

pub mod error;
pub mod render;
pub mod store;
pub mod vars;

pub use error::{TemplateError, TemplateErrorKind};
pub use render::placeholders;
pub use store::TemplateStore;
pub use vars::TemplateVars;
