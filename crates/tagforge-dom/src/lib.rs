//! tagforge DOM - Element tree model
//!
//! Owned-value markup trees: elements, child/attribute value unions,
//! attribute key canonicalization, tag tables and process configuration.

pub mod attrs;
pub mod config;
pub mod tags;

mod element;
mod error;
mod node;

pub use attrs::AttrList;
pub use config::{ForgeConfig, ValidateMode};
pub use element::{DEFAULT_KEEP_ATTRS, Element};
pub use error::ForgeError;
pub use node::{AttrValue, Child, flatten};
