//! kmu-core - flag bookkeeping and distfile cleanup for Portage systems
//!
//! This crate holds everything `kmu` does that does not touch the terminal:
//!
//! - **Attribute lists**: the `package.keywords`, `package.mask`,
//!   `package.use` and `package.unmask` files, parsed into [`AttributeList`]
//!   and written back atomically through [`AttributeStore`].
//! - **Flag merging**: [`merge`] folds a new set of `+flag` / `-flag`
//!   directives into a stored record.
//! - **Distfile cleanup**: [`distfiles`] scans the download cache, groups
//!   archives by package identity and plans which superseded copies can go.
//!
//! User interaction is injected through the [`Reporter`] and [`Confirm`]
//! traits so every flow can run headless.

pub mod attributes;
pub mod config;
pub mod distfiles;
pub mod merge;
pub mod paths;
pub mod repo;
pub mod reporter;
pub mod tokenize;
pub mod types;

pub use attributes::{AttributeList, AttributeRecord, AttributeStore, StoreError};
pub use config::{Config, ConfigError};
pub use merge::{MergeError, MergeOptions, merge, merge_line};
pub use reporter::{Confirm, NullReporter, Reporter};
pub use tokenize::{Flag, Polarity, tokenize};
pub use types::Category;
