//! Action flows behind each subcommand.
//!
//! Flows never touch the terminal directly: status goes through the
//! [`Context`] reporter and questions through its [`Confirm`] policy. Each
//! returns an outcome enum; a user saying "no" is an outcome, not an error.

pub mod add;
pub mod clean;
pub mod delete;
pub mod list;

pub use add::{AddOutcome, add};
pub use clean::{CleanOutcome, clean};
pub use delete::{DeleteOutcome, delete};
pub use list::{ListOutcome, list};

use anyhow::{Context as _, Result};
use kmu_core::{AttributeStore, Category, Config, Confirm, Reporter};
use std::fmt;
use std::sync::Arc;

/// Groups the state every flow needs.
#[derive(Clone)]
pub struct Context {
    pub config: Config,
    pub reporter: Arc<dyn Reporter>,
    pub confirm: Arc<dyn Confirm>,
    pub dry_run: bool,
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("config", &self.config)
            .field("dry_run", &self.dry_run)
            .finish_non_exhaustive()
    }
}

impl Context {
    pub fn new(
        config: Config,
        reporter: Arc<dyn Reporter>,
        confirm: Arc<dyn Confirm>,
        dry_run: bool,
    ) -> Self {
        Self {
            config,
            reporter,
            confirm,
            dry_run,
        }
    }

    fn confirm(&self, prompt: &str) -> bool {
        self.confirm.confirm(prompt)
    }

    /// Open the list backing `category`, telling the user when it does not
    /// exist yet.
    fn open_store(&self, category: Category) -> Result<AttributeStore> {
        let path = self.config.list_path(category);
        let store = AttributeStore::open(path)
            .with_context(|| format!("Failed to load {category} list"))?;
        if !store.existed() {
            self.reporter
                .info(&format!("{} does not exist yet", path.display()));
        }
        Ok(store)
    }

    /// Persist `store` unless this is a dry run.
    fn save_store(&self, store: &mut AttributeStore) -> Result<()> {
        if self.dry_run {
            self.reporter
                .info(&format!("Dry run: {} left untouched", store.path().display()));
            return Ok(());
        }
        store
            .save()
            .with_context(|| format!("Failed to write {}", store.path().display()))
    }
}
