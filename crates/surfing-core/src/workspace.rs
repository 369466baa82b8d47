use std::path::Path;

use crate::error::{Result, SurfingError};
use crate::layout::ProductLayout;
use crate::services::Services;
use crate::store::ProductStore;

/// The product tree and the external services a step operates with.
#[derive(Clone, Copy)]
pub struct Workspace<'a> {
    pub store: &'a dyn ProductStore,
    pub layout: &'a ProductLayout,
    pub services: Services<'a>,
}

impl<'a> Workspace<'a> {
    pub fn new(
        store: &'a dyn ProductStore,
        layout: &'a ProductLayout,
        services: Services<'a>,
    ) -> Self {
        Self {
            store,
            layout,
            services,
        }
    }

    /// Fail if an external task returned without writing `path`.
    pub(crate) fn expect_output(&self, task: &str, path: &Path) -> Result<()> {
        if self.store.exists(path) {
            Ok(())
        } else {
            Err(SurfingError::MissingOutput {
                task: task.to_string(),
                path: path.to_path_buf(),
            })
        }
    }
}
