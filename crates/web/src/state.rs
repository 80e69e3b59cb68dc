use std::sync::Arc;

use db::{pagination::Paginator, Store};

use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Config,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        Self { store, config }
    }

    pub fn paginator(&self) -> Paginator {
        Paginator::new(self.config.listing.per_page)
    }
}
