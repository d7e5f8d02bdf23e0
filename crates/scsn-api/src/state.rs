use std::sync::Arc;

use scsn_db::Database;

use crate::feed::FeedService;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub feed: FeedService,
}

impl AppStateInner {
    pub fn new(db: Arc<Database>) -> AppState {
        Arc::new(Self {
            feed: FeedService::new(db),
        })
    }
}
