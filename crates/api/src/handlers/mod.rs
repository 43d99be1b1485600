//! Route handlers. Parameters always come from the query string, POST
//! included.

use std::sync::Arc;

use records::RecordService;

pub mod tickets;
pub mod workflows;

#[derive(Clone)]
pub struct AppState {
    pub records: Arc<RecordService>,
}
