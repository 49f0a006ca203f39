//! The event-driven application core: a single-threaded cooperative loop
//! that owns all mutable state and every call into the Store.

pub mod dispatcher;
pub mod router;
pub mod state;

use std::sync::Arc;

use crate::db::Store;
use crate::hardware::LedHandle;

use router::UiPort;
use state::AppState;

/// Everything the event loop owns. Tasks posted onto the loop receive
/// `&mut Engine`; nothing else may touch it.
pub struct Engine {
    pub store: Arc<Store>,
    pub state: AppState,
    pub ui: Box<dyn UiPort>,
    pub feedback: LedHandle,
}
