pub mod types;
pub mod watcher;
pub mod queue;

pub use types::*;
pub use watcher::RequestWatcher;
pub use queue::{create_request_queue, RequestSender, RequestReceiver};
