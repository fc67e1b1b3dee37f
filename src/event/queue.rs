use tokio::sync::mpsc;
use super::types::PathRequest;

/// Request queue buffer size
const QUEUE_SIZE: usize = 1000;

/// Creates a new request queue channel pair
pub fn create_request_queue() -> (RequestSender, RequestReceiver) {
    let (tx, rx) = mpsc::channel(QUEUE_SIZE);
    (RequestSender(tx), RequestReceiver(rx))
}

/// Sender side of the request queue
#[derive(Clone)]
pub struct RequestSender(pub mpsc::Sender<PathRequest>);

impl RequestSender {
    pub fn inner(&self) -> mpsc::Sender<PathRequest> {
        self.0.clone()
    }
}

/// Receiver side of the request queue
pub struct RequestReceiver(pub mpsc::Receiver<PathRequest>);

impl RequestReceiver {
    pub async fn recv(&mut self) -> Option<PathRequest> {
        self.0.recv().await
    }
}
