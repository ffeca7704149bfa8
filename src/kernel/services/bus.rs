use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;

use super::ports::SearchMessage;

#[derive(Clone)]
pub struct SearchBusSender {
    tx: Sender<SearchMessage>,
}

pub struct SearchBusReceiver {
    rx: Receiver<SearchMessage>,
}

pub fn search_bus() -> (SearchBusSender, SearchBusReceiver) {
    let (tx, rx) = mpsc::channel();
    (SearchBusSender { tx }, SearchBusReceiver { rx })
}

impl SearchBusSender {
    pub fn send(&self, msg: SearchMessage) -> Result<(), mpsc::SendError<SearchMessage>> {
        self.tx.send(msg)
    }
}

impl SearchBusReceiver {
    pub fn try_recv(&mut self) -> Result<SearchMessage, TryRecvError> {
        self.rx.try_recv()
    }

    pub fn recv_timeout(&mut self, timeout: Duration) -> Result<SearchMessage, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}
