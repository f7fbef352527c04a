//! One abort token per city fetch: starting a fetch supersedes every fetch
//! started before it.

use tokio::sync::watch;

pub struct RequestSequencer {
    latest: watch::Sender<u64>,
}

impl Default for RequestSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestSequencer {
    pub fn new() -> Self {
        let (latest, _) = watch::channel(0);
        Self { latest }
    }

    /// Issues a ticket for a new request and fires the abort token of every
    /// older ticket.
    pub fn begin(&self) -> RequestTicket {
        let mut seq = 0;
        self.latest.send_modify(|latest| {
            *latest += 1;
            seq = *latest;
        });
        RequestTicket {
            seq,
            latest: self.latest.subscribe(),
        }
    }

    pub fn latest(&self) -> u64 {
        *self.latest.borrow()
    }
}

pub struct RequestTicket {
    seq: u64,
    latest: watch::Receiver<u64>,
}

impl RequestTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn is_current(&self) -> bool {
        *self.latest.borrow() == self.seq
    }

    /// Resolves once a newer request has started. Never resolves if the
    /// sequencer is gone.
    pub async fn aborted(&mut self) {
        loop {
            if *self.latest.borrow_and_update() != self.seq {
                return;
            }
            if self.latest.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn newer_ticket_supersedes_older() {
        let sequencer = RequestSequencer::new();
        let first = sequencer.begin();
        assert!(first.is_current());

        let second = sequencer.begin();
        assert!(!first.is_current());
        assert!(second.is_current());
        assert_eq!(sequencer.latest(), second.seq());
    }

    #[tokio::test]
    async fn abort_token_fires_when_superseded() {
        let sequencer = RequestSequencer::new();
        let mut first = sequencer.begin();

        let pending = tokio::time::timeout(Duration::from_millis(20), first.aborted()).await;
        assert!(pending.is_err(), "current ticket must not be aborted");

        let _second = sequencer.begin();
        tokio::time::timeout(Duration::from_secs(1), first.aborted())
            .await
            .expect("superseded ticket aborts");
    }
}
