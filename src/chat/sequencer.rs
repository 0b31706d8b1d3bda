use std::collections::BTreeMap;

use super::message::Message;

/// Releases completed turns to the log in the order their requests were sent.
///
/// Completions that arrive early are held until every earlier turn has
/// completed. Each sequence number is released at most once.
#[derive(Debug, Default)]
pub struct ReplySequencer {
    next: u64,
    held: BTreeMap<u64, Vec<Message>>,
}

impl ReplySequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the messages of turn `seq` and returns everything that is now
    /// ready to render, oldest turn first.
    pub fn complete(&mut self, seq: u64, messages: Vec<Message>) -> Vec<Message> {
        if seq < self.next || self.held.contains_key(&seq) {
            tracing::warn!("Ignoring duplicate completion for turn {}", seq);
            return Vec::new();
        }
        self.held.insert(seq, messages);

        let mut ready = Vec::new();
        while let Some(batch) = self.held.remove(&self.next) {
            ready.extend(batch);
            self.next += 1;
        }
        ready
    }

    /// Number of completed turns waiting on an earlier one
    pub fn held(&self) -> usize {
        self.held.len()
    }

    pub fn next_expected(&self) -> u64 {
        self.next
    }
}
