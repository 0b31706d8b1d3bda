use std::sync::{Arc, Mutex, MutexGuard};

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::input::InputField;
use super::log::ChatLog;
use super::message::Message;
use super::sequencer::ReplySequencer;
use crate::client::{Reply, ReplyService};
use crate::error::{ChatError, Result};

/// Log plus the ordering buffer for replies still in flight
#[derive(Debug, Default)]
pub struct Conversation {
    pub log: ChatLog,
    sequencer: ReplySequencer,
    next_seq: u64,
}

impl Conversation {
    /// Appends the user's entry under the next sequence number.
    fn start_turn(&mut self, text: &str) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.log.append(Message::user(text, seq));
        self.log.scroll_to_bottom();
        seq
    }

    fn finish_turn(&mut self, seq: u64, messages: Vec<Message>) {
        let ready = self.sequencer.complete(seq, messages);
        if !ready.is_empty() {
            self.log.extend(ready);
        }
        self.log.scroll_to_bottom();
    }

    /// Number of replies that arrived but wait on an earlier one
    pub fn held_replies(&self) -> usize {
        self.sequencer.held()
    }
}

/// A reply that has been requested but may not have arrived yet.
///
/// Dropping the handle does not cancel the request.
pub struct PendingReply {
    seq: u64,
    task: JoinHandle<()>,
}

impl PendingReply {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits until the reply (or its error entry) has been written to the log.
    pub async fn wait(self) {
        if let Err(e) = self.task.await {
            warn!("Reply task for turn {} did not complete: {}", self.seq, e);
        }
    }
}

/// Turns submitted text into a user entry, a request and, later, bot entries.
#[derive(Clone)]
pub struct ChatInputHandler {
    service: Arc<dyn ReplyService>,
    conversation: Arc<Mutex<Conversation>>,
}

impl ChatInputHandler {
    pub fn new(service: Arc<dyn ReplyService>) -> Self {
        Self {
            service,
            conversation: Arc::new(Mutex::new(Conversation::default())),
        }
    }

    /// Locks the shared conversation state.
    pub fn conversation(&self) -> MutexGuard<'_, Conversation> {
        lock(&self.conversation)
    }

    /// Submits the field's current text.
    ///
    /// Whitespace-only input is ignored and leaves the field as it was.
    /// Otherwise the user entry is appended, the request is spawned on the
    /// current tokio runtime, and the field is cleared straight away.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn submit(&self, field: &mut InputField) -> Option<PendingReply> {
        let text = field.value().trim().to_string();
        if text.is_empty() {
            return None;
        }

        let seq = self.conversation().start_turn(&text);
        info!("Sending turn {} ({} chars)", seq, text.chars().count());

        let service = Arc::clone(&self.service);
        let conversation = Arc::clone(&self.conversation);
        let task = tokio::spawn(async move {
            // A panicking service still has to free its turn
            let request = tokio::spawn(async move { service.get_reply(&text).await });
            let outcome = request.await.unwrap_or_else(|e| Err(ChatError::from(e)));
            let messages = reply_messages(seq, outcome);
            lock(&conversation).finish_turn(seq, messages);
        });

        field.clear();
        Some(PendingReply { seq, task })
    }
}

fn lock(conversation: &Mutex<Conversation>) -> MutexGuard<'_, Conversation> {
    // Writers only append, so a poisoned log is still usable.
    conversation.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Log entries for the outcome of one turn
fn reply_messages(seq: u64, outcome: Result<Reply>) -> Vec<Message> {
    match outcome {
        Ok(reply) => {
            debug!("Turn {} answered", seq);
            let mut messages = vec![Message::bot(reply.reply.clone(), seq)];
            if let Some(url) = reply.image() {
                messages.push(Message::bot_image(url, seq));
            }
            messages
        }
        Err(e) => {
            warn!("Turn {} failed: {}", seq, e);
            vec![Message::bot_error(
                format!("Sorry, the bot could not respond ({})", e),
                seq,
            )]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_with_image_yields_two_entries() {
        let messages = reply_messages(7, Ok(Reply::with_image("here", "http://x/y.png")));
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].text(), Some("here"));
        assert_eq!(messages[1].image_url(), Some("http://x/y.png"));
        assert!(messages.iter().all(|m| m.seq == 7));
    }

    #[test]
    fn failure_yields_one_error_entry() {
        let decode = serde_json::from_str::<Reply>("{}").unwrap_err();
        let messages = reply_messages(0, Err(ChatError::from(decode)));
        assert_eq!(messages.len(), 1);
        assert!(messages[0].is_error());
        assert!(messages[0].text().unwrap().contains("missing field `reply`"));
    }

    #[test]
    fn turns_are_numbered_in_append_order() {
        let mut conversation = Conversation::default();
        assert_eq!(conversation.start_turn("a"), 0);
        assert_eq!(conversation.start_turn("b"), 1);
        let seqs: Vec<u64> = conversation.log.entries().iter().map(|m| m.seq).collect();
        assert_eq!(seqs, [0, 1]);
    }
}
