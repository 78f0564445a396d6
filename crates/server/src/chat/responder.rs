use rand::seq::SliceRandom;
use std::time::Duration;

use tars_shared::constants::RESPONDER_REPLIES;

use crate::models::{MessageRecord, MessageStatus};

/// Scripted participant: waits a fixed delay, then answers with one line
/// picked uniformly from a fixed table.
#[derive(Debug, Clone)]
pub struct Responder {
    delay: Duration,
    replies: &'static [&'static str],
}

impl Responder {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            replies: &RESPONDER_REPLIES,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn replies(&self) -> &'static [&'static str] {
        self.replies
    }

    pub fn pick_reply(&self) -> &'static str {
        self.replies
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(RESPONDER_REPLIES[0])
    }

    /// Marks every `sent` record `seen` and appends a reply.
    /// Returns the ids that changed status and the appended reply.
    pub fn answer(&self, messages: &mut Vec<MessageRecord>) -> (Vec<String>, MessageRecord) {
        let mut seen = Vec::new();
        for msg in messages.iter_mut() {
            if msg.status == Some(MessageStatus::Sent) {
                msg.status = Some(MessageStatus::Seen);
                seen.push(msg.id.clone());
            }
        }

        let reply = MessageRecord::from_responder(self.pick_reply());
        messages.push(reply.clone());
        (seen, reply)
    }
}
