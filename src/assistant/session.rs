use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use parking_lot::Mutex;
use tokio::{task::JoinHandle, time::sleep};

use crate::domain::ChatMessage;

use super::{matcher::reply_for, rules::GREETING};

/// Transcript of the assistant widget. Cloning shares the same transcript.
///
/// The transcript is append-only and uncapped. Replies are computed on a
/// spawned task after `reply_delay`, so a reply can land after `reset()`;
/// it is then simply appended to the fresh transcript.
#[derive(Clone)]
pub struct ChatSession {
    transcript: Arc<Mutex<Vec<ChatMessage>>>,
    pending: Arc<AtomicUsize>,
    reply_delay: Duration,
}

impl ChatSession {
    pub fn new(reply_delay: Duration) -> Self {
        Self {
            transcript: Arc::new(Mutex::new(vec![ChatMessage::bot(GREETING)])),
            pending: Arc::new(AtomicUsize::new(0)),
            reply_delay,
        }
    }

    /// Appends the user message now and schedules exactly one bot reply.
    /// Blank input is ignored and returns `None`.
    pub fn send(&self, input: &str) -> Option<JoinHandle<ChatMessage>> {
        if input.trim().is_empty() {
            return None;
        }

        let text = input.to_string();
        self.transcript.lock().push(ChatMessage::user(text.clone()));
        self.pending.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(target: "assistant", chars = text.chars().count(), "chat message queued");

        let transcript = self.transcript.clone();
        let pending = self.pending.clone();
        let delay = self.reply_delay;
        Some(tokio::spawn(async move {
            sleep(delay).await;
            let reply = ChatMessage::bot(reply_for(&text));
            transcript.lock().push(reply.clone());
            pending.fetch_sub(1, Ordering::SeqCst);
            reply
        }))
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.transcript.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.transcript.lock().len()
    }

    pub fn is_typing(&self) -> bool {
        self.pending.load(Ordering::SeqCst) > 0
    }

    pub fn reset(&self) {
        let mut transcript = self.transcript.lock();
        transcript.clear();
        transcript.push(ChatMessage::bot(GREETING));
    }
}
