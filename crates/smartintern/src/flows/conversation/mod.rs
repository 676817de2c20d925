//! Scripted conversations shared by the interview and chatbot screens.
//!
//! A [`Conversation`] is a synchronous state holder: human input is appended
//! immediately and the [`Script`] answers with [`ScriptedReply`] entries that
//! wait in a FIFO queue. Replies leave the queue one at a time, so arrival
//! order always equals scheduling order. [`ConversationHandle`] drives that
//! queue against the tokio clock.

mod pacer;

pub use pacer::ConversationHandle;

use super::timeline::{DeliveryState, Message, Timeline};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;
use tracing::warn;

/// Shortcut button offered next to the chat input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickReply {
    pub id: String,
    pub label: String,
    pub action: String,
}

impl QuickReply {
    pub fn new(id: &str, label: &str, action: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            action: action.to_string(),
        }
    }
}

/// An agent message waiting for its simulated latency to elapse.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptedReply {
    pub id: Option<String>,
    pub text: String,
    /// Silent wait before the typing indicator turns on.
    pub pause: Duration,
    /// How long the typing indicator shows before the message lands.
    pub typing: Duration,
    /// Replaces the offered quick replies when the message lands.
    pub quick_replies: Option<Vec<QuickReply>>,
}

impl ScriptedReply {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: None,
            text: text.into(),
            pause: Duration::ZERO,
            typing: Duration::ZERO,
            quick_replies: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn after(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    pub fn typing_for(mut self, typing: Duration) -> Self {
        self.typing = typing;
        self
    }

    pub fn offering(mut self, quick_replies: Vec<QuickReply>) -> Self {
        self.quick_replies = Some(quick_replies);
        self
    }
}

/// What a script says when its screen mounts.
#[derive(Debug, Default)]
pub struct Opening {
    /// Delivered synchronously, before the screen is first rendered.
    pub immediate: Vec<ScriptedReply>,
    /// Paced like any other reply.
    pub queued: Vec<ScriptedReply>,
}

/// Canned behavior plugged into a [`Conversation`].
pub trait Script: Send + 'static {
    /// Prefix for generated agent message ids.
    const AGENT_PREFIX: &'static str = "agent";
    /// Delivery marker stamped on every message of this conversation.
    const DELIVERY: Option<DeliveryState> = None;
    /// Refuse human input while an agent turn is still pending.
    const BLOCKS_WHILE_BUSY: bool = false;

    fn opening(&mut self) -> Opening;

    /// Called with trimmed, non-empty human input.
    fn respond(&mut self, input: &str) -> Vec<ScriptedReply>;

    /// `false` once the script has reached a terminal state.
    fn accepts_input(&self) -> bool {
        true
    }

    fn delivered(&mut self, _message: &Message) {}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SendOutcome {
    Accepted { message_id: String, queued: usize },
    Empty,
    Busy,
    Ended,
}

impl SendOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SendOutcome::Accepted { .. })
    }
}

#[derive(Debug)]
pub struct Conversation<S> {
    script: S,
    timeline: Timeline,
    quick_replies: Vec<QuickReply>,
    pending: VecDeque<ScriptedReply>,
    mounted: bool,
}

impl<S: Script> Conversation<S> {
    pub fn start(mut script: S) -> Self {
        let opening = script.opening();
        let mut conversation = Self {
            script,
            timeline: Timeline::new(),
            quick_replies: Vec::new(),
            pending: VecDeque::new(),
            mounted: true,
        };

        for reply in opening.immediate {
            conversation.deliver(reply);
        }
        conversation.pending.extend(opening.queued);
        conversation
    }

    pub fn send(&mut self, text: &str) -> SendOutcome {
        let text = text.trim();
        if text.is_empty() {
            return SendOutcome::Empty;
        }
        if !self.mounted || !self.script.accepts_input() {
            return SendOutcome::Ended;
        }
        if S::BLOCKS_WHILE_BUSY && self.is_busy() {
            return SendOutcome::Busy;
        }

        let message_id = self.timeline.next_id("user");
        self.append(Message::human(message_id.clone(), text));

        let replies = self.script.respond(text);
        let queued = replies.len();
        self.pending.extend(replies);

        SendOutcome::Accepted { message_id, queued }
    }

    /// Queues an agent reply that was not triggered by human text.
    pub fn enqueue(&mut self, reply: ScriptedReply) {
        if self.mounted {
            self.pending.push_back(reply);
        }
    }

    pub fn is_busy(&self) -> bool {
        !self.pending.is_empty() || self.timeline.is_typing()
    }

    pub fn is_ended(&self) -> bool {
        !self.script.accepts_input()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Pause and typing time of the next queued reply.
    pub fn next_timing(&self) -> Option<(Duration, Duration)> {
        self.pending.front().map(|reply| (reply.pause, reply.typing))
    }

    pub(crate) fn begin_typing(&mut self) -> bool {
        if !self.mounted || self.pending.is_empty() {
            return false;
        }
        self.timeline.set_typing(true);
        true
    }

    /// Lands the next queued reply, ignoring its latency.
    pub fn deliver_next(&mut self) -> Option<&Message> {
        if !self.mounted {
            return None;
        }
        let reply = self.pending.pop_front()?;
        self.timeline.set_typing(false);
        self.deliver(reply)
    }

    /// Lands every queued reply, including ones queued by earlier deliveries.
    pub fn deliver_all(&mut self) -> usize {
        let mut delivered = 0;
        while self.deliver_next().is_some() {
            delivered += 1;
        }
        delivered
    }

    /// Tears the conversation down; later timer callbacks become no-ops.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.pending.clear();
        self.timeline.set_typing(false);
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn quick_replies(&self) -> &[QuickReply] {
        &self.quick_replies
    }

    pub fn script(&self) -> &S {
        &self.script
    }

    pub fn script_mut(&mut self) -> &mut S {
        &mut self.script
    }

    fn deliver(&mut self, reply: ScriptedReply) -> Option<&Message> {
        let ScriptedReply {
            id,
            text,
            quick_replies,
            ..
        } = reply;

        if let Some(quick_replies) = quick_replies {
            self.quick_replies = quick_replies;
        }

        let id = id.unwrap_or_else(|| self.timeline.next_id(S::AGENT_PREFIX));
        if !self.append(Message::agent(id, text)) {
            return None;
        }

        let message = self.timeline.last()?.clone();
        self.script.delivered(&message);
        self.timeline.last()
    }

    fn append(&mut self, message: Message) -> bool {
        let message = match S::DELIVERY {
            Some(state) => message.with_delivery(state),
            None => message,
        };

        match self.timeline.append(message) {
            Ok(()) => true,
            Err(err) => {
                warn!(%err, "dropping message with colliding id");
                false
            }
        }
    }
}
