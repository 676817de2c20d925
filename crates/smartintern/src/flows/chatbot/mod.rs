mod script;

pub use script::{ChatIntent, ChatScript, IntentScript, Shortcut};

use super::conversation::{
    Conversation, ConversationHandle, Opening, QuickReply, Script, ScriptedReply, SendOutcome,
};
use super::dispatch::KeywordDispatcher;
use super::timeline::{DeliveryState, Message};
use crate::config::PacingConfig;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug)]
pub struct ChatbotScript {
    script: Arc<ChatScript>,
    dispatcher: KeywordDispatcher<ChatIntent>,
    pacing: PacingConfig,
}

impl ChatbotScript {
    pub fn new(script: Arc<ChatScript>, pacing: PacingConfig) -> Self {
        let dispatcher = KeywordDispatcher::new(script.rules.clone());
        Self {
            script,
            dispatcher,
            pacing,
        }
    }

    pub fn classify(&self, input: &str) -> Option<ChatIntent> {
        self.dispatcher.dispatch(input)
    }

    fn single(&self, text: &str) -> ScriptedReply {
        ScriptedReply::new(text).typing_for(self.pacing.typing)
    }

    fn answer(&self, entry: &IntentScript) -> Vec<ScriptedReply> {
        let acknowledgement = self.single(&entry.acknowledgement);
        let Some(detail) = &entry.detail else {
            return vec![match &entry.quick_replies {
                Some(quick_replies) => acknowledgement.offering(quick_replies.clone()),
                None => acknowledgement,
            }];
        };

        let typing = if entry.long_detail {
            self.pacing.long_typing
        } else {
            self.pacing.typing
        };
        let detail = ScriptedReply::new(detail.clone())
            .after(self.pacing.follow_up)
            .typing_for(typing);
        let detail = match &entry.quick_replies {
            Some(quick_replies) => detail.offering(quick_replies.clone()),
            None => detail,
        };

        vec![acknowledgement, detail]
    }

    fn coming_soon(&self) -> ScriptedReply {
        self.single(&self.script.coming_soon)
    }
}

impl Script for ChatbotScript {
    const AGENT_PREFIX: &'static str = "bot";
    const DELIVERY: Option<DeliveryState> = Some(DeliveryState::Read);

    fn opening(&mut self) -> Opening {
        Opening {
            immediate: vec![ScriptedReply::new(self.script.greeting.clone())
                .with_id("welcome")
                .offering(self.script.quick_replies.clone())],
            queued: Vec::new(),
        }
    }

    fn respond(&mut self, input: &str) -> Vec<ScriptedReply> {
        let intent = self.classify(input);
        debug!(intent = intent.map(ChatIntent::label), "chat message dispatched");

        match intent.and_then(|intent| self.script.intent(intent)) {
            Some(entry) => self.answer(entry),
            None => vec![self.single(&self.script.fallback)],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "send", rename_all = "snake_case")]
pub enum QuickReplyOutcome {
    Sent(SendOutcome),
    ComingSoon,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatbotView {
    pub messages: Vec<Message>,
    pub typing: bool,
    pub quick_replies: Vec<QuickReply>,
}

/// A mounted chatbot screen.
pub struct ChatbotScreen {
    handle: ConversationHandle<ChatbotScript>,
}

impl ChatbotScreen {
    pub fn start(script: ChatbotScript) -> Self {
        Self {
            handle: ConversationHandle::spawn(Conversation::start(script)),
        }
    }

    pub fn send(&self, text: &str) -> SendOutcome {
        self.handle.send(text)
    }

    /// Known shortcuts re-enter as typed text; anything else gets the
    /// "coming soon" reply without a human message.
    pub fn select_quick_reply(&self, action: &str) -> QuickReplyOutcome {
        self.handle.update(|conversation| {
            let shortcut = conversation
                .script()
                .script
                .shortcut(action)
                .map(|shortcut| shortcut.text.clone());

            match shortcut {
                Some(text) => QuickReplyOutcome::Sent(conversation.send(&text)),
                None => {
                    let reply = conversation.script().coming_soon();
                    conversation.enqueue(reply);
                    QuickReplyOutcome::ComingSoon
                }
            }
        })
    }

    pub async fn settled(&self) {
        self.handle.settled().await;
    }

    pub fn view(&self) -> ChatbotView {
        self.handle.read(|conversation| ChatbotView {
            messages: conversation.timeline().messages().to_vec(),
            typing: conversation.timeline().is_typing(),
            quick_replies: conversation.quick_replies().to_vec(),
        })
    }
}
