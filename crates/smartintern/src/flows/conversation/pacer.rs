use super::{Conversation, Script, SendOutcome};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tracing::debug;

struct Shared<S> {
    conversation: Mutex<Conversation<S>>,
    wake: Notify,
    busy: watch::Sender<bool>,
}

impl<S: Script> Shared<S> {
    fn lock(&self) -> MutexGuard<'_, Conversation<S>> {
        self.conversation
            .lock()
            .expect("conversation mutex poisoned")
    }

    fn refresh(&self) {
        let busy = self.lock().is_busy();
        self.busy.send_replace(busy);
    }
}

/// Owns a mounted conversation and the task pacing its replies.
///
/// Dropping the handle unmounts the conversation: replies still waiting on a
/// timer are discarded instead of landing in a torn-down screen.
pub struct ConversationHandle<S: Script> {
    shared: Arc<Shared<S>>,
    pacer: JoinHandle<()>,
}

impl<S: Script> ConversationHandle<S> {
    /// Must be called from within a tokio runtime.
    pub fn spawn(conversation: Conversation<S>) -> Self {
        let (busy, _) = watch::channel(conversation.is_busy());
        let shared = Arc::new(Shared {
            conversation: Mutex::new(conversation),
            wake: Notify::new(),
            busy,
        });
        let pacer = tokio::spawn(run_pacer(Arc::clone(&shared)));
        Self { shared, pacer }
    }

    pub fn read<R>(&self, f: impl FnOnce(&Conversation<S>) -> R) -> R {
        f(&self.shared.lock())
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut Conversation<S>) -> R) -> R {
        let result = f(&mut self.shared.lock());
        self.shared.refresh();
        self.shared.wake.notify_one();
        result
    }

    pub fn send(&self, text: &str) -> SendOutcome {
        self.update(|conversation| conversation.send(text))
    }

    /// Runs `f` after `delay` unless the conversation was unmounted meanwhile.
    pub fn schedule<F>(&self, delay: Duration, f: F)
    where
        F: FnOnce(&mut Conversation<S>) + Send + 'static,
    {
        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            {
                let mut conversation = shared.lock();
                if !conversation.is_mounted() {
                    debug!("timer fired after conversation teardown");
                    return;
                }
                f(&mut conversation);
            }
            shared.refresh();
            shared.wake.notify_one();
        });
    }

    /// Resolves once no reply is queued or being typed.
    pub async fn settled(&self) {
        let mut busy = self.shared.busy.subscribe();
        let _ = busy.wait_for(|busy| !*busy).await;
    }

    pub fn close(&self) {
        self.shared.lock().unmount();
        self.shared.refresh();
        self.shared.wake.notify_one();
    }

    pub fn is_finished(&self) -> bool {
        self.pacer.is_finished()
    }
}

impl<S: Script> Drop for ConversationHandle<S> {
    fn drop(&mut self) {
        self.close();
    }
}

async fn run_pacer<S: Script>(shared: Arc<Shared<S>>) {
    loop {
        let timing = {
            let conversation = shared.lock();
            if !conversation.is_mounted() {
                break;
            }
            conversation.next_timing()
        };

        let Some((pause, typing)) = timing else {
            shared.wake.notified().await;
            continue;
        };

        tokio::time::sleep(pause).await;
        if !shared.lock().begin_typing() {
            shared.refresh();
            continue;
        }
        shared.refresh();

        tokio::time::sleep(typing).await;
        {
            let mut conversation = shared.lock();
            if !conversation.is_mounted() {
                debug!("dropping scripted reply after conversation teardown");
                break;
            }
            conversation.deliver_next();
        }
        shared.refresh();
    }
    shared.refresh();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::conversation::{Opening, ScriptedReply};

    struct Slow;

    impl Script for Slow {
        fn opening(&mut self) -> Opening {
            Opening::default()
        }

        fn respond(&mut self, input: &str) -> Vec<ScriptedReply> {
            vec![
                ScriptedReply::new(format!("ack {input}")).typing_for(Duration::from_millis(1500)),
                ScriptedReply::new("detail")
                    .after(Duration::from_millis(500))
                    .typing_for(Duration::from_millis(100)),
            ]
        }
    }

    #[tokio::test(start_paused = true)]
    async fn typing_flag_tracks_pending_reply() {
        let handle = ConversationHandle::spawn(Conversation::start(Slow));
        handle.send("hello");

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.read(|c| c.timeline().is_typing()));
        assert_eq!(handle.read(|c| c.timeline().len()), 1);

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(!handle.read(|c| c.timeline().is_typing()));
        assert_eq!(handle.read(|c| c.timeline().len()), 2);

        handle.settled().await;
        let texts = handle.read(|c| {
            c.timeline()
                .messages()
                .iter()
                .map(|m| m.text.clone())
                .collect::<Vec<_>>()
        });
        assert_eq!(texts, ["hello", "ack hello", "detail"]);
    }

    #[tokio::test(start_paused = true)]
    async fn closing_discards_pending_replies() {
        let handle = ConversationHandle::spawn(Conversation::start(Slow));
        handle.send("hello");
        tokio::time::sleep(Duration::from_millis(100)).await;

        handle.close();
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert_eq!(handle.read(|c| c.timeline().len()), 1);
        assert!(handle.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn scheduled_callbacks_skip_unmounted_conversations() {
        let handle = ConversationHandle::spawn(Conversation::start(Slow));
        handle.schedule(Duration::from_secs(1), |c| {
            c.enqueue(ScriptedReply::new("late"));
        });
        handle.close();

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(handle.read(|c| c.pending_len()), 0);
        assert!(handle.read(|c| c.timeline().is_empty()));
    }
}
