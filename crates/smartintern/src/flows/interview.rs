use super::conversation::{
    Conversation, ConversationHandle, Opening, Script, ScriptedReply, SendOutcome,
};
use super::timeline::Message;
use crate::config::PacingConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::info;

pub const WELCOME_TEXT: &str = "Hello! I'm your AI interviewer. I'll be asking you a few questions to assess your readiness for PM internships. Take your time with each answer, and feel free to use the voice input if you prefer speaking. Let's begin!";
pub const COMPLETION_TEXT: &str = "Great job! You've completed the AI interview. I've analyzed your responses and will now generate personalized internship recommendations based on your answers. Your readiness score and skill gaps will also be calculated.";
pub const VOICE_PLACEHOLDER: &str = "This is a simulated voice input response...";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewQuestion {
    pub id: String,
    pub prompt: String,
    pub category: String,
    #[serde(default)]
    pub follow_up: Option<String>,
}

impl InterviewQuestion {
    fn new(id: &str, prompt: &str, category: &str, follow_up: &str) -> Self {
        Self {
            id: id.to_string(),
            prompt: prompt.to_string(),
            category: category.to_string(),
            follow_up: Some(follow_up.to_string()),
        }
    }
}

/// The product-management question set.
pub fn standard_questions() -> Vec<InterviewQuestion> {
    vec![
        InterviewQuestion::new(
            "1",
            "Tell me about yourself and why you're interested in product management.",
            "Background",
            "What specific aspects of product management excite you the most?",
        ),
        InterviewQuestion::new(
            "2",
            "Describe a time when you had to work with a team to solve a complex problem. What was your role?",
            "Teamwork",
            "How did you handle any conflicts or disagreements within the team?",
        ),
        InterviewQuestion::new(
            "3",
            "If you were tasked with improving a popular mobile app, how would you approach identifying areas for improvement?",
            "Product Thinking",
            "How would you prioritize these improvements?",
        ),
        InterviewQuestion::new(
            "4",
            "Tell me about a project you're particularly proud of. What made it successful?",
            "Achievement",
            "What would you do differently if you could start over?",
        ),
    ]
}

/// Decides whether the interviewer digs deeper before moving on.
#[derive(Debug, Clone)]
pub enum FollowUpPolicy {
    Never,
    Always,
    Random { probability: f64, rng: StdRng },
}

impl FollowUpPolicy {
    pub fn random(probability: f64) -> Self {
        Self::Random {
            probability: unit_probability(probability),
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(probability: f64, seed: u64) -> Self {
        Self::Random {
            probability: unit_probability(probability),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn ask(&mut self) -> bool {
        match self {
            FollowUpPolicy::Never => false,
            FollowUpPolicy::Always => true,
            FollowUpPolicy::Random { probability, rng } => rng.gen_bool(*probability),
        }
    }
}

/// NaN and infinities fall back to an even chance.
fn unit_probability(probability: f64) -> f64 {
    if probability.is_finite() {
        probability.clamp(0.0, 1.0)
    } else {
        0.5
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "question", rename_all = "snake_case")]
pub enum InterviewStage {
    Greeting,
    AskingQuestion(usize),
    AwaitingAnswer(usize),
    AskingFollowUp(usize),
    Complete,
}

#[derive(Debug)]
pub struct InterviewScript {
    questions: Vec<InterviewQuestion>,
    index: usize,
    follow_up_asked: bool,
    stage: InterviewStage,
    policy: FollowUpPolicy,
    pacing: PacingConfig,
    draft: String,
    recording: bool,
    recording_generation: u64,
}

impl InterviewScript {
    pub fn new(
        questions: Vec<InterviewQuestion>,
        policy: FollowUpPolicy,
        pacing: PacingConfig,
    ) -> Self {
        Self {
            questions,
            index: 0,
            follow_up_asked: false,
            stage: InterviewStage::Greeting,
            policy,
            pacing,
            draft: String::new(),
            recording: false,
            recording_generation: 0,
        }
    }

    pub fn standard(policy: FollowUpPolicy, pacing: PacingConfig) -> Self {
        Self::new(standard_questions(), policy, pacing)
    }

    pub fn stage(&self) -> InterviewStage {
        self.stage
    }

    pub fn current_question_index(&self) -> usize {
        self.index
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// True as soon as the last answer is taken, while the closing message
    /// may still be pending delivery.
    pub fn is_complete(&self) -> bool {
        self.stage == InterviewStage::Complete
    }

    pub fn progress_label(&self) -> String {
        if self.is_complete() {
            return "Interview Complete!".to_string();
        }
        let total = self.questions.len();
        format!("Question {} of {}", (self.index + 1).min(total), total)
    }

    pub fn progress_percent(&self) -> u8 {
        let total = self.questions.len();
        if total == 0 {
            return 100;
        }
        let answered = (self.index + 1).min(total);
        ((answered * 100) / total) as u8
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Returns the recording generation when recording was switched on.
    pub fn toggle_recording(&mut self) -> Option<u64> {
        if self.recording {
            self.recording = false;
            return None;
        }
        self.recording = true;
        self.recording_generation += 1;
        Some(self.recording_generation)
    }

    /// Fills the draft with the placeholder transcript for a recording that is
    /// still running.
    pub fn finish_recording(&mut self, generation: u64) -> bool {
        if !self.recording || generation != self.recording_generation {
            return false;
        }
        self.recording = false;
        self.draft = VOICE_PLACEHOLDER.to_string();
        true
    }

    fn ask(&mut self, pause: std::time::Duration) -> ScriptedReply {
        match self.questions.get(self.index) {
            Some(question) => {
                self.stage = InterviewStage::AskingQuestion(self.index);
                ScriptedReply::new(question.prompt.clone())
                    .with_id(format!("question-{}", question.id))
                    .after(pause)
                    .typing_for(self.pacing.typing)
            }
            None => {
                self.stage = InterviewStage::Complete;
                info!(questions = self.questions.len(), "interview complete");
                ScriptedReply::new(COMPLETION_TEXT)
                    .with_id("completion")
                    .after(pause)
                    .typing_for(self.pacing.typing)
            }
        }
    }
}

impl Script for InterviewScript {
    const AGENT_PREFIX: &'static str = "ai";
    const BLOCKS_WHILE_BUSY: bool = true;

    fn opening(&mut self) -> Opening {
        let first = self.ask(self.pacing.think);
        Opening {
            immediate: vec![ScriptedReply::new(WELCOME_TEXT).with_id("welcome")],
            queued: vec![first],
        }
    }

    fn respond(&mut self, _answer: &str) -> Vec<ScriptedReply> {
        let Some(question) = self.questions.get(self.index) else {
            return Vec::new();
        };

        if !self.follow_up_asked {
            if let Some(follow_up) = question.follow_up.clone() {
                if self.policy.ask() {
                    let id = format!("followup-{}", question.id);
                    self.follow_up_asked = true;
                    self.stage = InterviewStage::AskingFollowUp(self.index);
                    return vec![ScriptedReply::new(follow_up)
                        .with_id(id)
                        .after(self.pacing.think)
                        .typing_for(self.pacing.typing)];
                }
            }
        }

        self.index += 1;
        self.follow_up_asked = false;
        vec![self.ask(self.pacing.think)]
    }

    fn accepts_input(&self) -> bool {
        !self.is_complete()
    }

    fn delivered(&mut self, message: &Message) {
        if let InterviewStage::AskingQuestion(index) | InterviewStage::AskingFollowUp(index) =
            self.stage
        {
            if message.id.starts_with("question-") || message.id.starts_with("followup-") {
                self.stage = InterviewStage::AwaitingAnswer(index);
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InterviewView {
    pub messages: Vec<Message>,
    pub typing: bool,
    pub stage: InterviewStage,
    pub current_question_index: usize,
    pub question_count: usize,
    pub completed: bool,
    pub progress_label: String,
    pub progress_percent: u8,
    pub draft: String,
    pub recording: bool,
}

/// A mounted interview screen.
pub struct InterviewScreen {
    handle: ConversationHandle<InterviewScript>,
    voice_delay: std::time::Duration,
}

impl InterviewScreen {
    pub fn start(script: InterviewScript) -> Self {
        let voice_delay = script.pacing.voice_capture;
        Self {
            handle: ConversationHandle::spawn(Conversation::start(script)),
            voice_delay,
        }
    }

    pub fn send_answer(&self, text: &str) -> SendOutcome {
        self.handle.send(text)
    }

    /// Sends whatever is in the input box; the draft survives a refused send.
    pub fn submit_draft(&self) -> SendOutcome {
        self.handle.update(|conversation| {
            let draft = std::mem::take(&mut conversation.script_mut().draft);
            let outcome = conversation.send(&draft);
            if !outcome.is_accepted() {
                conversation.script_mut().draft = draft;
            }
            outcome
        })
    }

    pub fn set_draft(&self, text: &str) {
        self.handle
            .update(|conversation| conversation.script_mut().set_draft(text));
    }

    /// Returns `true` when recording is now on.
    pub fn toggle_recording(&self) -> bool {
        let generation = self
            .handle
            .update(|conversation| conversation.script_mut().toggle_recording());

        match generation {
            Some(generation) => {
                self.handle.schedule(self.voice_delay, move |conversation| {
                    conversation.script_mut().finish_recording(generation);
                });
                true
            }
            None => false,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.handle.read(|conversation| conversation.script().is_complete())
    }

    pub async fn settled(&self) {
        self.handle.settled().await;
    }

    pub fn view(&self) -> InterviewView {
        self.handle.read(|conversation| {
            let script = conversation.script();
            InterviewView {
                messages: conversation.timeline().messages().to_vec(),
                typing: conversation.timeline().is_typing(),
                stage: script.stage(),
                current_question_index: script.current_question_index(),
                question_count: script.question_count(),
                completed: script.is_complete(),
                progress_label: script.progress_label(),
                progress_percent: script.progress_percent(),
                draft: script.draft().to_string(),
                recording: script.is_recording(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::timeline::Speaker;

    fn conversation(policy: FollowUpPolicy) -> Conversation<InterviewScript> {
        Conversation::start(InterviewScript::standard(policy, PacingConfig::instant()))
    }

    fn ids(conversation: &Conversation<InterviewScript>) -> Vec<String> {
        conversation
            .timeline()
            .messages()
            .iter()
            .map(|m| m.id.clone())
            .collect()
    }

    #[test]
    fn greets_then_asks_the_first_question() {
        let mut conversation = conversation(FollowUpPolicy::Never);
        assert_eq!(ids(&conversation), ["welcome"]);
        assert_eq!(conversation.script().stage(), InterviewStage::AskingQuestion(0));

        conversation.deliver_all();
        assert_eq!(ids(&conversation), ["welcome", "question-1"]);
        assert_eq!(conversation.script().stage(), InterviewStage::AwaitingAnswer(0));
    }

    #[test]
    fn completes_after_every_question_is_answered() {
        let mut conversation = conversation(FollowUpPolicy::Never);
        conversation.deliver_all();

        for _ in 0..4 {
            assert!(conversation.send("my answer").is_accepted());
            conversation.deliver_all();
        }

        let script = conversation.script();
        assert!(script.is_complete());
        assert_eq!(script.current_question_index(), script.question_count());
        assert_eq!(
            conversation.timeline().last().map(|m| m.id.as_str()),
            Some("completion")
        );

        let before = conversation.timeline().len();
        assert_eq!(conversation.send("one more"), SendOutcome::Ended);
        assert_eq!(conversation.timeline().len(), before);
    }

    #[test]
    fn completion_is_decided_before_the_closing_message_lands() {
        let mut conversation = conversation(FollowUpPolicy::Never);
        conversation.deliver_all();
        for _ in 0..3 {
            conversation.send("answer");
            conversation.deliver_all();
        }

        assert!(conversation.send("last answer").is_accepted());
        assert!(conversation.script().is_complete());
        assert_eq!(conversation.pending_len(), 1);
        assert_eq!(
            conversation.timeline().last().map(|m| m.speaker),
            Some(Speaker::Human)
        );

        conversation.deliver_all();
        assert_eq!(
            conversation.timeline().last().map(|m| m.id.as_str()),
            Some("completion")
        );
    }

    #[test]
    fn follow_up_is_asked_at_most_once_per_question() {
        let mut conversation = conversation(FollowUpPolicy::Always);
        conversation.deliver_all();

        conversation.send("first answer");
        conversation.deliver_all();
        assert_eq!(conversation.script().stage(), InterviewStage::AwaitingAnswer(0));
        assert_eq!(conversation.timeline().last().unwrap().id, "followup-1");

        conversation.send("follow-up answer");
        conversation.deliver_all();
        assert_eq!(conversation.timeline().last().unwrap().id, "question-2");
        assert_eq!(conversation.script().current_question_index(), 1);
    }

    #[test]
    fn answers_are_refused_while_the_interviewer_is_busy() {
        let mut conversation = conversation(FollowUpPolicy::Never);
        assert_eq!(conversation.send("too early"), SendOutcome::Busy);

        conversation.deliver_all();
        assert!(conversation.send("answer").is_accepted());
        assert_eq!(conversation.send("again"), SendOutcome::Busy);
    }

    #[test]
    fn completion_message_is_emitted_once() {
        let mut conversation = conversation(FollowUpPolicy::Always);
        conversation.deliver_all();
        while !conversation.script().is_complete() {
            conversation.send("answer");
            conversation.deliver_all();
        }
        conversation.send("ignored");
        conversation.deliver_all();

        let completions = conversation
            .timeline()
            .messages()
            .iter()
            .filter(|m| m.id == "completion")
            .count();
        assert_eq!(completions, 1);
        let human = conversation
            .timeline()
            .messages()
            .iter()
            .filter(|m| m.speaker == Speaker::Human)
            .count();
        assert_eq!(human, 8);
    }

    #[test]
    fn empty_question_set_completes_immediately() {
        let mut conversation = Conversation::start(InterviewScript::new(
            Vec::new(),
            FollowUpPolicy::Never,
            PacingConfig::instant(),
        ));
        assert!(conversation.script().is_complete());
        conversation.deliver_all();
        assert_eq!(ids(&conversation), ["welcome", "completion"]);
    }

    #[test]
    fn progress_label_is_clamped_to_question_count() {
        let mut conversation = conversation(FollowUpPolicy::Never);
        assert_eq!(conversation.script().progress_label(), "Question 1 of 4");
        conversation.deliver_all();
        for _ in 0..3 {
            conversation.send("answer");
            conversation.deliver_all();
        }
        assert_eq!(conversation.script().progress_label(), "Question 4 of 4");
        assert_eq!(conversation.script().progress_percent(), 100);
    }

    #[test]
    fn seeded_policy_is_reproducible() {
        let mut first = FollowUpPolicy::seeded(0.5, 7);
        let mut second = FollowUpPolicy::seeded(0.5, 7);
        let a: Vec<bool> = (0..16).map(|_| first.ask()).collect();
        let b: Vec<bool> = (0..16).map(|_| second.ask()).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn non_finite_probabilities_fall_back_to_an_even_chance() {
        for raw in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let mut policy = FollowUpPolicy::seeded(raw, 3);
            match &policy {
                FollowUpPolicy::Random { probability, .. } => assert_eq!(*probability, 0.5),
                other => panic!("unexpected policy {other:?}"),
            }
            policy.ask();
        }
        match FollowUpPolicy::random(1.5) {
            FollowUpPolicy::Random { probability, .. } => assert_eq!(probability, 1.0),
            other => panic!("unexpected policy {other:?}"),
        }
    }

    #[test]
    fn recording_fills_the_draft_only_for_the_live_generation() {
        let mut script = InterviewScript::standard(FollowUpPolicy::Never, PacingConfig::instant());
        let first = script.toggle_recording().expect("recording starts");
        assert_eq!(script.toggle_recording(), None);
        let second = script.toggle_recording().expect("recording restarts");

        assert!(!script.finish_recording(first));
        assert!(script.finish_recording(second));
        assert_eq!(script.draft(), VOICE_PLACEHOLDER);
        assert!(!script.is_recording());
    }

    #[tokio::test(start_paused = true)]
    async fn screen_paces_the_first_question() {
        let screen = InterviewScreen::start(InterviewScript::standard(
            FollowUpPolicy::Never,
            PacingConfig::default(),
        ));

        tokio::time::sleep(std::time::Duration::from_millis(2100)).await;
        let view = screen.view();
        assert!(view.typing);
        assert_eq!(view.messages.len(), 1);

        screen.settled().await;
        let view = screen.view();
        assert!(!view.typing);
        assert_eq!(view.messages.len(), 2);
        assert_eq!(view.stage, InterviewStage::AwaitingAnswer(0));
    }

    #[tokio::test(start_paused = true)]
    async fn voice_input_fills_the_draft_after_the_capture_delay() {
        let screen = InterviewScreen::start(InterviewScript::standard(
            FollowUpPolicy::Never,
            PacingConfig::default(),
        ));
        assert!(screen.toggle_recording());
        assert!(screen.view().recording);

        tokio::time::sleep(std::time::Duration::from_millis(3100)).await;
        let view = screen.view();
        assert!(!view.recording);
        assert_eq!(view.draft, VOICE_PLACEHOLDER);

        screen.settled().await;
        assert!(screen.submit_draft().is_accepted());
        assert!(screen.view().draft.is_empty());
    }
}
