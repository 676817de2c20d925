//! One user's walk through the onboarding screens.

use super::assets::FlowAssets;
use super::chatbot::{ChatbotScreen, ChatbotScript, ChatbotView, QuickReplyOutcome};
use super::conversation::SendOutcome;
use super::interview::{InterviewScreen, InterviewScript, InterviewView};
use super::onboarding::{
    LoginField, LoginForm, LoginOutcome, ProfileField, ProfileStep, ProfileWizard, WizardOutcome,
};
use super::readiness::{ReadinessBoard, ReadinessReport};
use super::recommendations::{
    ApplyOutcome, RecommendationBoard, RecommendationsView, WorkTypeFilter,
};
use super::screens::{FlowController, ScreenId};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FlowError {
    #[error("action '{action}' is not available on the {screen} screen")]
    ActionNotAvailable {
        action: &'static str,
        screen: ScreenId,
    },
    #[error("session {0} not found")]
    UnknownSession(String),
}

/// Everything a user can do on a screen.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScreenAction {
    SetLoginField { field: LoginField, value: String },
    SubmitLogin,
    SetProfileField { field: ProfileField, value: String },
    AddSkill { value: String },
    RemoveSkill { value: String },
    AddInterest { value: String },
    RemoveInterest { value: String },
    UploadResume,
    ProfileNext,
    ProfileBack,
    SendAnswer { text: String },
    SetDraft { text: String },
    SubmitDraft,
    ToggleRecording,
    FinishInterview,
    SelectWorkType { filter: WorkTypeFilter },
    Apply { listing_id: String },
    ContinueToReadiness,
    ToggleGap { gap_id: String },
    ContinueToChat,
    SendChat { text: String },
    QuickReply { action: String },
}

impl ScreenAction {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SetLoginField { .. } => "set_login_field",
            Self::SubmitLogin => "submit_login",
            Self::SetProfileField { .. } => "set_profile_field",
            Self::AddSkill { .. } => "add_skill",
            Self::RemoveSkill { .. } => "remove_skill",
            Self::AddInterest { .. } => "add_interest",
            Self::RemoveInterest { .. } => "remove_interest",
            Self::UploadResume => "upload_resume",
            Self::ProfileNext => "profile_next",
            Self::ProfileBack => "profile_back",
            Self::SendAnswer { .. } => "send_answer",
            Self::SetDraft { .. } => "set_draft",
            Self::SubmitDraft => "submit_draft",
            Self::ToggleRecording => "toggle_recording",
            Self::FinishInterview => "finish_interview",
            Self::SelectWorkType { .. } => "select_work_type",
            Self::Apply { .. } => "apply",
            Self::ContinueToReadiness => "continue_to_readiness",
            Self::ToggleGap { .. } => "toggle_gap",
            Self::ContinueToChat => "continue_to_chat",
            Self::SendChat { .. } => "send_chat",
            Self::QuickReply { .. } => "quick_reply",
        }
    }
}

/// What an accepted action did.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum ActionEffect {
    Updated,
    /// Valid on this screen but changed nothing.
    Ignored,
    Step { step: ProfileStep },
    Sent { send: SendOutcome },
    QuickReply { quick_reply: QuickReplyOutcome },
    Recording { recording: bool },
    Applied { apply: ApplyOutcome },
    GapToggled { gap_id: String, completed: bool },
    Advanced { to: ScreenId },
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    #[serde(flatten)]
    pub wizard: ProfileWizard,
    pub step_number: u8,
    pub step_title: &'static str,
    pub progress_percent: u8,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "screen", content = "state", rename_all = "snake_case")]
pub enum ScreenView {
    Login(LoginForm),
    Profile(ProfileView),
    Interview(InterviewView),
    Recommendations(RecommendationsView),
    Readiness(ReadinessReport),
    Chatbot(ChatbotView),
}

#[derive(Debug, Clone, Serialize)]
pub struct FlowView {
    pub label: &'static str,
    pub position: usize,
    pub can_go_back: bool,
    #[serde(flatten)]
    pub active: ScreenView,
}

enum ActiveScreen {
    Login(LoginForm),
    Profile(ProfileWizard),
    Interview(InterviewScreen),
    Recommendations(RecommendationBoard),
    Readiness(ReadinessBoard),
    Chatbot(ChatbotScreen),
}

impl ActiveScreen {
    fn mount(screen: ScreenId, assets: &FlowAssets) -> Self {
        match screen {
            ScreenId::Login => Self::Login(LoginForm::default()),
            ScreenId::Profile => Self::Profile(ProfileWizard::new()),
            ScreenId::Interview => Self::Interview(InterviewScreen::start(
                InterviewScript::standard(assets.follow_up.policy(), assets.pacing),
            )),
            ScreenId::Recommendations => {
                Self::Recommendations(RecommendationBoard::new(assets.catalog.clone()))
            }
            ScreenId::Readiness => Self::Readiness(ReadinessBoard::standard()),
            ScreenId::Chatbot => Self::Chatbot(ChatbotScreen::start(ChatbotScript::new(
                assets.chat_script.clone(),
                assets.pacing,
            ))),
        }
    }
}

/// Owns the flow controller and the state of the one mounted screen.
///
/// Conversational screens spawn pacing tasks, so mounting them needs a
/// tokio runtime.
pub struct OnboardingFlow {
    controller: FlowController,
    assets: FlowAssets,
    active: ActiveScreen,
}

impl OnboardingFlow {
    pub fn new(assets: FlowAssets) -> Self {
        let controller = FlowController::new();
        let active = ActiveScreen::mount(controller.current(), &assets);
        Self {
            controller,
            assets,
            active,
        }
    }

    pub fn current(&self) -> ScreenId {
        self.controller.current()
    }

    /// Free navigation; unknown ids land on login.
    pub fn navigate(&mut self, raw: &str) -> ScreenId {
        let target = self.controller.go_to(raw);
        self.remount_if_changed(target);
        target
    }

    pub fn back(&mut self) -> ScreenId {
        let before = self.controller.current();
        if let Some(previous) = self.controller.back() {
            self.mount(previous);
        }
        debug!(from = %before, to = %self.controller.current(), "back navigation");
        self.controller.current()
    }

    fn advance(&mut self) -> ActionEffect {
        match self.controller.advance() {
            Some(next) => {
                self.mount(next);
                ActionEffect::Advanced { to: next }
            }
            None => ActionEffect::Ignored,
        }
    }

    fn remount_if_changed(&mut self, target: ScreenId) {
        let mounted = match &self.active {
            ActiveScreen::Login(_) => ScreenId::Login,
            ActiveScreen::Profile(_) => ScreenId::Profile,
            ActiveScreen::Interview(_) => ScreenId::Interview,
            ActiveScreen::Recommendations(_) => ScreenId::Recommendations,
            ActiveScreen::Readiness(_) => ScreenId::Readiness,
            ActiveScreen::Chatbot(_) => ScreenId::Chatbot,
        };
        if mounted != target {
            self.mount(target);
        }
    }

    fn mount(&mut self, screen: ScreenId) {
        // Replacing the state drops the old screen, closing its conversation.
        self.active = ActiveScreen::mount(screen, &self.assets);
    }

    pub fn apply(&mut self, action: ScreenAction) -> Result<ActionEffect, FlowError> {
        let screen = self.controller.current();
        let not_available = FlowError::ActionNotAvailable {
            action: action.name(),
            screen,
        };

        let next = match (&mut self.active, action) {
            (ActiveScreen::Login(form), ScreenAction::SetLoginField { field, value }) => {
                form.set(field, value);
                Next::Stay(ActionEffect::Updated)
            }
            (ActiveScreen::Login(form), ScreenAction::SubmitLogin) => match form.submit() {
                LoginOutcome::SignedIn => Next::Advance,
                LoginOutcome::Incomplete => Next::Stay(ActionEffect::Ignored),
            },

            (ActiveScreen::Profile(wizard), ScreenAction::SetProfileField { field, value }) => {
                wizard.set(field, value);
                Next::Stay(ActionEffect::Updated)
            }
            (ActiveScreen::Profile(wizard), ScreenAction::AddSkill { value }) => {
                changed(wizard.add_skill(&value))
            }
            (ActiveScreen::Profile(wizard), ScreenAction::RemoveSkill { value }) => {
                changed(wizard.remove_skill(&value))
            }
            (ActiveScreen::Profile(wizard), ScreenAction::AddInterest { value }) => {
                changed(wizard.add_interest(&value))
            }
            (ActiveScreen::Profile(wizard), ScreenAction::RemoveInterest { value }) => {
                changed(wizard.remove_interest(&value))
            }
            (ActiveScreen::Profile(wizard), ScreenAction::UploadResume) => {
                wizard.upload_resume();
                Next::Stay(ActionEffect::Updated)
            }
            (ActiveScreen::Profile(wizard), ScreenAction::ProfileNext) => match wizard.next() {
                WizardOutcome::Step(step) => Next::Stay(ActionEffect::Step { step }),
                WizardOutcome::Completed => Next::Advance,
            },
            (ActiveScreen::Profile(wizard), ScreenAction::ProfileBack) => {
                Next::Stay(ActionEffect::Step {
                    step: wizard.back(),
                })
            }

            (ActiveScreen::Interview(interview), ScreenAction::SendAnswer { text }) => {
                Next::Stay(ActionEffect::Sent {
                    send: interview.send_answer(&text),
                })
            }
            (ActiveScreen::Interview(interview), ScreenAction::SetDraft { text }) => {
                interview.set_draft(&text);
                Next::Stay(ActionEffect::Updated)
            }
            (ActiveScreen::Interview(interview), ScreenAction::SubmitDraft) => {
                Next::Stay(ActionEffect::Sent {
                    send: interview.submit_draft(),
                })
            }
            (ActiveScreen::Interview(interview), ScreenAction::ToggleRecording) => {
                Next::Stay(ActionEffect::Recording {
                    recording: interview.toggle_recording(),
                })
            }
            (ActiveScreen::Interview(interview), ScreenAction::FinishInterview) => {
                if interview.is_complete() {
                    Next::Advance
                } else {
                    Next::Stay(ActionEffect::Ignored)
                }
            }

            (ActiveScreen::Recommendations(board), ScreenAction::SelectWorkType { filter }) => {
                board.select_filter(filter);
                Next::Stay(ActionEffect::Updated)
            }
            (ActiveScreen::Recommendations(board), ScreenAction::Apply { listing_id }) => {
                Next::Stay(ActionEffect::Applied {
                    apply: board.apply(&listing_id),
                })
            }
            (ActiveScreen::Recommendations(_), ScreenAction::ContinueToReadiness) => Next::Advance,

            (ActiveScreen::Readiness(board), ScreenAction::ToggleGap { gap_id }) => {
                Next::Stay(match board.toggle_gap(&gap_id) {
                    Some(completed) => ActionEffect::GapToggled { gap_id, completed },
                    None => ActionEffect::Ignored,
                })
            }
            (ActiveScreen::Readiness(_), ScreenAction::ContinueToChat) => Next::Advance,

            (ActiveScreen::Chatbot(chat), ScreenAction::SendChat { text }) => {
                Next::Stay(ActionEffect::Sent {
                    send: chat.send(&text),
                })
            }
            (ActiveScreen::Chatbot(chat), ScreenAction::QuickReply { action }) => {
                Next::Stay(ActionEffect::QuickReply {
                    quick_reply: chat.select_quick_reply(&action),
                })
            }

            _ => return Err(not_available),
        };

        Ok(match next {
            Next::Stay(effect) => effect,
            Next::Advance => self.advance(),
        })
    }

    /// Waits until the mounted conversation, if any, has no reply in flight.
    pub async fn settled(&self) {
        match &self.active {
            ActiveScreen::Interview(interview) => interview.settled().await,
            ActiveScreen::Chatbot(chat) => chat.settled().await,
            _ => {}
        }
    }

    pub fn view(&self) -> FlowView {
        let screen = self.controller.current();
        let active = match &self.active {
            ActiveScreen::Login(form) => ScreenView::Login(form.clone()),
            ActiveScreen::Profile(wizard) => ScreenView::Profile(ProfileView {
                step_number: wizard.step().number(),
                step_title: wizard.step().title(),
                progress_percent: wizard.progress_percent(),
                wizard: wizard.clone(),
            }),
            ActiveScreen::Interview(interview) => ScreenView::Interview(interview.view()),
            ActiveScreen::Recommendations(board) => ScreenView::Recommendations(board.view()),
            ActiveScreen::Readiness(board) => ScreenView::Readiness(board.report()),
            ActiveScreen::Chatbot(chat) => ScreenView::Chatbot(chat.view()),
        };

        FlowView {
            label: screen.label(),
            position: screen.position(),
            can_go_back: screen.previous().is_some(),
            active,
        }
    }
}

enum Next {
    Stay(ActionEffect),
    Advance,
}

fn changed(changed: bool) -> Next {
    Next::Stay(if changed {
        ActionEffect::Updated
    } else {
        ActionEffect::Ignored
    })
}
