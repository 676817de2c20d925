//! The onboarding screens and the scripted engines behind them.

pub mod assets;
pub mod chatbot;
pub mod conversation;
pub mod dispatch;
pub mod interview;
pub mod onboarding;
pub mod readiness;
pub mod recommendations;
pub mod router;
pub mod screens;
pub mod session;
pub mod store;
pub mod timeline;

pub use assets::{AssetError, FlowAssets, FollowUpMode};
pub use router::session_router;
pub use screens::{FlowController, ScreenId};
pub use session::{ActionEffect, FlowError, FlowView, OnboardingFlow, ScreenAction, ScreenView};
pub use store::{InMemorySessionStore, SessionId, SessionService, SessionStore};
