use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenId {
    Login,
    Profile,
    Interview,
    Recommendations,
    Readiness,
    Chatbot,
}

impl ScreenId {
    /// Registry order; also the forward sequence of the flow.
    pub const ORDER: [ScreenId; 6] = [
        ScreenId::Login,
        ScreenId::Profile,
        ScreenId::Interview,
        ScreenId::Recommendations,
        ScreenId::Readiness,
        ScreenId::Chatbot,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Profile => "profile",
            Self::Interview => "interview",
            Self::Recommendations => "recommendations",
            Self::Readiness => "readiness",
            Self::Chatbot => "chatbot",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Profile => "Profile",
            Self::Interview => "Interview",
            Self::Recommendations => "Jobs",
            Self::Readiness => "Badge",
            Self::Chatbot => "Chat",
        }
    }

    pub fn position(self) -> usize {
        Self::ORDER
            .iter()
            .position(|screen| *screen == self)
            .unwrap_or_default()
    }

    /// Only exact registry ids match.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ORDER.into_iter().find(|screen| screen.as_str() == raw)
    }

    /// Forward target; the chatbot is terminal.
    pub fn next(self) -> Option<Self> {
        Self::ORDER.get(self.position() + 1).copied()
    }

    pub fn previous(self) -> Option<Self> {
        self.position()
            .checked_sub(1)
            .and_then(|index| Self::ORDER.get(index).copied())
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScreenEntry {
    pub id: ScreenId,
    pub label: &'static str,
    pub position: usize,
}

pub fn registry() -> Vec<ScreenEntry> {
    ScreenId::ORDER
        .iter()
        .enumerate()
        .map(|(position, id)| ScreenEntry {
            id: *id,
            label: id.label(),
            position,
        })
        .collect()
}

/// Holds the one current screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowController {
    current: ScreenId,
}

impl Default for FlowController {
    fn default() -> Self {
        Self::new()
    }
}

impl FlowController {
    pub fn new() -> Self {
        Self {
            current: ScreenId::Login,
        }
    }

    pub fn current(&self) -> ScreenId {
        self.current
    }

    /// Accepts any id; anything outside the registry lands on login.
    pub fn go_to(&mut self, raw: &str) -> ScreenId {
        let target = ScreenId::parse(raw).unwrap_or_else(|| {
            warn!(requested = raw, "unknown screen, falling back to login");
            ScreenId::Login
        });
        self.show(target)
    }

    pub fn show(&mut self, screen: ScreenId) -> ScreenId {
        if screen != self.current {
            info!(from = %self.current, to = %screen, "screen changed");
            self.current = screen;
        }
        self.current
    }

    /// Follows the forward callback of the current screen, if it has one.
    pub fn advance(&mut self) -> Option<ScreenId> {
        let next = self.current.next()?;
        Some(self.show(next))
    }

    /// Steps to the previous registry entry regardless of how the current
    /// screen was reached.
    pub fn back(&mut self) -> Option<ScreenId> {
        let previous = self.current.previous()?;
        Some(self.show(previous))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_login_and_walks_forward() {
        let mut controller = FlowController::new();
        assert_eq!(controller.current(), ScreenId::Login);

        let visited: Vec<ScreenId> = std::iter::from_fn(|| controller.advance()).collect();
        assert_eq!(visited, &ScreenId::ORDER[1..]);
        assert_eq!(controller.current(), ScreenId::Chatbot);
        assert_eq!(controller.advance(), None);
    }

    #[test]
    fn unknown_ids_fall_back_to_login() {
        let mut controller = FlowController::new();
        controller.go_to("readiness");
        assert_eq!(controller.go_to("settings"), ScreenId::Login);
        assert_eq!(controller.current(), ScreenId::Login);
    }

    #[test]
    fn padded_or_mixed_case_ids_are_not_registry_ids() {
        let mut controller = FlowController::new();
        controller.go_to("readiness");
        assert_eq!(controller.go_to(" chatbot "), ScreenId::Login);

        controller.go_to("readiness");
        assert_eq!(controller.go_to("Chatbot"), ScreenId::Login);
        assert_eq!(ScreenId::parse("chatbot"), Some(ScreenId::Chatbot));
    }

    #[test]
    fn back_is_positional() {
        let mut controller = FlowController::new();
        controller.go_to("chatbot");
        assert_eq!(controller.back(), Some(ScreenId::Readiness));

        controller.go_to("login");
        assert_eq!(controller.back(), None);
        assert_eq!(controller.current(), ScreenId::Login);
    }

    #[test]
    fn registry_uses_navigation_labels() {
        let labels: Vec<&str> = registry().iter().map(|entry| entry.label).collect();
        assert_eq!(
            labels,
            ["Login", "Profile", "Interview", "Jobs", "Badge", "Chat"]
        );
        assert_eq!(registry()[3].id, ScreenId::Recommendations);
    }
}
