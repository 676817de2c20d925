use crate::flows::assets::AssetError;
use crate::flows::conversation::QuickReply;
use crate::flows::dispatch::KeywordRule;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatIntent {
    FindInternships,
    CheckStatus,
    GetTips,
    ShowHelp,
    Greeting,
}

impl ChatIntent {
    pub const fn label(self) -> &'static str {
        match self {
            Self::FindInternships => "find internships",
            Self::CheckStatus => "check status",
            Self::GetTips => "get tips",
            Self::ShowHelp => "help",
            Self::Greeting => "greeting",
        }
    }
}

/// Canned answer for one intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentScript {
    pub intent: ChatIntent,
    pub acknowledgement: String,
    #[serde(default)]
    pub detail: Option<String>,
    /// Long answers keep the typing indicator up for longer.
    #[serde(default)]
    pub long_detail: bool,
    #[serde(default)]
    pub quick_replies: Option<Vec<QuickReply>>,
}

/// A quick-reply action that re-enters the chat as typed text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortcut {
    pub action: String,
    pub text: String,
}

/// The full chatbot lookup table, loadable from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatScript {
    pub greeting: String,
    pub quick_replies: Vec<QuickReply>,
    pub rules: Vec<KeywordRule<ChatIntent>>,
    pub intents: Vec<IntentScript>,
    pub shortcuts: Vec<Shortcut>,
    pub fallback: String,
    pub coming_soon: String,
}

impl ChatScript {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, AssetError> {
        let script: Self = serde_json::from_reader(reader)?;
        Ok(script)
    }

    pub fn intent(&self, intent: ChatIntent) -> Option<&IntentScript> {
        self.intents.iter().find(|entry| entry.intent == intent)
    }

    pub fn shortcut(&self, action: &str) -> Option<&Shortcut> {
        self.shortcuts.iter().find(|entry| entry.action == action)
    }

    pub fn standard() -> Self {
        Self {
            greeting: "Hi! 👋 I'm SmartIntern Bot. I can help you find PM internships, check application status, and answer questions about opportunities. How can I assist you today?".to_string(),
            quick_replies: vec![
                QuickReply::new("find", "Find internships", "find_internships"),
                QuickReply::new("status", "Application status", "check_status"),
                QuickReply::new("tips", "Interview tips", "get_tips"),
                QuickReply::new("help", "Help", "show_help"),
            ],
            rules: vec![
                KeywordRule::all_of(&["find", "internship"], ChatIntent::FindInternships),
                KeywordRule::any_of(&["status", "application"], ChatIntent::CheckStatus),
                KeywordRule::any_of(&["tip", "interview"], ChatIntent::GetTips),
                KeywordRule::any_of(&["help"], ChatIntent::ShowHelp),
                KeywordRule::any_of(&["hello", "hi"], ChatIntent::Greeting),
            ],
            intents: vec![
                IntentScript {
                    intent: ChatIntent::FindInternships,
                    acknowledgement: "Great! Let me find the best PM internships for you based on your profile... 🔍".to_string(),
                    detail: Some(FIND_INTERNSHIPS_DETAIL.to_string()),
                    long_detail: true,
                    quick_replies: Some(vec![
                        QuickReply::new("more", "Show more", "more_internships"),
                        QuickReply::new("details", "Get details", "get_details"),
                        QuickReply::new("apply", "How to apply", "apply_help"),
                    ]),
                },
                IntentScript {
                    intent: ChatIntent::CheckStatus,
                    acknowledgement: "Let me check your application status... 📋".to_string(),
                    detail: Some(STATUS_DETAIL.to_string()),
                    long_detail: false,
                    quick_replies: Some(vec![
                        QuickReply::new("prep", "Interview prep", "interview_prep"),
                        QuickReply::new("reschedule", "Reschedule", "reschedule"),
                        QuickReply::new("more_apps", "Apply to more", "find_internships"),
                    ]),
                },
                IntentScript {
                    intent: ChatIntent::GetTips,
                    acknowledgement: "Here are some essential PM interview tips! 💡".to_string(),
                    detail: Some(TIPS_DETAIL.to_string()),
                    long_detail: false,
                    quick_replies: Some(vec![
                        QuickReply::new("guide", "Send prep guide", "send_guide"),
                        QuickReply::new("practice", "Practice questions", "practice"),
                        QuickReply::new("mock", "Mock interview", "mock_interview"),
                    ]),
                },
                IntentScript {
                    intent: ChatIntent::ShowHelp,
                    acknowledgement: "I'm here to help with your PM internship journey! Here's what I can do:".to_string(),
                    detail: Some(HELP_DETAIL.to_string()),
                    long_detail: false,
                    quick_replies: Some(vec![
                        QuickReply::new("find", "Find internships", "find_internships"),
                        QuickReply::new("updates", "Daily updates", "setup_updates"),
                        QuickReply::new("support", "Contact support", "contact_support"),
                    ]),
                },
                IntentScript {
                    intent: ChatIntent::Greeting,
                    acknowledgement: "Hello! How can I help you with your PM internship search today?".to_string(),
                    detail: None,
                    long_detail: false,
                    quick_replies: None,
                },
            ],
            shortcuts: vec![
                Shortcut { action: "find_internships".to_string(), text: "Find internships".to_string() },
                Shortcut { action: "check_status".to_string(), text: "Check application status".to_string() },
                Shortcut { action: "get_tips".to_string(), text: "Get interview tips".to_string() },
                Shortcut { action: "show_help".to_string(), text: "Help".to_string() },
            ],
            fallback: "I understand you're looking for help. Try asking me to 'find internships', 'check application status', or 'get interview tips'.".to_string(),
            coming_soon: "Thanks for your interest! This feature is coming soon. 🚀".to_string(),
        }
    }
}

const FIND_INTERNSHIPS_DETAIL: &str = "Here are 3 top matches for you:

🏢 *TechCorp Solutions*
📍 Mumbai, India | 💰 ₹25-35k/month
🎯 92% Match
Apply: techcorp.com/careers

🚀 *StartupHub*
📍 Bangalore, India | 💰 ₹30-40k/month
🎯 88% Match
Apply: startuphub.com/internships

💻 *E-commerce Giants*
📍 Remote | 💰 ₹20-30k/month
🎯 85% Match
Apply: ecommerce.com/jobs

Would you like more details about any of these positions?";

const STATUS_DETAIL: &str = "Here's your application status:

✅ *TechCorp Solutions* - Under Review
📅 Applied: 2 days ago
📊 Status: Your profile is being reviewed by the hiring team

⏳ *StartupHub* - Application Submitted
📅 Applied: 1 day ago
📊 Status: Application received, waiting for initial screening

🎯 *E-commerce Giants* - Interview Scheduled
📅 Applied: 5 days ago
📊 Status: Phone interview scheduled for tomorrow at 2 PM

Good luck with your interview tomorrow! 🍀";

const TIPS_DETAIL: &str = "🎯 *PM Interview Success Tips:*

1. *Product Thinking*
   • Practice product design questions
   • Think user-first, always
   • Use frameworks like CIRCLES

2. *Analytical Skills*
   • Prepare for case studies
   • Know your metrics (DAU, CAC, LTV)
   • Practice estimation problems

3. *Communication*
   • Structure your answers clearly
   • Tell stories with STAR method
   • Ask clarifying questions

4. *Behavioral Questions*
   • Prepare leadership examples
   • Show impact with numbers
   • Demonstrate learning mindset

Want me to send you a detailed prep guide?";

const HELP_DETAIL: &str = "🤖 *SmartIntern Bot Commands:*

🔍 *\"Find internships\"*
   Get personalized PM internship recommendations

📊 *\"Application status\"*
   Check your current application progress

💡 *\"Interview tips\"*
   Get PM interview preparation guidance

📱 *\"Send updates\"*
   Get daily internship alerts via WhatsApp

🎯 *\"My profile\"*
   View and update your profile information

📞 *\"Contact support\"*
   Connect with our career counselors

Just type what you need or use the quick reply buttons! 😊";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_script_covers_every_routed_intent() {
        let script = ChatScript::standard();
        for rule in &script.rules {
            assert!(
                script.intent(rule.target).is_some(),
                "missing answer for {}",
                rule.target.label()
            );
        }
    }

    #[test]
    fn script_round_trips_through_json() {
        let script = ChatScript::standard();
        let encoded = serde_json::to_vec(&script).expect("script serializes");
        let decoded = ChatScript::from_reader(encoded.as_slice()).expect("script parses");
        assert_eq!(decoded, script);
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = ChatScript::from_reader("{\"greeting\": 1}".as_bytes())
            .expect_err("invalid script rejected");
        assert!(matches!(err, AssetError::ChatScript(_)));
    }
}
