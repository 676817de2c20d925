//! End-to-end walks through the onboarding flow using only the public API.

use std::sync::Arc;
use std::time::Duration;

use smartintern::config::PacingConfig;
use smartintern::flows::chatbot::{ChatScript, ChatbotScript};
use smartintern::flows::conversation::{Conversation, ConversationHandle, SendOutcome};
use smartintern::flows::onboarding::{LoginField, ProfileStep};
use smartintern::flows::recommendations::ApplyOutcome;
use smartintern::flows::timeline::Speaker;
use smartintern::flows::{
    ActionEffect, FlowAssets, FollowUpMode, OnboardingFlow, ScreenAction, ScreenId, ScreenView,
};

fn flow(follow_up: FollowUpMode) -> OnboardingFlow {
    OnboardingFlow::new(FlowAssets::standard(PacingConfig::default()).with_follow_up(follow_up))
}

fn action(flow: &mut OnboardingFlow, action: ScreenAction) -> ActionEffect {
    flow.apply(action).expect("action available on this screen")
}

#[tokio::test(start_paused = true)]
async fn walks_every_screen_in_order() {
    let mut flow = flow(FollowUpMode::Seeded {
        probability: 0.5,
        seed: 42,
    });
    assert_eq!(flow.current(), ScreenId::Login);

    for (field, value) in [
        (LoginField::Name, "Asha"),
        (LoginField::Email, "asha@example.com"),
        (LoginField::College, "IIT Delhi"),
    ] {
        action(
            &mut flow,
            ScreenAction::SetLoginField {
                field,
                value: value.to_string(),
            },
        );
    }
    assert_eq!(
        action(&mut flow, ScreenAction::SubmitLogin),
        ActionEffect::Advanced {
            to: ScreenId::Profile
        }
    );

    assert_eq!(
        action(&mut flow, ScreenAction::ProfileNext),
        ActionEffect::Step {
            step: ProfileStep::SkillsAndInterests
        }
    );
    action(&mut flow, ScreenAction::ProfileNext);
    assert_eq!(
        action(&mut flow, ScreenAction::ProfileNext),
        ActionEffect::Advanced {
            to: ScreenId::Interview
        }
    );

    let mut answers = 0;
    loop {
        flow.settled().await;
        let ScreenView::Interview(view) = flow.view().active else {
            panic!("expected the interview screen");
        };
        if view.completed {
            assert_eq!(view.progress_label, "Interview Complete!");
            assert_eq!(view.messages.last().map(|m| m.id.as_str()), Some("completion"));
            break;
        }
        let effect = action(
            &mut flow,
            ScreenAction::SendAnswer {
                text: format!("answer {answers}"),
            },
        );
        assert!(matches!(
            effect,
            ActionEffect::Sent {
                send: SendOutcome::Accepted { .. }
            }
        ));
        answers += 1;
    }
    assert!((4..=8).contains(&answers));

    assert_eq!(
        action(&mut flow, ScreenAction::FinishInterview),
        ActionEffect::Advanced {
            to: ScreenId::Recommendations
        }
    );
    assert_eq!(
        action(&mut flow, ScreenAction::ContinueToReadiness),
        ActionEffect::Advanced {
            to: ScreenId::Readiness
        }
    );
    assert_eq!(
        action(&mut flow, ScreenAction::ContinueToChat),
        ActionEffect::Advanced {
            to: ScreenId::Chatbot
        }
    );

    assert!(flow.apply(ScreenAction::ContinueToChat).is_err());
    assert_eq!(flow.current(), ScreenId::Chatbot);
}

#[tokio::test(start_paused = true)]
async fn remote_filter_and_idempotent_apply() {
    let mut flow = flow(FollowUpMode::Never);
    flow.navigate("recommendations");

    action(
        &mut flow,
        ScreenAction::SelectWorkType {
            filter: "remote".parse().expect("known facet"),
        },
    );
    let first = action(
        &mut flow,
        ScreenAction::Apply {
            listing_id: "3".to_string(),
        },
    );
    let second = action(
        &mut flow,
        ScreenAction::Apply {
            listing_id: "3".to_string(),
        },
    );
    assert_eq!(
        first,
        ActionEffect::Applied {
            apply: ApplyOutcome::Applied
        }
    );
    assert_eq!(
        second,
        ActionEffect::Applied {
            apply: ApplyOutcome::AlreadyApplied
        }
    );

    let ScreenView::Recommendations(view) = flow.view().active else {
        panic!("expected the recommendations screen");
    };
    assert_eq!(view.listings.len(), 1);
    assert_eq!(view.listings[0].listing.id, "3");
    assert_eq!(view.summary.applied, 1);
}

#[tokio::test(start_paused = true)]
async fn readiness_reports_intermediate_for_standard_scores() {
    let mut flow = flow(FollowUpMode::Never);
    flow.navigate("readiness");

    let ScreenView::Readiness(report) = flow.view().active else {
        panic!("expected the readiness screen");
    };
    assert_eq!(report.overall_score, 76);
    assert_eq!(report.tier_label, "Intermediate");
}

#[tokio::test(start_paused = true)]
async fn unmatched_chat_text_gets_only_the_fallback() {
    let mut flow = flow(FollowUpMode::Never);
    flow.navigate("chatbot");

    let before = match flow.view().active {
        ScreenView::Chatbot(view) => view.quick_replies,
        other => panic!("unexpected screen {other:?}"),
    };

    action(
        &mut flow,
        ScreenAction::SendChat {
            text: "banana".to_string(),
        },
    );
    flow.settled().await;

    let ScreenView::Chatbot(view) = flow.view().active else {
        panic!("expected the chatbot screen");
    };
    assert_eq!(view.messages.len(), 3);
    assert_eq!(view.messages[2].text, ChatScript::standard().fallback);
    assert_eq!(view.quick_replies, before);
}

#[tokio::test(start_paused = true)]
async fn leaving_the_interview_discards_its_state() {
    let mut flow = flow(FollowUpMode::Never);
    flow.navigate("interview");
    flow.navigate("recommendations");
    tokio::time::sleep(Duration::from_secs(10)).await;

    flow.navigate("interview");
    let ScreenView::Interview(view) = flow.view().active else {
        panic!("expected the interview screen");
    };
    assert_eq!(view.messages.len(), 1);
    assert_eq!(view.current_question_index, 0);
}

#[tokio::test(start_paused = true)]
async fn closed_conversations_drop_pending_replies() {
    let handle = ConversationHandle::spawn(Conversation::start(ChatbotScript::new(
        Arc::new(ChatScript::standard()),
        PacingConfig::default(),
    )));
    assert!(handle.send("help").is_accepted());
    handle.close();

    tokio::time::sleep(Duration::from_secs(10)).await;
    let speakers: Vec<Speaker> = handle.read(|conversation| {
        conversation
            .timeline()
            .messages()
            .iter()
            .map(|m| m.speaker)
            .collect()
    });
    assert_eq!(speakers, [Speaker::Agent, Speaker::Human]);
    assert_eq!(handle.send("hello"), SendOutcome::Ended);
}
