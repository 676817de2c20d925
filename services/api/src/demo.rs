use crate::infra::load_assets;
use clap::Args;
use smartintern::config::{AppConfig, PacingConfig};
use smartintern::error::AppError;
use smartintern::flows::onboarding::{LoginField, ProfileField};
use smartintern::flows::readiness::{ReadinessBoard, ReadinessReport};
use smartintern::flows::recommendations::{
    filter_listings, ListingCatalog, RecommendationBoard, WorkTypeFilter,
};
use smartintern::flows::timeline::{Message, Speaker};
use smartintern::flows::{
    ActionEffect, FlowView, OnboardingFlow, ScreenAction, ScreenId, ScreenView,
};
use std::path::PathBuf;
use std::sync::Arc;

const DEMO_ANSWERS: [&str; 4] = [
    "I'm a final-year engineering student who loves turning user problems into shipped features.",
    "On a hackathon team I owned the roadmap and kept design and backend aligned on one scope.",
    "I'd start from app-store reviews and funnel metrics, then validate the biggest drop-offs with users.",
    "A campus marketplace app; it worked because we interviewed students every week.",
];

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Seed for the interviewer's follow-up decisions (reproducible runs)
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Skip the simulated typing and thinking delays
    #[arg(long)]
    pub(crate) fast: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ReadinessArgs {
    /// Gap checklist ids to mark as done, e.g. leadership-gap-0
    #[arg(long = "completed-gap")]
    pub(crate) completed_gaps: Vec<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ListingsArgs {
    /// Work-type facet: all, remote, hybrid or onsite
    #[arg(long, default_value = "all")]
    pub(crate) work_type: WorkTypeFilter,
    /// Optional CSV export replacing the built-in catalog
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { seed, fast } = args;

    let mut config = AppConfig::load()?;
    if fast {
        config.pacing = PacingConfig::instant();
    }
    let assets = load_assets(&config, seed)?;
    let mut flow = OnboardingFlow::new(assets);

    println!("SmartIntern onboarding demo");

    println!("\n[{}] signing in", flow.current().as_str());
    for (field, value) in [
        (LoginField::Name, "Asha Verma"),
        (LoginField::Email, "asha@example.com"),
        (LoginField::College, "IIT Delhi"),
    ] {
        act(
            &mut flow,
            ScreenAction::SetLoginField {
                field,
                value: value.to_string(),
            },
        )?;
    }
    report_effect(act(&mut flow, ScreenAction::SubmitLogin)?);

    println!("\n[{}] building the profile", flow.current().as_str());
    for (field, value) in [
        (ProfileField::Education, "B.Tech in Computer Science"),
        (ProfileField::Location, "Bangalore, Remote"),
        (ProfileField::Bio, "Curious builder who enjoys talking to users."),
    ] {
        act(
            &mut flow,
            ScreenAction::SetProfileField {
                field,
                value: value.to_string(),
            },
        )?;
    }
    for skill in ["SQL", "User Research", "Figma"] {
        act(
            &mut flow,
            ScreenAction::AddSkill {
                value: skill.to_string(),
            },
        )?;
    }
    act(
        &mut flow,
        ScreenAction::AddInterest {
            value: "Fintech".to_string(),
        },
    )?;
    act(&mut flow, ScreenAction::UploadResume)?;
    while flow.current() == ScreenId::Profile {
        report_effect(act(&mut flow, ScreenAction::ProfileNext)?);
    }

    println!("\n[{}] answering the AI interviewer", flow.current().as_str());
    let mut answers = DEMO_ANSWERS.iter().cycle();
    loop {
        flow.settled().await;
        if let ScreenView::Interview(view) = flow.view().active {
            if view.completed {
                println!("  {}", view.progress_label);
                break;
            }
        }
        let text = answers.next().copied().unwrap_or_default();
        act(
            &mut flow,
            ScreenAction::SendAnswer {
                text: text.to_string(),
            },
        )?;
    }
    if let ScreenView::Interview(view) = flow.view().active {
        print_timeline(&view.messages);
    }
    report_effect(act(&mut flow, ScreenAction::FinishInterview)?);

    println!("\n[{}] browsing recommendations", flow.current().as_str());
    act(
        &mut flow,
        ScreenAction::Apply {
            listing_id: "1".to_string(),
        },
    )?;
    if let ScreenView::Recommendations(view) = flow.view().active {
        for listing in &view.listings {
            println!(
                "- {} at {} ({}% match, {}){}",
                listing.listing.title,
                listing.listing.company,
                listing.listing.match_percentage,
                listing.listing.work_type,
                if listing.applied { " [applied]" } else { "" }
            );
        }
        println!(
            "  {} listings | avg match {}% | {} applied",
            view.summary.total, view.summary.average_match, view.summary.applied
        );
    }
    report_effect(act(&mut flow, ScreenAction::ContinueToReadiness)?);

    println!("\n[{}] reviewing readiness", flow.current().as_str());
    act(
        &mut flow,
        ScreenAction::ToggleGap {
            gap_id: "business-acumen-gap-2".to_string(),
        },
    )?;
    if let ScreenView::Readiness(report) = flow.view().active {
        render_readiness(&report);
    }
    report_effect(act(&mut flow, ScreenAction::ContinueToChat)?);

    println!("\n[{}] chatting with SmartIntern Bot", flow.current().as_str());
    for action in [
        ScreenAction::SendChat {
            text: "Can you find internships for me?".to_string(),
        },
        ScreenAction::QuickReply {
            action: "check_status".to_string(),
        },
        ScreenAction::SendChat {
            text: "banana".to_string(),
        },
    ] {
        act(&mut flow, action)?;
        flow.settled().await;
    }
    if let ScreenView::Chatbot(view) = flow.view().active {
        print_timeline(&view.messages);
    }

    let FlowView { label, .. } = flow.view();
    println!("\nDemo finished on the {label} screen");
    Ok(())
}

pub(crate) fn run_readiness(args: ReadinessArgs) -> Result<(), AppError> {
    let mut board = ReadinessBoard::standard();
    for gap_id in &args.completed_gaps {
        if board.toggle_gap(gap_id).is_none() {
            println!("Ignoring unknown gap id '{gap_id}'");
        }
    }
    render_readiness(&board.report());
    Ok(())
}

pub(crate) fn run_listings(args: ListingsArgs) -> Result<(), AppError> {
    let ListingsArgs { work_type, csv } = args;
    let catalog = match csv {
        Some(path) => ListingCatalog::from_path(path)?,
        None => ListingCatalog::standard(),
    };

    let listings = filter_listings(&catalog, work_type);
    println!(
        "Internship recommendations ({} of {}, facet {})",
        listings.len(),
        catalog.len(),
        work_type.as_str()
    );
    for listing in listings {
        println!(
            "- [{}] {} at {} | {} | {} | {}% match ({:?})",
            listing.id,
            listing.title,
            listing.company,
            listing.location,
            listing.work_type,
            listing.match_percentage,
            listing.match_band()
        );
        println!(
            "    deadline {} | {} applicants | {}",
            listing.application_deadline,
            listing.applicant_count,
            listing.salary_range.as_deref().unwrap_or("stipend not listed")
        );
    }

    let summary = RecommendationBoard::new(Arc::new(catalog)).summary();
    println!(
        "\n{} listings | avg match {}% | {} high matches",
        summary.total, summary.average_match, summary.high_matches
    );
    Ok(())
}

fn act(flow: &mut OnboardingFlow, action: ScreenAction) -> Result<ActionEffect, AppError> {
    Ok(flow.apply(action)?)
}

fn report_effect(effect: ActionEffect) {
    if let ActionEffect::Advanced { to } = effect {
        println!("  -> continuing to {}", to.label());
    }
}

fn print_timeline(messages: &[Message]) {
    for message in messages {
        let speaker = match message.speaker {
            Speaker::Human => "you",
            Speaker::Agent => "bot",
        };
        let first_line = message.text.lines().next().unwrap_or_default();
        println!("  {speaker:>3}: {first_line}");
    }
}

fn render_readiness(report: &ReadinessReport) {
    println!(
        "Readiness score: {}% ({})",
        report.overall_score, report.tier_label
    );
    for area in &report.skill_areas {
        println!("- {}: {}/{}", area.name, area.score, area.max_score);
    }
    println!(
        "Skill gaps addressed: {}/{} ({}%)",
        report.gap_progress.completed, report.gap_progress.total, report.gap_progress.percent
    );
    println!(
        "Achievements: {}/{} unlocked, {} points",
        report.achievements_completed, report.achievements_total, report.points_earned
    );
}
