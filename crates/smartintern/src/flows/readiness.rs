use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillArea {
    pub id: String,
    pub name: String,
    pub score: u8,
    pub max_score: u8,
    pub description: String,
    pub gaps: Vec<String>,
    pub recommendations: Vec<String>,
}

impl SkillArea {
    fn new(
        id: &str,
        name: &str,
        score: u8,
        description: &str,
        gaps: [&str; 3],
        recommendations: [&str; 3],
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            score,
            max_score: 100,
            description: description.to_string(),
            gaps: gaps.iter().map(|gap| gap.to_string()).collect(),
            recommendations: recommendations.iter().map(|r| r.to_string()).collect(),
        }
    }

    /// Checklist id of the gap at `index`, e.g. `leadership-gap-2`.
    pub fn gap_id(&self, index: usize) -> String {
        format!("{}-gap-{}", self.id, index)
    }

    pub fn gap_ids(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.gaps.len()).map(|index| self.gap_id(index))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub points: u32,
}

impl Achievement {
    fn new(id: &str, title: &str, description: &str, completed: bool, points: u32) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            completed,
            points,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessTier {
    Ready,
    Intermediate,
    Beginner,
}

impl ReadinessTier {
    pub const fn from_score(score: u8) -> Self {
        if score >= 85 {
            Self::Ready
        } else if score >= 70 {
            Self::Intermediate
        } else {
            Self::Beginner
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Ready => "Ready",
            Self::Intermediate => "Intermediate",
            Self::Beginner => "Beginner",
        }
    }
}

/// Rounded mean of the skill scores, halves rounding up.
pub fn overall_score(areas: &[SkillArea]) -> u8 {
    if areas.is_empty() {
        return 0;
    }
    let count = areas.len() as u32;
    let total: u32 = areas.iter().map(|area| u32::from(area.score)).sum();
    ((total * 2 + count) / (count * 2)) as u8
}

pub fn standard_skill_areas() -> Vec<SkillArea> {
    vec![
        SkillArea::new(
            "product-thinking",
            "Product Thinking",
            78,
            "Understanding user needs, market analysis, and product strategy",
            [
                "Learn about user persona development",
                "Practice competitive analysis frameworks",
                "Study product-market fit concepts",
            ],
            [
                "Read 'Inspired' by Marty Cagan",
                "Complete Google UX Design course",
                "Analyze 3 successful product launches",
            ],
        ),
        SkillArea::new(
            "analytical-skills",
            "Analytical Skills",
            85,
            "Data analysis, metrics interpretation, and decision-making",
            [
                "Advanced SQL query writing",
                "A/B testing methodology",
                "Statistical significance understanding",
            ],
            [
                "Complete SQL fundamentals course",
                "Practice with real datasets",
                "Learn Google Analytics",
            ],
        ),
        SkillArea::new(
            "communication",
            "Communication",
            72,
            "Stakeholder management, presentation skills, and documentation",
            [
                "Technical writing skills",
                "Stakeholder presentation techniques",
                "Cross-functional collaboration",
            ],
            [
                "Join Toastmasters or similar group",
                "Practice product requirement documents",
                "Lead a team project",
            ],
        ),
        SkillArea::new(
            "business-acumen",
            "Business Acumen",
            68,
            "Market understanding, business models, and strategic thinking",
            [
                "Business model canvas understanding",
                "Revenue model analysis",
                "Market sizing techniques",
            ],
            [
                "Study successful startup case studies",
                "Learn about different business models",
                "Practice market sizing exercises",
            ],
        ),
        SkillArea::new(
            "leadership",
            "Leadership",
            75,
            "Team collaboration, influence without authority, and project management",
            [
                "Conflict resolution skills",
                "Agile methodology knowledge",
                "Team motivation techniques",
            ],
            [
                "Get Scrum Master certification",
                "Lead a volunteer project",
                "Practice giving constructive feedback",
            ],
        ),
    ]
}

/// Completion flags are fixed content, not derived from the session.
pub fn standard_achievements() -> Vec<Achievement> {
    vec![
        Achievement::new(
            "profile-complete",
            "Profile Master",
            "Completed comprehensive profile setup",
            true,
            100,
        ),
        Achievement::new(
            "interview-ace",
            "Interview Ace",
            "Successfully completed AI interview assessment",
            true,
            150,
        ),
        Achievement::new(
            "first-application",
            "First Step",
            "Applied to your first internship",
            false,
            75,
        ),
        Achievement::new(
            "skill-improver",
            "Skill Improver",
            "Completed 5 skill gap recommendations",
            false,
            200,
        ),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GapProgress {
    pub completed: usize,
    pub total: usize,
    pub percent: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkillAreaView {
    pub id: String,
    pub name: String,
    pub score: u8,
    pub max_score: u8,
    pub percent: u8,
    pub description: String,
    pub gaps: Vec<GapView>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GapView {
    pub id: String,
    pub label: String,
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReadinessReport {
    pub overall_score: u8,
    pub tier: ReadinessTier,
    pub tier_label: &'static str,
    pub gap_progress: GapProgress,
    pub achievements_completed: usize,
    pub achievements_total: usize,
    pub points_earned: u32,
    pub skill_areas: Vec<SkillAreaView>,
    pub achievements: Vec<Achievement>,
}

/// Readiness screen state: fixed scores plus the gap checklist.
#[derive(Debug, Clone)]
pub struct ReadinessBoard {
    areas: Vec<SkillArea>,
    achievements: Vec<Achievement>,
    completed_gaps: BTreeSet<String>,
}

impl ReadinessBoard {
    pub fn new(areas: Vec<SkillArea>, achievements: Vec<Achievement>) -> Self {
        Self {
            areas,
            achievements,
            completed_gaps: BTreeSet::new(),
        }
    }

    pub fn standard() -> Self {
        Self::new(standard_skill_areas(), standard_achievements())
    }

    pub fn overall_score(&self) -> u8 {
        overall_score(&self.areas)
    }

    pub fn tier(&self) -> ReadinessTier {
        ReadinessTier::from_score(self.overall_score())
    }

    fn knows_gap(&self, gap_id: &str) -> bool {
        self.areas
            .iter()
            .any(|area| area.gap_ids().any(|id| id == gap_id))
    }

    /// Flips a checklist entry; returns the new state, or `None` for an
    /// unknown gap id.
    pub fn toggle_gap(&mut self, gap_id: &str) -> Option<bool> {
        if !self.knows_gap(gap_id) {
            return None;
        }
        if self.completed_gaps.remove(gap_id) {
            Some(false)
        } else {
            self.completed_gaps.insert(gap_id.to_string());
            Some(true)
        }
    }

    pub fn gap_progress(&self) -> GapProgress {
        let total: usize = self.areas.iter().map(|area| area.gaps.len()).sum();
        let completed = self.completed_gaps.len();
        let percent = if total == 0 {
            0
        } else {
            ((completed * 200 + total) / (total * 2)) as u8
        };
        GapProgress {
            completed,
            total,
            percent,
        }
    }

    pub fn report(&self) -> ReadinessReport {
        let overall_score = self.overall_score();
        let tier = ReadinessTier::from_score(overall_score);
        let completed: Vec<_> = self.achievements.iter().filter(|a| a.completed).collect();

        let skill_areas = self
            .areas
            .iter()
            .map(|area| SkillAreaView {
                id: area.id.clone(),
                name: area.name.clone(),
                score: area.score,
                max_score: area.max_score,
                percent: percent_of(area.score, area.max_score),
                description: area.description.clone(),
                gaps: area
                    .gaps
                    .iter()
                    .enumerate()
                    .map(|(index, label)| {
                        let id = area.gap_id(index);
                        GapView {
                            completed: self.completed_gaps.contains(&id),
                            id,
                            label: label.clone(),
                        }
                    })
                    .collect(),
                recommendations: area.recommendations.clone(),
            })
            .collect();

        ReadinessReport {
            overall_score,
            tier,
            tier_label: tier.label(),
            gap_progress: self.gap_progress(),
            achievements_completed: completed.len(),
            achievements_total: self.achievements.len(),
            points_earned: completed.iter().map(|a| a.points).sum(),
            skill_areas,
            achievements: self.achievements.clone(),
        }
    }
}

fn percent_of(score: u8, max: u8) -> u8 {
    if max == 0 {
        return 0;
    }
    ((u32::from(score) * 100) / u32::from(max)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn areas_with(scores: &[u8]) -> Vec<SkillArea> {
        standard_skill_areas()
            .into_iter()
            .zip(scores)
            .map(|(mut area, score)| {
                area.score = *score;
                area
            })
            .collect()
    }

    #[test]
    fn standard_scores_average_to_intermediate() {
        let board = ReadinessBoard::standard();
        assert_eq!(board.overall_score(), 76);
        assert_eq!(board.tier(), ReadinessTier::Intermediate);
    }

    #[test]
    fn high_scores_are_ready() {
        let areas = areas_with(&[90, 92, 88, 95, 91]);
        assert_eq!(overall_score(&areas), 91);
        assert_eq!(ReadinessTier::from_score(91), ReadinessTier::Ready);
    }

    #[test]
    fn tier_boundaries() {
        assert_eq!(ReadinessTier::from_score(85), ReadinessTier::Ready);
        assert_eq!(ReadinessTier::from_score(84), ReadinessTier::Intermediate);
        assert_eq!(ReadinessTier::from_score(70), ReadinessTier::Intermediate);
        assert_eq!(ReadinessTier::from_score(69), ReadinessTier::Beginner);
    }

    #[test]
    fn halves_round_up() {
        let areas = areas_with(&[70, 71]);
        assert_eq!(overall_score(&areas), 71);
        assert_eq!(overall_score(&[]), 0);
    }

    #[test]
    fn gap_checklist_does_not_move_the_score() {
        let mut board = ReadinessBoard::standard();
        assert_eq!(board.toggle_gap("leadership-gap-2"), Some(true));
        assert_eq!(board.toggle_gap("communication-gap-0"), Some(true));
        assert_eq!(board.toggle_gap("communication-gap-0"), Some(false));
        assert_eq!(board.toggle_gap("leadership-gap-9"), None);

        let progress = board.gap_progress();
        assert_eq!(progress.completed, 1);
        assert_eq!(progress.total, 15);
        // 1 / 15 = 6.67%
        assert_eq!(progress.percent, 7);
        assert_eq!(board.overall_score(), 76);
    }

    #[test]
    fn report_counts_static_achievements() {
        let report = ReadinessBoard::standard().report();
        assert_eq!(report.achievements_completed, 2);
        assert_eq!(report.achievements_total, 4);
        assert_eq!(report.points_earned, 250);
        assert_eq!(report.tier_label, "Intermediate");
        assert_eq!(report.skill_areas[3].gaps[1].id, "business-acumen-gap-1");
    }
}
