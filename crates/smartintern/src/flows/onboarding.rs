use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginField {
    Name,
    Email,
    College,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginOutcome {
    SignedIn,
    Incomplete,
}

/// Sign-up form; nothing is validated beyond presence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoginForm {
    pub name: String,
    pub email: String,
    pub college: String,
}

impl LoginForm {
    pub fn set(&mut self, field: LoginField, value: impl Into<String>) {
        let slot = match field {
            LoginField::Name => &mut self.name,
            LoginField::Email => &mut self.email,
            LoginField::College => &mut self.college,
        };
        *slot = value.into();
    }

    pub fn is_complete(&self) -> bool {
        [&self.name, &self.email, &self.college]
            .iter()
            .all(|value| !value.trim().is_empty())
    }

    pub fn submit(&self) -> LoginOutcome {
        if self.is_complete() {
            LoginOutcome::SignedIn
        } else {
            LoginOutcome::Incomplete
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileStep {
    BasicInformation,
    SkillsAndInterests,
    BioAndResume,
}

impl ProfileStep {
    pub const COUNT: u8 = 3;

    pub const fn number(self) -> u8 {
        match self {
            Self::BasicInformation => 1,
            Self::SkillsAndInterests => 2,
            Self::BioAndResume => 3,
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::BasicInformation => "Basic Information",
            Self::SkillsAndInterests => "Skills & Interests",
            Self::BioAndResume => "Bio & Resume",
        }
    }

    fn next(self) -> Option<Self> {
        match self {
            Self::BasicInformation => Some(Self::SkillsAndInterests),
            Self::SkillsAndInterests => Some(Self::BioAndResume),
            Self::BioAndResume => None,
        }
    }

    fn previous(self) -> Option<Self> {
        match self {
            Self::BasicInformation => None,
            Self::SkillsAndInterests => Some(Self::BasicInformation),
            Self::BioAndResume => Some(Self::SkillsAndInterests),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileField {
    Education,
    Experience,
    Location,
    Bio,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "step", rename_all = "snake_case")]
pub enum WizardOutcome {
    Step(ProfileStep),
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileWizard {
    step: ProfileStep,
    pub education: String,
    pub experience: String,
    pub location: String,
    pub bio: String,
    skills: Vec<String>,
    interests: Vec<String>,
    resume_uploaded: bool,
}

impl Default for ProfileWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileWizard {
    pub fn new() -> Self {
        Self {
            step: ProfileStep::BasicInformation,
            education: String::new(),
            experience: String::new(),
            location: String::new(),
            bio: String::new(),
            skills: Vec::new(),
            interests: Vec::new(),
            resume_uploaded: false,
        }
    }

    pub fn step(&self) -> ProfileStep {
        self.step
    }

    pub fn skills(&self) -> &[String] {
        &self.skills
    }

    pub fn interests(&self) -> &[String] {
        &self.interests
    }

    pub fn resume_uploaded(&self) -> bool {
        self.resume_uploaded
    }

    pub fn progress_percent(&self) -> u8 {
        (u16::from(self.step.number()) * 100 / u16::from(ProfileStep::COUNT)) as u8
    }

    pub fn set(&mut self, field: ProfileField, value: impl Into<String>) {
        let slot = match field {
            ProfileField::Education => &mut self.education,
            ProfileField::Experience => &mut self.experience,
            ProfileField::Location => &mut self.location,
            ProfileField::Bio => &mut self.bio,
        };
        *slot = value.into();
    }

    /// Moves forward; past the last step the profile is done.
    pub fn next(&mut self) -> WizardOutcome {
        match self.step.next() {
            Some(step) => {
                self.step = step;
                WizardOutcome::Step(step)
            }
            None => {
                debug!(
                    skills = self.skills.len(),
                    interests = self.interests.len(),
                    resume = self.resume_uploaded,
                    "profile submitted"
                );
                WizardOutcome::Completed
            }
        }
    }

    pub fn back(&mut self) -> ProfileStep {
        if let Some(step) = self.step.previous() {
            self.step = step;
        }
        self.step
    }

    pub fn add_skill(&mut self, skill: &str) -> bool {
        push_unique(&mut self.skills, skill)
    }

    pub fn remove_skill(&mut self, skill: &str) -> bool {
        remove_value(&mut self.skills, skill)
    }

    pub fn add_interest(&mut self, interest: &str) -> bool {
        push_unique(&mut self.interests, interest)
    }

    pub fn remove_interest(&mut self, interest: &str) -> bool {
        remove_value(&mut self.interests, interest)
    }

    /// No file is read; the upload is only marked as done.
    pub fn upload_resume(&mut self) {
        self.resume_uploaded = true;
    }
}

fn push_unique(values: &mut Vec<String>, raw: &str) -> bool {
    let value = raw.trim();
    if value.is_empty() || values.iter().any(|existing| existing == value) {
        return false;
    }
    values.push(value.to_string());
    true
}

fn remove_value(values: &mut Vec<String>, value: &str) -> bool {
    let before = values.len();
    values.retain(|existing| existing != value);
    values.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_needs_every_field() {
        let mut form = LoginForm::default();
        form.set(LoginField::Name, "Asha");
        form.set(LoginField::Email, "asha@example.com");
        form.set(LoginField::College, "   ");
        assert_eq!(form.submit(), LoginOutcome::Incomplete);

        form.set(LoginField::College, "IIT Delhi");
        assert_eq!(form.submit(), LoginOutcome::SignedIn);
    }

    #[test]
    fn wizard_walks_three_steps() {
        let mut wizard = ProfileWizard::new();
        assert_eq!(wizard.progress_percent(), 33);
        assert_eq!(wizard.back(), ProfileStep::BasicInformation);

        assert_eq!(
            wizard.next(),
            WizardOutcome::Step(ProfileStep::SkillsAndInterests)
        );
        assert_eq!(wizard.next(), WizardOutcome::Step(ProfileStep::BioAndResume));
        assert_eq!(wizard.progress_percent(), 100);
        assert_eq!(wizard.next(), WizardOutcome::Completed);
        assert_eq!(wizard.step(), ProfileStep::BioAndResume);

        assert_eq!(wizard.back(), ProfileStep::SkillsAndInterests);
    }

    #[test]
    fn skills_are_trimmed_and_deduplicated() {
        let mut wizard = ProfileWizard::new();
        assert!(wizard.add_skill("  SQL "));
        assert!(!wizard.add_skill("SQL"));
        assert!(!wizard.add_skill("   "));
        assert!(wizard.add_skill("Figma"));
        assert_eq!(wizard.skills(), ["SQL", "Figma"]);

        assert!(wizard.remove_skill("SQL"));
        assert!(!wizard.remove_skill("SQL"));
        assert_eq!(wizard.skills(), ["Figma"]);

        assert!(wizard.add_interest("Fintech"));
        assert!(!wizard.add_interest("Fintech "));
        assert_eq!(wizard.interests().len(), 1);
    }

    #[test]
    fn resume_upload_is_simulated() {
        let mut wizard = ProfileWizard::new();
        assert!(!wizard.resume_uploaded());
        wizard.upload_resume();
        assert!(wizard.resume_uploaded());
    }
}
