use super::{InternshipListing, WorkType};
use crate::flows::assets::AssetError;
use chrono::NaiveDate;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

/// Fixed, ordered set of internship listings.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingCatalog {
    listings: Vec<InternshipListing>,
}

impl ListingCatalog {
    pub fn new(listings: Vec<InternshipListing>) -> Self {
        Self { listings }
    }

    pub fn listings(&self) -> &[InternshipListing] {
        &self.listings
    }

    pub fn get(&self, id: &str) -> Option<&InternshipListing> {
        self.listings.iter().find(|listing| listing.id == id)
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file)
    }

    /// Reads a CSV export; list columns are `;`-separated.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, AssetError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut listings = Vec::new();

        for record in csv_reader.deserialize::<ListingRow>() {
            let row = record?;
            let listing = row.into_listing()?;
            if listings
                .iter()
                .any(|existing: &InternshipListing| existing.id == listing.id)
            {
                return Err(AssetError::InvalidListing {
                    id: listing.id,
                    reason: "duplicate listing id".to_string(),
                });
            }
            listings.push(listing);
        }

        Ok(Self { listings })
    }

    pub fn standard() -> Self {
        Self::new(vec![
            listing(
                "1",
                "Product Management Intern",
                "TechCorp Solutions",
                "Mumbai, India",
                "3 months",
                92,
                "Join our product team to work on cutting-edge fintech solutions. You'll collaborate with cross-functional teams to define product roadmaps and analyze user feedback.",
                ["Business/Engineering background", "Analytical thinking", "Communication skills"],
                ["Mentorship program", "Real project ownership", "Certificate of completion"],
                (2024, 2, 15),
                45,
                WorkType::Hybrid,
                "₹25,000 - ₹35,000/month",
            ),
            listing(
                "2",
                "Associate Product Manager Intern",
                "StartupHub",
                "Bangalore, India",
                "6 months",
                88,
                "Work directly with our founding team on product strategy for our B2B SaaS platform. Perfect opportunity to learn product management from the ground up.",
                ["Problem-solving skills", "Data analysis", "User empathy"],
                ["Equity participation", "Flexible hours", "Learning stipend"],
                (2024, 2, 20),
                32,
                WorkType::Onsite,
                "₹30,000 - ₹40,000/month",
            ),
            listing(
                "3",
                "Digital Product Intern",
                "E-commerce Giants",
                "Remote",
                "4 months",
                85,
                "Support our digital product initiatives across mobile and web platforms. Gain experience in A/B testing, user research, and product analytics.",
                ["Digital marketing knowledge", "Basic SQL", "Project management"],
                ["Remote work", "Industry exposure", "Performance bonus"],
                (2024, 2, 25),
                67,
                WorkType::Remote,
                "₹20,000 - ₹30,000/month",
            ),
            listing(
                "4",
                "Product Strategy Intern",
                "Innovation Labs",
                "Delhi, India",
                "3 months",
                82,
                "Research market trends and competitive landscape to inform product strategy decisions. Work with senior PMs on go-to-market strategies.",
                ["Research skills", "Market analysis", "Presentation skills"],
                ["Networking opportunities", "Strategy exposure", "Recommendation letter"],
                (2024, 3, 1),
                28,
                WorkType::Hybrid,
                "₹22,000 - ₹32,000/month",
            ),
            listing(
                "5",
                "Junior Product Analyst Intern",
                "DataDriven Co",
                "Pune, India",
                "5 months",
                79,
                "Analyze user behavior data and create insights to drive product decisions. Learn advanced analytics tools and methodologies.",
                ["Statistics background", "Excel/SQL proficiency", "Curiosity for data"],
                ["Tool training", "Data certification", "Full-time opportunity"],
                (2024, 3, 5),
                41,
                WorkType::Onsite,
                "₹18,000 - ₹28,000/month",
            ),
        ])
    }
}

#[allow(clippy::too_many_arguments)]
fn listing(
    id: &str,
    title: &str,
    company: &str,
    location: &str,
    duration: &str,
    match_percentage: u8,
    description: &str,
    requirements: [&str; 3],
    benefits: [&str; 3],
    (year, month, day): (i32, u32, u32),
    applicant_count: u32,
    work_type: WorkType,
    salary_range: &str,
) -> InternshipListing {
    InternshipListing {
        id: id.to_string(),
        title: title.to_string(),
        company: company.to_string(),
        location: location.to_string(),
        duration: duration.to_string(),
        match_percentage,
        description: description.to_string(),
        requirements: requirements.iter().map(|r| r.to_string()).collect(),
        benefits: benefits.iter().map(|b| b.to_string()).collect(),
        application_deadline: NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default(),
        applicant_count,
        work_type,
        salary_range: Some(salary_range.to_string()),
    }
}

#[derive(Debug, Deserialize)]
struct ListingRow {
    id: String,
    title: String,
    company: String,
    location: String,
    duration: String,
    match_percentage: u8,
    description: String,
    #[serde(default)]
    requirements: String,
    #[serde(default)]
    benefits: String,
    application_deadline: String,
    applicant_count: u32,
    work_type: WorkType,
    #[serde(default)]
    salary_range: Option<String>,
}

impl ListingRow {
    fn into_listing(self) -> Result<InternshipListing, AssetError> {
        if self.match_percentage > 100 {
            return Err(AssetError::InvalidListing {
                id: self.id,
                reason: format!("match percentage {} exceeds 100", self.match_percentage),
            });
        }

        let application_deadline =
            NaiveDate::parse_from_str(self.application_deadline.trim(), "%Y-%m-%d").map_err(
                |err| AssetError::InvalidListing {
                    id: self.id.clone(),
                    reason: format!(
                        "deadline '{}' is not YYYY-MM-DD ({err})",
                        self.application_deadline
                    ),
                },
            )?;

        Ok(InternshipListing {
            id: self.id,
            title: self.title,
            company: self.company,
            location: self.location,
            duration: self.duration,
            match_percentage: self.match_percentage,
            description: self.description,
            requirements: split_list(&self.requirements),
            benefits: split_list(&self.benefits),
            application_deadline,
            applicant_count: self.applicant_count,
            work_type: self.work_type,
            salary_range: self.salary_range.filter(|value| !value.trim().is_empty()),
        })
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "id,title,company,location,duration,match_percentage,description,requirements,benefits,application_deadline,applicant_count,work_type,salary_range\n";

    #[test]
    fn standard_catalog_matches_reference_mix() {
        let catalog = ListingCatalog::standard();
        assert_eq!(catalog.len(), 5);
        let remote = catalog
            .listings()
            .iter()
            .filter(|listing| listing.work_type == WorkType::Remote)
            .count();
        assert_eq!(remote, 1);
        assert_eq!(
            catalog.get("4").map(|l| l.application_deadline),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
    }

    #[test]
    fn csv_rows_become_listings() {
        let csv = format!(
            "{HEADER}10,Growth Intern,Acme,Remote,2 months,91,Own experiments,SQL; Curiosity ,Stipend,2024-04-01,12,remote,\n"
        );
        let catalog = ListingCatalog::from_reader(csv.as_bytes()).expect("catalog parses");

        let listing = catalog.get("10").expect("listing loaded");
        assert_eq!(listing.requirements, ["SQL", "Curiosity"]);
        assert_eq!(listing.benefits, ["Stipend"]);
        assert_eq!(listing.work_type, WorkType::Remote);
        assert!(listing.salary_range.is_none());
    }

    #[test]
    fn rejects_bad_deadline() {
        let csv = format!("{HEADER}1,A,B,C,D,50,E,,,next week,1,onsite,\n");
        let err = ListingCatalog::from_reader(csv.as_bytes()).expect_err("deadline rejected");
        assert!(matches!(err, AssetError::InvalidListing { ref id, .. } if id == "1"));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let row = "7,A,B,C,D,50,E,,,2024-01-01,1,hybrid,\n";
        let csv = format!("{HEADER}{row}{row}");
        let err = ListingCatalog::from_reader(csv.as_bytes()).expect_err("duplicate rejected");
        assert!(err.to_string().contains("duplicate"));
    }
}
