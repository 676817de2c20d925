mod catalog;

pub use catalog::ListingCatalog;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkType {
    Remote,
    Hybrid,
    Onsite,
}

impl WorkType {
    pub const ALL: [WorkType; 3] = [WorkType::Remote, WorkType::Hybrid, WorkType::Onsite];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Hybrid => "hybrid",
            Self::Onsite => "onsite",
        }
    }
}

impl fmt::Display for WorkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Work-type facet selected on the recommendations screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkTypeFilter {
    #[default]
    All,
    Only(WorkType),
}

impl WorkTypeFilter {
    pub fn matches(self, work_type: WorkType) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == work_type,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(work_type) => work_type.as_str(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown work type '{0}' (expected all, remote, hybrid or onsite)")]
pub struct UnknownWorkType(pub String);

impl FromStr for WorkTypeFilter {
    type Err = UnknownWorkType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "remote" => Ok(Self::Only(WorkType::Remote)),
            "hybrid" => Ok(Self::Only(WorkType::Hybrid)),
            "onsite" | "on-site" => Ok(Self::Only(WorkType::Onsite)),
            other => Err(UnknownWorkType(other.to_string())),
        }
    }
}

impl Serialize for WorkTypeFilter {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for WorkTypeFilter {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternshipListing {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub duration: String,
    pub match_percentage: u8,
    pub description: String,
    pub requirements: Vec<String>,
    pub benefits: Vec<String>,
    pub application_deadline: NaiveDate,
    pub applicant_count: u32,
    pub work_type: WorkType,
    pub salary_range: Option<String>,
}

impl InternshipListing {
    pub fn match_band(&self) -> MatchBand {
        MatchBand::from_percentage(self.match_percentage)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchBand {
    Excellent,
    Strong,
    Good,
    Fair,
}

impl MatchBand {
    pub const fn from_percentage(percentage: u8) -> Self {
        match percentage {
            90..=u8::MAX => Self::Excellent,
            80..=89 => Self::Strong,
            70..=79 => Self::Good,
            _ => Self::Fair,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ApplyOutcome {
    Applied,
    AlreadyApplied,
    UnknownListing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FacetCount {
    pub filter: WorkTypeFilter,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecommendationSummary {
    pub total: usize,
    pub average_match: u8,
    pub applied: usize,
    pub high_matches: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListingView {
    #[serde(flatten)]
    pub listing: InternshipListing,
    pub band: MatchBand,
    pub applied: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationsView {
    pub filter: WorkTypeFilter,
    pub facets: Vec<FacetCount>,
    pub listings: Vec<ListingView>,
    pub summary: RecommendationSummary,
}

/// Recommendations screen state: the selected facet and the applied set.
#[derive(Debug, Clone)]
pub struct RecommendationBoard {
    catalog: Arc<ListingCatalog>,
    filter: WorkTypeFilter,
    applied: BTreeSet<String>,
}

impl RecommendationBoard {
    pub const HIGH_MATCH: u8 = 85;

    pub fn new(catalog: Arc<ListingCatalog>) -> Self {
        Self {
            catalog,
            filter: WorkTypeFilter::All,
            applied: BTreeSet::new(),
        }
    }

    pub fn filter(&self) -> WorkTypeFilter {
        self.filter
    }

    pub fn select_filter(&mut self, filter: WorkTypeFilter) {
        self.filter = filter;
    }

    /// Listings matching the current facet, in catalog order.
    pub fn visible(&self) -> Vec<&InternshipListing> {
        filter_listings(&self.catalog, self.filter)
    }

    pub fn apply(&mut self, listing_id: &str) -> ApplyOutcome {
        if self.catalog.get(listing_id).is_none() {
            return ApplyOutcome::UnknownListing;
        }
        if self.applied.insert(listing_id.to_string()) {
            info!(listing_id, "internship application recorded");
            ApplyOutcome::Applied
        } else {
            ApplyOutcome::AlreadyApplied
        }
    }

    pub fn has_applied(&self, listing_id: &str) -> bool {
        self.applied.contains(listing_id)
    }

    pub fn applied(&self) -> &BTreeSet<String> {
        &self.applied
    }

    pub fn facet_counts(&self) -> Vec<FacetCount> {
        std::iter::once(WorkTypeFilter::All)
            .chain(WorkType::ALL.into_iter().map(WorkTypeFilter::Only))
            .map(|filter| FacetCount {
                filter,
                count: filter_listings(&self.catalog, filter).len(),
            })
            .collect()
    }

    pub fn summary(&self) -> RecommendationSummary {
        let listings = self.catalog.listings();
        let total = listings.len();
        let average_match = if total == 0 {
            0
        } else {
            let sum: u32 = listings
                .iter()
                .map(|listing| u32::from(listing.match_percentage))
                .sum();
            let count = total as u32;
            ((sum * 2 + count) / (count * 2)) as u8
        };

        RecommendationSummary {
            total,
            average_match,
            applied: self.applied.len(),
            high_matches: listings
                .iter()
                .filter(|listing| listing.match_percentage >= Self::HIGH_MATCH)
                .count(),
        }
    }

    pub fn view(&self) -> RecommendationsView {
        RecommendationsView {
            filter: self.filter,
            facets: self.facet_counts(),
            listings: self
                .visible()
                .into_iter()
                .map(|listing| ListingView {
                    band: listing.match_band(),
                    applied: self.has_applied(&listing.id),
                    listing: listing.clone(),
                })
                .collect(),
            summary: self.summary(),
        }
    }
}

/// Stable filter over the catalog.
pub fn filter_listings(catalog: &ListingCatalog, filter: WorkTypeFilter) -> Vec<&InternshipListing> {
    catalog
        .listings()
        .iter()
        .filter(|listing| filter.matches(listing.work_type))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> RecommendationBoard {
        RecommendationBoard::new(Arc::new(ListingCatalog::standard()))
    }

    fn ids(listings: &[&InternshipListing]) -> Vec<String> {
        listings.iter().map(|listing| listing.id.clone()).collect()
    }

    #[test]
    fn remote_filter_keeps_catalog_order() {
        let mut board = board();
        board.select_filter("remote".parse().expect("known facet"));
        assert_eq!(ids(&board.visible()), ["3"]);

        board.select_filter(WorkTypeFilter::Only(WorkType::Onsite));
        assert_eq!(ids(&board.visible()), ["2", "5"]);

        board.select_filter(WorkTypeFilter::All);
        assert_eq!(ids(&board.visible()), ["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn applying_twice_keeps_one_entry() {
        let mut board = board();
        assert_eq!(board.apply("2"), ApplyOutcome::Applied);
        assert_eq!(board.apply("2"), ApplyOutcome::AlreadyApplied);
        assert_eq!(board.applied().len(), 1);
        assert_eq!(board.apply("99"), ApplyOutcome::UnknownListing);
        assert_eq!(board.applied().len(), 1);
    }

    #[test]
    fn facet_counts_cover_every_work_type() {
        let counts: Vec<(String, usize)> = board()
            .facet_counts()
            .into_iter()
            .map(|facet| (facet.filter.as_str().to_string(), facet.count))
            .collect();
        assert_eq!(
            counts,
            [
                ("all".to_string(), 5),
                ("remote".to_string(), 1),
                ("hybrid".to_string(), 2),
                ("onsite".to_string(), 2),
            ]
        );
    }

    #[test]
    fn summary_reports_average_and_high_matches() {
        let mut board = board();
        board.apply("1");
        let summary = board.summary();
        assert_eq!(summary.total, 5);
        // (92 + 88 + 85 + 82 + 79) / 5 = 85.2
        assert_eq!(summary.average_match, 85);
        assert_eq!(summary.high_matches, 3);
        assert_eq!(summary.applied, 1);
    }

    #[test]
    fn match_bands() {
        assert_eq!(MatchBand::from_percentage(92), MatchBand::Excellent);
        assert_eq!(MatchBand::from_percentage(90), MatchBand::Excellent);
        assert_eq!(MatchBand::from_percentage(85), MatchBand::Strong);
        assert_eq!(MatchBand::from_percentage(79), MatchBand::Good);
        assert_eq!(MatchBand::from_percentage(12), MatchBand::Fair);
    }

    #[test]
    fn unknown_facet_is_rejected() {
        let err = "office".parse::<WorkTypeFilter>().expect_err("rejected");
        assert_eq!(err, UnknownWorkType("office".to_string()));
        assert_eq!(
            serde_json::from_str::<WorkTypeFilter>("\"hybrid\"").expect("facet parses"),
            WorkTypeFilter::Only(WorkType::Hybrid)
        );
    }
}
