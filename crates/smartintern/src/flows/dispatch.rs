use serde::{Deserialize, Serialize};

/// A substring predicate routing free text to a target.
///
/// Every `all_of` keyword must appear, and when `any_of` is non-empty at
/// least one of those must appear too. Keywords are matched against the
/// lower-cased input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRule<T> {
    #[serde(default)]
    pub all_of: Vec<String>,
    #[serde(default)]
    pub any_of: Vec<String>,
    pub target: T,
}

impl<T> KeywordRule<T> {
    pub fn all_of(keywords: &[&str], target: T) -> Self {
        Self {
            all_of: keywords.iter().map(|k| k.to_string()).collect(),
            any_of: Vec::new(),
            target,
        }
    }

    pub fn any_of(keywords: &[&str], target: T) -> Self {
        Self {
            all_of: Vec::new(),
            any_of: keywords.iter().map(|k| k.to_string()).collect(),
            target,
        }
    }

    fn matches(&self, input: &str) -> bool {
        self.all_of.iter().all(|k| input.contains(k.as_str()))
            && (self.any_of.is_empty() || self.any_of.iter().any(|k| input.contains(k.as_str())))
    }

    fn normalized(self) -> Self {
        Self {
            all_of: self.all_of.iter().map(|k| k.to_lowercase()).collect(),
            any_of: self.any_of.iter().map(|k| k.to_lowercase()).collect(),
            target: self.target,
        }
    }
}

/// Ordered priority list: the first matching rule wins.
#[derive(Debug, Clone)]
pub struct KeywordDispatcher<T> {
    rules: Vec<KeywordRule<T>>,
}

impl<T: Clone> KeywordDispatcher<T> {
    pub fn new(rules: Vec<KeywordRule<T>>) -> Self {
        Self {
            rules: rules.into_iter().map(KeywordRule::normalized).collect(),
        }
    }

    pub fn dispatch(&self, input: &str) -> Option<T> {
        let lowered = input.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&lowered))
            .map(|rule| rule.target.clone())
    }

    pub fn rules(&self) -> &[KeywordRule<T>] {
        &self.rules
    }
}
