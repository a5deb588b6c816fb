use chrono::{Datelike, NaiveDate};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{first_contribution_date, longest_streak, YearRange};

pub const MAX_TOP_REPOS: usize = 5;
pub const MAX_TOP_LANGUAGES: usize = 5;

// Lower-cased GitHub language names that the icon set spells differently
const LANGUAGE_ALIASES: &[(&str, &str)] = &[
    ("c++", "cplusplus"),
    ("c#", "csharp"),
    ("f#", "fsharp"),
    ("html", "html5"),
    ("css", "css3"),
    ("shell", "bash"),
    ("vue", "vuejs"),
    ("jupyter notebook", "jupyter"),
    ("objective-c", "objectivec"),
    ("dockerfile", "docker"),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionDay {
    pub contribution_count: u32,
    #[serde(default)]
    pub color: String,
    pub date: NaiveDate,
    pub weekday: u8,
}

impl ContributionDay {
    pub fn new(date: NaiveDate, contribution_count: u32) -> Self {
        Self {
            contribution_count,
            color: String::new(),
            date,
            weekday: date.weekday().num_days_from_sunday() as u8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Week {
    pub contribution_days: Vec<ContributionDay>,
    pub first_day: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repo {
    pub name: String,
    pub owner: Option<String>,
    pub avatar_url: Option<String>,
    pub is_private: bool,
    pub name_with_owner: Option<String>,
    pub url: Option<String>,
    pub stars: u32,
    pub contributions: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Language {
    /// Icon-compatible name, unique within a stats record.
    pub name: String,
    pub common_name: String,
    pub color: Option<String>,
}

impl Language {
    pub fn new(common_name: impl Into<String>, color: Option<String>) -> Self {
        let common_name = common_name.into();
        Self {
            name: normalize_language(&common_name),
            common_name,
            color,
        }
    }
}

pub fn normalize_language(common_name: &str) -> String {
    let name = common_name.trim().to_lowercase();
    LANGUAGE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, icon)| icon.to_string())
        .unwrap_or(name)
}

/// Keeps the first occurrence of every normalized name, at most five.
pub fn dedup_languages(languages: impl IntoIterator<Item = Language>) -> Vec<Language> {
    languages
        .into_iter()
        .unique_by(|language| language.name.clone())
        .take(MAX_TOP_LANGUAGES)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub avatar_url: String,
    pub name: Option<String>,
    pub login: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowGroup {
    pub total_count: u32,
    pub latest: Vec<Actor>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Follows {
    pub followers: FollowGroup,
    pub following: FollowGroup,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Stars {
    pub given: u32,
    pub received: u32,
}

/// Payload of the identity query.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlights {
    pub username: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub company: Option<String>,
    pub commits: u32,
    pub pulls: u32,
    pub reviews: u32,
    pub repos: u32,
    pub contributions: u32,
}

/// Canonical per-user, per-year record.
///
/// Fresh records come from [`StatsBuilder::build`], which computes the
/// derived fields from the history it was given. Deserializing reloads a
/// stored record as-is. The generative step only accepts a [`PromptStats`],
/// so the history never reaches it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub company: Option<String>,
    pub year: i32,
    pub commits: u32,
    pub pulls: u32,
    pub reviews: u32,
    pub repos: u32,
    pub contributions: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contributions_history: Option<Vec<Week>>,
    pub location: Option<String>,
    pub stars: Option<Stars>,
    pub top_repos: Option<Vec<Repo>>,
    pub top_languages: Option<Vec<Language>>,
    pub top_follows: Option<Follows>,
    pub first_contribution_date: Option<NaiveDate>,
    #[serde(default)]
    pub coding_streak_in_days: u32,
}

impl Stats {
    /// Separates the email from the record.
    pub fn take_email(&mut self) -> Option<String> {
        self.email.take()
    }

    /// Second phase of the record's lifecycle: drops the history and the
    /// email so the record may cross the generative-model boundary.
    pub fn into_prompt(mut self) -> PromptStats {
        self.contributions_history = None;
        self.email = None;
        PromptStats(self)
    }

    /// Contributions per calendar month of the record's year.
    pub fn monthly_contributions(&self) -> [u32; 12] {
        let mut months = [0; 12];
        let range = YearRange::new(self.year);
        for day in self
            .contributions_history
            .iter()
            .flatten()
            .flat_map(|week| week.contribution_days.iter())
            .filter(|day| range.contains(day.date))
        {
            months[day.date.month0() as usize] += day.contribution_count;
        }
        months
    }
}

/// A stats record stripped of its contribution history and email.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PromptStats(Stats);

impl PromptStats {
    pub fn stats(&self) -> &Stats {
        &self.0
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.0)
    }
}

/// Merges the Source Query Set results into a [`Stats`] record.
///
/// Every setter accepts the query result as-is, so an unavailable source
/// leaves its fields absent.
#[derive(Debug, Clone)]
pub struct StatsBuilder {
    stats: Stats,
}

impl StatsBuilder {
    pub fn new(highlights: Highlights, year: YearRange) -> Self {
        let Highlights {
            username,
            email,
            full_name,
            avatar_url,
            company,
            commits,
            pulls,
            reviews,
            repos,
            contributions,
        } = highlights;

        Self {
            stats: Stats {
                username,
                email,
                full_name,
                avatar_url,
                company,
                year: year.year,
                commits,
                pulls,
                reviews,
                repos,
                contributions,
                ..Default::default()
            },
        }
    }

    pub fn top_languages(mut self, languages: Option<Vec<Language>>) -> Self {
        self.stats.top_languages = languages.map(dedup_languages);
        self
    }

    pub fn top_repos(mut self, repos: Option<Vec<Repo>>) -> Self {
        self.stats.top_repos = repos.map(|mut repos| {
            repos.truncate(MAX_TOP_REPOS);
            repos
        });
        self
    }

    pub fn top_follows(mut self, follows: Option<Follows>) -> Self {
        self.stats.top_follows = follows;
        self
    }

    pub fn stars(mut self, stars: Option<Stars>) -> Self {
        self.stats.stars = stars;
        self
    }

    pub fn contributions_history(mut self, weeks: Option<Vec<Week>>) -> Self {
        self.stats.contributions_history = weeks;
        self
    }

    pub fn location(mut self, location: Option<String>) -> Self {
        self.stats.location = location;
        self
    }

    /// First phase of the record's lifecycle: derives the first contribution
    /// date and the longest streak while the history is still attached.
    pub fn build(self) -> Stats {
        let mut stats = self.stats;
        let weeks = stats.contributions_history.as_deref().unwrap_or_default();
        let first_date = first_contribution_date(weeks);
        let streak = longest_streak(weeks);
        stats.first_contribution_date = first_date;
        stats.coding_streak_in_days = streak;
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn highlights() -> Highlights {
        Highlights {
            username: "octocat".to_string(),
            email: Some("octocat@github.com".to_string()),
            commits: 120,
            contributions: 300,
            ..Default::default()
        }
    }

    fn day(month: u32, day: u32, count: u32) -> ContributionDay {
        ContributionDay::new(NaiveDate::from_ymd_opt(2024, month, day).unwrap(), count)
    }

    #[test]
    fn languages_are_normalized_and_unique() {
        let languages = vec![
            Language::new("TypeScript", Some("#3178c6".to_string())),
            Language::new("C++", None),
            Language::new("TypeScript", Some("#000000".to_string())),
            Language::new("Rust", None),
        ];
        let stats = StatsBuilder::new(highlights(), YearRange::new(2024))
            .top_languages(Some(languages))
            .build();

        let top = stats.top_languages.unwrap();
        let names: Vec<_> = top.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["typescript", "cplusplus", "rust"]);
        assert_eq!(top[0].color.as_deref(), Some("#3178c6"));
        assert_eq!(top[1].common_name, "C++");
    }

    #[test]
    fn languages_are_capped() {
        let languages = ["Go", "Rust", "Zig", "Nim", "Lua", "Ruby", "Perl"]
            .into_iter()
            .map(|name| Language::new(name, None));
        assert_eq!(dedup_languages(languages).len(), MAX_TOP_LANGUAGES);
    }

    #[test]
    fn repos_are_capped() {
        let repos = (0..8)
            .map(|i| Repo {
                name: format!("repo-{i}"),
                ..Default::default()
            })
            .collect();
        let stats = StatsBuilder::new(highlights(), YearRange::new(2024))
            .top_repos(Some(repos))
            .build();
        let top = stats.top_repos.unwrap();
        assert_eq!(top.len(), MAX_TOP_REPOS);
        assert_eq!(top[0].name, "repo-0");
    }

    #[test]
    fn unavailable_sources_stay_absent() {
        let stats = StatsBuilder::new(highlights(), YearRange::new(2024))
            .top_languages(None)
            .top_repos(None)
            .top_follows(None)
            .stars(Some(Stars {
                given: 3,
                received: 10,
            }))
            .contributions_history(None)
            .location(None)
            .build();

        assert!(stats.top_languages.is_none());
        assert!(stats.top_repos.is_none());
        assert!(stats.top_follows.is_none());
        assert!(stats.location.is_none());
        assert_eq!(stats.stars.unwrap().received, 10);
        assert_eq!(stats.first_contribution_date, None);
        assert_eq!(stats.coding_streak_in_days, 0);
    }

    #[test]
    fn build_derives_from_history() {
        let week = Week {
            first_day: NaiveDate::from_ymd_opt(2024, 3, 3).unwrap(),
            contribution_days: vec![day(3, 3, 0), day(3, 4, 2), day(3, 5, 1), day(3, 6, 0)],
        };
        let stats = StatsBuilder::new(highlights(), YearRange::new(2024))
            .contributions_history(Some(vec![week]))
            .build();

        assert_eq!(
            stats.first_contribution_date,
            NaiveDate::from_ymd_opt(2024, 3, 4)
        );
        assert_eq!(stats.coding_streak_in_days, 2);
    }

    #[test]
    fn prompt_drops_history_and_email_but_keeps_derived_fields() {
        let week = Week {
            first_day: NaiveDate::from_ymd_opt(2024, 3, 3).unwrap(),
            contribution_days: vec![day(3, 3, 5)],
        };
        let stats = StatsBuilder::new(highlights(), YearRange::new(2024))
            .contributions_history(Some(vec![week]))
            .build();

        let prompt = stats.into_prompt();
        assert!(prompt.stats().contributions_history.is_none());
        assert!(prompt.stats().email.is_none());
        assert_eq!(prompt.stats().coding_streak_in_days, 1);

        let json = prompt.to_json().unwrap();
        assert!(!json.contains("contributionsHistory"));
        assert!(!json.contains("octocat@github.com"));
        assert!(json.contains("\"codingStreakInDays\":1"));
    }

    #[test]
    fn monthly_series_ignores_days_outside_the_year() {
        let week = Week {
            first_day: NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
            contribution_days: vec![
                ContributionDay::new(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(), 9),
                day(1, 1, 2),
                day(1, 2, 3),
            ],
        };
        let stats = StatsBuilder::new(highlights(), YearRange::new(2024))
            .contributions_history(Some(vec![week, Week {
                first_day: NaiveDate::from_ymd_opt(2024, 7, 7).unwrap(),
                contribution_days: vec![day(7, 7, 4)],
            }]))
            .build();

        let months = stats.monthly_contributions();
        assert_eq!(months[0], 5);
        assert_eq!(months[6], 4);
        assert_eq!(months.iter().sum::<u32>(), 9);
    }
}
