pub const USER_HIGHLIGHTS: &str = r#"
query ($from: DateTime!, $to: DateTime!) {
  viewer {
    login
    email
    name
    company
    avatarUrl
    contributionsCollection(from: $from, to: $to) {
      totalCommitContributions
      totalPullRequestContributions
      totalPullRequestReviewContributions
      totalRepositoriesWithContributedCommits
      contributionCalendar {
        totalContributions
      }
    }
  }
}
"#;

pub const TOP_LANGUAGES: &str = r#"
query ($from: DateTime!) {
  viewer {
    topRepositories(first: 20, since: $from, orderBy: { field: UPDATED_AT, direction: DESC }) {
      nodes {
        primaryLanguage {
          name
          color
        }
      }
    }
  }
}
"#;

pub const TOP_REPOS: &str = r#"
query {
  viewer {
    contributionsCollection {
      commitContributionsByRepository(maxRepositories: 5) {
        contributions {
          totalCount
        }
        repository {
          name
          nameWithOwner
          isPrivate
          url
          stargazerCount
          owner {
            login
            avatarUrl
          }
        }
      }
    }
  }
}
"#;

pub const FOLLOWS: &str = r#"
query {
  viewer {
    followers(last: 3) {
      totalCount
      nodes { login name avatarUrl url }
    }
    following(last: 3) {
      totalCount
      nodes { login name avatarUrl url }
    }
  }
}
"#;

pub const STARS: &str = r#"
query {
  viewer {
    starredRepositories {
      totalCount
    }
    repositories(first: 100, ownerAffiliations: OWNER, orderBy: { field: STARGAZERS, direction: DESC }) {
      nodes {
        stargazerCount
      }
    }
  }
}
"#;

pub const CONTRIBUTIONS: &str = r#"
query ($from: DateTime!, $to: DateTime!) {
  viewer {
    contributionsCollection(from: $from, to: $to) {
      contributionCalendar {
        weeks {
          firstDay
          contributionDays {
            contributionCount
            color
            date
            weekday
          }
        }
      }
    }
  }
}
"#;

pub const USER_LOCATION: &str = r#"
query {
  viewer {
    location
  }
}
"#;

pub const VIEWER_LOGIN: &str = r#"
query {
  viewer {
    login
  }
}
"#;
