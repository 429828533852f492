//! Wire shapes of the GitHub REST API and their normalization into
//! [`ProfileRecord`].

use std::cmp::Reverse;

use profile_card_core::{ProfileRecord, RepoSummary};
use serde::Deserialize;

use crate::{FailureKind, FetchError};

/// `/users/{username}`
#[derive(Debug, Deserialize)]
pub(crate) struct GitHubUser {
    pub login: String,
    pub avatar_url: String,
    pub html_url: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    // Signed so that a negative count is reported as malformed instead of a
    // generic decode error.
    pub followers: i64,
    pub following: i64,
    pub public_repos: i64,
    pub public_gists: i64,
}

/// One element of `/users/{username}/repos`.
#[derive(Debug, Deserialize)]
pub(crate) struct GitHubRepo {
    pub id: u64,
    pub name: String,
    pub stargazers_count: i64,
}

/// Builds the record from the user and the repo list. The repos are ranked by
/// stars (ties by name) and cut to `top_repo_limit`.
pub(crate) fn normalize_profile(
    user: GitHubUser,
    repos: Vec<GitHubRepo>,
    top_repo_limit: usize,
) -> Result<ProfileRecord, FetchError> {
    if user.login.trim().is_empty() {
        return Err(FetchError::new(FailureKind::Malformed, "login is empty"));
    }

    let mut top_repos = repos
        .into_iter()
        .map(|repo| {
            Ok(RepoSummary {
                stargazers_count: count("stargazers_count", repo.stargazers_count)?,
                id: repo.id,
                name: repo.name,
            })
        })
        .collect::<Result<Vec<_>, FetchError>>()?;
    top_repos.sort_by(|a, b| {
        Reverse(a.stargazers_count)
            .cmp(&Reverse(b.stargazers_count))
            .then_with(|| a.name.cmp(&b.name))
    });
    top_repos.truncate(top_repo_limit);

    Ok(ProfileRecord {
        followers: count("followers", user.followers)?,
        following: count("following", user.following)?,
        public_repos: count("public_repos", user.public_repos)?,
        public_gists: count("public_gists", user.public_gists)?,
        login: user.login,
        name: user.name,
        avatar_url: user.avatar_url,
        bio: user.bio,
        html_url: user.html_url,
        top_repos,
    })
}

fn count(field: &str, value: i64) -> Result<u32, FetchError> {
    u32::try_from(value).map_err(|_| {
        FetchError::new(
            FailureKind::Malformed,
            format!("{field} out of range: {value}"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> GitHubUser {
        GitHubUser {
            login: "octocat".to_string(),
            avatar_url: "https://avatars.example.com/octocat".to_string(),
            html_url: "https://github.com/octocat".to_string(),
            name: None,
            bio: None,
            followers: 10,
            following: 5,
            public_repos: 8,
            public_gists: 0,
        }
    }

    fn repo(id: u64, name: &str, stars: i64) -> GitHubRepo {
        GitHubRepo {
            id,
            name: name.to_string(),
            stargazers_count: stars,
        }
    }

    #[test]
    fn ranks_repos_by_stars_then_name() {
        let repos = vec![
            repo(1, "b", 5),
            repo(2, "a", 5),
            repo(3, "c", 50),
            repo(4, "d", 0),
        ];
        let record = normalize_profile(user(), repos, 3).unwrap();
        let names: Vec<_> = record.top_repos.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn negative_count_is_malformed() {
        let err = normalize_profile(
            GitHubUser {
                followers: -1,
                ..user()
            },
            Vec::new(),
            5,
        )
        .unwrap_err();
        assert_eq!(err.kind, FailureKind::Malformed);
        assert!(err.message.contains("followers"));
    }

    #[test]
    fn blank_login_is_malformed() {
        let err = normalize_profile(
            GitHubUser {
                login: " ".to_string(),
                ..user()
            },
            Vec::new(),
            5,
        )
        .unwrap_err();
        assert_eq!(err.kind, FailureKind::Malformed);
    }
}
