use crate::ProfileRecord;

pub const SUBMIT_LABEL: &str = "Generate";
pub const SUBMIT_LABEL_LOADING: &str = "Loading...";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub input: String,
    pub submit_enabled: bool,
    pub submit_label: String,
    /// Username being fetched, while loading.
    pub loading_username: Option<String>,
    pub error: Option<String>,
    /// Present only when a profile is loaded; never partially filled.
    pub card: Option<ProfileCardView>,
    pub dirty: bool,
}

impl AppViewModel {
    pub(crate) fn submit_label_for(loading: bool) -> &'static str {
        if loading {
            SUBMIT_LABEL_LOADING
        } else {
            SUBMIT_LABEL
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileCardView {
    pub title: String,
    /// `@login`
    pub handle: String,
    pub avatar_url: String,
    pub bio: Option<String>,
    pub stats: Vec<StatView>,
    pub top_repos: Vec<RepoRowView>,
    pub profile_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatView {
    pub label: &'static str,
    pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRowView {
    pub id: u64,
    pub name: String,
    pub stars: u32,
}

impl ProfileCardView {
    pub(crate) fn from_record(record: &ProfileRecord) -> Self {
        Self {
            title: record.display_name().to_string(),
            handle: format!("@{}", record.login),
            avatar_url: record.avatar_url.clone(),
            bio: record
                .bio
                .as_deref()
                .map(str::trim)
                .filter(|bio| !bio.is_empty())
                .map(ToOwned::to_owned),
            stats: vec![
                StatView {
                    label: "Followers",
                    value: record.followers,
                },
                StatView {
                    label: "Following",
                    value: record.following,
                },
                StatView {
                    label: "Repositories",
                    value: record.public_repos,
                },
                StatView {
                    label: "Gists",
                    value: record.public_gists,
                },
            ],
            top_repos: record
                .top_repos
                .iter()
                .map(|repo| RepoRowView {
                    id: repo.id,
                    name: repo.name.clone(),
                    stars: repo.stargazers_count,
                })
                .collect(),
            profile_url: record.html_url.clone(),
        }
    }
}
