/// Normalized representation of a fetched profile.
///
/// Built once by the fetcher and then only read. Counts are unsigned, so the
/// non-negative invariant holds by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileRecord {
    pub login: String,
    pub name: Option<String>,
    pub avatar_url: String,
    pub bio: Option<String>,
    pub followers: u32,
    pub following: u32,
    pub public_repos: u32,
    pub public_gists: u32,
    pub html_url: String,
    /// Ordered as supplied by the fetcher, most starred first.
    pub top_repos: Vec<RepoSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSummary {
    pub id: u64,
    pub name: String,
    pub stargazers_count: u32,
}

impl ProfileRecord {
    /// Card title: the display name when set, otherwise the login.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => &self.login,
        }
    }
}
