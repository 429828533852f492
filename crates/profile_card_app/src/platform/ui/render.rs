//! Text rendering of the view model.

use profile_card_core::{AppViewModel, ProfileCardView};

use super::constants::{CARD_WIDTH, CMD_NEW, CMD_OPEN, PROMPT, TITLE};

const INDENT: &str = "  ";
const REPO_NAME_WIDTH: usize = 32;

/// Renders the whole screen for `view`. Exactly one of card, loading line or
/// search prompt is shown.
pub fn render(view: &AppViewModel) -> String {
    let mut lines = Vec::new();
    if let Some(card) = &view.card {
        render_card(&mut lines, card);
    } else if let Some(username) = &view.loading_username {
        lines.push(format!("{} {username}", view.submit_label));
    } else {
        lines.push(TITLE.to_string());
        if let Some(error) = &view.error {
            lines.push(error.clone());
        }
        lines.push(format!("{PROMPT} [{}]:", view.submit_label));
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn render_card(lines: &mut Vec<String>, card: &ProfileCardView) {
    let rule = "-".repeat(CARD_WIDTH);
    lines.push(rule.clone());
    lines.push(format!("{INDENT}{}", card.title));
    lines.push(format!("{INDENT}{}", card.handle));

    if let Some(bio) = &card.bio {
        lines.push(String::new());
        for line in wrap(bio, CARD_WIDTH - INDENT.len()) {
            lines.push(format!("{INDENT}{line}"));
        }
    }

    lines.push(String::new());
    for pair in card.stats.chunks(2) {
        let cells: Vec<String> = pair
            .iter()
            .map(|stat| format!("{:<13}{:>6}", stat.label, stat.value))
            .collect();
        lines.push(format!("{INDENT}{}", cells.join("    ")));
    }

    if !card.top_repos.is_empty() {
        lines.push(String::new());
        lines.push(format!("{INDENT}Top Repositories"));
        for repo in &card.top_repos {
            lines.push(format!(
                "{INDENT}{INDENT}{:<width$} * {}",
                repo.name,
                repo.stars,
                width = REPO_NAME_WIDTH
            ));
        }
    }

    lines.push(String::new());
    lines.push(format!("{INDENT}View on GitHub: {}", card.profile_url));
    lines.push(format!("{INDENT}({CMD_OPEN} to open in a browser, {CMD_NEW} for a new search)"));
    lines.push(rule);
}

/// Greedy word wrap. Words longer than `width` get a line of their own.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use profile_card_core::{
        update, AppState, Msg, ProfileRecord, RepoSummary, FETCH_FAILED_MESSAGE,
    };

    use super::*;

    fn octocat() -> ProfileRecord {
        ProfileRecord {
            login: "octocat".to_string(),
            name: Some("The Octocat".to_string()),
            avatar_url: "https://avatars.githubusercontent.com/u/583231".to_string(),
            bio: Some("Mascot of a code hosting site".to_string()),
            followers: 10,
            following: 5,
            public_repos: 8,
            public_gists: 0,
            html_url: "https://github.com/octocat".to_string(),
            top_repos: vec![RepoSummary {
                id: 1,
                name: "hello-world".to_string(),
                stargazers_count: 3,
            }],
        }
    }

    #[test]
    fn idle_screen_shows_prompt() {
        let out = render(&AppState::new().view());
        assert_eq!(out, format!("{TITLE}\n{PROMPT} [Generate]:\n"));
    }

    #[test]
    fn loading_screen_names_the_user() {
        let (state, _) = update(AppState::new(), Msg::Submit("octocat".to_string()));
        assert_eq!(render(&state.view()), "Loading... octocat\n");
    }

    #[test]
    fn failed_screen_shows_generic_error() {
        let (state, _) = update(AppState::new(), Msg::Submit("octocat".to_string()));
        let (state, _) = update(
            state,
            Msg::FetchFailed {
                request_id: 1,
                reason: "user not found".to_string(),
            },
        );
        let out = render(&state.view());
        assert!(out.contains(FETCH_FAILED_MESSAGE));
        assert!(!out.contains("user not found"));
    }

    #[test]
    fn card_lists_stats_and_repos() {
        let (state, _) = update(AppState::new(), Msg::Submit("octocat".to_string()));
        let (state, _) = update(
            state,
            Msg::FetchSucceeded {
                request_id: 1,
                record: octocat(),
            },
        );
        let out = render(&state.view());

        assert!(out.contains("  The Octocat\n"));
        assert!(out.contains("  @octocat\n"));
        assert!(out.contains("  Mascot of a code hosting site\n"));
        assert!(out.contains("Followers        10"));
        assert!(out.contains("Gists             0"));
        assert!(out.contains("Top Repositories"));
        assert!(out.contains("hello-world"));
        assert!(out.contains("View on GitHub: https://github.com/octocat"));
        assert!(!out.contains(PROMPT));
    }

    #[test]
    fn wrap_breaks_on_words() {
        assert_eq!(
            wrap("one two three four", 9),
            vec!["one two", "three", "four"]
        );
        assert_eq!(wrap("   ", 10), Vec::<String>::new());
        assert_eq!(wrap("supercalifragilistic ok", 5), vec!["supercalifragilistic", "ok"]);
    }
}
