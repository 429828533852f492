use std::time::Duration;

use pretty_assertions::assert_eq;
use profile_card_engine::{FailureKind, FetchSettings, ProfileFetcher, ReqwestProfileFetcher};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn user_json(login: &str) -> serde_json::Value {
    json!({
        "login": login,
        "id": 583231,
        "avatar_url": format!("https://avatars.githubusercontent.com/{login}"),
        "html_url": format!("https://github.com/{login}"),
        "name": "The Octocat",
        "bio": null,
        "followers": 10,
        "following": 5,
        "public_repos": 8,
        "public_gists": 0,
        "created_at": "2011-01-25T18:44:36Z"
    })
}

fn repo_json(id: u64, name: &str, stars: u32) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "full_name": format!("octocat/{name}"),
        "stargazers_count": stars,
        "fork": false
    })
}

fn settings_for(server: &MockServer) -> FetchSettings {
    FetchSettings {
        api_base_url: server.uri(),
        ..FetchSettings::default()
    }
}

async fn mount_repos(server: &MockServer, login: &str, repos: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/users/{login}/repos")))
        .respond_with(ResponseTemplate::new(200).set_body_json(repos))
        .mount(server)
        .await;
}

#[tokio::test]
async fn fetcher_returns_normalized_profile() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octocat"))
        .and(header("accept", "application/vnd.github+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("octocat")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/octocat/repos"))
        .and(query_param("per_page", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            repo_json(1, "hello-world", 3),
            repo_json(2, "linguist", 40),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = ReqwestProfileFetcher::new(settings_for(&server)).expect("fetcher");
    let record = fetcher.fetch("octocat").await.expect("fetch ok");

    assert_eq!(record.login, "octocat");
    assert_eq!(record.name.as_deref(), Some("The Octocat"));
    assert_eq!(record.bio, None);
    assert_eq!(record.followers, 10);
    assert_eq!(record.following, 5);
    assert_eq!(record.public_repos, 8);
    assert_eq!(record.public_gists, 0);
    assert_eq!(record.html_url, "https://github.com/octocat");
    let repos: Vec<_> = record
        .top_repos
        .iter()
        .map(|r| (r.id, r.name.as_str(), r.stargazers_count))
        .collect();
    assert_eq!(repos, vec![(2, "linguist", 40), (1, "hello-world", 3)]);
}

#[tokio::test]
async fn fetcher_limits_top_repos() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octocat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("octocat")))
        .mount(&server)
        .await;
    let repos: Vec<_> = (1..=8).map(|i| repo_json(i, &format!("repo-{i}"), i as u32)).collect();
    mount_repos(&server, "octocat", json!(repos)).await;

    let settings = FetchSettings {
        top_repo_limit: 3,
        ..settings_for(&server)
    };
    let fetcher = ReqwestProfileFetcher::new(settings).expect("fetcher");
    let record = fetcher.fetch("octocat").await.expect("fetch ok");

    let stars: Vec<_> = record.top_repos.iter().map(|r| r.stargazers_count).collect();
    assert_eq!(stars, vec![8, 7, 6]);
}

#[tokio::test]
async fn fetcher_skips_repo_request_when_limit_is_zero() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octocat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("octocat")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/octocat/repos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let settings = FetchSettings {
        top_repo_limit: 0,
        ..settings_for(&server)
    };
    let fetcher = ReqwestProfileFetcher::new(settings).expect("fetcher");
    let record = fetcher.fetch("octocat").await.expect("fetch ok");
    assert!(record.top_repos.is_empty());
}

#[tokio::test]
async fn fetcher_maps_missing_user_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/nobody-here"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
        .mount(&server)
        .await;

    let fetcher = ReqwestProfileFetcher::new(settings_for(&server)).expect("fetcher");
    let err = fetcher.fetch("nobody-here").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::NotFound);
}

#[tokio::test]
async fn fetcher_detects_exhausted_rate_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octocat"))
        .respond_with(
            ResponseTemplate::new(403)
                .insert_header("x-ratelimit-remaining", "0")
                .set_body_json(json!({"message": "API rate limit exceeded"})),
        )
        .mount(&server)
        .await;

    let fetcher = ReqwestProfileFetcher::new(settings_for(&server)).expect("fetcher");
    let err = fetcher.fetch("octocat").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::RateLimited);
}

#[tokio::test]
async fn fetcher_reports_other_statuses() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octocat"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let fetcher = ReqwestProfileFetcher::new(settings_for(&server)).expect("fetcher");
    let err = fetcher.fetch("octocat").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(502));
}

#[tokio::test]
async fn failed_repo_request_fails_the_whole_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octocat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("octocat")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/octocat/repos"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let fetcher = ReqwestProfileFetcher::new(settings_for(&server)).expect("fetcher");
    let err = fetcher.fetch("octocat").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(500));
}

#[tokio::test]
async fn fetcher_rejects_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octocat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"login": "octocat"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/garbled"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let fetcher = ReqwestProfileFetcher::new(settings_for(&server)).expect("fetcher");
    let err = fetcher.fetch("octocat").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Malformed);
    let err = fetcher.fetch("garbled").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Malformed);
}

#[tokio::test]
async fn fetcher_rejects_negative_counts() {
    let server = MockServer::start().await;
    let mut user = user_json("octocat");
    user["followers"] = json!(-3);
    Mock::given(method("GET"))
        .and(path("/users/octocat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user))
        .mount(&server)
        .await;
    mount_repos(&server, "octocat", json!([])).await;

    let fetcher = ReqwestProfileFetcher::new(settings_for(&server)).expect("fetcher");
    let err = fetcher.fetch("octocat").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Malformed);
}

#[tokio::test]
async fn fetcher_rejects_blank_username_without_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let fetcher = ReqwestProfileFetcher::new(settings_for(&server)).expect("fetcher");
    let err = fetcher.fetch("   ").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUsername);
}

#[tokio::test]
async fn fetcher_times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octocat"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(user_json("octocat")),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        request_timeout: Duration::from_millis(50),
        ..settings_for(&server)
    };
    let fetcher = ReqwestProfileFetcher::new(settings).expect("fetcher");
    let err = fetcher.fetch("octocat").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn fetcher_rejects_too_large_response() {
    let server = MockServer::start().await;
    let body = user_json("octocat").to_string();
    let body_len = body.len() as u64;
    Mock::given(method("GET"))
        .and(path("/users/octocat"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/json"))
        .mount(&server)
        .await;

    let settings = FetchSettings {
        max_bytes: 10,
        ..settings_for(&server)
    };
    let fetcher = ReqwestProfileFetcher::new(settings).expect("fetcher");
    let err = fetcher.fetch("octocat").await.unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::TooLarge {
            max_bytes: 10,
            actual: Some(body_len)
        }
    );
}

#[tokio::test]
async fn fetcher_sends_token_when_configured() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octocat"))
        .and(header("authorization", "Bearer s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("octocat")))
        .expect(1)
        .mount(&server)
        .await;
    mount_repos(&server, "octocat", json!([])).await;

    let settings = FetchSettings {
        token: Some("s3cret".to_string()),
        ..settings_for(&server)
    };
    let fetcher = ReqwestProfileFetcher::new(settings).expect("fetcher");
    fetcher.fetch("octocat").await.expect("fetch ok");
}

#[tokio::test]
async fn fetcher_honours_base_url_path_prefix() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/users/octocat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("octocat")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v3/users/octocat/repos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let settings = FetchSettings {
        api_base_url: format!("{}/api/v3/", server.uri()),
        ..FetchSettings::default()
    };
    let fetcher = ReqwestProfileFetcher::new(settings).expect("fetcher");
    let record = fetcher.fetch("octocat").await.expect("fetch ok");
    assert_eq!(record.login, "octocat");
}

#[test]
fn invalid_base_url_is_rejected_at_construction() {
    let settings = FetchSettings {
        api_base_url: "not a url".to_string(),
        ..FetchSettings::default()
    };
    assert!(ReqwestProfileFetcher::new(settings).is_err());
}
