//! GitHub API access.
//!
//! This module wraps the two kinds of request the merger makes: the
//! paginated repository listing and raw file downloads through the
//! contents API.

mod error;
mod repository;

pub use error::FetchError;
pub use repository::RemoteRepo;

use http::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use http::Uri;
use http_body_util::BodyExt;
use hyper_rustls::HttpsConnectorBuilder;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use octocrab::service::middleware::auth_header::AuthHeaderLayer;
use octocrab::service::middleware::base_uri::BaseUriLayer;
use octocrab::service::middleware::extra_headers::ExtraHeadersLayer;
use octocrab::{AuthState, OctoBody, Octocrab, OctocrabBuilder};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Public GitHub REST endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Upload endpoint; the token is also sent to this host.
const UPLOAD_API_BASE: &str = "https://uploads.github.com";

/// Client identifier sent with every request.
pub const CLIENT_USER_AGENT: &str = "portfolio-showcase-v1";

/// Results per page for the repository listing.
pub const REPOS_PER_PAGE: usize = 100;

/// Media type that makes the contents API return the file itself.
const RAW_MEDIA_TYPE: &str = "application/vnd.github.v3.raw";

/// Repositories the token owner can see, not just the ones they own.
const AFFILIATION: &str = "owner,collaborator,organization_member";

/// Characters escaped in a single repository path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Query parameters for `GET /user/repos`.
#[derive(Debug, Serialize)]
struct ListParams {
    per_page: usize,
    page: u32,
    affiliation: &'static str,
    sort: &'static str,
    direction: &'static str,
}

impl ListParams {
    fn page(page: u32) -> Self {
        Self {
            per_page: REPOS_PER_PAGE,
            page,
            affiliation: AFFILIATION,
            sort: "updated",
            direction: "desc",
        }
    }
}

/// Builds an authenticated GitHub client.
///
/// The service stack is assembled by hand: octocrab's default builder always
/// sends its own `User-Agent` in front of any extra header, while GitHub
/// must see exactly [`CLIENT_USER_AGENT`]. The stack has no retry layer, so
/// failed requests are not retried.
///
/// # Arguments
///
/// * `token` - Personal access token; `None` fails immediately
/// * `api_base` - Base URI of the REST API (overridable for tests)
///
/// # Errors
///
/// Returns [`FetchError::MissingToken`] when no token is configured, or a
/// setup error if the base URI, the token or the TLS roots are unusable.
pub fn build_client(token: Option<&str>, api_base: &str) -> Result<Octocrab, FetchError> {
    let token = token
        .filter(|token| !token.trim().is_empty())
        .ok_or(FetchError::MissingToken)?;

    let base_uri: Uri = api_base
        .parse()
        .map_err(|source| FetchError::InvalidApiBase {
            base: api_base.to_string(),
            source,
        })?;
    let auth_header = HeaderValue::from_str(&format!("Bearer {token}"))
        .map_err(|_| FetchError::InvalidToken)?;

    let connector = HttpsConnectorBuilder::new()
        .with_native_roots()
        .map_err(FetchError::TlsSetup)?
        .https_or_http()
        .enable_http1()
        .build();
    let client: Client<_, OctoBody> = Client::builder(TokioExecutor::new()).build(connector);

    let headers = vec![(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT))];

    let octocrab = OctocrabBuilder::new_empty()
        .with_service(client)
        .with_layer(&ExtraHeadersLayer::new(Arc::new(headers)))
        .with_layer(&BaseUriLayer::new(base_uri.clone()))
        .with_layer(&AuthHeaderLayer::new(
            Some(auth_header),
            base_uri,
            Uri::from_static(UPLOAD_API_BASE),
        ))
        .with_auth(AuthState::None)
        .build()
        .unwrap_or_else(|never| match never {});
    Ok(octocrab)
}

/// Fetches every repository visible to the authenticated user.
///
/// Pages are requested one after another until a page comes back with fewer
/// than [`REPOS_PER_PAGE`] entries. Results keep the order GitHub returned
/// them in (most recently updated first).
///
/// # Errors
///
/// Returns [`FetchError`] if any page request fails or times out. No partial
/// result is returned.
pub async fn list_repositories(
    octocrab: &Octocrab,
    timeout: Duration,
) -> Result<Vec<RemoteRepo>, FetchError> {
    let mut repositories = Vec::new();
    let mut page = 1;

    loop {
        info!(page, "Fetching repository page");
        let params = ListParams::page(page);
        let batch: Vec<RemoteRepo> =
            with_timeout(timeout, octocrab.get("/user/repos", Some(&params))).await?;

        let count = batch.len();
        debug!(page, count, "Received repository page");
        repositories.extend(batch);

        if count < REPOS_PER_PAGE {
            break;
        }
        page += 1;
    }

    Ok(repositories)
}

/// Downloads a file from a repository's default branch in raw form.
///
/// # Arguments
///
/// * `octocrab` - Authenticated GitHub client
/// * `full_name` - Repository in "owner/name" format
/// * `path` - File path relative to the repository root
/// * `timeout` - Applied separately to the request and to reading the body
///
/// # Errors
///
/// Returns [`FetchError::Status`] for non-success responses (check
/// [`FetchError::is_not_found`] for a missing file), or a transport/timeout
/// error.
pub async fn get_raw_file(
    octocrab: &Octocrab,
    full_name: &str,
    path: &str,
    timeout: Duration,
) -> Result<Vec<u8>, FetchError> {
    let route = contents_route(full_name, path);
    debug!(route = %route, "Downloading raw file");

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(RAW_MEDIA_TYPE));

    let response = with_timeout(
        timeout,
        octocrab._get_with_headers(route.as_str(), Some(headers)),
    )
    .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            route,
            status: status.as_u16(),
        });
    }

    let body = with_timeout(timeout, response.into_body().collect()).await?;
    Ok(body.to_bytes().to_vec())
}

/// Contents API route for a file, with each path segment percent-encoded.
fn contents_route(full_name: &str, path: &str) -> String {
    let encoded: Vec<String> = path
        .split('/')
        .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT).to_string())
        .collect();
    format!("/repos/{full_name}/contents/{}", encoded.join("/"))
}

/// Runs a GitHub request with an upper bound on its duration.
async fn with_timeout<T, E>(
    timeout: Duration,
    request: impl Future<Output = Result<T, E>>,
) -> Result<T, FetchError>
where
    FetchError: From<E>,
{
    match tokio::time::timeout(timeout, request).await {
        Ok(result) => result.map_err(FetchError::from),
        Err(_) => Err(FetchError::Timeout(timeout)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn repo_page(start: usize, count: usize) -> Value {
        let repos: Vec<Value> = (start..start + count)
            .map(|i| {
                json!({
                    "name": format!("repo-{i}"),
                    "full_name": format!("me/repo-{i}"),
                    "private": false,
                    "html_url": format!("https://github.com/me/repo-{i}"),
                    "updated_at": "2024-01-01T00:00:00Z",
                    "pushed_at": "2024-01-01T00:00:00Z"
                })
            })
            .collect();
        Value::Array(repos)
    }

    async fn mount_page(server: &MockServer, page: u32, body: Value) {
        Mock::given(method("GET"))
            .and(path("/user/repos"))
            .and(query_param("page", page.to_string()))
            .and(query_param("per_page", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(server)
            .await;
    }

    #[test]
    fn build_client_requires_token() {
        assert!(matches!(
            build_client(None, DEFAULT_API_BASE),
            Err(FetchError::MissingToken)
        ));
        assert!(matches!(
            build_client(Some("  "), DEFAULT_API_BASE),
            Err(FetchError::MissingToken)
        ));
    }

    #[test]
    fn list_params_ask_for_recently_updated_first() {
        let params = serde_json::to_value(ListParams::page(3)).unwrap();
        assert_eq!(
            params,
            json!({
                "per_page": 100,
                "page": 3,
                "affiliation": "owner,collaborator,organization_member",
                "sort": "updated",
                "direction": "desc"
            })
        );
    }

    #[tokio::test]
    async fn paginates_until_short_page() {
        let server = MockServer::start().await;
        mount_page(&server, 1, repo_page(0, 100)).await;
        mount_page(&server, 2, repo_page(100, 100)).await;
        mount_page(&server, 3, repo_page(200, 40)).await;

        let octocrab = build_client(Some("test-token"), &server.uri()).unwrap();
        let repos = list_repositories(&octocrab, TIMEOUT).await.unwrap();

        assert_eq!(repos.len(), 240);
        assert_eq!(repos[0].name, "repo-0");
        assert_eq!(repos[100].name, "repo-100");
        assert_eq!(repos[239].name, "repo-239");
        assert_eq!(server.received_requests().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn stops_on_empty_page() {
        let server = MockServer::start().await;
        mount_page(&server, 1, repo_page(0, 100)).await;
        mount_page(&server, 2, json!([])).await;

        let octocrab = build_client(Some("test-token"), &server.uri()).unwrap();
        let repos = list_repositories(&octocrab, TIMEOUT).await.unwrap();

        assert_eq!(repos.len(), 100);
    }

    #[tokio::test]
    async fn failed_page_aborts_listing() {
        let server = MockServer::start().await;
        mount_page(&server, 1, repo_page(0, 100)).await;
        Mock::given(method("GET"))
            .and(path("/user/repos"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "message": "Bad credentials",
                "documentation_url": "https://docs.github.com/rest"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let octocrab = build_client(Some("bad-token"), &server.uri()).unwrap();
        let result = list_repositories(&octocrab, TIMEOUT).await;

        assert!(matches!(result, Err(FetchError::GitHubError(_))));
    }

    #[tokio::test]
    async fn slow_page_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user/repos"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([]))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let octocrab = build_client(Some("test-token"), &server.uri()).unwrap();
        let result = list_repositories(&octocrab, Duration::from_millis(100)).await;

        assert!(matches!(result, Err(FetchError::Timeout(_))));
    }

    #[tokio::test]
    async fn downloads_raw_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/me/app/contents/images/shot.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x89, b'P', b'N', b'G']))
            .expect(1)
            .mount(&server)
            .await;

        let octocrab = build_client(Some("test-token"), &server.uri()).unwrap();
        let bytes = get_raw_file(&octocrab, "me/app", "images/shot.png", TIMEOUT)
            .await
            .unwrap();

        assert_eq!(bytes, vec![0x89, b'P', b'N', b'G']);
    }

    #[tokio::test]
    async fn sends_single_client_user_agent() {
        let server = MockServer::start().await;
        mount_page(&server, 1, json!([])).await;

        let octocrab = build_client(Some("test-token"), &server.uri()).unwrap();
        list_repositories(&octocrab, TIMEOUT).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let agents: Vec<&str> = requests[0]
            .headers
            .get_all(USER_AGENT)
            .iter()
            .map(|value| value.to_str().unwrap())
            .collect();
        assert_eq!(agents, vec![CLIENT_USER_AGENT]);
        assert_eq!(
            requests[0].headers.get("authorization").unwrap(),
            "Bearer test-token"
        );
    }

    #[test]
    fn contents_route_encodes_each_segment() {
        assert_eq!(
            contents_route("me/app", "docs/Screen Shot ü.png"),
            "/repos/me/app/contents/docs/Screen%20Shot%20%C3%BC.png"
        );
        assert_eq!(
            contents_route("me/app", "images/shot-1_v2.png"),
            "/repos/me/app/contents/images/shot-1_v2.png"
        );
    }

    #[tokio::test]
    async fn downloads_raw_file_with_space_in_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/me/app/contents/docs/my%20shot.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"shot".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let octocrab = build_client(Some("test-token"), &server.uri()).unwrap();
        let bytes = get_raw_file(&octocrab, "me/app", "docs/my shot.png", TIMEOUT)
            .await
            .unwrap();

        assert_eq!(bytes, b"shot");
    }

    #[tokio::test]
    async fn missing_raw_file_is_not_found() {
        let server = MockServer::start().await;

        let octocrab = build_client(Some("test-token"), &server.uri()).unwrap();
        let error = get_raw_file(&octocrab, "me/app", "PORTFOLIO.json", TIMEOUT)
            .await
            .unwrap_err();

        assert!(error.is_not_found());
    }
}
