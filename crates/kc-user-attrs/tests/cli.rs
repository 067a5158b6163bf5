//! End-to-end tests: the binary against a stub admin API.

use std::collections::HashMap;
use std::net::TcpListener;
use std::sync::{Arc, Mutex};

use assert_cmd::Command;
use axum::{
    extract::{Form, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use predicates::prelude::*;
use tempfile::TempDir;

const TOKEN: &str = "stub-token";
const ADMIN_PASSWORD: &str = "admin";

/// Requests seen by the stub.
#[derive(Debug, Default)]
struct Recorded {
    logins: Vec<(String, HashMap<String, String>)>,
    searches: Vec<(String, HashMap<String, String>)>,
}

/// Canned admin API.
struct Stub {
    /// Raw JSON returned by the user search, sent verbatim so key order holds.
    users: &'static str,
    fail_search: bool,
    recorded: Mutex<Recorded>,
}

type Shared = Arc<Stub>;

impl Stub {
    fn new(users: &'static str) -> Shared {
        Arc::new(Self {
            users,
            fail_search: false,
            recorded: Mutex::default(),
        })
    }

    fn failing_search() -> Shared {
        Arc::new(Self {
            users: "[]",
            fail_search: true,
            recorded: Mutex::default(),
        })
    }

    fn logins(&self) -> Vec<(String, HashMap<String, String>)> {
        self.recorded.lock().unwrap().logins.clone()
    }

    fn searches(&self) -> Vec<(String, HashMap<String, String>)> {
        self.recorded.lock().unwrap().searches.clone()
    }
}

fn json(status: StatusCode, body: impl Into<String>) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], body.into()).into_response()
}

/// POST /realms/{realm}/protocol/openid-connect/token
async fn token(
    State(stub): State<Shared>,
    Path(realm): Path<String>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let accepted = form.get("password").map(String::as_str) == Some(ADMIN_PASSWORD);
    stub.recorded.lock().unwrap().logins.push((realm, form));

    if accepted {
        json(
            StatusCode::OK,
            format!(r#"{{"access_token":"{TOKEN}","expires_in":60,"token_type":"Bearer"}}"#),
        )
    } else {
        json(
            StatusCode::UNAUTHORIZED,
            r#"{"error":"invalid_grant","error_description":"Invalid user credentials"}"#,
        )
    }
}

/// GET /admin/realms/{realm}/users
async fn users(
    State(stub): State<Shared>,
    Path(realm): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    stub.recorded.lock().unwrap().searches.push((realm, query));

    let bearer = format!("Bearer {TOKEN}");
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some(bearer.as_str());

    if !authorized {
        return json(StatusCode::UNAUTHORIZED, r#"{"error":"HTTP 401 Unauthorized"}"#);
    }
    if stub.fail_search {
        return json(StatusCode::INTERNAL_SERVER_ERROR, r#"{"error":"unknown_error"}"#);
    }
    json(StatusCode::OK, stub.users)
}

/// Serves `stub` on an ephemeral port and returns its base URL.
fn serve(stub: Shared) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let addr = listener.local_addr().unwrap();

    let app = Router::new()
        .route("/realms/{realm}/protocol/openid-connect/token", post(token))
        .route("/admin/realms/{realm}/users", get(users))
        .with_state(stub);

    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).unwrap();
            axum::serve(listener, app).await.unwrap();
        });
    });

    format!("http://{addr}")
}

/// The binary, run from an empty directory with a clean environment.
fn kc_user_attrs(dir: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("kc-user-attrs").unwrap();
    cmd.env_clear().current_dir(dir.path());
    cmd
}

fn with_admin_env(cmd: &mut Command, server: &str) {
    cmd.env("ADMIN_USERNAME", "admin")
        .env("ADMIN_PASSWORD", ADMIN_PASSWORD)
        .env("ADMIN_REALM", "master")
        .env("SERVER", server);
}

fn lookup(stub: &Shared, args: &[&str]) -> (TempDir, Command) {
    let server = serve(Arc::clone(stub));
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = kc_user_attrs(&dir);
    with_admin_env(&mut cmd, &server);
    cmd.args(args);
    (dir, cmd)
}

#[test]
fn prints_attribute_map() {
    let stub = Stub::new(
        r#"[{"id":"1","username":"alice","enabled":true,"attributes":{"team":["infra"],"level":["3"]}}]"#,
    );
    let (_dir, mut cmd) = lookup(&stub, &["acme", "alice"]);

    cmd.assert()
        .success()
        .stdout("{\"team\":[\"infra\"],\"level\":[\"3\"]}\n")
        .stderr(predicate::str::is_empty());
}

#[test]
fn empty_attribute_map_prints_empty_object() {
    let stub = Stub::new(r#"[{"id":"1","username":"alice","attributes":{}}]"#);
    let (_dir, mut cmd) = lookup(&stub, &["acme", "alice"]);

    cmd.assert().success().stdout("{}\n");
}

#[test]
fn unknown_user_exits_one() {
    let stub = Stub::new("[]");
    let (_dir, mut cmd) = lookup(&stub, &["acme", "ghost"]);

    cmd.assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr("user not found\n");
}

#[test]
fn user_without_attributes_exits_one() {
    for users in [
        r#"[{"id":"1","username":"alice"}]"#,
        r#"[{"id":"1","username":"alice","attributes":null}]"#,
    ] {
        let stub = Stub::new(users);
        let (_dir, mut cmd) = lookup(&stub, &["acme", "alice"]);

        cmd.assert()
            .code(1)
            .stdout(predicate::str::is_empty())
            .stderr("user has no attributes\n");
    }
}

#[test]
fn missing_arguments_exit_one() {
    let dir = tempfile::tempdir().unwrap();

    for args in [&[][..], &["acme"][..]] {
        kc_user_attrs(&dir)
            .args(args)
            .assert()
            .code(1)
            .stdout(predicate::str::is_empty())
            .stderr("missing argument: realm or username not provided\n");
    }
}

#[test]
fn hyphen_username_and_extra_arguments_are_looked_up() {
    let stub = Stub::new(r#"[{"username":"-bot","attributes":{"kind":["service"]}}]"#);
    let (_dir, mut cmd) = lookup(&stub, &["acme", "-bot", "extra", "--help"]);

    cmd.assert()
        .success()
        .stdout("{\"kind\":[\"service\"]}\n")
        .stderr(predicate::str::is_empty());

    let searches = stub.searches();
    assert_eq!(searches.len(), 1);
    assert_eq!(searches[0].0, "acme");
    assert_eq!(searches[0].1["username"], "-bot");
}

#[test]
fn sends_exact_enabled_single_result_search() {
    let stub = Stub::new(r#"[{"username":"j.doe","attributes":{}}]"#);
    let (_dir, mut cmd) = lookup(&stub, &["acme", "j.doe"]);

    cmd.assert().success();

    let logins = stub.logins();
    assert_eq!(logins.len(), 1);
    let (admin_realm, form) = &logins[0];
    assert_eq!(admin_realm, "master");
    assert_eq!(form["grant_type"], "password");
    assert_eq!(form["client_id"], "admin-cli");
    assert_eq!(form["username"], "admin");

    let searches = stub.searches();
    assert_eq!(searches.len(), 1);
    let (realm, query) = &searches[0];
    assert_eq!(realm, "acme");
    assert_eq!(query["username"], "j.doe");
    assert_eq!(query["exact"], "true");
    assert_eq!(query["enabled"], "true");
    assert_eq!(query["max"], "1");
}

#[test]
fn rejected_login_is_fatal_and_skips_search() {
    let stub = Stub::new(r#"[{"username":"alice","attributes":{}}]"#);
    let (_dir, mut cmd) = lookup(&stub, &["acme", "alice"]);
    cmd.env("ADMIN_PASSWORD", "wrong");

    cmd.assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(
            predicate::str::starts_with("fatal: admin login failed: server returned 401")
                .and(predicate::str::contains("invalid_grant")),
        );

    assert_eq!(stub.logins().len(), 1);
    assert!(stub.searches().is_empty());
}

#[test]
fn failed_search_is_fatal() {
    let stub = Stub::failing_search();
    let (_dir, mut cmd) = lookup(&stub, &["acme", "alice"]);

    cmd.assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::starts_with(
            "fatal: user search failed: server returned 500",
        ));
}

#[test]
fn unreachable_server_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = kc_user_attrs(&dir);
    // Bind and drop to get a port nobody listens on.
    let port = TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    with_admin_env(&mut cmd, &format!("http://127.0.0.1:{port}"));

    cmd.args(["acme", "alice"])
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::starts_with("fatal: admin login failed"));
}

#[test]
fn malformed_server_url_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = kc_user_attrs(&dir);
    with_admin_env(&mut cmd, "not a url");

    cmd.args(["acme", "alice"])
        .assert()
        .code(2)
        .stderr(predicate::str::starts_with(
            "fatal: admin login failed: invalid server URL",
        ));
}

#[test]
fn reads_credentials_from_env_file() {
    let stub = Stub::new(r#"[{"username":"alice","attributes":{"team":["infra"]}}]"#);
    let server = serve(Arc::clone(&stub));
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(".env"),
        format!(
            "ADMIN_USERNAME=admin\nADMIN_PASSWORD={ADMIN_PASSWORD}\nADMIN_REALM=master\nSERVER={server}\n"
        ),
    )
    .unwrap();

    kc_user_attrs(&dir)
        .args(["acme", "alice"])
        .assert()
        .success()
        .stdout("{\"team\":[\"infra\"]}\n");
}

#[test]
fn environment_wins_over_env_file() {
    let stub = Stub::new(r#"[{"username":"alice","attributes":{}}]"#);
    let (dir, mut cmd) = lookup(&stub, &["acme", "alice"]);
    std::fs::write(
        dir.path().join(".env"),
        "ADMIN_PASSWORD=from-file\nSERVER=http://127.0.0.1:9\n",
    )
    .unwrap();

    cmd.assert().success().stdout("{}\n");
}

#[test]
fn help_exits_zero() {
    let dir = tempfile::tempdir().unwrap();

    kc_user_attrs(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("REALM").and(predicate::str::contains("USERNAME")));
}
