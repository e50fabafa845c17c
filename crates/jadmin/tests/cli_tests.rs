use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Serve `responses` in order, one connection each, and return the raw script requests.
///
/// Crumb lookups are answered with 404 (CSRF protection off) and do not
/// consume a response.
fn start_mock_server(responses: Vec<(u16, String)>) -> (String, thread::JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let mut requests = Vec::new();
        let mut responses = responses.into_iter().peekable();
        while let Some((status, body)) = responses.peek() {
            let Ok((mut stream, _)) = listener.accept() else {
                break;
            };
            let request = read_request(&mut stream);

            let (status, body) = if request.starts_with("GET /crumbIssuer/") {
                (404, String::from("Not Found"))
            } else {
                let reply = (*status, body.clone());
                responses.next();
                requests.push(request);
                reply
            };

            let response = format!(
                "HTTP/1.1 {} Mock\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes());
        }
        requests
    });

    (url, handle)
}

fn read_request(stream: &mut std::net::TcpStream) -> String {
    stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .unwrap();

    let mut data = Vec::new();
    let mut buffer = [0; 4096];
    loop {
        let n = match stream.read(&mut buffer) {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        data.extend_from_slice(&buffer[..n]);

        let text = String::from_utf8_lossy(&data);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if data.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }

    String::from_utf8_lossy(&data).into_owned()
}

fn envelope(data: serde_json::Value) -> String {
    json!({ "error": false, "msg": "", "data": data }).to_string()
}

fn create_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    dir.push(format!("jadmin-test-{}-{}", std::process::id(), nanos));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// jadmin isolated from the caller's config files and environment
fn jadmin(home: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("jadmin");
    cmd.current_dir(home)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("NO_COLOR", "1")
        .env_remove("JENKINS_URL")
        .env_remove("JENKINS_USERNAME")
        .env_remove("JENKINS_PASSWORD")
        .env_remove("JENKINS_TIMEOUT_SECS")
        .env_remove("JADMIN_CONFIG")
        .env_remove("JADMIN_LOG")
        .timeout(Duration::from_secs(10));
    cmd
}

#[test]
fn test_missing_config() {
    let home = create_temp_dir();
    jadmin(&home)
        .args(["user", "get", "alice"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("URL not configured"));

    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn test_help_command() {
    let home = create_temp_dir();
    jadmin(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Manage Jenkins local users and global matrix permissions",
        ));

    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn test_permissions_subcommand_help() {
    let home = create_temp_dir();
    jadmin(&home)
        .args(["permissions", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Make the user's permissions exactly the given set"));

    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn test_version() {
    let home = create_temp_dir();
    jadmin(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));

    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn test_username_without_password_is_rejected() {
    let home = create_temp_dir();
    jadmin(&home)
        .args(["--url", "http://127.0.0.1:1", "--username", "admin", "user", "get", "alice"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("password not configured"));

    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn test_user_get_sends_authenticated_script() {
    let home = create_temp_dir();
    let (url, server) = start_mock_server(vec![(
        200,
        envelope(json!({
            "username": "alice",
            "fullname": "Alice A",
            "email": "a@x.com",
            "password_hash": "#jbcrypt:$2a$10$abc",
            "description": "Managed by Terraform"
        })),
    )]);

    jadmin(&home)
        .args(["--url", url.as_str(), "--username", "admin", "--password", "secret"])
        .args(["user", "get", "alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("alice"))
        .stdout(predicate::str::contains("Alice A"))
        .stdout(predicate::str::contains("Managed by Terraform"));

    let requests = server.join().unwrap();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert!(request.starts_with("POST /scriptText "));
    // admin:secret
    assert!(request.contains("YWRtaW46c2VjcmV0"));
    assert!(request.contains("script="));
    assert!(request.contains("alice"));

    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn test_config_file_is_used_for_defaults() {
    let home = create_temp_dir();
    let (url, server) = start_mock_server(vec![(
        200,
        envelope(json!({ "username": "bob", "permissions": ["Overall/Read", "Job/Build"] })),
    )]);

    let config_path = home.join("custom.toml");
    std::fs::write(
        &config_path,
        format!("url = \"{}\"\nusername = \"admin\"\npassword = \"t\"\n", url),
    )
    .unwrap();

    let output = jadmin(&home)
        .args(["--config", config_path.to_str().unwrap(), "-o", "json"])
        .args(["permissions", "get", "bob"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value["username"], "bob");
    assert_eq!(value["permissions"], json!(["Job/Build", "Overall/Read"]));
    server.join().unwrap();

    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn test_local_config_file_and_env_layering() {
    let home = create_temp_dir();
    let (url, server) = start_mock_server(vec![(
        200,
        envelope(json!({ "permissions": ["Job/Build", "Overall/Administer"] })),
    )]);

    std::fs::write(home.join("jadmin.toml"), "url = \"http://127.0.0.1:1\"\n").unwrap();

    // Environment overrides the local file
    jadmin(&home)
        .env("JENKINS_URL", &url)
        .args(["permissions", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Overall/Administer"));
    server.join().unwrap();

    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn test_domain_error_is_reported_verbatim() {
    let home = create_temp_dir();
    let (url, server) = start_mock_server(vec![(
        200,
        r#"{"error":true,"msg":"Jenkins is not using local user database","data":{}}"#.to_string(),
    )]);

    jadmin(&home)
        .args(["--url", url.as_str(), "user", "delete", "alice"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Jenkins is not using local user database"));
    server.join().unwrap();

    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn test_json_error_has_code() {
    let home = create_temp_dir();
    let (url, server) = start_mock_server(vec![(403, "No valid crumb was included".to_string())]);

    let output = jadmin(&home)
        .args(["--url", url.as_str(), "-o", "json", "permissions", "revoke", "bob"])
        .assert()
        .failure()
        .get_output()
        .stderr
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value["error"], true);
    assert_eq!(value["code"], "transport");
    assert!(value["message"].as_str().unwrap().contains("HTTP 403"));
    assert!(value["message"].as_str().unwrap().contains("No valid crumb"));
    server.join().unwrap();

    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn test_user_create_checks_for_existing_user() {
    let home = create_temp_dir();
    let (url, server) = start_mock_server(vec![(
        200,
        envelope(json!({ "username": "alice", "fullname": "Alice A" })),
    )]);

    jadmin(&home)
        .args(["--url", url.as_str(), "user", "create", "alice", "--user-password", "pw"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Local user alice already exists"));

    assert_eq!(server.join().unwrap().len(), 1);

    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn test_user_create() {
    let home = create_temp_dir();
    let (url, server) = start_mock_server(vec![
        (200, envelope(json!({}))),
        (
            200,
            r#"{"error":false,"msg":"User alice successfully created","data":{}}"#.to_string(),
        ),
    ]);

    let output = jadmin(&home)
        .args(["--url", url.as_str(), "-o", "json"])
        .args(["user", "create", "alice", "--user-password", "pw", "--email", "a@x.com"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value["success"], true);

    let requests = server.join().unwrap();
    assert_eq!(requests.len(), 2);
    assert!(requests[1].contains("createAccount"));
    // Default description, form encoded
    assert!(requests[1].contains("Managed+by+Terraform"));

    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn test_permissions_set_sends_desired_names() {
    let home = create_temp_dir();
    let (url, server) = start_mock_server(vec![(
        200,
        envelope(json!({
            "username": "bob",
            "granted": ["Job/Build"],
            "revoked": ["Overall/Read"],
            "unknown": []
        })),
    )]);

    jadmin(&home)
        .args(["--url", url.as_str(), "--username", "admin", "--password", "secret"])
        .args(["permissions", "set", "bob", "Job/Build"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Updated permissions of: bob"));

    let requests = server.join().unwrap();
    assert!(requests[0].contains("Job%2FBuild"));
    // Authenticated as admin:secret, while bob is only the target
    assert!(requests[0].contains("YWRtaW46c2VjcmV0"));
    assert!(requests[0].contains("bob"));

    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn test_config_show_masks_password() {
    let home = create_temp_dir();
    jadmin(&home)
        .env("JENKINS_URL", "https://ci.example.com")
        .env("JENKINS_USERNAME", "admin")
        .env("JENKINS_PASSWORD", "super-secret")
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://ci.example.com"))
        .stdout(predicate::str::contains("********"))
        .stdout(predicate::str::contains("super-secret").not());

    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn test_config_path_with_explicit_file() {
    let home = create_temp_dir();
    jadmin(&home)
        .args(["--config", "/etc/jadmin/custom.toml", "config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/etc/jadmin/custom.toml"));

    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn test_completions() {
    let home = create_temp_dir();
    jadmin(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("jadmin"));

    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn test_user_update_rewrites_existing_user() {
    let home = create_temp_dir();
    let (url, server) = start_mock_server(vec![
        (200, envelope(json!({ "username": "alice", "fullname": "Alice A" }))),
        (
            200,
            r#"{"error":false,"msg":"User alice successfully created","data":{}}"#.to_string(),
        ),
    ]);

    jadmin(&home)
        .args(["--url", url.as_str(), "--username", "admin", "--password", "secret"])
        .args(["user", "update", "alice", "--user-password", "n3w", "--fullname", "Alice B"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Updated user: alice"));

    let requests = server.join().unwrap();
    assert_eq!(requests.len(), 2);
    assert!(requests[1].contains("createAccount"));
    assert!(requests[1].contains("n3w"));
    assert!(requests[1].contains("Alice+B"));

    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn test_user_update_requires_existing_user() {
    let home = create_temp_dir();
    let (url, server) = start_mock_server(vec![(200, envelope(json!({})))]);

    let output = jadmin(&home)
        .args(["--url", url.as_str(), "-o", "json"])
        .args(["user", "update", "ghost", "--user-password", "pw"])
        .assert()
        .failure()
        .get_output()
        .stderr
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value["code"], "not_found");
    assert!(value["message"].as_str().unwrap().contains("ghost does not exist"));

    // Only the existence check was sent
    assert_eq!(server.join().unwrap().len(), 1);

    let _ = std::fs::remove_dir_all(&home);
}
