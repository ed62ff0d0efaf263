use assert_cmd::cargo::cargo_bin_cmd;
use roster_store::Store;
use serde_json::Value;
use std::path::Path;
use std::process::Output;
use std::sync::mpsc;
use std::thread;
use tempfile::TempDir;

fn spawn_server(db_path: &Path) -> String {
    let (tx, rx) = mpsc::channel();
    let db_path = db_path.to_path_buf();
    thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .expect("runtime");
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                .await
                .expect("bind");
            let store = Store::open(&db_path).expect("open store");
            store.migrate().expect("migrate");
            tx.send(listener.local_addr().expect("local addr"))
                .expect("send addr");
            roster_server::serve_on(listener, store, &[], std::future::pending())
                .await
                .expect("serve");
        });
    });
    let addr = rx.recv().expect("server addr");
    format!("http://{addr}")
}

fn unused_api_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    format!("http://{addr}")
}

fn run_raw(config_home: &Path, api_url: &str, args: &[&str]) -> Output {
    cargo_bin_cmd!("roster")
        .env("XDG_CONFIG_HOME", config_home)
        .env_remove("RUST_LOG")
        .args(["--api-url", api_url])
        .args(args)
        .output()
        .expect("run command")
}

fn run_cmd(config_home: &Path, api_url: &str, args: &[&str]) -> String {
    let output = run_raw(config_home, api_url, args);
    assert!(output.status.success(), "command failed: {:?}", output);
    String::from_utf8(output.stdout).expect("utf8")
}

fn run_cmd_json(config_home: &Path, api_url: &str, args: &[&str]) -> Value {
    let output = run_raw(config_home, api_url, &[&["--json"][..], args].concat());
    assert!(output.status.success(), "command failed: {:?}", output);
    serde_json::from_slice(&output.stdout).expect("parse json")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn cli_add_list_edit_delete_flow() {
    let temp = TempDir::new().expect("temp dir");
    let api = spawn_server(&temp.path().join("roster.sqlite3"));
    let home = temp.path();

    let empty = run_cmd(home, &api, &["list"]);
    assert!(empty.contains("No students yet"));

    run_cmd(
        home,
        &api,
        &["add", "--name", "Ada Lovelace", "--email", "Ada@Example.com", "--course", "Math"],
    );
    run_cmd(
        home,
        &api,
        &["add", "--name", "Alan Turing", "--email", "alan@example.com", "--course", "Logic"],
    );

    let list = run_cmd_json(home, &api, &["list"]);
    let items = list.as_array().expect("array");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["fullName"], "Alan Turing");
    assert_eq!(items[1]["email"], "ada@example.com");
    let ada_id = items[1]["id"].as_str().expect("id").to_string();

    let updated = run_cmd_json(home, &api, &["edit", &ada_id, "--course", "Engines"]);
    assert_eq!(updated["fullName"], "Ada Lovelace");
    assert_eq!(updated["course"], "Engines");

    let deleted = run_cmd_json(home, &api, &["delete", &ada_id]);
    assert_eq!(deleted["message"], "Student deleted");

    let again = run_raw(home, &api, &["delete", &ada_id]);
    assert_eq!(again.status.code(), Some(2));
    assert!(stderr(&again).contains("Student not found"));

    let missing_edit = run_raw(home, &api, &["edit", &ada_id, "--course", "History"]);
    assert_eq!(missing_edit.status.code(), Some(2));
}

#[test]
fn cli_reports_conflicts() {
    let temp = TempDir::new().expect("temp dir");
    let api = spawn_server(&temp.path().join("roster.sqlite3"));
    let home = temp.path();

    run_cmd(
        home,
        &api,
        &["add", "--name", "John Doe", "--email", "john@example.com", "--course", "Math"],
    );

    let duplicate = run_raw(
        home,
        &api,
        &["add", "--name", "john  doe", "--email", "JOHN@example.com", "--course", "MATH"],
    );
    assert_eq!(duplicate.status.code(), Some(4));
    assert!(stderr(&duplicate).contains("duplicate data is not allowed"));

    let email = run_raw(
        home,
        &api,
        &["add", "--name", "Jane Roe", "--email", "john@example.com", "--course", "History"],
    );
    assert_eq!(email.status.code(), Some(4));
    assert!(stderr(&email).contains("email already exists"));
}

#[test]
fn cli_validates_before_calling_the_api() {
    let temp = TempDir::new().expect("temp dir");
    let api = unused_api_url();

    let output = run_raw(
        temp.path(),
        &api,
        &["add", "--name", "Jo", "--email", "a@b.co", "--course", "CS"],
    );
    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("full name too short."));

    let output = run_raw(
        temp.path(),
        &api,
        &["add", "--name", "John Doe", "--email", "not-an-email", "--course", "CS"],
    );
    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("enter a valid email."));

    let output = run_raw(temp.path(), &api, &["delete", "not-a-uuid"]);
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn cli_unreachable_api_is_failure() {
    let temp = TempDir::new().expect("temp dir");
    let output = run_raw(temp.path(), &unused_api_url(), &["list"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn cli_rejects_missing_config_file() {
    let temp = TempDir::new().expect("temp dir");
    let missing = temp.path().join("missing.toml");
    let output = cargo_bin_cmd!("roster")
        .args(["--verbose", "--config", missing.to_str().expect("path"), "list"])
        .output()
        .expect("run command");
    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("config file not found"));
}

#[test]
fn serve_rejects_invalid_bind() {
    let temp = TempDir::new().expect("temp dir");
    let output = cargo_bin_cmd!("roster")
        .env("XDG_CONFIG_HOME", temp.path())
        .args(["serve", "--bind", "not-an-address"])
        .output()
        .expect("run command");
    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("invalid server.bind value"));
}
