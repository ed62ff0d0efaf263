use std::sync::mpsc;
use std::thread;

use roster_client::{ApiClient, ClientError};
use roster_core::{ErrorKind, StudentId, StudentInput};
use roster_store::Store;
use url::Url;

fn spawn_server() -> Url {
    let (tx, rx) = mpsc::channel();
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
            tx.send(listener.local_addr().expect("local addr"))
                .expect("send addr");
            let store = Store::open_in_memory().expect("open store");
            store.migrate().expect("migrate");
            roster_server::serve_on(listener, store, &[], std::future::pending())
                .await
                .expect("serve");
        });
    });
    let addr = rx.recv().expect("server addr");
    Url::parse(&format!("http://{addr}")).expect("url")
}

fn client() -> ApiClient {
    ApiClient::new(spawn_server()).expect("client")
}

#[test]
fn create_list_update_delete_roundtrip() {
    let client = client();

    let ada = client
        .create_student(&StudentInput::new("Ada Lovelace", "ADA@example.com", "Math"))
        .expect("create ada");
    assert_eq!(ada.email, "ada@example.com");

    let alan = client
        .create_student(&StudentInput::new("Alan Turing", "alan@example.com", "Logic"))
        .expect("create alan");

    let list = client.list_students().expect("list");
    let ids: Vec<StudentId> = list.iter().map(|record| record.id).collect();
    assert_eq!(ids, vec![alan.id, ada.id]);

    let updated = client
        .update_student(
            ada.id,
            &StudentInput::new("Ada Lovelace", "ada@example.com", "Engines"),
        )
        .expect("update");
    assert_eq!(updated.course, "Engines");

    let message = client.delete_student(alan.id).expect("delete");
    assert_eq!(message, "Student deleted");
    assert_eq!(client.list_students().expect("list").len(), 1);
}

#[test]
fn api_errors_carry_kind_and_message() {
    let client = client();

    let err = client
        .create_student(&StudentInput::new("Jo", "a@b.co", "CS"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.to_string(), "full name too short.");

    client
        .create_student(&StudentInput::new("John Doe", "john@example.com", "Math"))
        .expect("create");
    let err = client
        .create_student(&StudentInput::new("Jane Roe", "JOHN@example.com", "History"))
        .unwrap_err();
    match err {
        ClientError::Api {
            kind,
            status,
            message,
        } => {
            assert_eq!(kind, ErrorKind::Conflict);
            assert_eq!(status, 409);
            assert_eq!(message, "email already exists");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let err = client.delete_student(StudentId::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.to_string(), "Student not found");
}

#[test]
fn api_prefixed_base_url_works() {
    let base = spawn_server().join("api").expect("join");
    let client = ApiClient::new(base).expect("client");
    client
        .create_student(&StudentInput::new("Grace Hopper", "grace@example.com", "Compilers"))
        .expect("create");
    assert_eq!(client.list_students().expect("list").len(), 1);
}

#[test]
fn unreachable_server_is_internal_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let client =
        ApiClient::new(Url::parse(&format!("http://{addr}")).expect("url")).expect("client");
    let err = client.list_students().unwrap_err();
    assert!(matches!(err, ClientError::Http(_)));
    assert_eq!(err.kind(), ErrorKind::Internal);
}
