use docmap_core::Connection as _;
use docmap_driver_mongodb::Connection;

// Nothing listens on port 1, so server selection times out.
const UNREACHABLE: &str = "mongodb://127.0.0.1:1/test?serverSelectionTimeoutMS=200";

#[tokio::test]
async fn failed_server_selection_marks_connection_closed() {
    let connection = Connection::connect(UNREACHABLE).await.unwrap();
    assert!(!connection.is_closed());

    let err = connection.ping().await.unwrap_err();
    assert!(err.is_driver_operation_failed());
    assert!(connection.is_closed());
}

#[tokio::test]
async fn disconnect_marks_connection_closed() {
    let connection = Connection::connect(UNREACHABLE).await.unwrap();

    connection.disconnect().await.unwrap();
    assert!(connection.is_closed());

    // A second disconnect is a no-op
    connection.disconnect().await.unwrap();
}

#[tokio::test]
async fn non_mongodb_scheme_is_rejected() {
    let err = Connection::connect("postgres://127.0.0.1/test")
        .await
        .unwrap_err();
    assert!(err.is_invalid_connection_url());
}
