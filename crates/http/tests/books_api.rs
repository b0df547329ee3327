use shelf_http::HttpBooksApi;
use shelf_kernel::{ApiError, BooksApi, NewBook, Numeric, Operation};
use shelf_testing_fake_server::{sample_book, FakeBooksServer};

fn new_book(year: &str, copies: &str) -> NewBook {
    NewBook {
        title: "Piranesi".to_string(),
        author: "Susanna Clarke".to_string(),
        category: "Fantasy".to_string(),
        published_year: Numeric::coerce(year),
        available_copies: Numeric::coerce(copies),
    }
}

fn client(server: &FakeBooksServer) -> HttpBooksApi {
    HttpBooksApi::builder(server.endpoint())
        .build()
        .expect("client should build")
}

#[tokio::test]
async fn list_returns_books_in_server_order() {
    let server = FakeBooksServer::spawn_with(vec![
        sample_book("z", "Zorba", 1),
        sample_book("a", "Anathem", 2),
    ])
    .await
    .unwrap();
    let api = client(&server);

    let books = api.list().await.unwrap();

    let ids: Vec<_> = books.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, ["z", "a"]);
    assert_eq!(books[1].available_copies, 2);
}

#[tokio::test]
async fn list_twice_is_identical() {
    let server = FakeBooksServer::spawn_with(vec![
        sample_book("1", "One", 0),
        sample_book("2", "Two", 5),
    ])
    .await
    .unwrap();
    let api = client(&server);

    let first = api.list().await.unwrap();
    let second = api.list().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(server.list_requests(), 2);
}

#[tokio::test]
async fn create_stores_a_book() {
    let server = FakeBooksServer::spawn().await.unwrap();
    let api = client(&server);

    api.create(&new_book("2020", "4")).await.unwrap();

    let stored = server.books();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].title, "Piranesi");
    assert_eq!(stored[0].published_year, 2020);
    assert_eq!(stored[0].available_copies, 4);
}

#[tokio::test]
async fn create_with_non_numeric_year_is_rejected_by_status() {
    let server = FakeBooksServer::spawn().await.unwrap();
    let api = client(&server);

    let err = api.create(&new_book("abc", "1")).await.unwrap_err();

    assert!(matches!(
        err,
        ApiError::Rejected {
            operation: Operation::Create,
            status: 400
        }
    ));
    assert!(server.books().is_empty());
}

#[tokio::test]
async fn adjust_copies_applies_any_delta() {
    let server = FakeBooksServer::spawn_with(vec![sample_book("b-1", "Emma", 1)])
        .await
        .unwrap();
    let api = client(&server);

    api.adjust_copies("b-1", 3).await.unwrap();
    api.adjust_copies("b-1", -2).await.unwrap();

    assert_eq!(server.books()[0].available_copies, 2);
}

#[tokio::test]
async fn adjust_copies_below_zero_is_rejected() {
    let server = FakeBooksServer::spawn_with(vec![sample_book("b-1", "Emma", 0)])
        .await
        .unwrap();
    let api = client(&server);

    let err = api.adjust_copies("b-1", -1).await.unwrap_err();

    assert_eq!(err.operation(), Some(Operation::AdjustCopies));
    assert!(err.status().is_some());
    assert_eq!(server.books()[0].available_copies, 0);
}

#[tokio::test]
async fn adjust_copies_unknown_id_is_rejected() {
    let server = FakeBooksServer::spawn().await.unwrap();
    let api = client(&server);

    let err = api.adjust_copies("missing", 1).await.unwrap_err();

    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn delete_only_succeeds_at_zero_copies() {
    let server = FakeBooksServer::spawn_with(vec![
        sample_book("keep", "Stocked", 2),
        sample_book("gone", "Empty", 0),
    ])
    .await
    .unwrap();
    let api = client(&server);

    let err = api.delete("keep").await.unwrap_err();
    assert_eq!(err.operation(), Some(Operation::Delete));

    api.delete("gone").await.unwrap();

    let ids: Vec<_> = server.books().into_iter().map(|b| b.id).collect();
    assert_eq!(ids, ["keep"]);
}

#[tokio::test]
async fn failed_list_is_a_rejection() {
    let server = FakeBooksServer::spawn().await.unwrap();
    server.set_list_failure(true);
    let api = client(&server);

    let err = api.list().await.unwrap_err();

    assert_eq!(err.operation(), Some(Operation::List));
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let server = FakeBooksServer::spawn().await.unwrap();
    let endpoint = server.endpoint();
    drop(server);
    tokio::task::yield_now().await;

    let api = HttpBooksApi::builder(endpoint)
        .with_timeout(2_000)
        .build()
        .unwrap();
    let err = api.delete("anything").await.unwrap_err();

    assert!(matches!(
        err,
        ApiError::Transport {
            operation: Operation::Delete,
            ..
        }
    ));
}

#[tokio::test]
async fn requests_carry_request_ids() {
    let server = FakeBooksServer::spawn().await.unwrap();
    let api = client(&server);

    api.list().await.unwrap();
    api.list().await.unwrap();

    let ids = server.request_ids();
    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], ids[1]);
}

#[tokio::test]
async fn request_ids_can_be_disabled() {
    let server = FakeBooksServer::spawn().await.unwrap();
    let api = HttpBooksApi::builder(server.endpoint())
        .with_request_id(false)
        .build()
        .unwrap();

    api.list().await.unwrap();

    assert!(server.request_ids().is_empty());
}
