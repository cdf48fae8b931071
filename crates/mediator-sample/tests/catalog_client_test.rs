use async_trait::async_trait;
use mediator_framework::mock::{
    FailingNotificationHandler, Journal, MockHandler, RecordingNotificationHandler,
};
use mediator_framework::{
    CancellationSignal, CancellationSource, DispatchError, Failure, HandlerRegistry, Mediator,
    Outcome, RequestHandler,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use mediator_sample::clients::CatalogClient;
use mediator_sample::error::CatalogError;
use mediator_sample::model::{CreateItem, GetItem, Item, ItemCreated, ItemId};

/// Client logic test: real `CatalogClient`, mocked request handlers.
///
/// Pattern 0: Pure Mock
/// - No store, no validation
/// - Checks how the client folds outcomes and publishes events
#[tokio::test]
async fn test_create_publishes_only_after_success() {
    let create = MockHandler::<CreateItem>::new();
    create.expect().return_ok(ItemId(7));
    create.expect().return_err(Failure::conflict("taken"));
    let journal = Journal::new();

    let mediator = Mediator::new(
        HandlerRegistry::builder()
            .handler::<CreateItem, _>(create.clone())
            .notification_handler::<ItemCreated, _>(RecordingNotificationHandler::new(
                "created", &journal,
            ))
            .build(),
    );
    let client = CatalogClient::new(mediator);

    let id = client.create_item("Lamp", 3.0).await.unwrap();
    assert_eq!(id, ItemId(7));

    let err = client.create_item("Lamp", 3.0).await.unwrap_err();
    assert!(matches!(err, CatalogError::Duplicate(msg) if msg == "taken"));

    // One event, for the successful call only
    assert_eq!(journal.entries(), vec!["created"]);
    create.verify();
}

#[tokio::test]
async fn test_require_item_turns_none_into_not_found() {
    let get = MockHandler::<GetItem>::new();
    get.expect().return_ok(Some(Item::new(ItemId(1), "Lamp", 3.0)));
    get.expect().return_ok(None);

    let client = CatalogClient::new(Mediator::new(
        HandlerRegistry::builder()
            .handler::<GetItem, _>(get.clone())
            .build(),
    ));

    assert_eq!(client.require_item(ItemId(1)).await.unwrap().name, "Lamp");
    let err = client.require_item(ItemId(2)).await.unwrap_err();
    assert_eq!(err.to_string(), "Item not found: item_2 was not found");
    get.verify();
}

#[tokio::test]
async fn test_unwired_operation_is_a_dispatch_error() {
    let client = CatalogClient::new(Mediator::new(HandlerRegistry::builder().build()));

    let err = client.get_item(ItemId(1)).await.unwrap_err();

    assert!(matches!(
        err,
        CatalogError::Dispatch(DispatchError::MissingHandler { .. })
    ));
}

/// Commits the write, then cancels the caller's signal before returning.
struct CommitsThenCancels {
    source: CancellationSource,
    commits: Arc<AtomicUsize>,
}

#[async_trait]
impl RequestHandler<CreateItem> for CommitsThenCancels {
    async fn handle(&self, _: &CreateItem, cancel: &CancellationSignal) -> Outcome<ItemId> {
        cancel.check()?;
        let n = self.commits.fetch_add(1, Ordering::SeqCst) + 1;
        self.source.cancel();
        Ok(ItemId(n as u64))
    }
}

#[tokio::test]
async fn test_committed_create_survives_cancelled_announcement() {
    let (source, signal) = CancellationSource::new();
    let commits = Arc::new(AtomicUsize::new(0));
    let journal = Journal::new();

    let client = CatalogClient::new(Mediator::new(
        HandlerRegistry::builder()
            .handler::<CreateItem, _>(CommitsThenCancels {
                source,
                commits: commits.clone(),
            })
            .notification_handler::<ItemCreated, _>(RecordingNotificationHandler::new(
                "created", &journal,
            ))
            .build(),
    ))
    .with_cancellation(signal);

    let id = client.create_item("Lamp", 3.0).await.unwrap();

    assert_eq!(id, ItemId(1));
    assert_eq!(commits.load(Ordering::SeqCst), 1);
    // Cancelled before the listener started, so nothing was announced
    assert!(journal.entries().is_empty());
}

#[tokio::test]
async fn test_listener_failure_does_not_undo_a_committed_create() {
    let create = MockHandler::<CreateItem>::new();
    create.expect().return_ok(ItemId(4));
    let journal = Journal::new();

    let client = CatalogClient::new(Mediator::new(
        HandlerRegistry::builder()
            .handler::<CreateItem, _>(create.clone())
            .notification_handler::<ItemCreated, _>(FailingNotificationHandler::new(
                "index",
                &journal,
                Failure::unexpected("index offline"),
            ))
            .build(),
    ));

    assert_eq!(client.create_item("Lamp", 3.0).await.unwrap(), ItemId(4));
    assert_eq!(journal.entries(), vec!["index"]);
    create.verify();
}
