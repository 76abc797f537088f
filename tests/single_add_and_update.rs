//! Single-entity insert and upsert semantics against a live server.

mod common;

use common::{TestCustomer, dispose, test_database};
use mongo_data::query::field;

#[tokio::test]
#[ignore = "requires a running MongoDB (set MONGODB_URI)"]
async fn add_assigns_an_id_and_round_trips() {
    let database = test_database().await;
    let repo = database.repository::<TestCustomer>().unwrap();

    let customer = TestCustomer {
        first_name: "Customer A".to_string(),
        last_name: "Smith".to_string(),
        email: "a@example.com".to_string(),
        ..TestCustomer::default()
    };
    assert!(customer.id.is_none());

    let saved = repo.add(customer).await.unwrap();
    let id = saved.id.expect("store assigns an id on insert");

    let loaded = repo.get_by_id(&id).await.unwrap().expect("just inserted");
    assert_eq!(loaded, saved);

    dispose(database).await;
}

#[tokio::test]
#[ignore = "requires a running MongoDB (set MONGODB_URI)"]
async fn update_replaces_the_stored_document() {
    let database = test_database().await;
    let repo = database.repository::<TestCustomer>().unwrap();

    let mut saved = repo.add(TestCustomer::named("Customer A")).await.unwrap();
    saved.last_name = "Jones".to_string();

    let updated = repo.update(saved.clone()).await.unwrap();
    assert_eq!(updated.id, saved.id);

    let loaded = repo
        .get_by_id(&saved.id.unwrap())
        .await
        .unwrap()
        .expect("still present");
    assert_eq!(loaded.last_name, "Jones");
    assert_eq!(repo.count().await.unwrap(), 1);

    dispose(database).await;
}

#[tokio::test]
#[ignore = "requires a running MongoDB (set MONGODB_URI)"]
async fn update_is_idempotent_for_an_unchanged_entity() {
    let database = test_database().await;
    let repo = database.repository::<TestCustomer>().unwrap();

    let saved = repo.add(TestCustomer::named("Customer A")).await.unwrap();

    let once = repo.update(saved.clone()).await.unwrap();
    let twice = repo.update(once.clone()).await.unwrap();
    assert_eq!(once, twice);

    let loaded = repo
        .get_by_id(&saved.id.unwrap())
        .await
        .unwrap()
        .expect("still present");
    assert_eq!(loaded, saved);
    assert_eq!(repo.count().await.unwrap(), 1);

    dispose(database).await;
}

#[tokio::test]
#[ignore = "requires a running MongoDB (set MONGODB_URI)"]
async fn update_without_an_id_inserts_instead_of_replacing() {
    let database = test_database().await;
    let repo = database.repository::<TestCustomer>().unwrap();

    let unsaved = TestCustomer::named("Customer A");
    assert!(unsaved.id.is_none());

    let saved = repo.update(unsaved).await.unwrap();
    assert!(saved.id.is_some(), "upsert of an unsaved entity inserts it");
    assert_eq!(repo.count().await.unwrap(), 1);

    // and no null-id document was left behind
    let reachable = repo
        .find_one(field("first_name").eq("Customer A"))
        .await
        .unwrap()
        .expect("inserted entity is reachable by query");
    assert_eq!(reachable.id, saved.id);

    dispose(database).await;
}

#[tokio::test]
#[ignore = "requires a running MongoDB (set MONGODB_URI)"]
async fn update_with_a_caller_assigned_id_upserts_it() {
    let database = test_database().await;
    let repo = database.repository::<TestCustomer>().unwrap();

    let mut customer = TestCustomer::named("Customer A");
    customer.id = Some(mongo_data::ObjectId::new());

    // no matching document exists, so the replace inserts
    let saved = repo.update(customer.clone()).await.unwrap();
    assert_eq!(saved.id, customer.id);
    assert_eq!(repo.count().await.unwrap(), 1);

    let loaded = repo
        .get_by_id(&customer.id.unwrap())
        .await
        .unwrap()
        .expect("upserted under the caller's id");
    assert_eq!(loaded.first_name, "Customer A");

    dispose(database).await;
}
