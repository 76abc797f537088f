//! Shared helpers and entities for the live-server test suites
//!
//! Each test connects to the deployment named by `MONGODB_URI` (default
//! `mongodb://localhost:27017`) and works inside a uniquely-named throwaway
//! database that it drops when done, so suites can run concurrently against
//! one server without interfering.

#![allow(dead_code)]

use std::env;

use mongo_data::ObjectId;
use mongo_data::config::DataConfig;
use mongo_data::db::Database;
use mongo_data::entities::Entity;
use mongo_data::repositories::BlockingDatabase;
use serde::{Deserialize, Serialize};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn test_config() -> DataConfig {
    let uri =
        env::var("MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
    let database_name = format!("mongo_data_test_{}", ObjectId::new().to_hex());
    DataConfig::new(uri, database_name).with_app_name("mongo-data-tests")
}

/// Connects to a fresh, uniquely-named test database.
pub async fn test_database() -> Database {
    init_logging();
    Database::connect(&test_config())
        .await
        .expect("test MongoDB deployment must be reachable")
}

/// Blocking counterpart of [`test_database`].
pub fn blocking_test_database() -> BlockingDatabase {
    init_logging();
    BlockingDatabase::connect(&test_config())
        .expect("test MongoDB deployment must be reachable")
}

pub async fn dispose(database: Database) {
    database
        .drop_database()
        .await
        .expect("dropping the test database");
}

pub fn dispose_blocking(database: BlockingDatabase) {
    database
        .drop_database()
        .expect("dropping the test database");
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestCustomer {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl Entity for TestCustomer {
    const COLLECTION: Option<&'static str> = Some("TestCustomers");

    fn id(&self) -> Option<ObjectId> {
        self.id
    }

    fn set_id(&mut self, id: ObjectId) {
        self.id = Some(id);
    }
}

impl TestCustomer {
    pub fn named(first_name: &str) -> Self {
        Self {
            first_name: first_name.to_string(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestProduct {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub description: String,
    pub price: f64,
}

impl Entity for TestProduct {
    const COLLECTION: Option<&'static str> = Some("TestProducts");

    fn id(&self) -> Option<ObjectId> {
        self.id
    }

    fn set_id(&mut self, id: ObjectId) {
        self.id = Some(id);
    }
}

/// The 4/3 "Customer*" vs "Client*" split used across the suites.
pub fn seven_customers() -> Vec<TestCustomer> {
    [
        "Customer A",
        "Client B",
        "Customer C",
        "Client D",
        "Customer E",
        "Client F",
        "Customer G",
    ]
    .into_iter()
    .map(TestCustomer::named)
    .collect()
}
