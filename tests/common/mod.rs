//! Shared helpers for integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use home_library::{
    create_router,
    repository::Stores,
    services::{
        metadata::{BookMetadata, MetadataProvider},
        Services,
    },
    AppConfig, AppState,
};
use tempfile::TempDir;

/// In-memory metadata source that counts its lookups
#[derive(Default)]
pub struct FakeMetadata {
    records: HashMap<String, BookMetadata>,
    calls: AtomicUsize,
}

impl FakeMetadata {
    pub fn with(mut self, isbn: &str, title: &str, author: &str) -> Self {
        self.records.insert(
            isbn.to_string(),
            BookMetadata {
                title: title.to_string(),
                author: author.to_string(),
                isbn: isbn.to_string(),
            },
        );
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataProvider for FakeMetadata {
    async fn lookup(&self, isbn: &str) -> Option<BookMetadata> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.records.get(isbn).cloned()
    }
}

pub fn open_stores(dir: &TempDir) -> Stores {
    Stores::open(dir.path().join("library.json"), dir.path().join("members.json"))
}

pub fn services(dir: &TempDir, metadata: Arc<FakeMetadata>) -> Services {
    Services::new(open_stores(dir), metadata)
}

/// Serve the API on an ephemeral port and return its base URL
pub async fn spawn_app(dir: &TempDir, metadata: Arc<FakeMetadata>) -> String {
    let state = AppState::new(AppConfig::default(), services(dir, metadata));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("No local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test server failed");
    });

    format!("http://{}", addr)
}
