//! Business logic services

pub mod catalog;
pub mod circulation;
pub mod loans;
pub mod members;
pub mod metadata;

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::repository::Stores;

/// Stores shared by every service; the mutex makes each operation the single
/// writer of both backing files while it runs
pub type SharedStores = Arc<Mutex<Stores>>;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub members: members::MembersService,
    pub loans: loans::LoansService,
}

impl Services {
    /// Create all services over the given stores
    pub fn new(stores: Stores, metadata: Arc<dyn metadata::MetadataProvider>) -> Self {
        let stores: SharedStores = Arc::new(Mutex::new(stores));
        Self {
            catalog: catalog::CatalogService::new(stores.clone(), metadata),
            members: members::MembersService::new(stores.clone()),
            loans: loans::LoansService::new(stores),
        }
    }
}
