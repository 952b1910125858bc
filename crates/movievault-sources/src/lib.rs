pub mod error;
pub mod factory;
pub mod local;
pub mod omdb;
pub mod subscription;
pub mod traits;

pub use error::{SearchError, StoreError};
pub use factory::{create_search_service, open_local_store};
pub use local::LocalStore;
pub use omdb::OmdbClient;
pub use subscription::SubscriptionHandle;
pub use traits::{AuthProfile, RemoteStore, SearchService, SnapshotListener, StoredDocument, SubscriptionEvent};
