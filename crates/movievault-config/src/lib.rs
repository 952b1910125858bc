pub mod config;
pub mod credentials;
pub mod paths;

pub use config::{Config, LoggingConfig, OmdbConfig, StoreConfig, default_omdb_base_url};
pub use credentials::CredentialStore;
pub use paths::{PathManager, container_base_path};
