mod store;

pub use store::LocalStore;
