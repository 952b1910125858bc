pub mod candidate;
pub mod document;
pub mod draft;
pub mod error;
pub mod field_update;
pub mod movie;
pub mod rating;
pub mod review;
pub mod session;
pub mod status;

pub use candidate::SearchCandidate;
pub use document::{fields, Document, DocumentPatch, FieldValue};
pub use draft::{MovieDraft, MoviePatch, MovieUpdate, NewMovie};
pub use error::{RecordError, ValidationError};
pub use field_update::FieldUpdate;
pub use movie::{MovieId, MovieRecord};
pub use rating::Rating;
pub use review::normalize_review;
pub use session::{Session, SessionId};
pub use status::MovieStatus;
