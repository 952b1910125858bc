pub mod clock;
pub mod error;
pub mod import;
pub mod mapper;
pub mod profile;
pub mod sync;

pub use clock::{Clock, SystemClock};
pub use error::EngineError;
pub use import::{search_candidates, ImportPipeline};
pub use mapper::{map_search_response, map_title_response, SearchOutcome, TitleDetails};
pub use profile::ProfileService;
pub use sync::{EngineState, EngineView, SyncEngine};
