//! Client-side history engine.
//!
//! Turns a range selection (preset, custom picker, or shared link) into a
//! sequenced fetch request and reduces the fetched records into a
//! [`Summary`]. The engine does no I/O: callers run the returned
//! [`FetchRequest`] and hand the response back to
//! [`RangeSummaryEngine::complete`].
pub use error::EngineError;
pub use history::{FetchOutcome, FetchRequest, RangeSummaryEngine};
pub use money::MoneyCents;
pub use picker::{MonthGrid, Picker, Selection};
pub use range::{DateRange, PRESETS, Preset, active_preset};
pub use summary::{CategoryBreakdown, CategoryTotal, Summary, UNCATEGORIZED, category_key};

pub mod link;

mod error;
mod history;
mod money;
mod picker;
mod range;
mod summary;

type ResultEngine<T> = Result<T, EngineError>;
