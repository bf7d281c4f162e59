//! Service layer module
//!
//! Contains provider selection, the daily quota tracker and the request dispatcher

pub mod dispatcher;
pub mod quota;
pub mod selector;

pub use dispatcher::{Dispatcher, Generated};
pub use quota::{CallerId, Clock, ManualClock, QuotaTracker, SystemClock, UsageSnapshot};
pub use selector::{select_vendor, ProviderSelector};
