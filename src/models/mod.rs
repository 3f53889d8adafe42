//! Job shop domain models.
//!
//! Provides the data types describing a problem ([`Instance`]) and a
//! decoded solution ([`Schedule`]).
//!
//! # Domain Mappings
//!
//! | u-jobshop | Manufacturing | Computing |
//! |-----------|---------------|-----------|
//! | Job | Order / Part routing | Pipeline |
//! | Operation | Process step | Stage |
//! | Machine | Work center | Worker / Device |
//! | Schedule | Production plan | Execution plan |

mod instance;
mod schedule;

pub use instance::{Instance, Operation};
pub use schedule::{Schedule, ScheduledOperation};
