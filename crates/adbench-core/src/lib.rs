#![deny(missing_docs)]
#![doc = "Result records, condition keys and the shared error surface for adbench."]

pub mod errors;
mod key;
mod record;

pub use errors::{BenchError, ErrorInfo, ErrorKind};
pub use key::{ConditionKey, ConditionNumber, ConditionValue};
pub use record::ResultRecord;
