//! Value resolution: mappings + business record in, field values out.
//!
//! Resolution is a pure function of its inputs. Missing record data never
//! raises an error by itself; it becomes [`ResolvedValue::Absent`], and only
//! required fields that end up absent are reported.

pub mod error;
pub mod format;
pub mod resolver;
pub mod transforms;
pub mod value;

pub use error::{ResolveError, TransformError};
pub use resolver::resolve;
pub use transforms::{TransformArgs, TransformFn, TransformRegistry, reformat_date};
pub use value::{
    ImageRef, ResolvedValue, ResolvedValues, TableValue, decode_data_uri, format_plain_number,
};
