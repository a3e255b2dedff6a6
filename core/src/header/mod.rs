pub mod entry;
pub mod parser;

pub use entry::{Header, HeaderEntry, HeaderValue};
pub use parser::{auto_type, HeaderParser};
