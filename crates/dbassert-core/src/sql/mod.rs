mod qualified;
mod quote;
mod segment;
mod simple;

pub use qualified::{
    is_valid_qualified_name, parse_qualified_name, Fold, QualifiedName, MAX_IDENTIFIER_LEN,
};
pub use quote::{is_keyword, PgQuoter, Quoter};
pub use segment::Segment;
pub use simple::{is_valid_simple_name, parse_simple_name};
