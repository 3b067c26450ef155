mod ast;
mod builder;
mod dates;
mod lexer;
mod parser;

pub use ast::*;
pub use builder::{build_filter, build_query_filter};
pub use dates::{DateFilter, translate_date, year_partition};
pub use lexer::{FieldToken, Scan, scan};
pub use parser::{ParsedQuery, StructuredFilters, parse_query, parse_query_at};
