//! Compilers from the abstract query model to native documents.

mod projection;
pub use projection::{build_projection, Projection};

mod sort;
pub use sort::build_sort;

mod update;
pub use update::parse_update_data;

mod where_clause;
pub use where_clause::{build_where, has_near_filter};
