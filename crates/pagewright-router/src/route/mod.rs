pub mod parser;
pub mod pattern;
pub mod specificity;

pub use parser::RouteTemplate;
pub use pattern::{classify_segment, PathSegment};
pub use specificity::{SegmentRank, SpecificityScore};
