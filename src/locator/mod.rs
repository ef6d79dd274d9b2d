pub mod parser;
pub mod projector;
pub mod resolver;

pub use parser::{DescriptorParser, LocationDescriptor};
pub use projector::ResolvedPosition;
