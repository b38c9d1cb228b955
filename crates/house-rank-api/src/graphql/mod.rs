pub mod mutations;
pub mod queries;
pub mod types;
pub mod zillow_types;


pub use mutations::*;
pub use queries::*;
pub use types::*;
pub use zillow_types::*;
