pub mod audit;
pub mod context;
pub mod logging;
pub mod render;
pub mod utils;

pub use context::RequestContext;
