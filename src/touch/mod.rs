pub mod dispatch;
pub mod edges;
pub mod router;

pub use dispatch::Dispatcher;
pub use router::Router;
