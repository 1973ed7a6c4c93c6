pub mod dispatcher;

pub use dispatcher::DispatchError;
pub use dispatcher::Dispatcher;
