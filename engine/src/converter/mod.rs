mod handle;
mod service;
mod view;

pub use handle::ConverterHandle;
pub use service::ConverterService;
pub use view::{ConverterEvent, ConverterView};
