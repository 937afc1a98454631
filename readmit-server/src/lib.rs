pub mod http;
pub mod model_loader;
pub mod page;
