mod footer;
mod health;
mod http_utils;
mod subscriptions;

pub use footer::*;
pub use health::*;
pub use http_utils::*;
pub use subscriptions::*;
