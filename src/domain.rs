mod subscriber_email;

pub use subscriber_email::{EmailShapeError, SubscriberEmail};
