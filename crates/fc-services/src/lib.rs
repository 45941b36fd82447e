//! # fc-services
//!
//! Repositories over the [`KvStore`](fc_core::traits::KvStore) port, the
//! notification center and the [`Fleet`] facade that ties them together.

mod collection;
pub mod components;
pub mod fixtures;
pub mod fleet;
pub mod jobs;
pub mod notifications;
pub mod ships;

pub use components::ComponentRepo;
pub use fleet::Fleet;
pub use jobs::JobRepo;
pub use notifications::{NotificationCenter, Subscriber, SubscriptionId};
pub use ships::ShipRepo;
