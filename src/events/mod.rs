pub mod bus;
pub mod event;

pub use bus::{EventBus, EventHandler, SubscriptionId, WildcardHandler};
pub use event::KanbanEvent;
