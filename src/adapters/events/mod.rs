//! Event bus adapters.
//!
//! - `InMemoryEventBus` - In-process publish/subscribe
//! - `PromotionNotifier` - Logs notification intents for promoted attendees

mod in_memory;
mod promotion_notifier;

pub use in_memory::InMemoryEventBus;
pub use promotion_notifier::PromotionNotifier;
