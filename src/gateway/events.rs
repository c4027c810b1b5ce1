use async_trait::async_trait;
use crate::core::events::DomainEvent;
use crate::core::library::LibraryError;

// EventPublisher is the notifier sink for due-soon, overdue and reservation-ready events.
#[async_trait]
pub trait EventPublisher: Sync + Send {
    async fn publish(&self, event: &DomainEvent) -> Result<(), LibraryError>;
}
