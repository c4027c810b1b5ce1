use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};
use async_trait::async_trait;
use crate::core::events::{DomainEvent, DomainEventType};
use crate::core::library::LibraryError;
use crate::gateway::events::EventPublisher;

// MemoryPublisher records every notification it receives. Clones share the same record,
// so a caller can keep one handle and hand another to the engine.
#[derive(Debug, Clone, Default)]
pub struct MemoryPublisher {
    events: Arc<Mutex<Vec<DomainEvent>>>,
    failing: Arc<AtomicBool>,
}

impl MemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DomainEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn events_of(&self, kind: DomainEventType) -> Vec<DomainEvent> {
        self.events().into_iter().filter(|e| e.kind == kind).collect()
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }

    // makes every following publish fail until switched back
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl EventPublisher for MemoryPublisher {
    async fn publish(&self, event: &DomainEvent) -> Result<(), LibraryError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(LibraryError::runtime(
                format!("notifier unavailable for {}", event.name).as_str(), Some("UNAVAILABLE".to_string())));
        }
        let mut events = self.events.lock().map_err(|err| LibraryError::runtime(
            format!("notifier lock poisoned {}", err).as_str(), None))?;
        events.push(event.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use crate::core::events::{DomainEvent, DomainEventType};
    use crate::core::library::LibraryError;
    use crate::gateway::events::EventPublisher;
    use crate::gateway::memory::publisher::MemoryPublisher;
    use crate::loans::domain::model::LoanEntity;

    #[tokio::test]
    async fn test_should_record_events() {
        let now = Utc::now().naive_utc();
        let publisher = MemoryPublisher::new();
        let observer = publisher.clone();
        let loan = LoanEntity::new("L00001", "M00001", "B00001", now, now + Duration::days(1));
        publisher.publish(&DomainEvent::due_soon(&loan, now).expect("build event")).await.expect("should publish");
        publisher.publish(&DomainEvent::overdue(&loan, now).expect("build event")).await.expect("should publish");

        assert_eq!(2, observer.events().len());
        assert_eq!(1, observer.events_of(DomainEventType::Overdue).len());
        observer.clear();
        assert!(publisher.events().is_empty());
    }

    #[tokio::test]
    async fn test_should_fail_when_unavailable() {
        let now = Utc::now().naive_utc();
        let publisher = MemoryPublisher::new();
        let loan = LoanEntity::new("L00001", "M00001", "B00001", now, now);
        publisher.set_failing(true);
        let res = publisher.publish(&DomainEvent::overdue(&loan, now).expect("build event")).await;
        assert!(matches!(res, Err(LibraryError::Runtime{ .. })));
        assert!(publisher.events().is_empty());
    }
}
