use crate::core::domain::Identifiable;
use crate::core::library::LibraryResult;

// Repository abstracts the in-memory tables owned by the circulation state. Callers
// serialize access through the engine lock, so implementations need no locking.
pub trait Repository<Entity: Identifiable>: Sync + Send {
    // allocates the identity for the next record
    fn next_id(&mut self) -> String;

    // create an entity
    fn create(&mut self, entity: &Entity) -> LibraryResult<usize>;

    // updates an entity
    fn update(&mut self, entity: &Entity) -> LibraryResult<usize>;

    // get an entity
    fn get(&self, id: &str) -> Option<Entity>;

    // delete an entity
    fn delete(&mut self, id: &str) -> LibraryResult<usize>;

    // all entities ordered by identity
    fn list(&self) -> Vec<Entity>;
}

// IdSequence hands out identities such as `B00001`, `M00042`.
#[derive(Debug, Clone)]
pub struct IdSequence {
    prefix: char,
    last: u32,
}

impl IdSequence {
    pub fn new(prefix: char) -> Self {
        IdSequence { prefix, last: 0 }
    }

    pub fn next_id(&mut self) -> String {
        self.last += 1;
        format!("{}{:05}", self.prefix, self.last)
    }
}

#[cfg(test)]
mod tests {
    use crate::core::repository::IdSequence;

    #[tokio::test]
    async fn test_should_allocate_padded_ids() {
        let mut seq = IdSequence::new('B');
        assert_eq!("B00001", seq.next_id());
        assert_eq!("B00002", seq.next_id());
    }
}
