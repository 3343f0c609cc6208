//! Entity stores: thread-safe CRUD plus predicate search over one entity kind.
//!
//! Each store owns one mutex guarding its map *and* its identity counter, so
//! assigning an identity and inserting the value happen as one step with
//! respect to every other operation on the same store. No lock is ever held
//! across a call into another store.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bookstore_core::{DomainError, DomainResult, Entity, EntityId, SearchCriteria};

/// The five store operations every entity kind supports.
pub trait EntityStore<T: Entity>: Send + Sync {
    /// Assign the next identity, insert, and return the stored copy.
    fn create(&self, value: T) -> DomainResult<T>;

    fn get(&self, id: EntityId) -> DomainResult<T>;

    /// Replace an existing value wholesale. Never inserts.
    fn update(&self, value: T) -> DomainResult<T>;

    /// Remove a value. The identity is not reclaimed.
    fn delete(&self, id: EntityId) -> DomainResult<()>;

    /// Every value matching all recognised filters, in no particular order.
    fn search(&self, criteria: &SearchCriteria) -> DomainResult<Vec<T>>;
}

impl<T, S> EntityStore<T> for Arc<S>
where
    T: Entity,
    S: EntityStore<T> + ?Sized,
{
    fn create(&self, value: T) -> DomainResult<T> {
        (**self).create(value)
    }

    fn get(&self, id: EntityId) -> DomainResult<T> {
        (**self).get(id)
    }

    fn update(&self, value: T) -> DomainResult<T> {
        (**self).update(value)
    }

    fn delete(&self, id: EntityId) -> DomainResult<()> {
        (**self).delete(id)
    }

    fn search(&self, criteria: &SearchCriteria) -> DomainResult<Vec<T>> {
        (**self).search(criteria)
    }
}

#[derive(Debug)]
struct StoreState<T> {
    items: HashMap<EntityId, T>,
    next_id: EntityId,
}

/// In-memory entity store.
#[derive(Debug)]
pub struct InMemoryEntityStore<T> {
    inner: Mutex<StoreState<T>>,
}

impl<T: Entity> InMemoryEntityStore<T> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(StoreState {
                items: HashMap::new(),
                next_id: EntityId::FIRST,
            }),
        }
    }

    /// Rebuild a store from previously stored entries.
    ///
    /// The map key is authoritative for each value's identity. The counter
    /// resumes after the largest key so identities are never handed out twice.
    pub fn from_entries(entries: BTreeMap<EntityId, T>) -> Self {
        Self::restore(entries, EntityId::FIRST)
    }

    /// Like `from_entries`, but never hands out an identity below `next_id`
    /// (identities of entries deleted before the snapshot was taken).
    pub fn restore(entries: BTreeMap<EntityId, T>, next_id: EntityId) -> Self {
        let after_max = entries
            .keys()
            .next_back()
            .map_or(EntityId::FIRST, |max| max.next());
        let next_id = next_id.max(after_max);

        let items = entries
            .into_iter()
            .map(|(id, mut value)| {
                value.set_id(id);
                (id, value)
            })
            .collect();

        Self {
            inner: Mutex::new(StoreState { items, next_id }),
        }
    }

    /// Copy of every entry, ordered by identity.
    pub fn entries(&self) -> BTreeMap<EntityId, T> {
        let state = self.lock();
        state
            .items
            .iter()
            .map(|(id, value)| (*id, value.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The identity the next successful `create` will assign.
    pub fn next_id(&self) -> EntityId {
        self.lock().next_id
    }

    // A panic while holding the lock cannot leave a half-written entry (every
    // mutation is a single map call), so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, StoreState<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Entity> Default for InMemoryEntityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> EntityStore<T> for InMemoryEntityStore<T> {
    fn create(&self, mut value: T) -> DomainResult<T> {
        let mut state = self.lock();

        let id = state.next_id;
        value.set_id(id);
        state.items.insert(id, value.clone());
        state.next_id = id.next();

        tracing::debug!(kind = T::KIND, %id, "entity created");
        Ok(value)
    }

    fn get(&self, id: EntityId) -> DomainResult<T> {
        let state = self.lock();
        state
            .items
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(T::KIND, id))
    }

    fn update(&self, value: T) -> DomainResult<T> {
        let mut state = self.lock();

        let id = value.id();
        match state.items.get_mut(&id) {
            Some(slot) => {
                *slot = value.clone();
                tracing::debug!(kind = T::KIND, %id, "entity updated");
                Ok(value)
            }
            None => Err(DomainError::not_found(T::KIND, id)),
        }
    }

    fn delete(&self, id: EntityId) -> DomainResult<()> {
        let mut state = self.lock();
        match state.items.remove(&id) {
            Some(_) => {
                tracing::debug!(kind = T::KIND, %id, "entity deleted");
                Ok(())
            }
            None => Err(DomainError::not_found(T::KIND, id)),
        }
    }

    fn search(&self, criteria: &SearchCriteria) -> DomainResult<Vec<T>> {
        // Scan under the lock: a search sees one consistent state of the map.
        let state = self.lock();
        let results = state
            .items
            .values()
            .filter(|value| criteria.matches(*value))
            .cloned()
            .collect();
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::thread;

    use bookstore_catalog::{Author, Book};

    fn store() -> InMemoryEntityStore<Book> {
        InMemoryEntityStore::new()
    }

    fn book(title: &str, price: f64) -> Book {
        Book::new(title, price, Author::new("Frank", "Herbert"))
    }

    #[test]
    fn create_assigns_sequential_ids_from_one() {
        let store = store();
        let a = store.create(book("Dune", 9.99)).unwrap();
        let b = store.create(book("Emma", 4.5)).unwrap();
        assert_eq!(a.id, EntityId::new(1));
        assert_eq!(b.id, EntityId::new(2));
        assert_eq!(store.get(a.id).unwrap(), a);
    }

    #[test]
    fn create_ignores_caller_supplied_id() {
        let store = store();
        let mut input = book("Dune", 9.99);
        input.id = EntityId::new(99);
        let created = store.create(input).unwrap();
        assert_eq!(created.id, EntityId::FIRST);
        assert!(store.get(EntityId::new(99)).is_err());
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let store = store();
        let a = store.create(book("Dune", 9.99)).unwrap();
        store.delete(a.id).unwrap();
        let b = store.create(book("Emma", 4.5)).unwrap();
        assert_eq!(b.id, EntityId::new(2));
    }

    #[test]
    fn get_update_delete_on_absent_id_fail_with_not_found() {
        let store = store();
        let missing = EntityId::new(5);

        assert_eq!(store.get(missing), Err(DomainError::not_found("book", missing)));
        assert!(store.delete(missing).unwrap_err().is_not_found());

        let mut ghost = book("Ghost", 1.0);
        ghost.id = missing;
        assert!(store.update(ghost).unwrap_err().is_not_found());
        assert!(store.is_empty(), "update must never insert");
    }

    #[test]
    fn deleted_entities_are_gone() {
        let store = store();
        let a = store.create(book("Dune", 9.99)).unwrap();
        store.delete(a.id).unwrap();
        assert!(store.get(a.id).unwrap_err().is_not_found());
        assert!(store.delete(a.id).unwrap_err().is_not_found());
    }

    #[test]
    fn update_replaces_wholesale() {
        let store = store();
        let created = store
            .create(book("Dune", 9.99).with_genres(["sci-fi"]))
            .unwrap();

        let mut replacement = book("Dune Messiah", 11.0);
        replacement.id = created.id;
        store.update(replacement.clone()).unwrap();

        let stored = store.get(created.id).unwrap();
        assert_eq!(stored, replacement);
        assert!(stored.genres.is_empty());
    }

    #[test]
    fn search_without_filters_returns_every_entity_once() {
        let store = store();
        for i in 0..10 {
            store.create(book(&format!("Book {i}"), 1.0)).unwrap();
        }
        store.delete(EntityId::new(3)).unwrap();

        let ids: Vec<_> = store
            .search(&SearchCriteria::all())
            .unwrap()
            .into_iter()
            .map(|b| b.id)
            .collect();
        let unique: BTreeSet<_> = ids.iter().copied().collect();
        assert_eq!(ids.len(), 9);
        assert_eq!(unique.len(), 9);
        assert!(!unique.contains(&EntityId::new(3)));
    }

    #[test]
    fn search_applies_all_filters() {
        let store = store();
        store.create(book("Dune", 9.99)).unwrap();
        store.create(book("Dune Messiah", 12.0)).unwrap();
        store.create(book("Emma", 9.99)).unwrap();

        let by_title = store
            .search(&SearchCriteria::all().with("title", "Dune"))
            .unwrap();
        assert_eq!(by_title.len(), 2);

        let both = store
            .search(&SearchCriteria::all().with("title", "Dune").with("price", 9.99))
            .unwrap();
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].title, "Dune");
    }

    #[test]
    fn concurrent_creates_get_distinct_gapless_ids() {
        let store = Arc::new(store());
        let threads = 8;
        let per_thread = 50;

        let handles: Vec<_> = (0..threads)
            .map(|t| {
                let store = store.clone();
                thread::spawn(move || {
                    (0..per_thread)
                        .map(|i| store.create(book(&format!("{t}-{i}"), 1.0)).unwrap().id)
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let ids: BTreeSet<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .map(EntityId::get)
            .collect();

        let n = (threads * per_thread) as u64;
        assert_eq!(ids, (1..=n).collect::<BTreeSet<_>>());
    }

    #[test]
    fn search_concurrent_with_writers_sees_whole_entities() {
        let store = Arc::new(store());
        let writer = {
            let store = store.clone();
            thread::spawn(move || {
                for i in 0..200 {
                    let b = store.create(book(&format!("Book {i}"), 1.0)).unwrap();
                    if i % 3 == 0 {
                        store.delete(b.id).unwrap();
                    }
                }
            })
        };

        for _ in 0..50 {
            for b in store.search(&SearchCriteria::all()).unwrap() {
                assert!(b.id.is_assigned());
                assert!(b.title.starts_with("Book "));
            }
        }
        writer.join().unwrap();
        assert_eq!(store.len(), 200 - 67);
    }

    #[test]
    fn from_entries_resumes_after_largest_id() {
        let mut entries = BTreeMap::new();
        entries.insert(EntityId::new(2), book("Dune", 1.0));
        entries.insert(EntityId::new(7), book("Emma", 1.0));
        let store = InMemoryEntityStore::from_entries(entries);

        assert_eq!(store.get(EntityId::new(7)).unwrap().id, EntityId::new(7));
        assert_eq!(store.next_id(), EntityId::new(8));
        assert_eq!(store.create(book("Ulysses", 1.0)).unwrap().id, EntityId::new(8));
    }

    #[test]
    fn restore_honours_a_higher_saved_counter() {
        let mut entries = BTreeMap::new();
        entries.insert(EntityId::new(2), book("Dune", 1.0));
        let store = InMemoryEntityStore::restore(entries.clone(), EntityId::new(10));
        assert_eq!(store.next_id(), EntityId::new(10));

        let store = InMemoryEntityStore::restore(entries, EntityId::UNASSIGNED);
        assert_eq!(store.next_id(), EntityId::new(3));
    }

    #[test]
    fn from_empty_entries_starts_at_one() {
        let store: InMemoryEntityStore<Book> = InMemoryEntityStore::from_entries(BTreeMap::new());
        assert_eq!(store.next_id(), EntityId::FIRST);
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Create,
            Delete(u64),
            Update(u64),
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                Just(Op::Create),
                (1u64..20).prop_map(Op::Delete),
                (1u64..20).prop_map(Op::Update),
            ]
        }

        proptest! {
            /// Property: the store behaves like a map with a never-decreasing
            /// counter: creates get the next id, update/delete succeed exactly
            /// when the id is live.
            #[test]
            fn store_matches_model(ops in prop::collection::vec(op(), 0..60)) {
                let store: InMemoryEntityStore<Book> = InMemoryEntityStore::new();
                let mut live = BTreeSet::new();
                let mut next = 1u64;

                for op in ops {
                    match op {
                        Op::Create => {
                            let created = store.create(book("x", 1.0)).unwrap();
                            prop_assert_eq!(created.id.get(), next);
                            live.insert(next);
                            next += 1;
                        }
                        Op::Delete(id) => {
                            let res = store.delete(EntityId::new(id));
                            prop_assert_eq!(res.is_ok(), live.remove(&id));
                        }
                        Op::Update(id) => {
                            let mut value = book("y", 2.0);
                            value.id = EntityId::new(id);
                            let res = store.update(value);
                            prop_assert_eq!(res.is_ok(), live.contains(&id));
                        }
                    }
                }

                prop_assert_eq!(store.len(), live.len());
            }
        }
    }
}
