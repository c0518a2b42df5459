//! Shared tree state with snapshot subscriptions
//!
//! The store owns the current tree as an immutable [`Arc<Tree>`]. Writers
//! publish a whole new snapshot; readers and subscribers never see a tree
//! being edited.
//!
//! Swapping the snapshot and publishing it happen under the same write lock,
//! so subscribers receive snapshots in the order they became current.

use std::sync::mpsc;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tracing::{debug, trace};

use crate::core::TreeError;
use crate::tree::Tree;

/// Holds the current tree and notifies subscribers of new snapshots
#[derive(Debug, Default)]
pub struct TreeStore {
    current: RwLock<Arc<Tree>>,
    subscribers: Mutex<Vec<mpsc::Sender<Arc<Tree>>>>,
}

impl TreeStore {
    pub fn new(tree: Tree) -> Self {
        Self {
            current: RwLock::new(Arc::new(tree)),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// The current snapshot
    pub fn snapshot(&self) -> Arc<Tree> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Receive every snapshot published from now on
    pub fn subscribe(&self) -> mpsc::Receiver<Arc<Tree>> {
        let (tx, rx) = mpsc::channel();
        let mut subscribers = self.subscribers.lock().unwrap_or_else(PoisonError::into_inner);
        subscribers.push(tx);
        trace!(subscribers = subscribers.len(), "Subscribed");
        rx
    }

    /// Swap in `tree` and publish it; returns the number of subscribers reached
    pub fn replace(&self, tree: Tree) -> usize {
        let snapshot = Arc::new(tree);
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *current = Arc::clone(&snapshot);
        self.publish(snapshot)
    }

    /// Edit a copy of the current tree and publish it if `edit` succeeds
    ///
    /// On error the current snapshot is left as it was.
    pub fn update<F>(&self, edit: F) -> Result<Arc<Tree>, TreeError>
    where
        F: FnOnce(&mut Tree) -> Result<(), TreeError>,
    {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let mut tree = Tree::clone(&current);
        edit(&mut tree)?;
        let snapshot = Arc::new(tree);
        *current = Arc::clone(&snapshot);
        self.publish(Arc::clone(&snapshot));
        Ok(snapshot)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Send `snapshot` to every live subscriber
    ///
    /// Callers hold the write lock on `current`.
    fn publish(&self, snapshot: Arc<Tree>) -> usize {
        let mut subscribers = self.subscribers.lock().unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|tx| tx.send(Arc::clone(&snapshot)).is_ok());
        debug!(people = snapshot.len(), subscribers = subscribers.len(), "Published tree snapshot");
        subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Person;

    fn store() -> TreeStore {
        TreeStore::new(Tree::new(vec![Person::new("a")]).unwrap())
    }

    #[test]
    fn test_snapshot_is_shared_until_replaced() {
        let store = store();
        let before = store.snapshot();
        assert!(Arc::ptr_eq(&before, &store.snapshot()));

        store.replace(Tree::default());
        assert_eq!(before.len(), 1);
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn test_subscribers_receive_new_snapshots() {
        let store = store();
        let rx = store.subscribe();
        let reached = store.replace(Tree::new(vec![Person::new("b")]).unwrap());
        assert_eq!(reached, 1);
        assert!(rx.try_recv().unwrap().contains("b"));
    }

    #[test]
    fn test_dropped_subscribers_are_pruned() {
        let store = store();
        let kept = store.subscribe();
        drop(store.subscribe());
        assert_eq!(store.subscriber_count(), 2);
        store.replace(Tree::default());
        assert_eq!(store.subscriber_count(), 1);
        assert!(kept.try_recv().is_ok());
    }

    #[test]
    fn test_update_publishes_edited_copy() {
        let store = store();
        let rx = store.subscribe();
        let before = store.snapshot();
        let after = store.update(|tree| tree.push(Person::new("b"))).unwrap();
        assert_eq!(before.len(), 1);
        assert_eq!(after.len(), 2);
        assert!(Arc::ptr_eq(&rx.try_recv().unwrap(), &after));
    }

    #[test]
    fn test_concurrent_writers_publish_in_snapshot_order() {
        let store = Arc::new(store());
        let rx = store.subscribe();

        let writers: Vec<_> = (0..8)
            .map(|w| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for i in 0..50 {
                        if i % 2 == 0 {
                            store.replace(Tree::new(vec![Person::new(format!("w{}-{}", w, i))]).unwrap());
                        } else {
                            store
                                .update(|tree| tree.push(Person::new(format!("w{}-{}", w, i))))
                                .unwrap();
                        }
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        let received: Vec<Arc<Tree>> = rx.try_iter().collect();
        assert_eq!(received.len(), 8 * 50);
        let last = received.last().unwrap();
        assert!(Arc::ptr_eq(last, &store.snapshot()));
    }

    #[test]
    fn test_failed_update_keeps_snapshot() {
        let store = store();
        let rx = store.subscribe();
        let result = store.update(|tree| tree.push(Person::new("a")));
        assert!(matches!(result, Err(TreeError::DuplicatePersonId { .. })));
        assert_eq!(store.snapshot().len(), 1);
        assert!(rx.try_recv().is_err());
    }
}
