use tokio::sync::watch;

/// Single-value holder that notifies subscribers on every write.
///
/// Holds at most one value and keeps no history: a subscriber only ever sees
/// the latest value. Clearing an already-empty slot does not notify.
#[derive(Debug)]
pub struct Slot<T> {
    tx: watch::Sender<Option<T>>,
}

impl<T: Clone> Slot<T> {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx }
    }

    pub fn set(&self, value: T) {
        self.tx.send_replace(Some(value));
    }

    pub fn clear(&self) {
        self.tx.send_if_modified(|current| current.take().is_some());
    }

    pub fn get(&self) -> Option<T> {
        self.tx.borrow().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.tx.borrow().is_none()
    }

    /// The receiver starts with the current value marked as seen.
    pub fn subscribe(&self) -> watch::Receiver<Option<T>> {
        self.tx.subscribe()
    }
}

impl<T: Clone> Default for Slot<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let slot: Slot<u32> = Slot::new();
        assert!(slot.is_empty());
        assert_eq!(slot.get(), None);
    }

    #[test]
    fn set_overwrites_previous_value() {
        let slot = Slot::new();
        slot.set("first");
        slot.set("second");
        assert_eq!(slot.get(), Some("second"));
    }

    #[tokio::test]
    async fn subscriber_is_notified_of_set() {
        let slot = Slot::new();
        let mut rx = slot.subscribe();

        slot.set(7);

        rx.changed().await.expect("sender alive");
        assert_eq!(*rx.borrow_and_update(), Some(7));
    }

    #[test]
    fn clear_on_empty_slot_does_not_notify() {
        let slot: Slot<u32> = Slot::new();
        let rx = slot.subscribe();

        slot.clear();

        assert!(!rx.has_changed().expect("sender alive"));
    }

    #[test]
    fn clear_notifies_when_value_present() {
        let slot = Slot::new();
        let mut rx = slot.subscribe();
        slot.set(1);
        rx.borrow_and_update();

        slot.clear();

        assert!(rx.has_changed().expect("sender alive"));
        assert_eq!(*rx.borrow_and_update(), None);
    }
}
