//! Player input buttons and per-frame change tracking
//!
//! [`InputTracker::poll`] reads every player's button mask once per frame
//! and reports what changed since the previous frame:
//!
//! ```ignore
//! let key = tracker.on_buttons(|event| {
//!     if event.pressed.contains(InputButtons::USE) {
//!         tracing::info!("slot {} pressed E", event.slot);
//!     }
//! });
//! ```

use bitflags::bitflags;
use cs2kit_sdk::layout::MAX_PLAYERS;
use slotmap::{new_key_type, SlotMap};

use crate::entities::EntityDirectory;

bitflags! {
    /// In-game input buttons (`CInButtonState` bit values)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct InputButtons: u64 {
        const ATTACK = 1 << 0;
        const JUMP = 1 << 1;
        const DUCK = 1 << 2;
        const FORWARD = 1 << 3;
        const BACK = 1 << 4;
        const USE = 1 << 5;
        const TURN_LEFT = 1 << 7;
        const TURN_RIGHT = 1 << 8;
        const MOVE_LEFT = 1 << 9;
        const MOVE_RIGHT = 1 << 10;
        const ATTACK2 = 1 << 11;
        const RELOAD = 1 << 13;
        const SPEED = 1 << 16;
        const SCORE = 1 << 33;
        const ZOOM = 1 << 34;
        const LOOK_AT_WEAPON = 1 << 35;
    }
}

/// Button changes of one player between two frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonEvent {
    pub slot: usize,
    /// Down now, up last frame
    pub pressed: InputButtons,
    /// Up now, down last frame
    pub released: InputButtons,
    /// Everything down now
    pub held: InputButtons,
}

new_key_type! {
    /// Key for registered button listeners, used for removal
    pub struct ListenerKey;
}

type ButtonCallback = Box<dyn FnMut(&ButtonEvent) + Send>;

/// Per-slot button state with change listeners
pub struct InputTracker {
    previous: [InputButtons; MAX_PLAYERS],
    listeners: SlotMap<ListenerKey, ButtonCallback>,
}

impl Default for InputTracker {
    fn default() -> Self {
        Self {
            previous: [InputButtons::empty(); MAX_PLAYERS],
            listeners: SlotMap::with_key(),
        }
    }
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for button changes
    pub fn on_buttons<F>(&mut self, callback: F) -> ListenerKey
    where
        F: FnMut(&ButtonEvent) + Send + 'static,
    {
        self.listeners.insert(Box::new(callback))
    }

    /// Remove a listener by its key
    ///
    /// Returns `true` if the listener was found and removed.
    pub fn remove_listener(&mut self, key: ListenerKey) -> bool {
        self.listeners.remove(key).is_some()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Buttons seen for `slot` on the last update
    pub fn buttons(&self, slot: usize) -> InputButtons {
        self.previous.get(slot).copied().unwrap_or_default()
    }

    /// Forget the state of `slot`, e.g. when its player disconnects
    pub fn reset_slot(&mut self, slot: usize) {
        if let Some(previous) = self.previous.get_mut(slot) {
            *previous = InputButtons::empty();
        }
    }

    /// Read every player's buttons and dispatch the changes
    ///
    /// The dispatched events are also returned, in slot order.
    pub fn poll(&mut self, entities: &EntityDirectory) -> Vec<ButtonEvent> {
        let mut events = Vec::new();
        for slot in 0..MAX_PLAYERS {
            if !entities.is_player_slot_valid(slot) {
                self.reset_slot(slot);
                continue;
            }
            let now = InputButtons::from_bits_retain(entities.player_buttons(slot));
            events.extend(self.update(slot, now));
        }
        events
    }

    /// Record `now` for `slot`, returning and dispatching the change if any
    pub fn update(&mut self, slot: usize, now: InputButtons) -> Option<ButtonEvent> {
        let previous = self.previous.get_mut(slot)?;
        let before = std::mem::replace(previous, now);

        let event = ButtonEvent {
            slot,
            pressed: now & !before,
            released: before & !now,
            held: now,
        };

        if event.pressed.is_empty() && event.released.is_empty() {
            return None;
        }

        tracing::trace!(
            "slot {} buttons: pressed={:?} released={:?}",
            slot,
            event.pressed,
            event.released
        );

        for callback in self.listeners.values_mut() {
            callback(&event);
        }

        Some(event)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::entities::system::testing::FakeWorld;

    #[test]
    fn test_button_values() {
        assert_eq!(InputButtons::ATTACK.bits(), 0x1);
        assert_eq!(InputButtons::USE.bits(), 0x20);
        assert_eq!(InputButtons::RELOAD.bits(), 0x2000);
        assert_eq!(InputButtons::SPEED.bits(), 0x10000);
        assert_eq!(InputButtons::SCORE.bits(), 0x2_0000_0000);
        assert_eq!(InputButtons::LOOK_AT_WEAPON.bits(), 0x8_0000_0000);
    }

    #[test]
    fn test_unknown_bits_are_kept() {
        let buttons = InputButtons::from_bits_retain(0x1 | 0x40);
        assert!(buttons.contains(InputButtons::ATTACK));
        assert_eq!(buttons.bits(), 0x41);
    }

    #[test]
    fn test_pressed_and_released() {
        let mut tracker = InputTracker::new();

        let event = tracker.update(0, InputButtons::JUMP | InputButtons::USE).unwrap();
        assert_eq!(event.pressed, InputButtons::JUMP | InputButtons::USE);
        assert!(event.released.is_empty());

        let event = tracker.update(0, InputButtons::USE | InputButtons::DUCK).unwrap();
        assert_eq!(event.pressed, InputButtons::DUCK);
        assert_eq!(event.released, InputButtons::JUMP);
        assert_eq!(event.held, InputButtons::USE | InputButtons::DUCK);

        assert!(tracker.update(0, InputButtons::USE | InputButtons::DUCK).is_none());
        assert!(tracker.update(MAX_PLAYERS, InputButtons::USE).is_none());
    }

    #[test]
    fn test_listeners() {
        let mut tracker = InputTracker::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        let key = tracker.on_buttons(move |event| sink.lock().unwrap().push(event.slot));

        tracker.update(4, InputButtons::ATTACK);
        tracker.update(4, InputButtons::ATTACK);
        tracker.update(7, InputButtons::RELOAD);
        assert_eq!(*seen.lock().unwrap(), vec![4, 7]);

        assert!(tracker.remove_listener(key));
        assert!(!tracker.remove_listener(key));
        tracker.update(4, InputButtons::empty());
        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_reset_slot() {
        let mut tracker = InputTracker::new();
        tracker.update(1, InputButtons::USE);
        tracker.reset_slot(1);
        assert!(tracker.buttons(1).is_empty());

        let event = tracker.update(1, InputButtons::USE).unwrap();
        assert_eq!(event.pressed, InputButtons::USE);
    }

    #[test]
    fn test_poll_reads_valid_slots() {
        let mut world = FakeWorld::new();
        world.add_player(0, 80, Some(InputButtons::FORWARD.bits()));
        world.add_player(5, 81, Some(0));
        let entities = world.directory();

        let mut tracker = InputTracker::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        tracker.on_buttons(move |event| sink.lock().unwrap().push(*event));

        let returned = tracker.poll(&entities);

        let events = seen.lock().unwrap();
        assert_eq!(*events, returned);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].slot, 0);
        assert_eq!(events[0].pressed, InputButtons::FORWARD);
        assert_eq!(tracker.buttons(0), InputButtons::FORWARD);
    }
}
