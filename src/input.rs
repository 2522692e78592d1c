//! Held-key tracking. Rotation, thrust and fire act every frame while their
//! key is down, but many terminals only report presses. When no release has
//! ever been seen a key counts as held for a short window after its last
//! press or repeat.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::game::Controls;

/// Frames a key stays down after a press when releases are not reported.
/// Longer than the usual keyboard repeat delay so holding a key is smooth.
pub const HOLD_FRAMES: u32 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Held {
    RotateLeft,
    RotateRight,
    Thrust,
    Fire,
}

impl Held {
    pub fn from_code(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Left => Some(Held::RotateLeft),
            KeyCode::Right => Some(Held::RotateRight),
            KeyCode::Up => Some(Held::Thrust),
            KeyCode::Char(' ') => Some(Held::Fire),
            _ => None,
        }
    }

    fn slot(self) -> usize {
        match self {
            Held::RotateLeft => 0,
            Held::RotateRight => 1,
            Held::Thrust => 2,
            Held::Fire => 3,
        }
    }
}

#[derive(Debug, Default)]
pub struct HeldKeys {
    /// Frames left in each key's fallback hold window
    timers: [u32; 4],
    down: [bool; 4],
    releases_seen: bool,
}

impl HeldKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a key event. Returns true if the key is one this tracker owns.
    pub fn handle(&mut self, key: KeyEvent) -> bool {
        if key.kind == KeyEventKind::Release {
            self.releases_seen = true;
        }
        let Some(held) = Held::from_code(key.code) else {
            return false;
        };
        match key.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => self.press(held),
            KeyEventKind::Release => self.release(held),
        }
        true
    }

    /// True once the terminal has reported any key release.
    pub fn reports_releases(&self) -> bool {
        self.releases_seen
    }

    pub fn press(&mut self, held: Held) {
        let slot = held.slot();
        self.down[slot] = true;
        self.timers[slot] = HOLD_FRAMES;
    }

    pub fn release(&mut self, held: Held) {
        self.releases_seen = true;
        let slot = held.slot();
        self.down[slot] = false;
        self.timers[slot] = 0;
    }

    /// Advance one frame.
    pub fn tick(&mut self) {
        if self.releases_seen {
            return;
        }
        for (down, timer) in self.down.iter_mut().zip(self.timers.iter_mut()) {
            *timer = timer.saturating_sub(1);
            if *timer == 0 {
                *down = false;
            }
        }
    }

    pub fn is_down(&self, held: Held) -> bool {
        self.down[held.slot()]
    }

    pub fn controls(&self) -> Controls {
        Controls {
            rotate_left: self.is_down(Held::RotateLeft),
            rotate_right: self.is_down(Held::RotateRight),
            thrust: self.is_down(Held::Thrust),
            fire: self.is_down(Held::Fire),
        }
    }

    pub fn clear(&mut self) {
        self.down = [false; 4];
        self.timers = [0; 4];
    }
}

/// One-shot key that must not retrigger while held. Without release
/// reporting, auto-repeat arrives as fresh presses; those are swallowed until
/// the key has been quiet for [`HOLD_FRAMES`].
#[derive(Debug, Default)]
pub struct Tap {
    quiet: u32,
}

impl Tap {
    /// Whether a press should act. `repeats_as_presses` is the fallback mode.
    pub fn accept(&mut self, kind: KeyEventKind, repeats_as_presses: bool) -> bool {
        if kind != KeyEventKind::Press {
            return false;
        }
        if !repeats_as_presses {
            return true;
        }
        let fresh = self.quiet == 0;
        self.quiet = HOLD_FRAMES;
        fresh
    }

    pub fn tick(&mut self) {
        self.quiet = self.quiet.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, KeyModifiers};

    fn key(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_mapping() {
        assert_eq!(Held::from_code(KeyCode::Left), Some(Held::RotateLeft));
        assert_eq!(Held::from_code(KeyCode::Right), Some(Held::RotateRight));
        assert_eq!(Held::from_code(KeyCode::Up), Some(Held::Thrust));
        assert_eq!(Held::from_code(KeyCode::Char(' ')), Some(Held::Fire));
        assert_eq!(Held::from_code(KeyCode::Char('h')), None);
        assert_eq!(Held::from_code(KeyCode::Down), None);
    }

    #[test]
    fn test_release_clears() {
        let mut keys = HeldKeys::new();
        assert!(keys.handle(key(KeyCode::Up, KeyEventKind::Press)));
        for _ in 0..100 {
            keys.tick();
        }
        // Releases were never reported yet, so the window ran out
        assert!(!keys.controls().thrust);

        keys.handle(key(KeyCode::Up, KeyEventKind::Press));
        keys.handle(key(KeyCode::Up, KeyEventKind::Release));
        assert!(!keys.controls().thrust);

        // With releases reported a held key stays down indefinitely
        keys.handle(key(KeyCode::Up, KeyEventKind::Press));
        for _ in 0..100 {
            keys.tick();
        }
        assert!(keys.controls().thrust);
        keys.handle(key(KeyCode::Up, KeyEventKind::Release));
        assert!(!keys.controls().thrust);
    }

    #[test]
    fn test_hold_window_expires() {
        let mut keys = HeldKeys::new();
        keys.handle(key(KeyCode::Left, KeyEventKind::Press));
        for _ in 0..HOLD_FRAMES - 1 {
            keys.tick();
            assert!(keys.controls().rotate_left);
        }
        keys.tick();
        assert!(!keys.controls().rotate_left);
    }

    #[test]
    fn test_repeat_refreshes_window() {
        let mut keys = HeldKeys::new();
        keys.handle(key(KeyCode::Char(' '), KeyEventKind::Press));
        for _ in 0..3 {
            for _ in 0..HOLD_FRAMES - 1 {
                keys.tick();
            }
            keys.handle(key(KeyCode::Char(' '), KeyEventKind::Repeat));
        }
        assert!(keys.controls().fire);
    }

    #[test]
    fn test_unrelated_keys_ignored() {
        let mut keys = HeldKeys::new();
        assert!(!keys.handle(key(KeyCode::Enter, KeyEventKind::Press)));
        assert_eq!(keys.controls(), Controls::default());
    }

    #[test]
    fn test_any_release_switches_off_fallback() {
        let mut keys = HeldKeys::new();
        assert!(!keys.reports_releases());
        assert!(!keys.handle(key(KeyCode::Char('h'), KeyEventKind::Release)));
        assert!(keys.reports_releases());
    }

    #[test]
    fn test_tap_swallows_auto_repeat_presses() {
        let mut tap = Tap::default();
        assert!(tap.accept(KeyEventKind::Press, true));
        // Auto-repeat every couple of frames while the key is held
        for _ in 0..10 {
            tap.tick();
            tap.tick();
            assert!(!tap.accept(KeyEventKind::Press, true));
        }
        for _ in 0..HOLD_FRAMES {
            tap.tick();
        }
        assert!(tap.accept(KeyEventKind::Press, true));
    }

    #[test]
    fn test_tap_with_release_reporting() {
        let mut tap = Tap::default();
        assert!(tap.accept(KeyEventKind::Press, false));
        assert!(tap.accept(KeyEventKind::Press, false));
        assert!(!tap.accept(KeyEventKind::Repeat, false));
        assert!(!tap.accept(KeyEventKind::Release, false));
    }

    #[test]
    fn test_clear() {
        let mut keys = HeldKeys::new();
        keys.press(Held::Fire);
        keys.press(Held::RotateRight);
        keys.clear();
        assert_eq!(keys.controls(), Controls::default());
    }
}
