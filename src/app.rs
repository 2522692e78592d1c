use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::info;

use crate::audio::{Audio, Loop};
use crate::game::Game;
use crate::input::{HeldKeys, Tap};

pub struct App {
    pub should_quit: bool,
    pub game: Game,
    pub keys: HeldKeys,
    hyperspace_key: Tap,
    audio: Box<dyn Audio>,
}

impl App {
    pub fn new(game: Game, audio: Box<dyn Audio>) -> Self {
        Self {
            should_quit: false,
            game,
            keys: HeldKeys::new(),
            hyperspace_key: Tap::default(),
            audio,
        }
    }

    /// One frame: apply held keys, step the simulation, play what it produced.
    pub fn on_tick(&mut self) {
        self.game.steer(self.keys.controls());
        self.game.step();
        self.keys.tick();
        self.hyperspace_key.tick();

        for cue in self.game.drain_cues() {
            self.audio.play(cue);
        }
        self.audio.set_loop(Loop::Thrust, self.game.thrust_active());
        self.audio.set_loop(Loop::Saucer, self.game.saucer_active());
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        // Ctrl+C always quits
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if self.keys.handle(key) {
            return;
        }
        if key.kind == KeyEventKind::Release {
            return;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => {
                info!("quit requested");
                self.should_quit = true;
            }
            KeyCode::Char('h') | KeyCode::Char('H') => {
                let fallback = !self.keys.reports_releases();
                if self.hyperspace_key.accept(key.kind, fallback) {
                    self.game.hyperspace();
                }
            }
            KeyCode::Enter => {
                if self.game.is_over() {
                    self.keys.clear();
                    self.game.restart();
                }
            }
            _ => {}
        }
    }

    /// Silence the loops and save the high score before exit.
    pub fn shutdown(&mut self) {
        self.audio.set_loop(Loop::Thrust, false);
        self.audio.set_loop(Loop::Saucer, false);
        self.game.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Cue, STARTING_LIVES};
    use crate::scores::ScoreStore;
    use crossterm::event::KeyEventState;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Recorder {
        cues: Rc<RefCell<Vec<Cue>>>,
        loops: Rc<RefCell<Vec<(Loop, bool)>>>,
    }

    impl Audio for Recorder {
        fn play(&mut self, cue: Cue) {
            self.cues.borrow_mut().push(cue);
        }

        fn set_loop(&mut self, sound: Loop, on: bool) {
            self.loops.borrow_mut().push((sound, on));
        }
    }

    struct NoStore;

    impl ScoreStore for NoStore {
        fn load(&self) -> u32 {
            0
        }

        fn save(&mut self, _score: u32) {}
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn release(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        }
    }

    fn app_with(recorder: Recorder) -> App {
        let game = Game::new(StdRng::seed_from_u64(11), Box::new(NoStore));
        App::new(game, Box::new(recorder))
    }

    #[test]
    fn test_quit_keys() {
        for key in [
            press(KeyCode::Esc),
            press(KeyCode::Char('q')),
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        ] {
            let mut app = app_with(Recorder::default());
            app.on_key(key);
            assert!(app.should_quit);
        }
    }

    #[test]
    fn test_fire_plays_cue() {
        let recorder = Recorder::default();
        let cues = recorder.cues.clone();
        let mut app = app_with(recorder);

        app.on_key(press(KeyCode::Char(' ')));
        app.on_tick();

        assert!(cues.borrow().contains(&Cue::Fire));
        assert!(!app.game.bullets.is_empty());
    }

    #[test]
    fn test_thrust_loop_follows_key() {
        let recorder = Recorder::default();
        let loops = recorder.loops.clone();
        let mut app = app_with(recorder);

        app.on_key(press(KeyCode::Up));
        app.on_tick();
        assert!(loops.borrow().contains(&(Loop::Thrust, true)));

        app.on_key(release(KeyCode::Up));
        app.on_tick();
        let last = loops.borrow().iter().rev().find(|(l, _)| *l == Loop::Thrust).copied();
        assert_eq!(last, Some((Loop::Thrust, false)));
    }

    #[test]
    fn test_hyperspace_key() {
        let recorder = Recorder::default();
        let cues = recorder.cues.clone();
        let mut app = app_with(recorder);
        app.on_key(press(KeyCode::Char('h')));
        app.on_tick();
        assert!(cues.borrow().contains(&Cue::Hyperspace));
    }

    #[test]
    fn test_held_hyperspace_key_jumps_once() {
        let recorder = Recorder::default();
        let cues = recorder.cues.clone();
        let mut app = app_with(recorder);
        // No releases reported: auto-repeat shows up as presses
        for _ in 0..10 {
            app.on_key(press(KeyCode::Char('h')));
            app.on_tick();
            app.on_tick();
        }
        let jumps = cues.borrow().iter().filter(|&&c| c == Cue::Hyperspace).count();
        assert_eq!(jumps, 1);
    }

    #[test]
    fn test_enter_restarts_only_after_game_over() {
        let mut app = app_with(Recorder::default());
        app.game.score = 120;
        app.on_key(press(KeyCode::Enter));
        assert_eq!(app.game.score, 120);

        app.game.ship.lives = 1;
        app.game.ship_destroyed();
        assert!(app.game.is_over());
        app.on_key(press(KeyCode::Enter));
        assert!(!app.game.is_over());
        assert_eq!(app.game.score, 0);
        assert_eq!(app.game.ship.lives, STARTING_LIVES);
    }
}
