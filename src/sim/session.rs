//! A running game: world plus persistent progress
//!
//! The session owns both halves and is the only place where simulation
//! events turn into game data changes.

use thiserror::Error;

use super::object::PoolObjectType;
use super::state::{GameEvent, GamePhase, World};
use super::tick::{TickInput, tick};
use crate::persistence::SlotId;
use crate::pool::PoolError;
use crate::state::{GameDataManager, StateError};
use crate::tuning::{Tuning, TuningError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Tuning(#[from] TuningError),
    #[error(transparent)]
    Pool(#[from] PoolError<PoolObjectType>),
}

pub struct GameSession {
    pub world: World,
    pub manager: GameDataManager,
    max_lives: u32,
}

impl GameSession {
    /// Build a session whose saves follow `tuning.save`
    pub fn new(tuning: &Tuning) -> Result<Self, SessionError> {
        let manager = GameDataManager::from_config(&tuning.save);
        Self::with_manager(tuning, manager)
    }

    /// Build a session around an existing manager (observers already attached)
    pub fn with_manager(tuning: &Tuning, manager: GameDataManager) -> Result<Self, SessionError> {
        tuning.validate()?;
        let world = World::new(tuning)?;
        Ok(Self {
            world,
            manager,
            max_lives: tuning.player.max_lives,
        })
    }

    pub fn max_lives(&self) -> u32 {
        self.max_lives
    }

    pub fn phase(&self) -> GamePhase {
        self.world.phase
    }

    /// Load progress, start a fresh run and arm the spawner
    pub fn start(&mut self) {
        if !self.manager.is_initialized() {
            self.manager.init();
        }
        self.reset_run();
        self.world.start();
        log::info!("Session started with {} lives", self.max_lives);
    }

    /// One fixed step. Events are applied to the game data before returning.
    pub fn tick(&mut self, input: &TickInput, dt: f32) -> Vec<GameEvent> {
        let events = tick(&mut self.world, input, dt);
        for event in &events {
            self.apply(*event);
        }
        events
    }

    fn apply(&mut self, event: GameEvent) {
        let result = match event {
            GameEvent::EnemyIntercepted { score } => self.manager.modify(|data| data.add_score(score)),
            GameEvent::CoreHit => self.manager.modify(|data| {
                data.lose_life();
            }),
        };
        if let Err(err) = result {
            log::warn!("Dropped {event:?}: {err}");
            return;
        }

        if self.manager.data().is_some_and(|data| data.is_game_over()) && self.world.phase != GamePhase::GameOver {
            log::info!("Game over");
            self.world.phase = GamePhase::GameOver;
        }
    }

    /// Back to the start of a run without reloading anything
    pub fn restart(&mut self) {
        self.world.reset();
        self.reset_run();
        log::info!("Session restarted");
    }

    fn reset_run(&mut self) {
        let lives = self.max_lives;
        if let Err(err) = self.manager.modify(|data| data.reset_run(lives)) {
            log::warn!("Could not reset run: {err}");
        }
    }

    /// Persist progress on the way out
    pub fn shutdown(&mut self) -> Result<SlotId, StateError> {
        let slot = self.manager.force_save()?;
        log::info!("Saved progress to {}", slot.file_name());
        Ok(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::persistence::{SaveMode, SaveStore};
    use crate::sim::tick::late_update;
    use glam::Vec2;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn session(dir: &std::path::Path, mode: SaveMode) -> GameSession {
        let manager = GameDataManager::new(SaveStore::new(dir), mode);
        GameSession::with_manager(&Tuning::default(), manager).unwrap()
    }

    fn run(session: &mut GameSession, seconds: f32) -> Vec<GameEvent> {
        let steps = (seconds / SIM_DT).round() as usize;
        let mut events = Vec::new();
        for _ in 0..steps {
            events.extend(session.tick(&TickInput::default(), SIM_DT));
        }
        events
    }

    #[test]
    fn test_start_resets_run_but_keeps_progress() {
        let dir = tempfile::tempdir().unwrap();
        let store = SaveStore::new(dir.path());
        let mut saved = crate::state::GameData::new("Ada", 4, 900);
        saved.current_lives = 1;
        saved.high_score = 1200;
        store.save(SlotId::Checkpoint(2), &saved).unwrap();

        let mut session = session(dir.path(), SaveMode::Checkpoints);
        session.start();

        let data = session.manager.data().unwrap();
        assert_eq!(data.player_name, "Ada");
        assert_eq!(data.player_level, 4);
        assert_eq!(data.high_score, 1200);
        assert_eq!(data.player_score, 0);
        assert_eq!(data.current_lives, 3);
    }

    #[test]
    fn test_interception_scores() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path(), SaveMode::Checkpoints);
        session.start();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        session.manager.subscribe(move |data, _| sink.borrow_mut().push(data.player_score));

        session.world.spawn_enemy(0, Vec2::new(6.0, 0.0)).unwrap();
        run(&mut session, 1.0);

        assert_eq!(session.manager.data().unwrap().player_score, 10);
        assert_eq!(*seen.borrow(), vec![10]);
    }

    #[test]
    fn test_three_core_hits_end_the_game() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path(), SaveMode::Checkpoints);
        session.start();

        for x in [-0.2, 0.0, 0.2] {
            session.world.spawn_enemy(0, Vec2::new(x, 1.5)).unwrap();
        }
        let events = run(&mut session, 0.5);

        assert_eq!(events.iter().filter(|e| **e == GameEvent::CoreHit).count(), 3);
        assert_eq!(session.manager.data().unwrap().current_lives, 0);
        assert_eq!(session.phase(), GamePhase::GameOver);

        // Frozen until restarted
        let ticks = session.world.time_ticks;
        run(&mut session, 0.5);
        assert_eq!(session.world.time_ticks, ticks);
    }

    #[test]
    fn test_restart_clears_world_and_run() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path(), SaveMode::Checkpoints);
        session.start();

        session.world.spawn_enemy(0, Vec2::new(6.0, 0.0)).unwrap();
        run(&mut session, 1.0);
        for i in 0..5 {
            session.world.spawn_enemy(0, Vec2::new(0.0, 15.0 + i as f32)).unwrap();
        }
        late_update(&mut session.world);
        session.world.phase = GamePhase::GameOver;

        session.restart();

        for kind in PoolObjectType::ALL {
            assert_eq!(session.world.pool.active_count(kind), 0);
        }
        let data = session.manager.data().unwrap();
        assert_eq!(data.player_score, 0);
        assert_eq!(data.current_lives, 3);
        assert_eq!(data.high_score, 10);
        assert_eq!(session.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_autosave_writes_through_on_score() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path(), SaveMode::AutoSave);
        session.start();

        session.world.spawn_enemy(0, Vec2::new(6.0, 0.0)).unwrap();
        run(&mut session, 1.0);

        let on_disk = SaveStore::new(dir.path()).load(SlotId::AutoSave).unwrap().unwrap();
        assert_eq!(on_disk.player_score, 10);
    }

    #[test]
    fn test_hud_attached_before_start_sees_fresh_run() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path(), SaveMode::Checkpoints);
        let max_lives = session.max_lives();
        let (hud, _) = crate::ui::Hud::attach(&mut session.manager, max_lives);
        session.start();

        session.world.spawn_enemy(0, Vec2::new(6.0, 0.0)).unwrap();
        run(&mut session, 1.0);

        let hud = hud.borrow();
        assert_eq!(hud.score_text, "Score: 10");
        assert_eq!(hud.lives_shown(), 3);
    }

    #[test]
    fn test_shutdown_saves_new_checkpoint() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path(), SaveMode::Checkpoints);
        session.start();
        assert_eq!(session.shutdown().unwrap(), SlotId::Checkpoint(1));
        assert!(dir.path().join("GameData_checkpoint_1.json").exists());
    }

    #[test]
    fn test_invalid_tuning_rejected() {
        let mut tuning = Tuning::default();
        tuning.pools.retain(|entry| entry.key != PoolObjectType::DestructionEffect);
        let dir = tempfile::tempdir().unwrap();
        let manager = GameDataManager::new(SaveStore::new(dir.path()), SaveMode::Checkpoints);
        assert!(matches!(
            GameSession::with_manager(&tuning, manager),
            Err(SessionError::Tuning(_))
        ));
    }
}
