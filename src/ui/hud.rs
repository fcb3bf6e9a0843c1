//! Score and lives display

use std::cell::RefCell;
use std::rc::Rc;

use crate::state::{GameData, GameDataManager, SubscriptionId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hud {
    pub score_text: String,
    pub high_score_text: String,
    /// One entry per life icon; `true` while that life is still held
    pub life_icons: Vec<bool>,
}

impl Hud {
    pub fn new(max_lives: u32) -> Self {
        Self {
            score_text: "Score: 0".to_string(),
            high_score_text: "High Score: 0".to_string(),
            life_icons: vec![true; max_lives as usize],
        }
    }

    pub fn update(&mut self, data: &GameData) {
        self.score_text = format!("Score: {}", data.player_score);
        self.high_score_text = format!("High Score: {}", data.high_score);
        let lives = data.current_lives as usize;
        for (i, icon) in self.life_icons.iter_mut().enumerate() {
            *icon = i < lives;
        }
    }

    pub fn lives_shown(&self) -> usize {
        self.life_icons.iter().filter(|icon| **icon).count()
    }

    /// Subscribe a HUD to `manager`, seeded with the current record if any
    pub fn attach(manager: &mut GameDataManager, max_lives: u32) -> (Rc<RefCell<Hud>>, SubscriptionId) {
        let hud = Rc::new(RefCell::new(Hud::new(max_lives)));
        if let Some(data) = manager.data() {
            hud.borrow_mut().update(data);
        }
        let view = hud.clone();
        let id = manager.subscribe(move |data, _| view.borrow_mut().update(data));
        (hud, id)
    }
}
