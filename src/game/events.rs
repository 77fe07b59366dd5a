use bevy::math::DVec2;
use bevy::prelude::*;

use super::parts::weapon::WeaponSlot;

/// Why the game restarted from scratch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResetReason {
    /// Enemy projectiles brought HP to zero.
    ShotDown,
    EnemyCollision,
    MeteorCollision,
    /// The last level was completed.
    CampaignComplete,
    /// Requested from outside (menu "new game").
    NewGame,
}

/// Everything noteworthy that happened during a tick, handed to the engine layer.
#[derive(Message, Debug, Clone, PartialEq)]
pub enum GameEvent {
    MeteorDestroyed {
        position: DVec2,
    },
    EnemyDestroyed {
        position: DVec2,
    },
    ItemCollected {
        item: String,
    },
    PlayerHit {
        damage: f64,
        hp: f64,
    },
    WeaponFired {
        slot: WeaponSlot,
        weapon: String,
        ammo_left: u32,
    },
    WaveAdvanced {
        wave: usize,
    },
    StageAdvanced {
        stage: usize,
    },
    LevelAdvanced {
        level: usize,
    },
    Reset {
        reason: ResetReason,
        score: u32,
    },
}
