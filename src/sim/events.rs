//! Outbound game events
//!
//! The update step never calls collaborators directly; it appends to the
//! state's event outbox and the frame driver dispatches after the tick.

use serde::Serialize;

use crate::audio::SoundEffect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameEvent {
    /// A normal target entered the field (`spawn_index` is 1-based, cumulative)
    TargetSpawned { spawn_index: u32 },
    /// A boss entered the field
    BossSpawned { spawn_index: u32, hp: u32 },
    /// A normal target was destroyed
    TargetDestroyed { kills: u32 },
    /// A boss took a hit and survived or died on it
    BossHit { hp: u32, max_hp: u32 },
    /// A boss reached 0 hp
    BossDestroyed { kills: u32 },
}

impl GameEvent {
    /// Sound triggered by this event, if any
    pub fn sound(&self) -> Option<SoundEffect> {
        match self {
            GameEvent::TargetDestroyed { .. } | GameEvent::BossDestroyed { .. } => {
                Some(SoundEffect::Pop)
            }
            GameEvent::BossHit { .. } => Some(SoundEffect::BossHit),
            GameEvent::TargetSpawned { .. } | GameEvent::BossSpawned { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sound_mapping() {
        assert_eq!(
            GameEvent::TargetDestroyed { kills: 1 }.sound(),
            Some(SoundEffect::Pop)
        );
        assert_eq!(
            GameEvent::BossHit { hp: 29, max_hp: 30 }.sound(),
            Some(SoundEffect::BossHit)
        );
        assert_eq!(GameEvent::TargetSpawned { spawn_index: 3 }.sound(), None);
    }
}
