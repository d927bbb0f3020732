//! Simulation module
//!
//! All gameplay logic lives here:
//! - One tick per frame, wall-clock ms only for spawn and fire gates
//! - Randomness only through an injected `Random`
//! - Side effects only through the `GameEvent` outbox
//! - No rendering or platform dependencies

pub mod collision;
pub mod events;
pub mod rng;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{projectile_hits, resolve_collisions};
pub use events::GameEvent;
pub use rng::{Random, ReplayRandom, seeded};
pub use state::{
    BossStatus, HitOutcome, Particle, ParticleKind, Projectile, Rgb, ShootingStar, SimState,
    Spaceship, SpawnTimers, Star, Target,
};
pub use tick::tick;
