//! Movement helpers shared across templates
//!
//! Small pure building blocks: staggered pursuit convergence, carrier
//! weave paths, line surges, and the deterministic loose-ball jitter.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::engine::coordinates::{clamp_pos, lateral_yards, yards};
use crate::engine::easing::{ease_in_out_quad, ease_out_cubic, lerp_pos, window};
use crate::models::entity::{AnimState, EntityState, FieldPos};

/// Move every entity toward `target` with a per-slot sprint stagger, the
/// later slots leaving later. `standoff_yards` keeps pursuers from
/// stacking on the exact target point by fanning them out around it.
pub fn staggered_pursuit(
    start: &[EntityState],
    target: FieldPos,
    t: f32,
    standoff_yards: f32,
) -> Vec<EntityState> {
    start
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let stagger = (i % 4) as f32 * 0.08;
            let local = window(t, stagger, 1.0);
            let angle = i as f32 * 0.61;
            let dest = clamp_pos((
                target.0 + angle.cos() * yards(standoff_yards),
                target.1 + angle.sin() * lateral_yards(standoff_yards),
            ));
            let mut moved = e.at(lerp_pos(e.pos, dest, ease_out_cubic(local)));
            moved.anim = if local > 0.0 { AnimState::Running } else { AnimState::Idle };
            moved
        })
        .collect()
}

/// Ball-carrier path: eased downfield travel with a decaying sinusoidal
/// lateral weave.
pub fn carrier_path(start: FieldPos, dest: FieldPos, t: f32, weave_yards: f32) -> FieldPos {
    let eased = ease_in_out_quad(t);
    let base = lerp_pos(start, dest, eased);
    let weave = (t * 3.0 * std::f32::consts::PI).sin() * lateral_yards(weave_yards) * (1.0 - t);
    clamp_pos((base.0, base.1 + weave))
}

/// Push an entity straight downfield by `surge_yards`, eased. Used for
/// linemen drive-blocking.
pub fn surge(e: &EntityState, dir: f32, surge_yards: f32, t: f32) -> EntityState {
    let mut moved = e.at(clamp_pos((
        e.pos.0 + dir * yards(surge_yards) * ease_out_cubic(t),
        e.pos.1,
    )));
    moved.anim = AnimState::Blocking;
    moved
}

/// Deterministic loose-ball jitter: the same (seed, progress) always
/// produces the same offset, so replays stay bit-identical while the ball
/// still wobbles frame to frame.
pub fn loose_ball_jitter(seed: u64, progress: f32, at: FieldPos) -> FieldPos {
    let quantized = (progress.clamp(0.0, 1.0) * 1024.0) as u64;
    let mut rng = ChaCha8Rng::seed_from_u64(seed ^ quantized.wrapping_mul(0x9E37_79B9));
    let dx: f32 = rng.gen_range(-0.4..0.4);
    let dy: f32 = rng.gen_range(-0.4..0.4);
    clamp_pos((at.0 + dx, at.1 + dy))
}

/// Index of the entity nearest to `target`.
pub fn nearest_to(entities: &[EntityState], target: FieldPos) -> usize {
    let mut best = 0;
    let mut best_d2 = f32::MAX;
    for (i, e) in entities.iter().enumerate() {
        let dx = e.pos.0 - target.0;
        let dy = e.pos.1 - target.1;
        let d2 = dx * dx + dy * dy;
        if d2 < best_d2 {
            best_d2 = d2;
            best = i;
        }
    }
    best
}
