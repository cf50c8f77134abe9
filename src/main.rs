//! Paper Trail headless runner
//!
//! Steps the simulation with scripted input and builds a draw list every frame.
//! Usage: `paper-trail [tuning.json] [seed]`

use glam::Vec2;

use paper_trail::Tuning;
use paper_trail::renderer::{Camera, build_draw_list, instance_bytes};
use paper_trail::sim::{CharacterKind, GameEvent, GamePhase, GameState, TickInput, tick};

const FRAMES: u32 = 60 * 120;
const DT: f32 = 1.0 / 60.0;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let tuning = match args.next() {
        Some(path) => Tuning::load(&path).unwrap_or_else(|e| {
            log::error!("Could not load tuning from {path}: {e}; using defaults");
            Tuning::default()
        }),
        None => Tuning::default(),
    };
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0x5EED);

    log::info!("Paper Trail starting with seed {seed}");
    let mut state = GameState::with_placeholders(seed, CharacterKind::CircleNinja, tuning);
    let mut camera = Camera::new(
        Vec2::new(state.tuning.screen_w, state.tuning.screen_h),
        Vec2::new(state.tuning.world_w, state.tuning.world_h),
    );

    let mut kills = 0u32;
    let mut shots = 0u32;
    let mut peak_sprites = 0usize;
    let mut peak_bytes = 0usize;

    for frame in 0..FRAMES {
        // Walk a slow circle, swinging every half second
        let t = frame as f32 * DT;
        let input = TickInput {
            move_dir: Vec2::from_angle(t * 0.5),
            fire: frame % 30 == 0,
            fire_dir: None,
            pause: false,
        };
        tick(&mut state, &input, DT);

        for event in &state.events {
            match event {
                GameEvent::EnemyKilled { .. } => kills += 1,
                GameEvent::WeaponFired { .. } => shots += 1,
                _ => {}
            }
        }

        camera.follow(state.player.pos);
        let list = build_draw_list(&state, &camera);
        peak_sprites = peak_sprites.max(list.len());
        peak_bytes = peak_bytes.max(instance_bytes(&list).len());

        if state.phase == GamePhase::GameOver {
            break;
        }
    }

    log::info!(
        "Run over after {:.1}s: wave {}, {} kills, {} shots, {} xp, {} money, health {:.0}/{:.0}",
        state.time,
        state.spawner.wave_index() + 1,
        kills,
        shots,
        state.player.xp,
        state.player.money,
        state.player.health.current(),
        state.player.health.max(),
    );
    log::info!("Peak draw list: {peak_sprites} sprites ({peak_bytes} bytes)");
}
