//! Skyflap headless runner
//!
//! Builds a scene from the stock texture metrics, drives it with a synthetic
//! 60 Hz clock and a simple autopilot, then prints a JSON summary.
//!
//! Usage: `skyflap [seconds] [config.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use skyflap::sim::{GamePhase, GameScene, LoopDriver};
    use skyflap::{AssetManifest, SceneConfig};

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seconds: f64 = match args.next() {
        Some(s) => s.parse()?,
        None => 20.0,
    };
    let config = match args.next() {
        Some(path) => SceneConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => SceneConfig::default(),
    };

    let mut scene = GameScene::new(config, &AssetManifest::stock())?;
    let mut driver = LoopDriver::new();
    log::info!("Skyflap (headless) running for {seconds}s");

    let frame_time = 1.0 / 60.0;
    let mut timestamp = 0.0;
    let mut flaps = 0u32;
    let mut frozen_at = None;

    while timestamp <= seconds {
        if scene.phase() == GamePhase::Active && autopilot_wants_flap(&scene) {
            driver.activate();
            flaps += 1;
        }
        driver.frame(timestamp, &mut scene);

        if frozen_at.is_none() && scene.phase() == GamePhase::Frozen {
            frozen_at = Some(scene.world().elapsed());
            log::info!(
                "frozen at {:.2}s after {} pairs",
                scene.world().elapsed(),
                scene.spawner().spawned()
            );
        }
        timestamp += frame_time;
    }

    let summary = serde_json::json!({
        "elapsed": scene.world().elapsed(),
        "steps": driver.steps(),
        "phase": scene.phase(),
        "frozen_at": frozen_at,
        "flaps": flaps,
        "pairs_spawned": scene.spawner().spawned(),
        "pairs_suppressed": scene.spawner().suppressed(),
        "pairs_live": scene.obstacle_pairs().count(),
        "frame": scene.render(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

/// Flap when falling below the middle of the next opening
#[cfg(not(target_arch = "wasm32"))]
fn autopilot_wants_flap(scene: &skyflap::sim::GameScene) -> bool {
    let flyer = scene.flyer();
    if flyer.velocity.y > 0.0 {
        return false;
    }

    let target = scene
        .obstacle_pairs()
        .map(|(id, pair)| (scene.graph().world_position(id), pair))
        .filter(|(origin, pair)| origin.x + pair.width() / 2.0 + flyer.radius > flyer.position.x)
        .min_by(|(a, _), (b, _)| a.x.total_cmp(&b.x))
        .map(|(origin, pair)| origin.y + pair.lower().top() + pair.gap() / 2.0)
        .unwrap_or(scene.config().viewport_height / 2.0);

    flyer.position.y < target - flyer.radius
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Headless runner is native only
}
