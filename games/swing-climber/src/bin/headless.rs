//! Native driver: plays the climber without a browser, tapping on a fixed
//! rhythm, and logs every run. Best score goes to a JSON file.
//!
//! Usage: `headless [frames] [save-file]`

use swing_climber::game::{events, game_events};
use swing_climber::SwingClimber;
use swing_engine::{InputEvent, JsonFileStore};
use swing_web::GameRunner;

const FRAME_DT: f32 = 1.0 / 60.0;
/// Frames between taps while hanging from a hold.
const TAP_EVERY: u32 = 40;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let frames: u32 = match args.next().map(|s| s.parse()) {
        Some(Ok(n)) => n,
        Some(Err(e)) => {
            log::error!("frame count: {}", e);
            std::process::exit(2);
        }
        None => 3600,
    };
    let save_path = args.next().unwrap_or_else(|| "swing-climber-save.json".to_string());

    let store = JsonFileStore::new(save_path);
    log::info!("best score file: {}", store.path().display());
    let mut runner = GameRunner::new(SwingClimber::with_store(Box::new(store)));
    runner.init();

    let play = InputEvent::Custom { kind: events::PLAY, a: 0.0, b: 0.0, c: 0.0 };
    runner.push_input(play);

    let mut runs = 0;
    let mut anchored_frames = 0;
    for _ in 0..frames {
        if runner.game().is_anchored() {
            anchored_frames += 1;
            if anchored_frames % TAP_EVERY == 0 {
                runner.push_input(InputEvent::PointerDown { x: 0.0, y: 0.0 });
            }
        } else {
            anchored_frames = 0;
            runner.push_input(InputEvent::PointerUp { x: 0.0, y: 0.0 });
        }

        runner.tick(FRAME_DT);

        let over = runner
            .context()
            .events
            .iter()
            .find(|e| e.kind_id() == game_events::GAME_OVER)
            .copied();
        if let Some(event) = over {
            runs += 1;
            log::info!("run {}: score {}, best {}", runs, event.a, event.b);
            runner.push_input(play);
        }
    }

    let game = runner.game();
    log::info!(
        "{} frames, {} finished runs, current score {}, best {}",
        frames,
        runs,
        game.score(),
        game.best_score()
    );
}
