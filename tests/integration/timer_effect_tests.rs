use std::sync::Arc;
use std::time::Duration;

use oxide_flare::{
    create_test_spawner, timer, Action, Dispatch, Error, FnApp, MemoryPlatform, Platform,
    RecordingPatch, TestRuntime, Transition,
};
use serde_json::json;

const FRAME: Duration = Duration::from_millis(150);

#[derive(Clone, Debug, Default, PartialEq)]
struct Game {
    running: bool,
    frames: u64,
}

/// Advances one frame and schedules the next while the game runs.
fn tick(platform: Arc<dyn Platform>) -> Action<Game> {
    Action::new("tick", move |game: &Game, _| {
        if !game.running {
            return Transition::new(game.clone());
        }
        let next = Game {
            frames: game.frames + 1,
            ..game.clone()
        };
        Transition::new(next).with(timer::delay(platform.clone(), FRAME, tick(platform.clone())))
    })
}

fn stop() -> Action<Game> {
    Action::new("stop", |game: &Game, _| {
        Transition::new(Game {
            running: false,
            ..game.clone()
        })
    })
}

fn game_view(game: &Game, _dispatch: &Dispatch<Game>) -> Result<u64, Error> {
    Ok(game.frames)
}

#[test]
fn given_a_delay_effect_should_dispatch_only_once_the_time_has_passed() {
    let platform = MemoryPlatform::new("/");
    let host: Arc<dyn Platform> = Arc::new(platform.clone());
    let bump = Action::new("bump", |count: &i64, _| Transition::new(count + 1));

    let app = FnApp::new(
        move || {
            Ok(Transition::new(0_i64).with(timer::delay(
                host.clone(),
                Duration::from_millis(500),
                bump.clone(),
            )))
        },
        |count: &i64, _dispatch| -> Result<i64, Error> { Ok(*count) },
    );
    let mut driver = TestRuntime::new(RecordingPatch::new(), create_test_spawner())
        .start(app, -1)
        .unwrap();

    assert_eq!(platform.pending_timers(), 1);

    platform.advance(Duration::from_millis(499));
    assert_eq!(driver.process_messages().unwrap(), 0);
    assert_eq!(*driver.state(), 0);

    assert_eq!(platform.advance(Duration::from_millis(1)), 1);
    assert_eq!(driver.process_messages().unwrap(), 1);
    assert_eq!(*driver.state(), 1);
    assert_eq!(platform.pending_timers(), 0);
}

#[test]
fn given_a_frame_loop_should_tick_once_per_frame_until_stopped() {
    let platform = MemoryPlatform::new("/");
    let host: Arc<dyn Platform> = Arc::new(platform.clone());

    let start_host = host.clone();
    let app = FnApp::new(
        move || {
            let game = Game {
                running: true,
                frames: 0,
            };
            Ok(Transition::new(game).with(timer::delay(
                start_host.clone(),
                FRAME,
                tick(start_host.clone()),
            )))
        },
        game_view,
    );
    let patches = RecordingPatch::new();
    let mut driver = TestRuntime::new(patches.clone(), create_test_spawner())
        .start(app, 0)
        .unwrap();

    for expected in 1..=4 {
        assert_eq!(platform.advance(FRAME), 1);
        driver.process_messages().unwrap();
        assert_eq!(driver.state().frames, expected);
        assert_eq!(platform.pending_timers(), 1);
    }
    assert_eq!(patches.last(), Some(4));

    driver.dispatch().dispatch(&stop(), vec![]);
    driver.process_messages().unwrap();

    // The tick already scheduled still arrives and ends the loop.
    assert_eq!(platform.advance(FRAME), 1);
    driver.process_messages().unwrap();
    assert_eq!(driver.state().frames, 4);
    assert_eq!(platform.pending_timers(), 0);
    assert_eq!(platform.now(), FRAME * 5);
}

#[test]
fn given_a_malformed_delay_argument_the_effect_should_fail() {
    let platform: Arc<dyn Platform> = Arc::new(MemoryPlatform::new("/"));
    let bump = Action::new("bump", |count: &i64, _| Transition::new(count + 1));
    let delay = timer::delay(platform, FRAME, bump);

    let malformed = delay.handler().with(vec![json!("soon")]);
    let app = FnApp::new(
        move || Ok(Transition::new(0_i64).with(malformed.clone())),
        |count: &i64, _dispatch| -> Result<i64, Error> { Ok(*count) },
    );

    let result = TestRuntime::new(RecordingPatch::new(), create_test_spawner()).start(app, -1);

    assert!(matches!(result, Err(Error::Effect { name: "timer/delay", .. })));
}
