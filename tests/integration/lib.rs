mod simple_app;

use oxide_flare::{create_test_spawner, Effect, RecordingPatch, TestDriver, TestRuntime};
pub(crate) use simple_app::*;

mod dispatch_cycle_tests;
mod timer_effect_tests;

pub(crate) struct IntegrationTest {
    pub(crate) driver: TestDriver<TestState, TestTree, TestApp, JournalPatch>,
    pub(crate) patches: RecordingPatch<TestTree>,
    pub(crate) journal: Journal,
}

pub(crate) fn given_no_initial_effects() -> IntegrationTest {
    given_initial_effects(new_journal(), vec![])
}

pub(crate) fn given_initial_effects(
    journal: Journal,
    effects: Vec<Effect<TestState>>,
) -> IntegrationTest {
    let mut views = MockViewDependency::new();
    views.expect_on_view().return_const(());
    given_initial_effects_and_views(journal, effects, views)
}

pub(crate) fn given_initial_effects_and_views(
    journal: Journal,
    effects: Vec<Effect<TestState>>,
    views: MockViewDependency,
) -> IntegrationTest {
    let mut initial_effects = MockInitialEffectsDependency::new();
    initial_effects
        .expect_on_init()
        .times(1)
        .return_once(move || effects);

    let app = TestApp {
        initial_effects: Box::new(initial_effects),
        views: Box::new(views),
        journal: journal.clone(),
    };

    let patches = RecordingPatch::new();
    let patch = JournalPatch {
        journal: journal.clone(),
        recording: patches.clone(),
    };

    let runtime = TestRuntime::new(patch, create_test_spawner());
    let driver = runtime
        .start(app, TestTree::detached())
        .expect("initial cycle succeeds");

    IntegrationTest {
        driver,
        patches,
        journal,
    }
}
