use mockall::predicate::eq;
use oxide_flare::{create_test_spawner, Error, FnApp, RecordingPatch, TestRuntime, Transition};
use serde_json::json;

use super::*;

#[test]
fn given_no_initial_effects_should_view_once_and_patch_the_initial_node() {
    let mut views = MockViewDependency::new();
    views.expect_on_view().with(eq(0)).times(1).return_const(());

    let test = given_initial_effects_and_views(new_journal(), vec![], views);

    assert_eq!(test.patches.count(), 1);
    test.patches.with_patches(|patches| {
        let (old, new) = &patches[0];
        assert_eq!(old.count, -1);
        assert_eq!(new.count, 0);
    });
    assert_eq!(test.driver.node().count, 0);
}

#[test]
fn given_initial_effects_should_run_each_once_in_order_after_the_initial_render() {
    let journal = new_journal();
    let first = journal_effect(&journal, "first");
    let second = journal_effect(&journal, "second");

    let test = given_initial_effects(
        journal.clone(),
        vec![
            first.with(vec![json!(1), json!(2), json!(3)]),
            second.with(vec![]),
        ],
    );

    assert_eq!(
        entries(&test.journal),
        vec![
            "view:0",
            "patch:-1->0",
            "effect:first:[1,2,3]",
            "effect:second:[]",
        ]
    );
}

#[test]
fn given_a_dispatched_action_should_store_state_and_rerender_before_its_effects() {
    let journal = new_journal();
    let after = journal_effect(&journal, "after");
    let mut test = given_no_initial_effects_with(&journal);

    test.driver
        .dispatch()
        .dispatch(&increment_with(vec![after.with(vec![])]), vec![]);
    test.driver.process_messages().unwrap();

    assert_eq!(test.driver.state().count, 1);
    assert_eq!(
        entries(&test.journal),
        vec!["view:0", "patch:-1->0", "view:1", "patch:0->1", "effect:after:[]"]
    );
}

#[test]
fn given_an_effect_dispatching_synchronously_should_observe_the_updated_state() {
    let journal = new_journal();
    let observe = dispatching_effect(&journal, "observe", snapshot());
    let mut test = given_no_initial_effects_with(&journal);

    test.driver
        .dispatch()
        .dispatch(&increment_with(vec![observe.with(vec![])]), vec![]);
    test.driver.process_messages().unwrap();

    assert_eq!(test.driver.state().count, 1);
    assert_eq!(test.driver.state().snapshots, vec![1]);
}

#[test]
fn given_initial_props_when_callback_invoked_should_render_again() {
    let mut test = given_no_initial_effects();

    test.patches.with_patches(|patches| {
        (patches[0].1.on_increment)();
    });

    assert_eq!(test.driver.pending(), 1);
    assert_eq!(test.driver.process_messages().unwrap(), 1);

    assert_eq!(test.patches.count(), 2);
    test.patches.with_patches(|patches| {
        assert_eq!(patches[1].1.count, 1);
    });
}

#[test]
fn given_an_async_effect_should_dispatch_once_the_future_completes() {
    let journal = new_journal();
    let fetch = oxide_flare::EffectHandler::<TestState>::new("fetch", |args, dispatch| {
        let amount = args[0].as_u64().unwrap_or(0);
        let dispatch = dispatch.clone();
        let increment = increment();
        let inner = dispatch.clone();
        dispatch.spawn(async move {
            for _ in 0..amount {
                inner.dispatch(&increment, vec![]);
            }
        });
        Ok(())
    });

    let mut test = given_initial_effects(journal, vec![fetch.with(vec![json!(3)])]);

    assert_eq!(test.driver.process_messages().unwrap(), 3);
    assert_eq!(test.driver.state().count, 3);
}

#[test]
fn given_a_failing_view_start_should_return_the_error() {
    let app = FnApp::new(
        || Ok(Transition::new(0_i64)),
        |_count: &i64, _dispatch| -> Result<i64, Error> { Err(anyhow::anyhow!("no tree").into()) },
    );

    let result = TestRuntime::new(RecordingPatch::new(), create_test_spawner()).start(app, 0);

    assert!(matches!(result, Err(Error::Other(_))));
}

#[test]
fn given_two_runtimes_should_keep_independent_state() {
    let mut first = given_no_initial_effects();
    let mut second = given_no_initial_effects();

    first.driver.dispatch().dispatch(&increment(), vec![]);
    first.driver.dispatch().dispatch(&increment(), vec![]);
    second.driver.dispatch().dispatch(&increment(), vec![]);

    first.driver.process_messages().unwrap();
    second.driver.process_messages().unwrap();

    assert_eq!(first.driver.state().count, 2);
    assert_eq!(second.driver.state().count, 1);
}

fn given_no_initial_effects_with(journal: &Journal) -> IntegrationTest {
    given_initial_effects(journal.clone(), vec![])
}
