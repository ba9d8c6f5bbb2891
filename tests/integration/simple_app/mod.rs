use std::sync::{Arc, Mutex};

use oxide_flare::{Action, App, Dispatch, Effect, EffectHandler, Error, Patch, RecordingPatch, Transition};
use serde_json::Value;

pub(crate) type Journal = Arc<Mutex<Vec<String>>>;

pub(crate) fn new_journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

pub(crate) fn entries(journal: &Journal) -> Vec<String> {
    journal.lock().unwrap().clone()
}

fn note(journal: &Journal, entry: String) {
    journal.lock().unwrap().push(entry);
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct TestState {
    pub(crate) count: i64,
    pub(crate) snapshots: Vec<i64>,
}

#[derive(Clone)]
pub(crate) struct TestTree {
    pub(crate) count: i64,
    pub(crate) on_increment: Arc<dyn Fn() + Send + Sync>,
}

impl TestTree {
    /// The tree handed to the runtime before the first render.
    pub(crate) fn detached() -> Self {
        Self {
            count: -1,
            on_increment: Arc::new(|| {}),
        }
    }
}

pub(crate) struct TestApp {
    pub(crate) initial_effects: Box<dyn InitialEffectsDependency>,
    pub(crate) views: Box<dyn ViewDependency>,
    pub(crate) journal: Journal,
}

#[cfg_attr(test, mockall::automock)]
pub(crate) trait InitialEffectsDependency {
    fn on_init(&self) -> Vec<Effect<TestState>>;
}

#[cfg_attr(test, mockall::automock)]
pub(crate) trait ViewDependency {
    fn on_view(&self, count: i64);
}

impl App<TestState, TestTree> for TestApp {
    fn init(&self) -> Result<Transition<TestState>, Error> {
        Ok(Transition::with_effects(
            TestState::default(),
            self.initial_effects.on_init(),
        ))
    }

    fn view(&self, state: &TestState, dispatch: &Dispatch<TestState>) -> Result<TestTree, Error> {
        self.views.on_view(state.count);
        note(&self.journal, format!("view:{}", state.count));

        let dispatch = dispatch.clone();
        let increment = increment();
        Ok(TestTree {
            count: state.count,
            on_increment: Arc::new(move || dispatch.dispatch(&increment, vec![])),
        })
    }
}

/// Journals every patch, then records it for assertions.
#[derive(Clone)]
pub(crate) struct JournalPatch {
    pub(crate) journal: Journal,
    pub(crate) recording: RecordingPatch<TestTree>,
}

impl Patch<TestTree> for JournalPatch {
    fn patch(&mut self, old: &TestTree, new: TestTree) -> TestTree {
        note(&self.journal, format!("patch:{}->{}", old.count, new.count));
        self.recording.patch(old, new)
    }
}

pub(crate) fn increment() -> Action<TestState> {
    Action::new("increment", |state: &TestState, _| {
        Transition::new(TestState {
            count: state.count + 1,
            ..state.clone()
        })
    })
}

/// Increments, then runs `effects` against the incremented state.
pub(crate) fn increment_with(effects: Vec<Effect<TestState>>) -> Action<TestState> {
    Action::new("increment-with", move |state: &TestState, _| {
        Transition::with_effects(
            TestState {
                count: state.count + 1,
                ..state.clone()
            },
            effects.clone(),
        )
    })
}

/// Records the count the action was applied to.
pub(crate) fn snapshot() -> Action<TestState> {
    Action::new("snapshot", |state: &TestState, _| {
        let mut next = state.clone();
        next.snapshots.push(state.count);
        Transition::new(next)
    })
}

/// An effect that journals its name and arguments.
pub(crate) fn journal_effect(journal: &Journal, name: &'static str) -> EffectHandler<TestState> {
    let journal = journal.clone();
    EffectHandler::new(name, move |args, _dispatch| {
        note(&journal, format!("effect:{name}:{}", Value::from(args.to_vec())));
        Ok(())
    })
}

/// An effect that journals its name and dispatches `action` synchronously.
pub(crate) fn dispatching_effect(
    journal: &Journal,
    name: &'static str,
    action: Action<TestState>,
) -> EffectHandler<TestState> {
    let journal = journal.clone();
    EffectHandler::new(name, move |_args, dispatch| {
        note(&journal, format!("effect:{name}"));
        dispatch.dispatch(&action, vec![]);
        Ok(())
    })
}

pub(crate) fn failing_effect(name: &'static str) -> EffectHandler<TestState> {
    EffectHandler::new(name, |_args, _dispatch| anyhow::bail!("boom"))
}
