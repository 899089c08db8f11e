//! Verify-given-change runs from handoff to report.

use std::time::Duration;

use till_core::{AssetCatalog, SequenceRandom};
use till_engine::{
    ChangePolicy, InputEvent, Key, ScriptedEvents, Task, TaskView, VerifyChangeTask,
    VerifySettings,
};

use super::harness::{click, drag, play, typed};

const FRAME: Duration = Duration::from_millis(100);

fn task(policy: ChangePolicy) -> VerifyChangeTask {
    let settings = VerifySettings {
        policy,
        ..VerifySettings::default()
    };
    // 0.3 flips wrong change downward.
    let mut rng = SequenceRandom::new([0.3]);
    VerifyChangeTask::with_random(settings, AssetCatalog::builtin(), &mut rng).unwrap()
}

fn handoff(task: &VerifyChangeTask) -> Vec<InputEvent> {
    let view = task.view();
    drag(view.tokens[0].rect.center(), view.zones[0].rect.center())
}

/// What the second phase looks like, from an identical task.
fn review_view(policy: ChangePolicy) -> TaskView {
    let mut probe = task(policy);
    for event in handoff(&probe) {
        probe.handle_event(&event);
    }
    probe.view()
}

fn button(view: &TaskView, label: &str) -> till_engine::Point {
    view.button(label).expect("button on screen").rect.center()
}

#[test]
fn accepting_correct_change_succeeds() {
    let mut task = task(ChangePolicy::AlwaysRight);
    let review = review_view(ChangePolicy::AlwaysRight);
    let script = ScriptedEvents::new()
        .frame(handoff(&task))
        .idle(4)
        .frame(click(button(&review, "Yes")));

    let (result, presenter) = play(&mut task, script, FRAME);

    assert!(result.success);
    assert!(!result.abandoned);
    assert_eq!(result.subtask_id, "incorrect_change");
    assert_eq!(result.errors, 0);
    assert_eq!(result.independence_score, 0);
    assert_eq!(result.quality_score, 3);
    assert_eq!(result.process_score, 3);
    assert!((result.duration_sec - 0.5).abs() < 1e-9);
    assert_eq!(presenter.last().message.as_deref(), Some("Yes - Thanks!"));
    assert!(presenter.last().finished);
}

#[test]
fn rejecting_wrong_change_and_correcting_it_succeeds() {
    let mut task = task(ChangePolicy::AlwaysWrong);
    let review = review_view(ChangePolicy::AlwaysWrong);
    let mut correction = typed("3.75");
    correction.push(InputEvent::key(Key::Enter));
    let script = ScriptedEvents::new()
        .frame(handoff(&task))
        .frame(click(button(&review, "No")))
        .frame(typed("3.5"))
        .frame([InputEvent::key(Key::Enter)])
        .frame((0..3).map(|_| InputEvent::key(Key::Backspace)))
        .frame(correction);

    let (result, presenter) = play(&mut task, script, FRAME);

    assert!(result.success);
    assert_eq!(result.errors, 1);
    assert_eq!(result.quality_score, 3);

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["target_change"], 3.75);
    assert_eq!(json["shown_change"], 3.55);
    assert_eq!(json["user_guess"], 3.75);

    let mismatch = presenter
        .frames
        .iter()
        .filter_map(|frame| frame.message.as_deref())
        .any(|message| message == "You entered $3.50. Try again or give up.");
    assert!(mismatch);
}

#[test]
fn accepting_wrong_change_costs_an_error_but_continues() {
    let mut task = task(ChangePolicy::AlwaysWrong);
    let review = review_view(ChangePolicy::AlwaysWrong);
    let script = ScriptedEvents::new()
        .frame(handoff(&task))
        .frame(click(button(&review, "Yes")))
        .frame(click(button(&review, "Give Up")));

    let (result, presenter) = play(&mut task, script, FRAME);

    assert!(!result.success);
    assert_eq!(result.errors, 1);
    assert!(
        presenter
            .frames
            .iter()
            .any(|frame| frame.message.as_deref() == Some("No - Actually it was wrong"))
    );
    let json = serde_json::to_value(&result).unwrap();
    assert!(json.get("user_guess").is_none());
}

#[test]
fn idle_review_climbs_the_ladder_and_escape_abandons() {
    let mut task = task(ChangePolicy::AlwaysRight);
    // 12 seconds idle reaches the rung that highlights both answers.
    let script = ScriptedEvents::new()
        .frame(handoff(&task))
        .idle(120)
        .frame([InputEvent::key(Key::Escape)]);

    let (result, presenter) = play(&mut task, script, FRAME);

    assert!(result.abandoned);
    assert!(!result.success);
    assert_eq!(result.independence_score, 3);
    let last = presenter.last();
    assert!(last.button("Yes").unwrap().highlighted);
    assert!(last.button("No").unwrap().highlighted);
}

#[test]
fn handoff_phase_never_scaffolds() {
    let mut task = task(ChangePolicy::FiftyFifty);
    let (result, presenter) = play(&mut task, ScriptedEvents::new().idle(300), FRAME);

    assert!(result.abandoned);
    assert_eq!(result.independence_score, 0);
    assert!(presenter.frames.iter().all(|frame| frame.message.is_none()));
    assert_eq!(
        presenter.frames[0].status,
        vec!["Drag the $5 bill into the payment area".to_string()]
    );
}
