//! Pay-with-limited-wallet runs through the frame loop.

use std::time::Duration;

use till_core::AssetCatalog;
use till_engine::{
    Cents, InputEvent, Point, ReceiptItem, ScriptedEvents, Task, TaskView, WalletSettings,
    WalletTask,
};
use till_types::Denomination;

use super::harness::{click, drag, play};

const FRAME: Duration = Duration::from_millis(100);

fn task(price: i64, max_time: Duration, max_attempts: u32) -> WalletTask {
    let settings = WalletSettings {
        max_time,
        max_attempts,
        items: vec![ReceiptItem::new("Bread", Cents::new(price))],
        shuffle_items: false,
    };
    WalletTask::new(settings, AssetCatalog::builtin()).unwrap()
}

fn first(view: &TaskView, denomination: Denomination) -> Point {
    view.tokens
        .iter()
        .find(|token| token.denomination == denomination)
        .expect("denomination in wallet")
        .rect
        .center()
}

fn zone(view: &TaskView) -> Point {
    view.zones[0].rect.center()
}

fn button(view: &TaskView, label: &str) -> Point {
    view.button(label).expect("button on screen").rect.center()
}

#[test]
fn exact_payment_succeeds() {
    let mut task = task(125, Duration::from_secs(120), 3);
    let view = task.view();
    let pay = zone(&view);
    let script = ScriptedEvents::new()
        .frame(drag(first(&view, Denomination::OneDollar), pay))
        .frame(drag(
            first(&view, Denomination::Quarter),
            Point::new(pay.x + 150, pay.y),
        ))
        .frame(click(button(&view, "Submit")));

    let (result, presenter) = play(&mut task, script, FRAME);

    assert!(result.success);
    assert_eq!(result.subtask_id, "make_change_submit");
    assert_eq!(
        (
            result.independence_score,
            result.quality_score,
            result.process_score
        ),
        (0, 3, 3)
    );

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["target_total"], 1.25);
    assert_eq!(json["payment_given"], 1.25);
    assert_eq!(json["drag_events"], 2);
    assert_eq!(json["extraneous_moves"], 0);
    assert_eq!(json["attempts_used"], 1);
    assert!(presenter.last().finished);
}

#[test]
fn timeouts_reset_the_wallet_and_exhaust_attempts() {
    let mut task = task(125, Duration::from_secs(1), 2);
    let view = task.view();
    assert_eq!(view.status, vec!["Time: 1s  Attempts: 2".to_string()]);

    let script = ScriptedEvents::new()
        .frame(drag(first(&view, Denomination::OneDollar), zone(&view)))
        .idle(30);

    let (result, presenter) = play(&mut task, script, FRAME);

    assert!(!result.success);
    assert!(!result.abandoned);
    assert_eq!(result.errors, 2);
    assert_eq!(result.quality_score, 0);
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["attempts_used"], 2);
    assert_eq!(json["payment_given"], 0.0);

    let second_attempt = presenter
        .frames
        .iter()
        .find(|frame| frame.status[0].ends_with("Attempts: 1"))
        .expect("second attempt shown");
    assert!(second_attempt.tokens.iter().all(|token| !token.in_zone));
}

#[test]
fn giving_up_close_to_the_total_scores_a_minor_miss() {
    let mut task = task(125, Duration::from_secs(120), 3);
    let view = task.view();
    let script = ScriptedEvents::new()
        .frame(drag(first(&view, Denomination::OneDollar), zone(&view)))
        .frame(click(button(&view, "Give Up")));

    let (result, _) = play(&mut task, script, FRAME);

    assert!(!result.success);
    assert_eq!(result.independence_score, 7);
    assert_eq!(result.quality_score, 2);
    assert_eq!(result.process_score, 0);
}

#[test]
fn taking_money_back_out_is_an_extraneous_move() {
    let mut task = task(125, Duration::from_secs(120), 3);
    let view = task.view();
    let pay = zone(&view);
    let script = ScriptedEvents::new()
        .frame(drag(first(&view, Denomination::OneDollar), pay))
        .frame(drag(pay, Point::new(240, 380)))
        .frame(drag(first(&view, Denomination::FiveDollar), pay))
        .frame(click(button(&view, "Submit")));

    let (result, _) = play(&mut task, script, FRAME);

    assert!(!result.success);
    assert_eq!(result.errors, 1);
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["drag_events"], 3);
    assert_eq!(json["extraneous_moves"], 1);
    assert_eq!(json["payment_given"], 5.0);
}

#[test]
fn an_idle_trainee_is_walked_through_the_payment() {
    let mut task = task(100, Duration::from_secs(120), 3);
    let submit = button(&task.view(), "Submit");
    let script = ScriptedEvents::new()
        .idle(500)
        .frame(click(submit));

    let (result, presenter) = play(&mut task, script, FRAME);

    assert!(result.success);
    assert_eq!(result.independence_score, 6);
    assert_eq!(result.process_score, 1);
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["payment_given"], 1.0);
    assert_eq!(json["drag_events"], 0);
    assert!(presenter.frames.iter().any(|frame| {
        frame.message.as_deref()
            == Some("Move the highlighted object to the payment area like this ^")
    }));
    assert!(
        presenter
            .frames
            .iter()
            .any(|frame| frame.tokens.iter().any(|token| token.highlighted))
    );
}

#[test]
fn quitting_mid_task_reports_an_abandoned_attempt() {
    let mut task = task(125, Duration::from_secs(120), 3);
    let script = ScriptedEvents::new()
        .idle(2)
        .frame([InputEvent::Quit]);

    let (result, _) = play(&mut task, script, FRAME);

    assert!(result.abandoned);
    assert!(!result.success);
    assert_eq!(result.errors, 0);
}
