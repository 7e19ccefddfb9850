//! When steps for submission BDD scenarios.

use super::world::{SubmissionWorld, run_async};
use eyre::WrapErr;
use quantbridge::task::{
    domain::TaskKind,
    services::{SubmitRequest, should_run_async},
};
use quantbridge::tools::submission_response;
use rstest_bdd_macros::when;
use tokio::sync::oneshot;

#[when("the submission is made")]
fn submission_is_made(world: &mut SubmissionWorld) -> Result<(), eyre::Report> {
    let range = world
        .pending_range
        .ok_or_else(|| eyre::eyre!("missing time range in scenario world"))?;
    let outcome = world
        .planned_outcome
        .take()
        .ok_or_else(|| eyre::eyre!("missing planned outcome in scenario world"))?;

    // Inline operations run straight through: dropping the sender opens the gate.
    let (release, gate) = oneshot::channel::<()>();
    if should_run_async(&range) {
        world.release = Some(release);
    }

    let request = SubmitRequest::new(TaskKind::BACKTEST, range).with_param("symbol", "ETHUSDT");
    let submitted = run_async(world.dispatcher.submit(request, move || async move {
        let _ = gate.await;
        outcome
    }))
    .wrap_err("submit operation")?;

    world.task_id = submitted.task_id().cloned();
    world.last_response = Some(submission_response(&submitted));
    Ok(())
}

#[when("the operation is released")]
fn operation_is_released(world: &mut SubmissionWorld) -> Result<(), eyre::Report> {
    let release = world
        .release
        .take()
        .ok_or_else(|| eyre::eyre!("operation already released"))?;
    release
        .send(())
        .map_err(|()| eyre::eyre!("operation is no longer waiting"))
}
