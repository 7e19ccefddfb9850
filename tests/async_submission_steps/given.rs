//! Given steps for submission BDD scenarios.

use super::world::SubmissionWorld;
use eyre::WrapErr;
use quantbridge::tools::parse_time_range;
use rstest_bdd_macros::given;
use serde_json::json;

#[given(r#"a submission from "{start}" to "{end}""#)]
fn submission_range(
    world: &mut SubmissionWorld,
    start: String,
    end: String,
) -> Result<(), eyre::Report> {
    let range = parse_time_range(&start, &end).wrap_err("parse scenario time range")?;
    world.pending_range = Some(range);
    Ok(())
}

#[given("the operation returns a profit of {profit:i64}")]
fn operation_returns_profit(world: &mut SubmissionWorld, profit: i64) {
    world.planned_outcome = Some(Ok(json!({ "profit": profit })));
}

#[given(r#"the operation fails with "{message}""#)]
fn operation_fails(world: &mut SubmissionWorld, message: String) {
    world.planned_outcome = Some(Err(message));
}
