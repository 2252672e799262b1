use super::common::*;
use crate::workflows::pipeline::domain::{Category, StageId, StageStatus};
use crate::workflows::pipeline::{
    add_stage, remove_stage, reorder_stage, validate_stages, PipelineError, StageIdSequence,
};

#[test]
fn added_stage_lands_at_end_unconfigured() {
    let stages = stages_from(&["phone-screening", "technical-interview"]);
    let updated = add_stage(
        &stages,
        &template("client-interview"),
        StageId::from("client-1"),
    );

    let added = updated.last().expect("stage appended");
    assert_eq!(added.order, 3);
    assert_eq!(added.status, StageStatus::NotConfigured);
    assert!(added.interviewers.is_empty());
    assert!(!added.scheduling.is_scheduled);
    assert!(added.config.is_none());
    assert_eq!(added.category, Category::Client);
    assert_dense(&updated);
    assert_eq!(stages.len(), 2, "input list is left untouched");
}

#[test]
fn removing_renumbers_remaining_stages() {
    let stages = stages_from(&["phone-screening", "technical-interview", "client-interview"]);
    let updated = remove_stage(&stages, &StageId::from("s1"));

    assert_eq!(names(&updated), vec!["Technical Interview", "Client Interview"]);
    assert_dense(&updated);
}

#[test]
fn removing_unknown_id_is_a_no_op() {
    let stages = stages_from(&["phone-screening", "client-interview"]);
    let updated = remove_stage(&stages, &StageId::from("missing"));
    assert_eq!(updated, stages);
}

#[test]
fn reorder_uses_splice_not_swap() {
    let stages = stages_from(&[
        "phone-screening",
        "technical-interview",
        "hr-interview",
        "client-interview",
    ]);

    let updated = reorder_stage(&stages, 0, 2);
    assert_eq!(
        names(&updated),
        vec![
            "Technical Interview",
            "HR Interview",
            "Phone Screening",
            "Client Interview"
        ]
    );
    assert_dense(&updated);

    let back = reorder_stage(&updated, 3, 0);
    assert_eq!(back[0].name, "Client Interview");
    assert_dense(&back);
}

#[test]
fn reorder_to_same_index_returns_identical_list() {
    let stages = stages_from(&["phone-screening", "technical-interview", "hr-interview"]);
    for index in 0..stages.len() {
        assert_eq!(reorder_stage(&stages, index, index), stages);
    }
}

#[test]
fn reorder_out_of_range_is_ignored() {
    let stages = stages_from(&["phone-screening", "technical-interview"]);
    assert_eq!(reorder_stage(&stages, 0, 5), stages);
    assert_eq!(reorder_stage(&stages, 7, 0), stages);
}

#[test]
fn every_operation_sequence_keeps_order_dense() {
    let mut stages = stages_from(&[
        "phone-screening",
        "hygiene-screening",
        "aptitude-test",
        "technical-interview",
        "client-interview",
        "background-verification",
    ]);

    let moves = [(5, 0), (1, 4), (2, 2), (0, 5), (3, 1)];
    for (from, to) in moves {
        stages = reorder_stage(&stages, from, to);
        assert_dense(&stages);
    }

    for id in ["s3", "s1", "unknown", "s6"] {
        stages = remove_stage(&stages, &StageId::from(id));
        assert_dense(&stages);
    }

    stages = add_stage(&stages, &template("offer-discussion"), StageId::from("s7"));
    assert_dense(&stages);
    assert!(validate_stages(&stages).is_ok());
}

#[test]
fn validation_flags_gaps_and_duplicates() {
    let mut stages = stages_from(&["phone-screening", "technical-interview"]);
    stages[1].order = 4;
    assert_eq!(
        validate_stages(&stages),
        Err(PipelineError::OrderGap {
            position: 1,
            expected: 2,
            found: 4
        })
    );

    let mut stages = stages_from(&["phone-screening", "technical-interview"]);
    stages[1].id = stages[0].id.clone();
    assert_eq!(
        validate_stages(&stages),
        Err(PipelineError::DuplicateStage(StageId::from("s1")))
    );
}

#[test]
fn id_sequence_is_monotonic_per_pipeline() {
    let mut sequence = StageIdSequence::new();
    let screening = template("phone-screening");

    let first = sequence.next_for(&screening);
    let second = sequence.next_for(&screening);
    assert_eq!(first, StageId::from("phone-screening-0001"));
    assert_eq!(second, StageId::from("phone-screening-0002"));
    assert_eq!(sequence.peek(), 3);

    assert_eq!(StageIdSequence::starting_at(0).peek(), 1);
}
