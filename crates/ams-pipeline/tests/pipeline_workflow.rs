use ams_pipeline::workflows::pipeline::{
    add_stage, infer_stage_type, remove_stage, reorder_stage, CardBounds, Category,
    DragSession, PipelineBoard, StageCatalog, StageConfig, StageId, StageSettings, StageStatus,
    StageTemplate, StageType,
};
use chrono::NaiveDate;

fn template(name: &str, category: Category) -> StageTemplate {
    StageTemplate {
        id: name.to_lowercase().replace(' ', "-"),
        name: name.to_string(),
        category,
        stage_type: infer_stage_type(name),
    }
}

#[test]
fn build_reorder_and_trim_a_pipeline() {
    let phone = template("Phone Screening", Category::Internal);
    let client = template("Client Interview", Category::Client);

    let stages = add_stage(&[], &phone, StageId::from("phone"));
    let stages = add_stage(&stages, &client, StageId::from("client"));
    assert_eq!(stages.len(), 2);
    assert!(stages
        .iter()
        .all(|stage| stage.status == StageStatus::NotConfigured && stage.interviewers.is_empty()));

    let stages = reorder_stage(&stages, 1, 0);
    let ordered: Vec<(u32, &str)> = stages
        .iter()
        .map(|stage| (stage.order, stage.name.as_str()))
        .collect();
    assert_eq!(
        ordered,
        vec![(1, "Client Interview"), (2, "Phone Screening")]
    );

    let stages = remove_stage(&stages, &StageId::from("phone"));
    assert_eq!(stages.len(), 1);
    assert_eq!(stages[0].name, "Client Interview");
    assert_eq!(stages[0].order, 1);
}

#[test]
fn keyword_inference_matches_documented_examples() {
    assert_eq!(
        infer_stage_type("Client Interview - Final Round"),
        StageType::ClientInterview
    );
    assert_eq!(infer_stage_type("Quarterly Planning"), StageType::Custom);
}

#[test]
fn board_drives_drag_gestures_and_configuration() {
    let catalog = StageCatalog::standard();
    let mut board = PipelineBoard::new();
    for template_id in ["phone-screening", "technical-interview", "client-interview"] {
        board.on_add_stage(catalog.find(template_id).expect("template"));
    }

    let card = CardBounds {
        left: 0.0,
        right: 240.0,
    };
    let mut session = DragSession::start(0);
    assert!(!board.on_drag_hover(&mut session, 1, card, 60.0));
    assert!(board.on_drag_hover(&mut session, 1, card, 200.0));
    assert!(board.on_drag_hover(&mut session, 2, card, 180.0));
    assert!(!board.on_drag_hover(&mut session, 9, card, 180.0));

    let names: Vec<&str> = board
        .stages()
        .iter()
        .map(|stage| stage.name.as_str())
        .collect();
    assert_eq!(
        names,
        vec!["Technical Interview", "Client Interview", "Phone Screening"]
    );

    let phone_id = board.stages()[2].id.clone();
    let mut config = board
        .on_configure_stage(&phone_id)
        .expect("configuration form opens");
    if let StageSettings::PhoneScreening(settings) = &mut config.settings {
        settings.interviewers.push(ams_pipeline::workflows::pipeline::Interviewer::new(
            "ta-2",
            "Jordan Blake",
        ));
    }
    let stage = board
        .on_save_stage_config(&phone_id, config)
        .expect("config saves");
    assert_eq!(stage.status, StageStatus::Configured);

    assert!(board
        .on_save_stage_config(
            &StageId::from("missing"),
            StageConfig::seed(StageType::Custom)
        )
        .is_err());

    let report = board.report(NaiveDate::from_ymd_opt(2025, 10, 1).expect("valid date"));
    assert_eq!(report.count(StageStatus::Configured), 1);
    assert_eq!(report.attention.len(), 2);

    assert!(board.on_remove_stage(&phone_id));
    assert!(!board.on_remove_stage(&phone_id));
    let orders: Vec<u32> = board.stages().iter().map(|stage| stage.order).collect();
    assert_eq!(orders, vec![1, 2]);
    assert!(board.on_configure_stage(&phone_id).is_none());
}
