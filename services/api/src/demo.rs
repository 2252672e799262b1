use crate::infra::{load_catalog, InMemoryPipelineRepository};
use ams_pipeline::error::AppError;
use ams_pipeline::workflows::pipeline::stage_config::forms::InterviewFormat;
use ams_pipeline::workflows::pipeline::{
    Category, FlowNode, Interviewer, PipelineFlow, PipelineReport, PipelineService,
    StageCatalog, StageSettings,
};
use chrono::{Local, NaiveDate};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct CatalogArgs {
    /// Optional catalog CSV export (id,name,category[,stage_type])
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Optional catalog CSV export to build the demo pipeline from
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
    /// Override the reporting date (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Number of catalog templates to place in the demo pipeline
    #[arg(long, default_value_t = 4)]
    pub(crate) stages: usize,
}

pub(crate) fn run_catalog_listing(args: CatalogArgs) -> Result<(), AppError> {
    let catalog = load_catalog(args.csv.as_deref())?;
    render_catalog(&catalog);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { csv, today, stages } = args;
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let catalog = load_catalog(csv.as_deref())?;

    let template_ids: Vec<String> = catalog
        .list_templates()
        .iter()
        .take(stages.max(1))
        .map(|template| template.id.clone())
        .collect();

    let service = PipelineService::new(Arc::new(InMemoryPipelineRepository::default()), catalog);
    let record = service.create("Demo Hiring Pipeline")?;
    for template_id in &template_ids {
        service.add_stage(&record.id, template_id)?;
    }

    println!("Hiring pipeline demo: {} ({})", record.name, record.id);
    let record = service.get(&record.id)?;
    render_flow(&record.board.flow());

    if record.board.len() > 1 {
        let last = record.board.len() - 1;
        service.reorder(&record.id, last, 0)?;
        println!("\nMoved the last stage to the front");
        render_flow(&service.flow(&record.id)?);
    }

    let record = service.get(&record.id)?;
    if let Some(first) = record.board.stages().first() {
        let mut config = service.config_form(&record.id, &first.id)?;
        let panel = vec![
            Interviewer::new("int-001", "Priya Raman"),
            Interviewer::new("int-002", "Sam Ortiz"),
        ];
        config.settings.interviewers_mut().extend(panel);
        fill_required_detail(&mut config.settings, today);
        config.notes = Some("Configured by the CLI demo".to_string());

        let stage = service.save_config(&record.id, &first.id, config)?;
        let format = stage
            .config
            .as_ref()
            .and_then(|config| config.settings.interview_format())
            .map_or("n/a", InterviewFormat::label);
        println!(
            "\nConfigured '{}' -> {} (format: {})",
            stage.name,
            stage.status.label(),
            format
        );
    }

    render_report(&service.report(&record.id, today)?, today);
    Ok(())
}

fn fill_required_detail(settings: &mut StageSettings, today: NaiveDate) {
    match settings {
        StageSettings::PhoneScreening(form) => form.interview_format = Some(InterviewFormat::Phone),
        StageSettings::HygieneScreening(form) => {
            form.interview_format = Some(InterviewFormat::Phone)
        }
        StageSettings::Interview(form) => form.interview_format = Some(InterviewFormat::Video),
        StageSettings::ClientInterview(form) => {
            form.interview_format = Some(InterviewFormat::Video)
        }
        StageSettings::VendorPartnerInterview(form) => {
            form.interview_format = Some(InterviewFormat::Video)
        }
        StageSettings::Custom(form) => form.interview_format = Some(InterviewFormat::InPerson),
        StageSettings::BackgroundVerification(form) => {
            form.sla_date = Some(today + chrono::Duration::days(7))
        }
        StageSettings::AptitudeTest(form) => form.test_platform = Some("HackerRank".to_string()),
    }
}

fn render_catalog(catalog: &StageCatalog) {
    println!("Stage catalog ({} templates)", catalog.list_templates().len());
    for category in Category::ordered() {
        let templates = catalog.templates_in(category);
        if templates.is_empty() {
            continue;
        }
        println!("\n{} [{}]", category.label(), category.accent());
        for template in templates {
            println!(
                "  - {:<28} {:<26} {}",
                template.name,
                template.id,
                template.stage_type.label()
            );
        }
    }
}

fn render_flow(flow: &PipelineFlow) {
    if flow.is_empty() {
        println!("  (no stages)");
        return;
    }

    for node in &flow.nodes {
        match node {
            FlowNode::Stage(card) => println!(
                "  {}. {} [{} | {}] {}",
                card.order, card.name, card.category_label, card.stage_type_label, card.status_label
            ),
            FlowNode::Connector { .. } => println!("     |"),
            FlowNode::FinalStage { label, .. } => println!("  == {} ==", label),
        }
    }
}

fn render_report(report: &PipelineReport, today: NaiveDate) {
    println!("\nReadiness as of {}", today);
    println!(
        "  {} stages, {:.0}% configured, {} scheduled",
        report.total_stages, report.readiness_pct, report.scheduled_stages
    );
    for entry in &report.status_breakdown {
        println!("  {:<22} {}", entry.status_label, entry.count);
    }

    if !report.attention.is_empty() {
        println!("\nNeeds attention");
        for item in &report.attention {
            let overdue = if item.overdue { " (overdue)" } else { "" };
            println!(
                "  {}. {}{}: {}",
                item.order,
                item.name,
                overdue,
                item.missing_items.join(", ")
            );
        }
    }
}
