use crate::cli::ServeArgs;
use crate::infra::{
    AppState, InMemoryFollowUpRepository, InMemorySubmissionRepository, LogMailTransport,
    SnapshotPdfEngine,
};
use crate::routes::with_assessment_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use readiness_ai::assessment::{
    AssessmentPipeline, FileReportStore, MailSettings, PipelineConfig,
};
use readiness_ai::config::AppConfig;
use readiness_ai::error::AppError;
use readiness_ai::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        report_dir: Arc::new(config.storage.report_dir.clone()),
    };

    let submissions = Arc::new(InMemorySubmissionRepository::default());
    let follow_ups = Arc::new(InMemoryFollowUpRepository::default());
    let mail = Arc::new(LogMailTransport::default());
    let pdf = Arc::new(SnapshotPdfEngine);
    let store = Arc::new(FileReportStore::new(config.storage.report_dir.clone()));
    let mail_settings = MailSettings {
        from: config.mail.from.clone(),
        reply_to: config.mail.reply_to.clone(),
    };

    let pipeline = Arc::new(AssessmentPipeline::start(
        submissions,
        follow_ups,
        mail,
        pdf,
        store,
        mail_settings,
        PipelineConfig::default(),
    ));

    let app = with_assessment_routes(pipeline)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "readiness assessment service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
