//! Wellbeing Survey server - binary entry point.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use wellbeing_survey::adapters::http::{app_router, InsightHandlers, QuestionnaireHandlers, StreamSettings};
use wellbeing_survey::adapters::{
    CsvQuestionSource, InMemoryAnswerStore, InsightBroker, MockTextGenerator, OpenAiConfig,
    OpenAiTextGenerator,
};
use wellbeing_survey::application::{
    CreateUserHandler, GetDailyHandler, GetInsightsHandler, GetNextQuestionsHandler, InsightCoordinator,
    InsightCoordinatorConfig, ResetUserHandler, SubmitAnswersHandler,
};
use wellbeing_survey::config::AppConfig;
use wellbeing_survey::domain::daily::ParagraphCatalog;
use wellbeing_survey::domain::selection::{CompletionDetector, SelectionEngine};
use wellbeing_survey::domain::taxonomy::Catalog;
use wellbeing_survey::ports::{AnswerStore, QuestionSource, TextGenerator};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    // Catalog load failure is fatal
    let source = CsvQuestionSource::new(&config.questionnaire.questions_path)
        .with_header(config.questionnaire.has_header);
    let catalog = Arc::new(Catalog::build(source.load_rows()?, config.questionnaire.ranks())?);
    let paragraphs = Arc::new(ParagraphCatalog::from_json(&std::fs::read_to_string(
        &config.questionnaire.paragraphs_path,
    )?)?);

    let store: Arc<dyn AnswerStore> = Arc::new(InMemoryAnswerStore::new());
    let generator = build_generator(&config)?;
    let broker = InsightBroker::spawn(config.broker.command_capacity);

    let coordinator = Arc::new(InsightCoordinator::new(
        catalog.clone(),
        store.clone(),
        generator,
        broker.clone(),
        InsightCoordinatorConfig {
            max_concurrent_jobs: config.insights.max_concurrent_jobs,
            max_attempts: config.insights.max_attempts,
            backoff_base: config.insights.backoff_base(),
            shutdown_grace: config.insights.shutdown_grace(),
            dimension_instructions: config.ai.dimension_instructions.clone(),
            holistic_instructions: config.ai.holistic_instructions.clone(),
        },
    ));

    let detector = CompletionDetector::new(catalog.clone())
        .with_excluded(config.questionnaire.excluded_dimensions_list());
    let questionnaire = QuestionnaireHandlers::new(
        Arc::new(GetNextQuestionsHandler::new(SelectionEngine::new(catalog.clone()), store.clone())),
        Arc::new(SubmitAnswersHandler::new(
            catalog.clone(),
            store.clone(),
            detector,
            coordinator.clone(),
        )),
        Arc::new(CreateUserHandler::new(store.clone())),
        Arc::new(ResetUserHandler::new(store.clone())),
        Arc::new(GetDailyHandler::new(
            SelectionEngine::new(catalog.clone()),
            paragraphs,
            store.clone(),
        )),
    );

    let shutdown = CancellationToken::new();
    let insights = InsightHandlers::new(
        Arc::new(GetInsightsHandler::new(catalog.clone(), store.clone())),
        coordinator.clone(),
        broker,
        StreamSettings {
            buffer: config.broker.subscriber_buffer,
            heartbeat: config.broker.heartbeat(),
            shutdown: shutdown.clone(),
        },
    );

    let app = app_router(
        questionnaire,
        insights,
        &config.server.cors_origins_list(),
        config.server.request_timeout(),
    );

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "Server listening");

    let stop = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            stop.cancel();
        })
        .await?;

    coordinator.shutdown().await;
    info!("Server stopped");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_filter));

    let registry = tracing_subscriber::registry().with(filter);
    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn build_generator(config: &AppConfig) -> Result<Arc<dyn TextGenerator>, Box<dyn std::error::Error>> {
    match config.ai.openai_api_key.as_deref().filter(|_| config.ai.has_openai()) {
        Some(key) => {
            let openai = OpenAiConfig::new(key)
                .with_model(config.ai.model.clone())
                .with_base_url(config.ai.base_url.clone())
                .with_timeout(config.ai.timeout());
            let generator = OpenAiTextGenerator::new(openai)?;
            info!(model = %config.ai.model, "Using OpenAI text generator");
            Ok(Arc::new(generator))
        }
        None => {
            warn!("No OpenAI API key configured, using mock text generator");
            Ok(Arc::new(MockTextGenerator::new()))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
