use std::{process, sync::Arc};

use ardesia::{
    application::{
        chrome::ChromeService,
        content::ContentRepo,
        error::AppError,
        export::ExportService,
        feed::FeedService,
        render::render_service,
        sitemap::SitemapService,
    },
    config,
    infra::{content_fs::FsContentStore, error::InfraError, http, telemetry},
};
use time::OffsetDateTime;
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Routes(_) => run_routes(settings).await,
        config::Command::Export(args) => run_export(settings, args).await,
    }
}

struct SiteServices {
    feed: Arc<FeedService>,
    chrome: Arc<ChromeService>,
    sitemap: Arc<SitemapService>,
    content: Arc<dyn ContentRepo>,
}

fn build_site_services(settings: &config::Settings) -> Result<SiteServices, AppError> {
    let store = FsContentStore::new(settings.content.directory.clone())?;
    let content: Arc<dyn ContentRepo> = Arc::new(store);

    let feed = Arc::new(FeedService::new(
        content.clone(),
        render_service(),
        settings.site.clone(),
        settings.content.include_drafts,
    ));
    let chrome = Arc::new(ChromeService::new(settings.site.clone()));
    let sitemap = Arc::new(SitemapService::new(content.clone(), settings.site.clone()));

    Ok(SiteServices {
        feed,
        chrome,
        sitemap,
        content,
    })
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let services = build_site_services(&settings)?;

    let router = http::build_router(http::HttpState {
        feed: services.feed,
        chrome: services.chrome,
        sitemap: services.sitemap,
        content: services.content,
    });

    let listener = tokio::net::TcpListener::bind(settings.server.public_addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "ardesia::serve",
        addr = %settings.server.public_addr,
        content_dir = %settings.content.directory.display(),
        "serving site"
    );

    axum::serve(listener, router.into_make_service())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    Ok(())
}

async fn run_routes(settings: config::Settings) -> Result<(), AppError> {
    let services = build_site_services(&settings)?;
    let today = OffsetDateTime::now_utc().date();

    let routes = services
        .sitemap
        .production_routes(today)
        .await
        .map_err(|err| AppError::unexpected(err.to_string()))?;

    for route in routes {
        println!("{route}");
    }
    Ok(())
}

async fn run_export(settings: config::Settings, args: config::ExportArgs) -> Result<(), AppError> {
    let services = build_site_services(&settings)?;
    let today = OffsetDateTime::now_utc().date();

    info!(
        target = "ardesia::export",
        out_dir = %args.out_dir.display(),
        "starting export"
    );

    let exporter = ExportService::new(
        services.feed.as_ref().clone(),
        services.chrome.as_ref().clone(),
        services.sitemap.as_ref().clone(),
        settings.site.clone(),
    );

    let report = exporter
        .export(&args.out_dir, today)
        .await
        .map_err(|err| AppError::unexpected(err.to_string()))?;

    info!(
        target = "ardesia::export",
        documents = report.documents,
        "export finished"
    );
    Ok(())
}
