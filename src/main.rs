use std::{process, sync::Arc};

use aitoonic::{
    application::{
        context::CatalogStores,
        error::AppError,
        export::{StaticExporter, export_routes},
        render::{SiteProfile, SiteRenderer},
    },
    cache::{RouteTable, SystemClock},
    config,
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{self, HttpState},
        telemetry,
    },
    presentation::views::LayoutChrome,
};
use time::OffsetDateTime;
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
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
    let (cli_args, settings) = config::load_with_cli()?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::ExportStatic(_) => run_export_static(settings).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    let stores = CatalogStores::from_store(repositories);
    let state = HttpState::new(
        &stores,
        &settings.site,
        &settings.cache,
        Arc::new(SystemClock),
        OffsetDateTime::now_utc().year(),
    );
    let router = http::build_router(state);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::bind(settings.server.addr, err)))?;

    info!(
        target = "aitoonic::serve",
        addr = %settings.server.addr,
        static_ttl_secs = settings.cache.static_ttl.as_secs(),
        dynamic_ttl_secs = settings.cache.dynamic_ttl.as_secs(),
        "listening"
    );

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    info!(target = "aitoonic::serve", "server stopped");
    Ok(())
}

async fn run_export_static(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    let stores = CatalogStores::from_store(repositories);
    let catalog = stores.catalog();

    let snapshot = catalog.snapshot().await;
    let routes_table = RouteTable::default();
    let routes = export_routes(routes_table.static_paths(), &snapshot);

    let renderer = SiteRenderer::new(
        catalog,
        stores.admin(),
        SiteProfile::new(settings.site.brand.clone(), &settings.site.public_url),
    );
    let chrome = LayoutChrome::new(settings.site.brand.clone(), OffsetDateTime::now_utc().year());
    let output_dir = settings.export.output_dir.as_path();

    let report = StaticExporter::new(&renderer, &chrome, output_dir)
        .export(&routes)
        .await
        .map_err(|err| AppError::from(InfraError::export(err.to_string())))?;

    if report.failed.is_empty() {
        info!(
            target = "aitoonic::export_static",
            written = report.written.len(),
            output_dir = %output_dir.display(),
            "static export written"
        );
    } else {
        warn!(
            target = "aitoonic::export_static",
            written = report.written.len(),
            failed = ?report.failed,
            output_dir = %output_dir.display(),
            "static export written with skipped routes"
        );
    }

    Ok(())
}

async fn init_repositories(
    settings: &config::Settings,
) -> Result<Arc<PostgresRepositories>, AppError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))
        .map_err(AppError::from)?;

    let pool = PostgresRepositories::connect(database_url, settings.database.max_connections.get())
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    Ok(Arc::new(PostgresRepositories::new(pool)))
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!(target = "aitoonic::serve", "shutdown requested"),
        Err(err) => error!(
            target = "aitoonic::serve",
            error = %err,
            "failed to listen for shutdown signal"
        ),
    }
}
