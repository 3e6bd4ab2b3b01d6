use anyhow::{Context, Result};
use tracing::info;

use marketplace_admin::config::AppConfig;
use marketplace_admin::infra::sqlite::database::Database;
use marketplace_admin::infra::sqlite::seed::seed_demo_catalog;
use marketplace_admin::logging::init_logging;
use marketplace_admin::ui::state::app_state::AppServices;

fn main() {
    if let Err(err) = run() {
        eprintln!("marketplace-admin: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = AppConfig::load()?;
    init_logging(&config.log_filter)?;

    let db_path = config.resolved_db_path()?;
    let database = Database::initialize(&db_path).context("failed to open catalog database")?;
    if config.seed_demo_data && seed_demo_catalog(database.path())? {
        info!(path = %db_path.display(), "seeded demo catalog");
    }

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    let _runtime = runtime.enter();

    let services = AppServices::new(
        database.repo(),
        config.context,
        config.default_page_size,
        config.search_debounce_ms,
        config.resolved_export_dir()?,
    );
    launch(services)
}

#[cfg(feature = "desktop")]
fn ensure_webview_data_dir(base_data_dir: &std::path::Path) -> Result<std::path::PathBuf> {
    let webview_data_dir = base_data_dir.join("webview2");
    std::fs::create_dir_all(&webview_data_dir).with_context(|| {
        format!(
            "failed to create webview dir: {}",
            webview_data_dir.display()
        )
    })?;
    Ok(webview_data_dir)
}

#[cfg(feature = "desktop")]
fn launch(services: AppServices) -> Result<()> {
    use marketplace_admin::app::App;
    use marketplace_admin::config::default_data_dir;

    let webview_data_dir = ensure_webview_data_dir(&default_data_dir()?)?;
    dioxus::LaunchBuilder::desktop()
        .with_cfg(
            dioxus::desktop::Config::new()
                .with_window(dioxus::desktop::WindowBuilder::new().with_title("Marketplace Admin"))
                .with_data_directory(webview_data_dir),
        )
        .with_context(services)
        .launch(App);
    Ok(())
}

#[cfg(not(feature = "desktop"))]
fn launch(services: AppServices) -> Result<()> {
    tracing::error!(
        db = %services.repo.db_path.display(),
        "built without a renderer; rebuild with `--features desktop` to open the admin window"
    );
    Ok(())
}
