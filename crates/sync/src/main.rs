use sheetsync::config::SyncConfig;
use sheetsync::driver;
use sheetsync::fetch::SheetFetcher;
use sheetsync_store::PostgrestStore;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = match SyncConfig::load() {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("SYNC_ERROR {}", err);
            std::process::exit(1);
        }
    };

    let fetcher = match SheetFetcher::new(config.http_timeout()) {
        Ok(fetcher) => fetcher,
        Err(err) => {
            eprintln!("SYNC_ERROR ERR_HTTP_CLIENT {}", err);
            std::process::exit(1);
        }
    };

    let store = match PostgrestStore::new(
        config.store_url.clone(),
        config.service_role_key.clone(),
        config.http_timeout(),
    ) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("SYNC_ERROR ERR_HTTP_CLIENT {}", err);
            std::process::exit(1);
        }
    };

    match driver::run(&config, &fetcher, &store).await {
        Ok(report) => {
            tracing::info!(
                apps = report.apps_upserted,
                apps_rejected = report.apps_rejected,
                user_apps = report.user_apps_upserted,
                user_apps_rejected = report.user_apps_rejected,
                "sheet sync complete"
            );
            println!("sync done");
        }
        Err(err) => {
            eprintln!("SYNC_ERROR {}", err);
            std::process::exit(1);
        }
    }
}
