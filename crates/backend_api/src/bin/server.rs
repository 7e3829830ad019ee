use backend_api::run_server;
use std::{env, path::PathBuf};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    reconciliation_engine::init_tracing(
        "backend_api=debug,reconciliation_engine=info,settings_loader=info,tower_http=debug",
    );

    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .unwrap_or(3000);
    let settings_path = env::var("SETTINGS_PATH").ok().map(PathBuf::from);

    // Requests without a `settings` object fall back to these
    let settings = settings_loader::load_settings_or_default(settings_path.as_ref())?;

    println!("Net Worth Reconciliation API");
    println!("============================");
    println!("Listening on: {}:{}", host, port);
    println!(
        "Default goals: provident {} (net {}), cash {}, gap fill {}",
        settings.monthly_provident_goal,
        settings.net_provident_goal(),
        settings.monthly_cash_goal,
        if settings.auto_fill_missing_months { "on" } else { "off" }
    );
    println!();

    run_server(settings, &host, port).await
}
