use anyhow::Result;
use clap::Parser;
use rs_notify_center::{
    checks::{run_startup_checks, seed_products, seed_renewals},
    cli::Args,
    config::Config,
    events::create_command_channel,
    formatter::NotificationFormatter,
    monitoring::setup_metrics,
    store::{NotificationStore, NotifierHandle, shared},
    toast::ToastRunner,
    tracing_setup::setup_tracing,
    ui::{UIController, UIOptions},
};
use tokio::io::BufReader;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    setup_tracing(&args.log_level, args.json_logs)?;

    info!(
        "Starting notification center v{}",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_args(&args)?;

    if config.metrics.enabled {
        setup_metrics(config.metrics.port).await?;
        info!("Metrics server started on port {}", config.metrics.port);
    }

    let store = shared(NotificationStore::new());
    let (command_sender, command_receiver) = create_command_channel();

    let (runner, toast_view) =
        ToastRunner::new(store.clone(), config.toast.clone(), command_receiver).await;
    let runner_handle = tokio::spawn(runner.run());

    if !args.no_checks {
        let today = chrono::Local::now().date_naive();
        let (renewals, products) = (seed_renewals(today), seed_products());
        NotifierHandle::new(store.clone())
            .batch(|n| run_startup_checks(n, &config.checks, &renewals, &products, today))
            .await;
    }

    let mut ui = UIController::new(
        store.clone(),
        toast_view,
        command_sender,
        NotificationFormatter::new(config.output.format.clone(), config.output.colored),
        UIOptions {
            quiet: config.output.quiet,
        },
    );

    if let Err(e) = ui.run(BufReader::new(tokio::io::stdin())).await {
        error!("UI loop error: {}", e);
        return Err(e);
    }

    runner_handle.await?;
    info!("Notification center stopped");
    Ok(())
}
