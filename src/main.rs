use clap::Parser;
use monitor_panel::api::{ApiClient, HttpUploader};
use monitor_panel::cli::{Cli, Commands, ReportArgs};
use monitor_panel::config::Config;
use monitor_panel::error::Result;
use monitor_panel::monitor::ReportMonitor;
use monitor_panel::params_store::ParamsStore;
use monitor_panel::progress::BarReporter;
use monitor_panel::uploader::UploadController;
use monitor_panel::{render, scanner};
use monitor_panel_common::{FilterParams, ReportRow, ReportTable};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;
    init_tracing(&config, cli.verbose);

    match cli.command {
        Commands::Report(args) => run_report(&config, &args).await?,

        Commands::Upload { paths } => {
            let files = scanner::collect_media(&paths)?;
            if files.is_empty() {
                println!("No files to upload.");
                return Ok(());
            }

            let client = ApiClient::new(&config)?;
            let uploader = HttpUploader::new(client, &config.upload_path, config.max_upload_bytes);
            let mut controller = UploadController::new(uploader);
            let reporter = BarReporter::new();

            controller.select_files(files, &reporter).await;

            println!();
            for entry in controller.entries() {
                println!("{:<10} {:>3}%  {}", entry.status.as_str(), entry.progress, entry.file_name);
            }
        }

        Commands::Config { set_base_url, show } => {
            let mut config = config;

            if let Some(url) = set_base_url {
                config.set_base_url(url)?;
                println!("✔ Base URL set to {}", config.base_url);
            }

            if show {
                println!("Settings:");
                println!("  Base URL: {}", config.base_url);
                println!("  Upload path: {}", config.upload_path);
                println!("  Page size: {}", config.page_size);
                println!("  Max upload: {} bytes", config.max_upload_bytes);
                match config.timeout_seconds {
                    Some(secs) => println!("  Timeout: {}s", secs),
                    None => println!("  Timeout: none"),
                }
                println!("  Log level: {}", config.log_level);
            }
        }

        Commands::Params { show, clear } => {
            let store = ParamsStore::open_default()?;

            if show || !clear {
                match store.load() {
                    Some(params) => {
                        println!("Saved params ({}):", store.path().display());
                        println!("{}", serde_json::to_string_pretty(&params.to_wire())?);
                    }
                    None => println!("No saved params."),
                }
            }

            if clear {
                if store.clear()? {
                    println!("✔ Saved params removed");
                } else {
                    println!("No saved params.");
                }
            }
        }
    }

    Ok(())
}

/// `--verbose` なら debug、それ以外は `RUST_LOG`、次に設定ファイルのレベル
fn init_tracing(config: &Config, verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new("debug")
    } else {
        match EnvFilter::try_from_default_env() {
            Ok(f) => f,
            Err(_) => match config.log_level.parse::<EnvFilter>() {
                Ok(f) => f,
                Err(e) => {
                    eprintln!(
                        "WARN: log_level '{}' is not a valid tracing filter ({}); falling back to 'info'",
                        config.log_level, e
                    );
                    EnvFilter::new("info")
                }
            },
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

async fn run_report(config: &Config, args: &ReportArgs) -> Result<()> {
    let store = ParamsStore::open_default()?;
    let base = if args.use_saved {
        store.load().unwrap_or_default()
    } else {
        FilterParams::new()
    };
    let params = args.filter_params(base);

    if args.save {
        store.save(&params)?;
    }

    let client = ApiClient::new(config)?;
    let monitor = ReportMonitor::new(client, ReportTable::default().with_page_size(config.page_size));
    monitor.refresh(&params).await?;

    if !args.json {
        println!("{}", monitor.insertions_label());
        println!();
    }

    monitor.with_table(|table| -> Result<()> {
        args.apply_view(table);

        if args.json {
            let page: Vec<&ReportRow> = table.page().into_iter().map(|(_, row)| row).collect();
            println!("{}", serde_json::to_string_pretty(&page)?);
            return Ok(());
        }

        println!("{}", render::render_table(table));
        println!();
        println!("{}  {}", render::selection_label(table), render::page_label(table));

        let selected = table.selected_rows();
        if !selected.is_empty() {
            println!();
            println!("Selected Public_Oid:");
            for (id, _) in selected {
                if let Some(oid) = table.public_oid(id) {
                    println!("  {}", oid);
                }
            }
        }
        Ok(())
    })
}
