use clap::Parser;
use hitl_review::{cli, client, config, error, review, summary};
use cli::{Cli, Commands};
use client::MetadataClient;
use config::Config;
use error::Result;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::load()?;
    let backend_url = cli.backend_url.as_deref();

    match cli.command {
        Commands::Review { filter, log, offline } => {
            println!("🔍 hitl-review - 検出レビュー\n");
            let client = MetadataClient::new(&config, backend_url)?;
            let options = review::ReviewOptions {
                filter,
                log_output: log,
                offline,
            };
            review::run_interactive_review(&client, &config, options).await?;
        }

        Commands::Summary => {
            println!("📊 hitl-review - 進捗サマリー\n");
            let client = MetadataClient::new(&config, backend_url)?;
            let images = client.load().await?;
            summary::print_summary(&images);
        }

        Commands::Config { set_backend_url, set_window_size, show } => {
            if let Some(url) = set_backend_url {
                config.set_backend_url(url)?;
                println!("✔ バックエンドURLを設定しました");
            }

            if let Some(size) = set_window_size {
                config.set_window_size(size)?;
                println!("✔ ウィンドウサイズを設定しました");
            }

            if show {
                println!("設定:");
                println!("  バックエンドURL: {}", config.backend_url);
                let effective = backend_url.map(str::to_string).unwrap_or_else(|| config.get_backend_url());
                if effective != config.backend_url {
                    println!("  （今回の接続先: {}）", effective);
                }
                println!("  ウィンドウサイズ: {}", config.window_size);
                match config.timeout_seconds {
                    Some(secs) => println!("  タイムアウト: {}秒", secs),
                    None => println!("  タイムアウト: なし"),
                }
                println!("  クラス: {}", config.class_names.join(", "));
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
