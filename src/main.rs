#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use anyhow::Context;
    use clap::{Parser, Subcommand};
    use tokio::io::{self, BufReader};
    use walkrender::host;
    use walkrender::{RenderParameters, WalkConfig, WalkService};

    #[derive(Parser)]
    #[command(name = "walkrender", version, about = "Render random walks to PNG")]
    struct Cli {
        /// Log at debug level (RUST_LOG still wins when set)
        #[arg(short, long, global = true)]
        verbose: bool,

        #[command(subcommand)]
        command: Command,
    }

    #[derive(Subcommand)]
    enum Command {
        /// Register `walk` and answer JSON request lines from stdin
        Serve {
            /// Exit when stdin closes instead of staying resident
            #[arg(long)]
            exit_on_eof: bool,
            /// Seed every walk for reproducible output
            #[arg(long)]
            seed: Option<u64>,
        },
        /// Render one walk
        Render {
            #[arg(long, default_value_t = 10.0, allow_negative_numbers = true)]
            step_length: f64,
            #[arg(long, default_value_t = 100, allow_negative_numbers = true)]
            steps: i64,
            #[arg(long, default_value_t = 400, allow_negative_numbers = true)]
            width: i64,
            #[arg(long, default_value_t = 400, allow_negative_numbers = true)]
            height: i64,
            #[arg(long)]
            seed: Option<u64>,
            /// PNG file to write
            #[arg(short, long, conflicts_with = "base64")]
            output: Option<PathBuf>,
            /// Print the host response JSON instead of writing a file
            #[arg(long)]
            base64: bool,
        },
    }

    fn init_logging(verbose: bool) {
        let level = if verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        };
        // stdout carries protocol responses, so logs go to stderr
        env_logger::Builder::new()
            .filter_level(level)
            .parse_default_env()
            .target(env_logger::Target::Stderr)
            .init();
    }

    async fn serve(config: WalkConfig, exit_on_eof: bool) -> anyhow::Result<()> {
        host::register_builtins(config.clone());
        let service = WalkService::new(config);
        log::info!("`{}` registered; reading requests from stdin", host::WALK);

        let answered = service
            .serve_lines(BufReader::new(io::stdin()), &mut io::stdout())
            .await
            .context("serving stdin")?;
        log::debug!("stdin closed after {} requests", answered);

        if exit_on_eof {
            return service.close().await.map_err(Into::into);
        }
        log::info!("stdin closed; staying resident until terminated");
        std::future::pending::<()>().await;
        Ok(())
    }

    fn render(
        params: RenderParameters,
        config: WalkConfig,
        output: Option<PathBuf>,
        base64: bool,
    ) -> anyhow::Result<()> {
        if base64 {
            let numbers = [
                Some(params.step_length),
                Some(params.num_steps as f64),
                Some(params.width as f64),
                Some(params.height as f64),
            ];
            println!("{}", host::walk_numbers(&numbers, &config).to_json());
            return Ok(());
        }

        let image = walkrender::render_walk(&params, &config)?;
        let path = output.unwrap_or_else(|| PathBuf::from("walk.png"));
        std::fs::write(&path, &image.png_data)
            .with_context(|| format!("writing {}", path.display()))?;
        println!(
            "{} {}x{} sha256={}",
            path.display(),
            image.width,
            image.height,
            image.digest_hex()
        );
        Ok(())
    }

    #[tokio::main]
    pub async fn run() -> anyhow::Result<()> {
        let cli = Cli::parse();
        init_logging(cli.verbose);

        match cli.command {
            Command::Serve { exit_on_eof, seed } => {
                let config = WalkConfig {
                    seed,
                    ..Default::default()
                };
                serve(config, exit_on_eof).await
            }
            Command::Render {
                step_length,
                steps,
                width,
                height,
                seed,
                output,
                base64,
            } => {
                let params = RenderParameters {
                    step_length,
                    num_steps: steps,
                    width,
                    height,
                };
                let config = WalkConfig {
                    seed,
                    ..Default::default()
                };
                render(params, config, output, base64)
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

// The browser build is driven by the library's `start` hook.
#[cfg(target_arch = "wasm32")]
fn main() {}
