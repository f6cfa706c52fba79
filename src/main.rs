use clap::{Parser, Subcommand};
use gallo_card::config::{self, CardConfig};
use gallo_card::presentation::Presentation;
use gallo_card::stage::RecordingStage;
use gallo_card::types::{ImageDescriptor, Viewport};
use gallo_card::{auth, css, output, page, provision, shuffle, simulate};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Inputs shared by every command that builds a card.
#[derive(clap::Args, Clone)]
struct CardArgs {
    /// JSON array of image descriptors
    #[arg(long)]
    images: PathBuf,

    /// Presentation options file (stock defaults when omitted)
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Layout inputs for commands that provision images.
#[derive(clap::Args, Clone)]
struct LayoutArgs {
    /// Viewport to lay out against, as WIDTHxHEIGHT
    #[arg(long, default_value = "1280x800", value_parser = parse_viewport)]
    viewport: Viewport,

    /// Shuffle seed (random when omitted)
    #[arg(long)]
    seed: Option<u64>,
}

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // leaked once, at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "gallo-card")]
#[command(about = "Slideshow gallery card tooling")]
#[command(long_about = "\
Slideshow gallery card tooling

The card itself runs in the browser (build the library for wasm32 and call
present() from the host page). This binary validates card inputs, previews
how images will be provisioned, replays presentation events, renders the
host page and prints build configuration.

Image descriptors are a JSON array:

  [
    { \"previews\": [
        { \"url\": \"a-640.jpg\",  \"width\": 640,  \"height\": 427 },
        { \"url\": \"a-1600.jpg\", \"width\": 1600, \"height\": 1067 }
    ] }
  ]

The last preview of each image is its largest; aspect ratio decisions are
taken from it.

Run 'gallo-card gen-config' to print a documented card.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate image descriptors and presentation options
    Check(CardArgs),
    /// Shuffle and show which images fit the width budget
    Plan {
        #[command(flatten)]
        card: CardArgs,
        #[command(flatten)]
        layout: LayoutArgs,
    },
    /// Replay presentation events without a browser
    Simulate {
        #[command(flatten)]
        card: CardArgs,
        #[command(flatten)]
        layout: LayoutArgs,
        /// Comma separated: cover-timeout, image-load, image-error,
        /// cover-faded, images-faded, tick
        #[arg(long)]
        events: String,
    },
    /// Render the HTML page hosting the card
    Page {
        #[command(flatten)]
        card: CardArgs,
        /// URL of the browser build's JS module
        #[arg(long, default_value = "./pkg/gallo_card.js")]
        script: String,
        /// Document title
        #[arg(long, default_value = "Gallo")]
        title: String,
        /// Cover image URL
        #[arg(long)]
        cover: Option<String>,
        /// Reload the page once every image has been shown
        #[arg(long)]
        reload_after_cycle: bool,
        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the auth redirect for a URL fragment, if it carries a token
    AuthUrl {
        /// The fragment, e.g. '#token=…'
        hash: String,
    },
    /// Print the PostCSS configuration for a build environment
    CssConfig {
        /// Build environment; only 'production' enables minification
        #[arg(long, env = "NODE_ENV", default_value = "development")]
        env: String,
        /// Source map option, as JSON
        #[arg(long)]
        map: Option<String>,
        /// Custom parser module
        #[arg(long)]
        parser: Option<String>,
    },
    /// Print a stock card.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Check(card) => {
            let config = load_card(&card)?;
            output::print_check(&config);
            println!("==> Card is valid");
        }
        Command::Plan { card, layout } => {
            let config = load_card(&card)?;
            let images = shuffled(config.images, layout.seed);
            let plans =
                provision::plan_images(&images, layout.viewport, config.presentation.width_limit);
            output::print_plan(
                &images,
                &plans,
                layout.viewport,
                config.presentation.width_limit,
            );
        }
        Command::Simulate {
            card,
            layout,
            events,
        } => {
            let events = simulate::parse_events(&events)?;
            let mut config = load_card(&card)?;
            config.images = shuffled(config.images, layout.seed);
            let mut presentation =
                Presentation::new(RecordingStage::new(layout.viewport), config)?;
            let start = presentation.start();
            let steps = simulate::replay(&mut presentation, &events);
            output::print_simulation(&start, &steps);
        }
        Command::Page {
            card,
            script,
            title,
            cover,
            reload_after_cycle,
            output,
        } => {
            let mut config = load_card(&card)?;
            if reload_after_cycle {
                config.presentation.auto_reload =
                    Some(config.presentation.full_cycle_reload(config.images.len()));
            }
            let options = page::PageOptions {
                title,
                script,
                cover,
            };
            let html = page::render(&config, &options)?.into_string();
            match output {
                Some(path) => std::fs::write(path, html)?,
                None => println!("{}", html),
            }
        }
        Command::AuthUrl { hash } => match auth::redirect_for_hash(&hash) {
            Some(url) => println!("{}", url),
            None => {
                eprintln!("no token in fragment");
                std::process::exit(1);
            }
        },
        Command::CssConfig { env, map, parser } => {
            let env: css::BuildEnv = env.parse()?;
            let map = map.map(|m| serde_json::from_str(&m)).transpose()?;
            let pipeline = css::pipeline(env, css::PipelineOptions { map, parser });
            println!("{}", pipeline.to_json()?);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Logs go to stderr so command output stays clean on stdout.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_card(args: &CardArgs) -> Result<CardConfig, config::ConfigError> {
    let presentation = config::load_config(args.config.as_deref())?;
    let images = config::load_images(&args.images)?;
    let card = CardConfig::new(presentation, images);
    card.validate()?;
    Ok(card)
}

fn shuffled(images: Vec<ImageDescriptor>, seed: Option<u64>) -> Vec<ImageDescriptor> {
    let seed = seed.unwrap_or_else(rand::random);
    tracing::info!(seed, "shuffling images");
    shuffle::shuffle(images, &mut shuffle::seeded_rng(seed))
}

fn parse_viewport(s: &str) -> Result<Viewport, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let width: f64 = w.trim().parse().map_err(|e| format!("bad width '{w}': {e}"))?;
    let height: f64 = h.trim().parse().map_err(|e| format!("bad height '{h}': {e}"))?;
    if width <= 0.0 || height <= 0.0 {
        return Err(format!("viewport dimensions must be positive, got '{s}'"));
    }
    Ok(Viewport::new(width, height))
}
