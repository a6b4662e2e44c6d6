use tile_sim::config::{self, Command, FormatArg};
use tile_sim::engine::validate_config;
use tile_sim::error::Result;
use tile_sim::models::{Author, Tile, TileStatus};
use tile_sim::output::{self, Formatter, HumanFormatter, JsonFormatter};
use tile_sim::repository::InMemoryRepository;
use tile_sim::source::RepositoryTiles;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    if let Err(err) = run() {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = config::parse_args()?;

    match cli.command {
        Command::Checks(args) => {
            let faker = config::build_faker(&args.shared)?;
            let tile = faker.checks(&args.params()?)?;
            render(&args.shared.format, &tile);
        }
        Command::Build(args) => {
            let params = args.params()?;
            let tile = match &args.repository {
                Some(path) => {
                    let resolved = config::resolve_config(&args.shared)?;
                    let tiles = RepositoryTiles::new(
                        InMemoryRepository::load(path)?,
                        config::build_clock(&args.shared)?,
                        Author {
                            name: resolved.author_name,
                            avatar_url: resolved.author_avatar_url,
                        },
                    );
                    tiles.build(&params)?
                }
                None => config::build_faker(&args.shared)?.build(&params)?,
            };
            render(&args.shared.format, &tile);
        }
        Command::Issues(args) => {
            let faker = config::build_faker(&args.shared)?;
            let tile = faker.issues(&args.params())?;
            render(&args.shared.format, &tile);
        }
        Command::ListStatuses => {
            for status in TileStatus::ALL {
                println!("{}", status);
            }
        }
        Command::ShowConfig(shared) => {
            let config = config::resolve_config(&shared)?;
            validate_config(&config)?;
            print!("{}", output::describe_config(&config));
        }
    }

    Ok(())
}

fn render(format: &FormatArg, tile: &Tile) {
    let formatter = formatter_for(format);
    print!("{}", formatter.write(tile));
}

fn formatter_for(format: &FormatArg) -> Box<dyn Formatter> {
    match format {
        FormatArg::Human => Box::new(HumanFormatter),
        FormatArg::Json => Box::new(JsonFormatter),
    }
}
