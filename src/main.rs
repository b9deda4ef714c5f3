use anyhow::Result;
use bitesize::build::build_blog;
use bitesize::config::{Config, Overrides};
use bitesize::render::{render, Format};
use clap::{crate_version, App, Arg, ArgMatches};
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn app<'a, 'b>() -> App<'a, 'b> {
    App::new("bitesize")
        .version(crate_version!())
        .about("Fetches blog posts from a GitHub repository and prints them")
        .arg(
            Arg::with_name("repo")
                .long("repo")
                .value_name("OWNER/NAME")
                .env("BITESIZE_BLOG_GITHUB_REPO")
                .help("The repository holding the posts")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("path")
                .long("path")
                .value_name("PATH")
                .env("BITESIZE_BLOG_GITHUB_POST_PATH")
                .help("The directory within the repository holding the posts")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("token")
                .long("token")
                .value_name("TOKEN")
                .env("BITESIZE_GITHUB_ACCESS_TOKEN")
                .hide_env_values(true)
                .help("A GitHub access token (raises the API rate limit)")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("image-prefix")
                .long("image-prefix")
                .value_name("PATTERN")
                .env("BITESIZE_IMAGE_PREFIX")
                .help("Text in post bodies to replace with --image-new-prefix")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("image-new-prefix")
                .long("image-new-prefix")
                .value_name("PREFIX")
                .env("BITESIZE_IMAGE_NEW_PREFIX")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("config")
                .long("config")
                .short("c")
                .value_name("FILE")
                .help("The project file (defaults to the nearest bitesize.yaml)")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("format")
                .long("format")
                .short("f")
                .possible_values(&["text", "html", "json"])
                .default_value("text")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("Logs more (repeat for debug output)"),
        )
}

fn init_logging(verbosity: u64) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "bitesize=info,warn",
        _ => "bitesize=debug,info",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn overrides(matches: &ArgMatches) -> Overrides {
    let value = |name: &str| matches.value_of(name).map(str::to_owned);
    Overrides {
        repository: value("repo"),
        post_path: value("path"),
        access_token: value("token"),
        image_prefix: value("image-prefix"),
        image_new_prefix: value("image-new-prefix"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = app().get_matches();
    init_logging(matches.occurrences_of("verbose"));

    let config = Config::load(
        matches.value_of("config").map(Path::new),
        &std::env::current_dir()?,
        overrides(&matches),
    )?;
    let format = match matches.value_of("format") {
        Some("html") => Format::Html,
        Some("json") => Format::Json,
        _ => Format::Text,
    };

    let blog = build_blog(&config).await?;
    print!("{}", render(&blog, format)?);
    Ok(())
}
