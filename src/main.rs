use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use spexcli::{
    Res, cli,
    cli::{CandidateSource, SimilarOptions},
    config, error,
    filters::{FeatureRange, SongFilter, YearRange},
    management::SongCache,
    output::{Console, Output},
    similarity::Weights,
    types::{Feature, SortAttribute},
    utils,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth,

    /// Check the cached token by printing the current user
    TestAuth,

    /// Fetch new liked songs with genres and audio features
    FetchSongs {
        /// Maximum number of new songs to fetch
        #[clap(long, default_value_t = 100)]
        limit: usize,
    },

    /// Filter liked songs into the working set
    Explore(ExploreOptions),

    /// Sort the working set by an attribute
    Sort {
        /// Attribute to sort by, e.g. tempo, release_date or name
        #[clap(short, long)]
        attribute: SortAttribute,
    },

    /// Create a Spotify playlist from the working set
    CreatePlaylist {
        #[clap(short, long, default_value = "My Filtered Liked Songs")]
        name: String,
        #[clap(short, long, default_value = "A playlist created with spexcli")]
        description: String,
    },

    /// Find songs similar to a set of query songs
    Similar(SimilarArgs),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct ExploreOptions {
    /// Song name contains
    #[clap(short, long)]
    name: Option<String>,
    /// Artist name contains
    #[clap(short, long)]
    artist: Option<String>,
    /// Any genre contains
    #[clap(short, long)]
    genre: Option<String>,
    /// Release date contains (YYYY-MM-DD)
    #[clap(long)]
    release_date: Option<String>,
    #[clap(long)]
    release_year: Option<i32>,
    /// Inclusive range, e.g. 1990-1999
    #[clap(long, value_parser = utils::parse_year_range)]
    release_year_range: Option<YearRange>,
    /// Pitch class, 0 to 11
    #[clap(long)]
    key: Option<f64>,
    /// 1 for major, 0 for minor
    #[clap(long)]
    mode: Option<f64>,

    #[clap(long)]
    min_tempo: Option<f64>,
    #[clap(long)]
    max_tempo: Option<f64>,
    /// In seconds
    #[clap(long)]
    min_duration: Option<f64>,
    /// In seconds
    #[clap(long)]
    max_duration: Option<f64>,
    #[clap(long)]
    min_popularity: Option<f64>,
    #[clap(long)]
    max_popularity: Option<f64>,
    #[clap(long)]
    min_energy: Option<f64>,
    #[clap(long)]
    max_energy: Option<f64>,
    #[clap(long)]
    min_danceability: Option<f64>,
    #[clap(long)]
    max_danceability: Option<f64>,
    #[clap(long)]
    min_happiness: Option<f64>,
    #[clap(long)]
    max_happiness: Option<f64>,
    #[clap(long)]
    min_acousticness: Option<f64>,
    #[clap(long)]
    max_acousticness: Option<f64>,
    #[clap(long)]
    min_instrumentalness: Option<f64>,
    #[clap(long)]
    max_instrumentalness: Option<f64>,
    #[clap(long)]
    min_liveness: Option<f64>,
    #[clap(long)]
    max_liveness: Option<f64>,
    #[clap(long)]
    min_speechiness: Option<f64>,
    #[clap(long)]
    max_speechiness: Option<f64>,
    /// In dB
    #[clap(long, allow_hyphen_values = true)]
    min_loudness: Option<f64>,
    /// In dB
    #[clap(long, allow_hyphen_values = true)]
    max_loudness: Option<f64>,
}

impl From<ExploreOptions> for SongFilter {
    fn from(opt: ExploreOptions) -> Self {
        let ranges = [
            (Feature::Tempo, opt.min_tempo, opt.max_tempo),
            (Feature::Duration, opt.min_duration, opt.max_duration),
            (Feature::Popularity, opt.min_popularity, opt.max_popularity),
            (Feature::Energy, opt.min_energy, opt.max_energy),
            (Feature::Danceability, opt.min_danceability, opt.max_danceability),
            (Feature::Happiness, opt.min_happiness, opt.max_happiness),
            (Feature::Acousticness, opt.min_acousticness, opt.max_acousticness),
            (
                Feature::Instrumentalness,
                opt.min_instrumentalness,
                opt.max_instrumentalness,
            ),
            (Feature::Liveness, opt.min_liveness, opt.max_liveness),
            (Feature::Speechiness, opt.min_speechiness, opt.max_speechiness),
            (Feature::Loudness, opt.min_loudness, opt.max_loudness),
        ]
        .into_iter()
        .map(|(feature, min, max)| FeatureRange { feature, min, max })
        .filter(FeatureRange::is_set)
        .collect();

        SongFilter {
            name: opt.name,
            artist: opt.artist,
            genre: opt.genre,
            release_date: opt.release_date,
            release_year: opt.release_year,
            release_year_range: opt.release_year_range,
            key: opt.key,
            mode: opt.mode,
            ranges,
        }
    }
}

#[derive(Parser, Debug, Clone)]
pub struct SimilarArgs {
    /// Comma-separated liked song names to use as the query.
    /// Without it the working set is the query.
    #[clap(short, long)]
    songs: Option<String>,
    /// Candidate pool: liked_songs, cache or comma-separated song names
    #[clap(short = 'r', long)]
    source: Option<CandidateSource>,
    #[clap(long, default_value_t = 0.7, value_parser = utils::parse_weight)]
    audio_weight: f64,
    #[clap(long, default_value_t = 0.5, value_parser = utils::parse_weight)]
    genre_weight: f64,
    /// Minimum cosine similarity, 0 to 1
    #[clap(short = 't', long, default_value_t = 0.7, value_parser = utils::parse_threshold)]
    similarity_threshold: f64,
}

impl From<SimilarArgs> for SimilarOptions {
    fn from(args: SimilarArgs) -> Self {
        SimilarOptions {
            songs: args.songs.map(|s| utils::parse_song_names(&s)),
            source: args.source,
            weights: Weights {
                genre: args.genre_weight,
                audio: args.audio_weight,
            },
            threshold: args.similarity_threshold,
        }
    }
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

async fn run(command: Command, out: &mut Console) -> Res<()> {
    let cache = SongCache::from_config();

    match command {
        Command::Auth => cli::auth(out).await,
        Command::TestAuth => cli::test_auth(out).await,
        Command::FetchSongs { limit } => cli::fetch_songs(&cache, limit, out).await,
        Command::Explore(opt) => cli::explore(&cache, &opt.into(), out).await.map(|_| ()),
        Command::Sort { attribute } => cli::sort(&cache, attribute, out).await,
        Command::CreatePlaylist { name, description } => {
            cli::create_playlist(&cache, &name, &description, out).await
        }
        Command::Similar(args) => cli::similar(&cache, &args.into(), out).await.map(|_| ()),
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let mut out = Console::new();

    if let Err(e) = config::load_env().await {
        out.warning(&format!("Cannot load environment file: {}", e));
    }

    let cli = Cli::parse();

    if let Err(e) = run(cli.command, &mut out).await {
        out.finish_progress();
        error!("{}", e);
    }
}
