use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use dbpedialite::config::{self, ClientConfig};
use dbpedialite::content::clean_html_text;
use dbpedialite::formats::{self, Format};
use dbpedialite::freebase::FreebaseApi;
use dbpedialite::models::Entity;
use dbpedialite::redirect::{Resolution, Resolver};
use dbpedialite::stats::LookupStats;
use dbpedialite::wikidata::WikidataApi;
use dbpedialite::wikipedia::WikipediaApi;
use indicatif::ProgressBar;
use std::process::ExitCode;
use std::time::{Duration, Instant};
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Exit code when a lookup did not produce an entity
const EXIT_NOT_RESOLVED: u8 = 2;

#[derive(Parser)]
#[command(name = "dbpedialite")]
#[command(about = "Describe Wikipedia pages and categories as linked data")]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(flatten)]
    endpoints: EndpointArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct EndpointArgs {
    /// Wikipedia API endpoint
    #[arg(long, global = true, default_value = config::WIKIPEDIA_API)]
    wikipedia_api: String,

    /// Wikidata API endpoint
    #[arg(long, global = true, default_value = config::WIKIDATA_API)]
    wikidata_api: String,

    /// Freebase MQL read endpoint
    #[arg(long, global = true, default_value = config::FREEBASE_MQLREAD)]
    freebase_api: String,

    /// Override connect and read timeouts for every client, in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Describe one or more articles by page id
    Thing(ThingArgs),
    /// Describe a category and its members by page id
    Category(OutputArgs),
    /// Look up a page by title and describe it
    Title(TitleArgs),
    /// Search Wikipedia and list matching titles
    Search(SearchArgs),
}

#[derive(Args)]
struct OutputArgs {
    /// Page id
    page_id: u64,

    #[command(flatten)]
    render: RenderArgs,
}

#[derive(Args)]
struct ThingArgs {
    /// Page ids
    #[arg(required = true)]
    page_ids: Vec<u64>,

    #[command(flatten)]
    render: RenderArgs,
}

#[derive(Args)]
struct TitleArgs {
    /// Page title, e.g. "Ceres, Fife"
    title: String,

    #[command(flatten)]
    render: RenderArgs,
}

#[derive(Args, Clone)]
struct RenderArgs {
    /// Output format suffix (html, json, jsonld, ttl, nt, rdf, trix)
    #[arg(short, long, default_value = config::DEFAULT_FORMAT)]
    format: String,

    /// Pick the format from an Accept header value instead of --format
    #[arg(long)]
    accept: Option<String>,

    /// Skip Wikidata and Freebase lookups
    #[arg(long)]
    no_enrich: bool,

    /// Follow one redirect instead of reporting it
    #[arg(long)]
    follow_redirects: bool,
}

#[derive(Args)]
struct SearchArgs {
    /// Search term
    term: String,

    /// Maximum number of results
    #[arg(long, default_value_t = config::SEARCH_LIMIT)]
    limit: u32,
}

/// Upstream clients and counters shared by one invocation.
struct Session {
    wikipedia: WikipediaApi,
    wikidata: WikidataApi,
    freebase: FreebaseApi,
    stats: LookupStats,
}

impl Session {
    fn new(args: &EndpointArgs) -> Result<Self> {
        let configure = |config: ClientConfig, endpoint: &str| {
            let config = config.with_endpoint(endpoint);
            match args.timeout {
                Some(secs) => config.with_timeout(Duration::from_secs(secs)),
                None => config,
            }
        };

        let wikipedia = WikipediaApi::new(&configure(ClientConfig::wikipedia(), &args.wikipedia_api))
            .context("Failed to build Wikipedia client")?;
        let wikidata = WikidataApi::new(&configure(ClientConfig::wikidata(), &args.wikidata_api))
            .context("Failed to build Wikidata client")?;
        let freebase = FreebaseApi::new(&configure(ClientConfig::freebase(), &args.freebase_api))
            .context("Failed to build Freebase client")?;

        Ok(Self {
            wikipedia,
            wikidata,
            freebase,
            stats: LookupStats::new(),
        })
    }

    fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.wikipedia)
    }

    /// Enriches and prints a resolved entity; reports any other outcome. Returns whether an entity was printed.
    fn emit(&self, resolution: Resolution<Entity>, render: &RenderArgs, format: Format) -> Result<bool> {
        self.stats.record_resolution(&resolution);

        let mut entity = match resolution {
            Resolution::Resolved(entity) => entity,
            Resolution::Redirected(target) => {
                eprintln!("Redirect: {} ({})", target.page_id, target.title);
                return Ok(false);
            }
            Resolution::NotFound => {
                eprintln!("Not found");
                return Ok(false);
            }
            Resolution::UnsupportedNamespace { page_id, namespace } => {
                eprintln!("Page {} is in unsupported namespace {}", page_id, namespace);
                return Ok(false);
            }
        };

        match &mut entity {
            Entity::Thing(thing) => {
                self.stats.inc_things();
                if !render.no_enrich {
                    self.stats.record_enrichment(thing.enrich_wikidata(&self.wikidata));
                    self.stats.record_enrichment(thing.enrich_freebase(&self.freebase));
                }
            }
            Entity::Category(_) => self.stats.inc_categories(),
        }

        let triples = entity.to_triples();
        let output = formats::serialize_triples(&entity, &triples, format)
            .with_context(|| format!("Failed to write {}", entity.page().doc_uri()))?;
        self.stats.add_triples(triples.len() as u64);
        println!("{}", output.trim_end());
        Ok(true)
    }
}

fn output_format(render: &RenderArgs) -> Result<Format> {
    let format = match &render.accept {
        Some(accept) => Format::negotiate(Some(accept)),
        None => Format::from_suffix(&render.format),
    };
    format.context("Cannot choose an output format")
}

fn run_thing(session: &Session, args: ThingArgs) -> Result<bool> {
    let format = output_format(&args.render)?;
    let resolver = session.resolver();
    let pb = ProgressBar::new_spinner();
    let start = Instant::now();
    let mut all_found = true;

    for (i, page_id) in args.page_ids.iter().copied().enumerate() {
        pb.set_message(format!("Looking up {}", page_id));
        pb.tick();

        let resolution = if args.render.follow_redirects {
            resolver.thing_following(page_id)
        } else {
            resolver.thing(page_id)
        }
        .with_context(|| format!("Failed to look up thing {}", page_id))?;

        let found = pb.suspend(|| session.emit(resolution, &args.render, format))?;
        all_found &= found;

        if (i as u64 + 1) % config::PROGRESS_INTERVAL == 0 {
            info!(done = i + 1, total = args.page_ids.len(), "Lookup progress");
        }
    }
    pb.finish_and_clear();

    if args.page_ids.len() > 1 {
        let snapshot = session.stats.snapshot();
        eprintln!();
        eprintln!("=== Summary ===");
        eprintln!("Lookup time:          {:.2}s", start.elapsed().as_secs_f64());
        eprintln!("Things loaded:        {}", snapshot.things_loaded);
        eprintln!("Redirects:            {}", snapshot.redirects);
        eprintln!("Not found:            {}", snapshot.not_found);
        eprintln!("Unsupported:          {}", snapshot.unsupported);
        eprintln!("Enrichments resolved: {}", snapshot.enrichments_resolved);
        eprintln!("Enrichments failed:   {}", snapshot.enrichments_failed);
        eprintln!("Triples written:      {}", snapshot.triples_written);
    }

    Ok(all_found)
}

fn run_category(session: &Session, args: OutputArgs) -> Result<bool> {
    let format = output_format(&args.render)?;
    let resolver = session.resolver();
    let resolution = if args.render.follow_redirects {
        resolver.category_following(args.page_id)
    } else {
        resolver.category(args.page_id)
    }
    .with_context(|| format!("Failed to look up category {}", args.page_id))?;

    session.emit(resolution, &args.render, format)
}

fn run_title(session: &Session, args: TitleArgs) -> Result<bool> {
    let format = output_format(&args.render)?;
    let resolver = session.resolver();
    let mut resolution = resolver
        .resolve_title(&args.title)
        .with_context(|| format!("Failed to look up '{}'", args.title))?;

    if args.render.follow_redirects {
        if let Resolution::Redirected(target) = &resolution {
            resolution = resolver
                .resolve(target.page_id)
                .with_context(|| format!("Failed to follow redirect to {}", target.page_id))?;
        }
    }

    session.emit(resolution, &args.render, format)
}

fn run_search(session: &Session, args: SearchArgs) -> Result<bool> {
    let results = session
        .wikipedia
        .search(&args.term, args.limit)
        .with_context(|| format!("Search for '{}' failed", args.term))?;

    if results.is_empty() {
        warn!(term = %args.term, "No search results");
    }
    for result in &results {
        println!("{}\t{}", result.title, clean_html_text(&result.snippet));
    }
    Ok(!results.is_empty())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return ExitCode::FAILURE;
    }

    let result = Session::new(&cli.endpoints).and_then(|session| match cli.command {
        Commands::Thing(args) => run_thing(&session, args),
        Commands::Category(args) => run_category(&session, args),
        Commands::Title(args) => run_title(&session, args),
        Commands::Search(args) => run_search(&session, args),
    });

    match result {
        Ok(true) => {
            info!("Completed successfully");
            ExitCode::SUCCESS
        }
        Ok(false) => ExitCode::from(EXIT_NOT_RESOLVED),
        Err(e) => {
            error!("Error: {:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
