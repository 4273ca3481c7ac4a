use anyhow::{Context, Result as AnyhowResult};
use api_matcher::{parse_args, CatalogBuilder, QueryResult, SearchService};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const SAMPLE_QUERIES: &[&str] = &[
    "How do I get a list of all users?",
    "I want to create a new user",
    "Get details about a specific user",
];

#[tokio::main]
async fn main() -> AnyhowResult<()> {
    let args = parse_args();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if args.debug { "debug" } else { "info" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = args.resolve_config()?;
    debug!(?config, "Resolved configuration");

    let encoder = config
        .create_encoder()
        .context("Failed to initialise encoder")?;
    let service = SearchService::from_path(encoder, &args.spec)
        .with_builder(CatalogBuilder::with_concurrency(config.build_concurrency)?)
        .with_default_top_k(config.default_top_k)?;

    let catalog = service
        .catalog()
        .await
        .with_context(|| format!("Failed to index {:?}", args.spec))?;
    info!("Indexed {} operations", catalog.len());

    let queries: Vec<&str> = if args.query.is_empty() {
        SAMPLE_QUERIES.to_vec()
    } else {
        args.query.iter().map(String::as_str).collect()
    };

    for query in queries {
        let matches = service
            .search(query)
            .await
            .with_context(|| format!("Query failed: {}", query))?;

        if args.json {
            println!("{}", serde_json::to_string_pretty(&matches)?);
        } else {
            print_matches(query, &matches);
        }
    }

    Ok(())
}

fn print_matches(query: &str, matches: &[QueryResult]) {
    println!("\nQuery: {}", query);
    if matches.is_empty() {
        println!("No matching operations.");
    }
    for (i, m) in matches.iter().enumerate() {
        println!("\nMatch {} (Confidence: {:.3}):", i + 1, m.confidence);
        println!("Method: {}", m.method);
        println!("Path: {}", m.path);
        println!("Description: {}", m.description);
    }
}
