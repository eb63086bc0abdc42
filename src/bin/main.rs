use samtools::{QueryBuilder, SearchRequest};
use tracing::info;

/// Offline classifier: prints the SAM Entities API parameters a search
/// would produce, without calling SAM.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(std::io::stderr)
        .init();

    let search = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    info!(search = %search, "Classifying search input");

    let query = QueryBuilder::build(SearchRequest {
        search: Some(search),
        ..SearchRequest::default()
    });

    let output = serde_json::json!({
        "category": query.classified.category,
        "params": query
            .to_query_pairs()
            .into_iter()
            .collect::<std::collections::BTreeMap<_, _>>(),
    });

    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
