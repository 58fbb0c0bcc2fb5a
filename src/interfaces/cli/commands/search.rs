use colored::Colorize;

use crate::config::StaticConfig;
use crate::interfaces::cli::CliError;
use crate::services::SearchService;
use crate::services::search::clean_term;

/// Run a search against the configured database and print the hits
pub async fn search_index(config: &StaticConfig, term: &str, json: bool) -> Result<(), CliError> {
    let service = SearchService::new(&config.search.database).with_pool_size(1);
    let term = clean_term(term);
    let results = service.search(&term).await?;

    if json {
        let out = serde_json::to_string_pretty(&results)
            .map_err(|e| CliError::CommandError(e.to_string()))?;
        println!("{}", out);
        return Ok(());
    }

    if results.is_empty() {
        println!("{}", "No results.".yellow());
        return Ok(());
    }

    for result in &results {
        println!("{} {}", result.title.bold(), result.url.blue());
        println!("  {}", result.description.dimmed());
    }
    println!("{} {}", "Total:".green(), results.len());
    Ok(())
}
