//! Failure cache command handlers.

use super::commands::{CacheCommands, OutputFormat};
use serde_json::json;
use strum::IntoEnumIterator;
use vitrine::{ImageResolver, MediaCategory, VitrineResult};

/// Handle failure cache commands.
pub fn handle_cache_command(
    resolver: &ImageResolver,
    cmd: CacheCommands,
    format: OutputFormat,
) -> VitrineResult<()> {
    match cmd {
        CacheCommands::List { category } => list(resolver, selected(category), format),
        CacheCommands::Clear { category } => {
            for category in selected(category) {
                resolver.cache(category).clear();
            }
            Ok(())
        }
        CacheCommands::Prune { category } => {
            let removed: usize = selected(category)
                .into_iter()
                .map(|category| resolver.cache(category).cleanup_expired())
                .sum();
            println!("Removed {} expired entries", removed);
            Ok(())
        }
    }
}

fn selected(category: Option<MediaCategory>) -> Vec<MediaCategory> {
    match category {
        Some(category) => vec![category],
        None => MediaCategory::iter().collect(),
    }
}

fn list(
    resolver: &ImageResolver,
    categories: Vec<MediaCategory>,
    format: OutputFormat,
) -> VitrineResult<()> {
    match format {
        OutputFormat::Json => {
            let mut out = serde_json::Map::new();
            for category in categories {
                let entries: serde_json::Map<_, _> = resolver
                    .cache(category)
                    .entries()
                    .into_iter()
                    .map(|(url, failed_at)| (url, json!(failed_at)))
                    .collect();
                out.insert(category.cache_key().to_string(), entries.into());
            }
            let text = serde_json::to_string_pretty(&out).map_err(vitrine::JsonError::from)?;
            println!("{}", text);
        }
        OutputFormat::Human => {
            for category in categories {
                let entries = resolver.cache(category).entries();
                if entries.is_empty() {
                    continue;
                }
                println!("{} ({}):", category, category.cache_key());
                println!("{:-<80}", "");
                for (url, failed_at) in &entries {
                    println!("{}\t{}", failed_at, url);
                }
                println!("Total: {} entries", entries.len());
            }
        }
    }
    Ok(())
}
