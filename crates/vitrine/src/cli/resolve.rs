//! Resolution command handlers.

use super::commands::OutputFormat;
use serde_json::{Value as JsonValue, json};
use std::sync::Arc;
use vitrine::{
    Fallback, FallbackContext, ImageReference, ImageResolver, ImageSlot, JsonError, MediaCategory,
    MediaFields, MemoryStore, ResolverConfig, SlotState, VitrineResult,
};

fn context(category: MediaCategory, video_id: Option<String>) -> FallbackContext {
    let context = FallbackContext::new(category);
    match video_id {
        Some(id) => context.with_known_id(id),
        None => context,
    }
}

fn parse_json(raw: &str) -> VitrineResult<JsonValue> {
    serde_json::from_str(raw).map_err(|e| JsonError::new(format!("invalid JSON input: {}", e)).into())
}

fn print_json(value: &JsonValue) -> VitrineResult<()> {
    let text = serde_json::to_string_pretty(value).map_err(JsonError::from)?;
    println!("{}", text);
    Ok(())
}

/// Resolve one reference.
#[tracing::instrument(skip(resolver, reference, format))]
pub fn run_resolve(
    resolver: &ImageResolver,
    reference: &str,
    json: bool,
    category: MediaCategory,
    video_id: Option<String>,
    format: OutputFormat,
) -> VitrineResult<()> {
    let reference = if json {
        ImageReference::from_json(&parse_json(reference)?)
    } else {
        Some(ImageReference::url(reference))
    };

    let context = context(category, video_id);
    let normalized = resolver.normalize(reference.as_ref(), category);
    let resolved = resolver.resolve_with(reference.as_ref(), &context);
    let placeholder = resolver.is_placeholder(resolved.as_str());

    match format {
        OutputFormat::Json => print_json(&json!({
            "category": category.as_str(),
            "normalized": normalized,
            "resolved": resolved,
            "placeholder": placeholder,
        }))?,
        OutputFormat::Human => {
            println!("{}", resolved);
            if placeholder && normalized.is_some() {
                tracing::info!(normalized = ?normalized, "Reference failed recently, showing placeholder");
            }
        }
    }
    Ok(())
}

/// Resolve every image field of a record.
pub fn run_record(
    resolver: &ImageResolver,
    record: &str,
    category: MediaCategory,
    format: OutputFormat,
) -> VitrineResult<()> {
    let fields = MediaFields::from_json(&parse_json(record)?);

    let primary = resolver.resolve(fields.primary(), category);
    let featured = fields
        .featured_image()
        .as_ref()
        .map(|r| resolver.resolve(Some(r), category));
    let thumbnail = fields
        .thumbnail()
        .as_ref()
        .map(|r| resolver.resolve(Some(r), category));
    let images = resolver.resolve_all(fields.images(), category);
    // Galleries never substitute thumbnails, whatever the record's category.
    let gallery = resolver.resolve_all(fields.gallery(), MediaCategory::Gallery);

    match format {
        OutputFormat::Json => print_json(&json!({
            "primary": primary,
            "featuredImage": featured,
            "thumbnail": thumbnail,
            "images": images,
            "gallery": gallery,
        }))?,
        OutputFormat::Human => {
            println!("primary:   {}", primary);
            if let Some(url) = featured {
                println!("featured:  {}", url);
            }
            if let Some(url) = thumbnail {
                println!("thumbnail: {}", url);
            }
            for url in &images {
                println!("image:     {}", url);
            }
            for url in &gallery {
                println!("gallery:   {}", url);
            }
        }
    }
    Ok(())
}

/// Record a failure and print the next candidate.
pub fn run_fallback(
    resolver: &ImageResolver,
    url: &str,
    category: MediaCategory,
    video_id: Option<String>,
    format: OutputFormat,
) -> VitrineResult<()> {
    let fallback = resolver.on_load_error(url, None, &context(category, video_id));

    match (format, &fallback) {
        (OutputFormat::Json, Fallback::Next(candidate)) => print_json(&json!({
            "failed": url,
            "next": candidate.url(),
            "step": candidate.step().to_string(),
        }))?,
        (OutputFormat::Json, Fallback::Done) => print_json(&json!({
            "failed": url,
            "next": null,
            "step": "done",
        }))?,
        (OutputFormat::Human, Fallback::Next(candidate)) => {
            println!("{}\t{}", candidate.url(), candidate.step())
        }
        (OutputFormat::Human, Fallback::Done) => println!("done"),
    }
    Ok(())
}

/// Simulate every source failing, using a throwaway in-memory cache.
pub fn run_chain(
    config: &ResolverConfig,
    url: &str,
    category: MediaCategory,
    video_id: Option<String>,
    format: OutputFormat,
) -> VitrineResult<()> {
    let resolver = ImageResolver::new(config.clone(), Arc::new(MemoryStore::new()));
    let mut slot = ImageSlot::new(Some(ImageReference::url(url)), context(category, video_id));

    let mut rows = vec![(slot.resolve(&resolver), describe(slot.state()))];
    while !slot.is_terminal() {
        let next = slot.on_error(&resolver);
        rows.push((next, describe(slot.state())));
    }

    match format {
        OutputFormat::Json => {
            let steps: Vec<_> = rows
                .iter()
                .map(|(url, step)| json!({"url": url, "step": step}))
                .collect();
            print_json(&JsonValue::Array(steps))?
        }
        OutputFormat::Human => {
            for (i, (url, step)) in rows.iter().enumerate() {
                println!("{}. {}\t{}", i + 1, url, step);
            }
        }
    }
    Ok(())
}

fn describe(state: &SlotState) -> String {
    match state {
        SlotState::Unresolved => "unresolved".to_string(),
        SlotState::Resolved(_) => "resolved".to_string(),
        SlotState::FallbackAttempted { step, .. } => step.to_string(),
        SlotState::Placeholder(_) => "placeholder".to_string(),
    }
}
