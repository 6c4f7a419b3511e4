/// Keyword Linter — validates a keyword table before it is deployed.
///
/// Usage: keyword_linter <keywords.ron> [--sample <text.txt>]

use adaptive_reader::core::analyzer::ParagraphAnalyzer;
use adaptive_reader::core::config::ReaderConfig;
use adaptive_reader::core::keywords::KeywordTable;
use adaptive_reader::schema::content::ContentType;
use adaptive_reader::schema::document::{BookId, BookMeta, Document};
use std::collections::BTreeMap;
use std::path::Path;
use std::process;
use std::sync::Arc;

const NEAR_MISS_HITS: usize = 2;
const MAX_NEAR_MISSES: usize = 10;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!("Usage: keyword_linter <keywords.ron> [--sample <text.txt>]");
        process::exit(0);
    }

    let table_path = &args[1];
    let mut sample_path = None;

    let mut i = 2;
    while i < args.len() {
        if args[i] == "--sample" && i + 1 < args.len() {
            i += 1;
            sample_path = Some(args[i].clone());
        }
        i += 1;
    }

    let table = match KeywordTable::load_from_ron(Path::new(table_path)) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("ERROR: Failed to load keyword table: {}", e);
            process::exit(1);
        }
    };

    let (errors, warnings) = lint_table(&table);

    println!("\n=== Keyword Lint Report ===\n");

    if errors.is_empty() && warnings.is_empty() {
        println!("All checks passed!");
    }

    for warning in &warnings {
        println!("WARNING: {}", warning);
    }

    for error in &errors {
        println!("ERROR: {}", error);
    }

    println!(
        "\nSummary: {} errors, {} warnings",
        errors.len(),
        warnings.len()
    );

    if let Some(ref path) = sample_path {
        print_sample_distribution(&table, path);
    }

    if errors.is_empty() {
        process::exit(0);
    } else {
        process::exit(1);
    }
}

fn lint_table(table: &KeywordTable) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    // Action and plot only fire on 3+ distinct hits
    for ct in [ContentType::Action, ContentType::PlotCritical] {
        match table.signals.get(&ct) {
            None => errors.push(format!("No '{}' word list; that type can never be assigned", ct)),
            Some(words) if words.len() < 3 => errors.push(format!(
                "'{}' has only {} words; at least 3 distinct hits are needed to assign it",
                ct,
                words.len()
            )),
            Some(_) => {}
        }
    }

    if !table.signals.contains_key(&ContentType::Description) {
        warnings.push(
            "No 'description' word list; action will win on any 3 action hits".to_string(),
        );
    }

    if table.signals.contains_key(&ContentType::Dialogue) {
        warnings.push("'dialogue' word list is ignored; dialogue is detected from quotes".to_string());
    }

    let mut lists: Vec<(String, Vec<&String>)> = table
        .signals
        .iter()
        .map(|(ct, words)| (ct.name().to_string(), words.iter().collect()))
        .collect();
    lists.push(("condense_triggers".to_string(), table.condense_triggers.iter().collect()));
    lists.push(("key_indicators".to_string(), table.key_indicators.iter().collect()));
    lists.sort_by(|a, b| a.0.cmp(&b.0));

    for (name, words) in &lists {
        if words.is_empty() {
            warnings.push(format!("'{}' is empty", name));
        }
        let mut sorted = words.clone();
        sorted.sort();
        for word in sorted {
            if !word.chars().all(|c| c.is_alphanumeric() || c == '_') {
                errors.push(format!(
                    "'{}' contains '{}', which can never match a single word",
                    name, word
                ));
            }
        }
    }

    // Words voting for two content types cancel each other out
    let mut owners: BTreeMap<&str, Vec<&'static str>> = BTreeMap::new();
    for ct in ContentType::ALL {
        if let Some(words) = table.signals.get(&ct) {
            for w in words {
                owners.entry(w.as_str()).or_default().push(ct.name());
            }
        }
    }
    for (word, types) in owners {
        if types.len() > 1 {
            warnings.push(format!("'{}' votes for several types: {}", word, types.join(", ")));
        }
    }

    (errors, warnings)
}

fn print_sample_distribution(table: &KeywordTable, path: &str) {
    let text = match std::fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("ERROR reading sample '{}': {}", path, e);
            return;
        }
    };
    let meta = BookMeta {
        id: BookId(0),
        title: path.to_string(),
        author: String::new(),
        description: None,
        isbn: None,
        published_year: None,
    };
    let doc = Document::from_text(meta, &text);
    let analyzer = ParagraphAnalyzer::new(Arc::new(table.clone()), &ReaderConfig::default());

    let mut counts: BTreeMap<ContentType, usize> = BTreeMap::new();
    let mut near_misses = Vec::new();
    for (i, paragraph) in doc.paragraphs.iter().enumerate() {
        for seg in analyzer.analyze(paragraph, i).segments {
            *counts.entry(seg.content_type).or_default() += 1;
            if seg.content_type != ContentType::Description {
                continue;
            }
            // One more distinct hit would have changed the type
            let signals = analyzer.classifier().signals(&seg.text);
            if signals.action_count == NEAR_MISS_HITS || signals.plot_count == NEAR_MISS_HITS {
                near_misses.push((i, signals, seg.text));
            }
        }
    }

    let total: usize = counts.values().sum();
    println!("\n=== Sample Distribution ({} sentences) ===\n", total);
    for ct in ContentType::ALL {
        let n = counts.get(&ct).copied().unwrap_or(0);
        let pct = if total > 0 { n as f64 * 100.0 / total as f64 } else { 0.0 };
        println!("  {:<14} {:>5}  ({:.1}%)", ct.name(), n, pct);
    }

    if !near_misses.is_empty() {
        println!("\n=== Near Misses ({} description sentences) ===\n", near_misses.len());
        for (paragraph, signals, text) in near_misses.iter().take(MAX_NEAR_MISSES) {
            println!(
                "  [p{}] action {}, description {}, plot {}: {}",
                paragraph,
                signals.action_count,
                signals.description_count,
                signals.plot_count,
                text
            );
        }
        if near_misses.len() > MAX_NEAR_MISSES {
            println!("  ... and {} more", near_misses.len() - MAX_NEAR_MISSES);
        }
    }
}
