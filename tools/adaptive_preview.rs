/// Adaptive Preview — shows how a text file is analyzed and what each
/// rendering of every paragraph looks like.
///
/// Usage: adaptive_preview --input <text.txt> [--version full|condensed|summary|auto]
///                         [--paragraph <n>] [--config <reader.ron>]
///                         [--keywords <keywords.ron>] [--warm-up <n>] [--seed <n>] [--json]
///
/// `--warm-up <n>` feeds n simulated skimmer events through the learning
/// loop first, so `auto` has patterns to work from.

use adaptive_reader::core::documents::load_document;
use adaptive_reader::core::identity::InMemoryUsers;
use adaptive_reader::core::reader::AdaptiveReader;
use adaptive_reader::core::simulation::{ReadingSimulator, SimulatedReader};
use adaptive_reader::schema::content::{AdaptiveContent, AnalyzedParagraph};
use adaptive_reader::schema::document::{BookId, BookMeta};
use adaptive_reader::schema::pattern::{UserId, UserProfile};
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const PREVIEW_USER: &str = "preview";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return;
    }

    let mut input_path = None;
    let mut version_tags: Vec<String> = ["full", "condensed", "summary", "auto"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let mut only_paragraph: Option<usize> = None;
    let mut config_path = None;
    let mut keywords_path = None;
    let mut warm_up = 0usize;
    let mut seed: u64 = 42;
    let mut json = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--input" if i + 1 < args.len() => {
                i += 1;
                input_path = Some(args[i].clone());
            }
            "--version" if i + 1 < args.len() => {
                i += 1;
                version_tags = vec![args[i].clone()];
            }
            "--paragraph" if i + 1 < args.len() => {
                i += 1;
                only_paragraph = args[i].parse().ok();
            }
            "--config" if i + 1 < args.len() => {
                i += 1;
                config_path = Some(args[i].clone());
            }
            "--keywords" if i + 1 < args.len() => {
                i += 1;
                keywords_path = Some(args[i].clone());
            }
            "--warm-up" if i + 1 < args.len() => {
                i += 1;
                warm_up = args[i].parse().unwrap_or(0);
            }
            "--seed" if i + 1 < args.len() => {
                i += 1;
                seed = args[i].parse().unwrap_or(42);
            }
            "--json" => json = true,
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let input_path = match input_path {
        Some(p) => p,
        None => {
            eprintln!("Error: --input is required");
            print_usage();
            std::process::exit(1);
        }
    };

    let meta = BookMeta {
        id: BookId(0),
        title: input_path.clone(),
        author: String::new(),
        description: None,
        isbn: None,
        published_year: None,
    };
    let document = match load_document(meta, Path::new(&input_path)) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error reading '{}': {}", input_path, e);
            std::process::exit(1);
        }
    };

    let user = UserId::new(PREVIEW_USER);
    let users = Arc::new(InMemoryUsers::new());
    users.register(UserProfile {
        username: user.clone(),
        normal_reading_speed: None,
    });

    let mut builder = AdaptiveReader::builder()
        .documents(Arc::new(document))
        .users(users);
    if let Some(ref path) = config_path {
        builder = builder.config_path(path);
    }
    if let Some(ref path) = keywords_path {
        builder = builder.keywords_path(path);
    }
    let reader = match builder.build() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error building reader: {}", e);
            std::process::exit(1);
        }
    };

    if warm_up > 0 {
        let mut sim = ReadingSimulator::new(SimulatedReader::skimmer(), seed);
        for event in sim.session(warm_up) {
            if let Err(e) = reader.record_reading_event(&user, &user, &event) {
                eprintln!("Error recording event: {}", e);
                std::process::exit(1);
            }
        }
    }

    let indices: Vec<usize> = match only_paragraph {
        Some(n) => vec![n],
        None => (0..reader.paragraph_count()).collect(),
    };

    let mut report = Vec::new();
    for index in indices {
        let analyzed = match reader.analyze(index) {
            Ok(a) => a,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        };
        let mut renders = Vec::new();
        for tag in &version_tags {
            match reader.get_adaptive_tag(index, tag, &user) {
                Ok(content) => renders.push((tag.clone(), content)),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        if json {
            report.push(serde_json::json!({
                "analysis": analyzed,
                "renders": renders
                    .iter()
                    .map(|(tag, c)| serde_json::json!({ "requested": tag, "content": c }))
                    .collect::<Vec<_>>(),
            }));
        } else {
            print_paragraph(&analyzed, &renders);
        }
    }

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("Error serializing report: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn print_paragraph(analyzed: &AnalyzedParagraph, renders: &[(String, AdaptiveContent)]) {
    println!(
        "\n=== Paragraph {} [{}] importance {:.2}, difficulty {:.2} ===",
        analyzed.index, analyzed.primary_type, analyzed.importance_score, analyzed.reading_difficulty
    );
    for seg in &analyzed.segments {
        println!(
            "  {:>4}..{:<4} {:<14} {}",
            seg.start_pos,
            seg.end_pos,
            seg.content_type.name(),
            seg.text
        );
    }
    for (tag, content) in renders {
        println!("\n  -- {} -> {} --", tag, content.version);
        if content.text.is_empty() {
            println!("  (empty)");
        } else {
            println!("  {}", content.text);
        }
        for h in &content.highlighted_sentences {
            println!("    * {}", h);
        }
    }
}

fn print_usage() {
    println!("Adaptive Preview — inspect analysis and renderings of a text");
    println!();
    println!("Usage: adaptive_preview --input <text.txt> [options]");
    println!();
    println!("Options:");
    println!("  --version <tag>       full, condensed, summary or auto (default: all)");
    println!("  --paragraph <n>       only preview paragraph n");
    println!("  --config <path>       reader config (RON)");
    println!("  --keywords <path>     keyword table (RON)");
    println!("  --warm-up <n>         simulate n skimmer events before rendering");
    println!("  --seed <n>            simulator seed (default: 42)");
    println!("  --json                print the report as JSON");
}
