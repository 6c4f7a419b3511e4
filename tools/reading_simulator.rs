/// Reading Simulator — drives the learning loop with a seeded synthetic
/// reader and prints how the stored patterns evolve.
///
/// Usage: reading_simulator [--reader skimmer|steady] [--events <n>] [--seed <n>]
///                          [--normal-wpm <n>] [--config <reader.ron>] [--json]
use adaptive_reader::core::config::ReaderConfig;
use adaptive_reader::core::selector::AdaptiveSelector;
use adaptive_reader::core::simulation::{ReadingSimulator, SimulatedReader};
use adaptive_reader::core::tracker::{InMemoryPatternStore, PatternTracker};
use adaptive_reader::schema::content::{AnalyzedParagraph, ContentType, RequestedVersion};
use adaptive_reader::schema::pattern::UserId;
use std::collections::BTreeMap;
use std::path::Path;
use std::process;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: reading_simulator [--reader skimmer|steady] [--events <n>] [--seed <n>] [--normal-wpm <n>] [--config <reader.ron>] [--json]";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut reader_kind = "skimmer".to_string();
    let mut events = 40usize;
    let mut seed = 42u64;
    let mut normal_wpm: Option<u32> = None;
    let mut config_path = None;
    let mut json = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--reader" if i + 1 < args.len() => {
                i += 1;
                reader_kind = args[i].clone();
            }
            "--events" if i + 1 < args.len() => {
                i += 1;
                events = args[i].parse().unwrap_or_else(|_| {
                    eprintln!("Error: --events must be a number");
                    process::exit(1);
                });
            }
            "--seed" if i + 1 < args.len() => {
                i += 1;
                seed = args[i].parse().unwrap_or(42);
            }
            "--normal-wpm" if i + 1 < args.len() => {
                i += 1;
                normal_wpm = args[i].parse().ok();
            }
            "--config" if i + 1 < args.len() => {
                i += 1;
                config_path = Some(args[i].clone());
            }
            "--json" => json = true,
            "--help" | "-h" => {
                println!("{}", USAGE);
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                eprintln!("{}", USAGE);
                process::exit(1);
            }
        }
        i += 1;
    }

    let config = match config_path {
        Some(ref path) => ReaderConfig::load_from_ron(Path::new(path)).unwrap_or_else(|e| {
            eprintln!("Error loading config '{}': {}", path, e);
            process::exit(1);
        }),
        None => ReaderConfig::default(),
    };

    let reader = match reader_kind.as_str() {
        "skimmer" => SimulatedReader::skimmer(),
        "steady" => SimulatedReader::steady(f64::from(normal_wpm.unwrap_or(200)), 6.0),
        other => {
            eprintln!("Error: unknown reader '{}' (expected skimmer or steady)", other);
            process::exit(1);
        }
    };

    let tracker = PatternTracker::new(Arc::new(InMemoryPatternStore::new()), &config);
    let selector = AdaptiveSelector::new(&config);
    let user = UserId::new("simulated");
    let mut sim = ReadingSimulator::new(reader, seed);

    let session = sim.session(events);
    if !json {
        println!("Simulating {} events (seed {})...", session.len(), seed);
        println!(
            "{:>4}  {:<14} {:>8} {:>7}  {:>8} {:>6} {:>6}",
            "#", "type", "obs wpm", "dwell", "avg wpm", "pref", "attn"
        );
    }
    for (n, event) in session.iter().enumerate() {
        let p = tracker.record_event(&user, event, normal_wpm);
        if !json {
            println!(
                "{:>4}  {:<14} {:>8.1} {:>7.1}  {:>8.1} {:>6.3} {:>6.3}",
                n + 1,
                event.content_type.name(),
                event.observed_wpm,
                event.dwell_time_seconds,
                p.avg_wpm,
                p.preference_score,
                p.attention_level
            );
        }
    }

    // What `auto` would serve for a paragraph of each primary type
    let mut auto_choice = BTreeMap::new();
    for ct in ContentType::ALL {
        let probe = AnalyzedParagraph {
            index: 0,
            original_text: String::new(),
            segments: Vec::new(),
            reading_difficulty: 0.0,
            importance_score: 0.0,
            primary_type: ct,
        };
        let version = selector.resolve(&probe, RequestedVersion::Auto, |t| tracker.pattern(&user, t));
        auto_choice.insert(ct, version);
    }

    let patterns: BTreeMap<_, _> = tracker.patterns(&user).into_iter().collect();
    if json {
        let report = serde_json::json!({
            "seed": seed,
            "events": session.len(),
            "patterns": patterns,
            "auto": auto_choice,
        });
        match serde_json::to_string_pretty(&report) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("Error serializing report: {}", e);
                process::exit(1);
            }
        }
    } else {
        println!("\nAuto selection after learning:");
        for (ct, version) in &auto_choice {
            println!("  {:<14} -> {}", ct.name(), version);
        }
    }
}
