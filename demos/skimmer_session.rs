/// Skimmer Session example — one reader, one chapter, before and after learning.
///
/// A simulated reader skims description and lingers on plot. The chapter is
/// rendered with `auto` before any events, then again after the reader's
/// habits have been learned.
///
/// Run with: cargo run --example skimmer_session

use adaptive_reader::core::documents::load_document;
use adaptive_reader::core::identity::InMemoryUsers;
use adaptive_reader::core::reader::AdaptiveReader;
use adaptive_reader::core::simulation::{ReadingSimulator, SimulatedReader};
use adaptive_reader::schema::content::RequestedVersion;
use adaptive_reader::schema::document::{BookId, BookMeta};
use adaptive_reader::schema::pattern::{UserId, UserProfile};
use std::sync::Arc;

fn main() {
    // --- Load the chapter ---
    let meta = BookMeta {
        id: BookId(1),
        title: "The Lane".to_string(),
        author: "Anon".to_string(),
        description: None,
        isbn: None,
        published_year: None,
    };
    let document = load_document(meta, std::path::Path::new("tests/fixtures/chapter.txt"))
        .expect("Failed to read chapter");

    // --- One registered reader ---
    let reader_id = UserId::new("mira");
    let users = Arc::new(InMemoryUsers::new());
    users.register(UserProfile {
        username: reader_id.clone(),
        normal_reading_speed: Some(220),
    });

    let reader = AdaptiveReader::builder()
        .documents(Arc::new(document))
        .users(users)
        .build()
        .expect("Failed to build reader");

    println!("=== Before learning ===");
    print_chapter(&reader, &reader_id);

    // --- Forty events of skimming habits ---
    let mut sim = ReadingSimulator::new(SimulatedReader::skimmer(), 2026);
    for event in sim.session(40) {
        reader
            .record_reading_event(&reader_id, &reader_id, &event)
            .expect("Failed to record event");
    }

    println!("\n=== Learned patterns ===");
    for (ct, p) in reader
        .get_patterns(&reader_id, &reader_id)
        .expect("Failed to read patterns")
    {
        println!(
            "  {:<14} {:>6.1} wpm  preference {:.2}  attention {:.2}",
            ct.name(),
            p.avg_wpm,
            p.preference_score,
            p.attention_level
        );
    }

    println!("\n=== After learning ===");
    print_chapter(&reader, &reader_id);
}

fn print_chapter(reader: &AdaptiveReader, user: &UserId) {
    for index in 0..reader.paragraph_count() {
        let content = reader
            .get_adaptive(index, RequestedVersion::Auto, user)
            .expect("Paragraph in range");
        println!("\n[{}] {}", content.version, content.text);
    }
}
