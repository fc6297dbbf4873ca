//! Preview the generated calibration array for a table
//!
//! Prints each board's identifier words and the rendered initializer without
//! touching any C source.
//!
//! Usage:
//!   cargo run --example preview_table -- <data.xlsx|data.csv> [--sheet <name>] [--multiline]

use board_cali_gen::{Generator, GeneratorConfig, RecordLayout};
use std::env;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(input) = args.first() else {
        eprintln!("Usage: preview_table <data.xlsx|data.csv> [--sheet <name>] [--multiline]");
        std::process::exit(2);
    };

    let mut config = GeneratorConfig::new().with_input(input);
    let mut rest = args[1..].iter();
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--sheet" => {
                if let Some(name) = rest.next() {
                    config = config.with_sheet(name.clone());
                }
            }
            "--multiline" => config = config.with_layout(RecordLayout::Multiline),
            other => eprintln!("Ignoring unknown argument: {}", other),
        }
    }

    let generator = match Generator::new(config) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("✗ {}", e);
            std::process::exit(1);
        }
    };

    let records = match generator.load_records() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("✗ {}", e);
            std::process::exit(1);
        }
    };

    println!("=== {} boards ===", records.len());
    for record in &records {
        let [w0, w1, w2] = record.id.words();
        println!(
            "  row {:>3}: {} → {:08x} {:08x} {:08x}",
            record.row, record.id, w0, w1, w2
        );
    }

    match generator.render(&records) {
        Ok(fragment) => println!("\n{}", fragment),
        Err(e) => {
            eprintln!("✗ {}", e);
            std::process::exit(1);
        }
    }
}
