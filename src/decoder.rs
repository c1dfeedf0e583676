use std::env;
use std::time::Instant;

use log::{debug, error, info, warn};

use huffman_text_coding::{Separator, decompress_file};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        error!(
            "Usage: {} <input_file> <output_file> [--separator=S]",
            args[0]
        );
        eprintln!("  📂 <input_file>:  path to the encoded file.");
        eprintln!("  💾 <output_file>: path to write the decoded output.");
        eprintln!("  ✂️ --separator=S: separator used when encoding (default ';').");
        std::process::exit(1);
    }

    let input_filepath = &args[1];
    let output_filepath = &args[2];
    let mut separator = Separator::default();

    for arg in &args[3..] {
        match arg.strip_prefix("--separator=") {
            Some(value) => match Separator::new(value) {
                Ok(s) => separator = s,
                Err(e) => {
                    error!("{}", e);
                    std::process::exit(1);
                }
            },
            None => warn!("Ignoring unexpected argument {}", arg),
        }
    }

    info!("--- Start Decoding ---");
    let start_time = Instant::now();

    let report = match decompress_file(input_filepath, output_filepath, &separator) {
        Ok(report) => report,
        Err(e) => {
            error!("Failed to decode {}: {}", input_filepath, e);
            std::process::exit(1);
        }
    };

    debug!("Decoding finished in {:.2?}.", start_time.elapsed());
    info!("Write successful.");

    println!(
        "\r\n✅ decoding successful.\n\
         📂 input file:        {} ({} bytes)\n\
         💾 output file:       {} ({} bytes)\n\
         ℹ️ entropy:           {:.2} bits/symbol\n\
         🗜️ compression ratio: {:.2}% (relative to decoded output)",
        input_filepath,
        report.packed_bytes,
        output_filepath,
        report.plain_bytes,
        report.entropy,
        report.space_saving()
    );

    info!("--- End ---");
}
