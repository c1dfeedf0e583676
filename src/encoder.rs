use std::env;
use std::time::Instant;

use log::{debug, error, info, warn};

use huffman_text_coding::{Separator, compress_file};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        error!("Usage: {} <input_file> [output_file] [--separator=S]", args[0]);
        eprintln!("  📂 <input_file>:  path to the text file to encode.");
        eprintln!("  💾 [output_file]: where to write the container (default output.huff).");
        eprintln!("  ✂️ --separator=S: header entry separator (default ';').");
        std::process::exit(1);
    }

    let input_filepath = &args[1];
    let mut output_filepath = "output.huff";
    let mut separator = Separator::default();

    for arg in &args[2..] {
        if let Some(value) = arg.strip_prefix("--separator=") {
            separator = match Separator::new(value) {
                Ok(s) => s,
                Err(e) => {
                    error!("{}", e);
                    std::process::exit(1);
                }
            };
        } else if arg.starts_with("--") {
            warn!("Ignoring unknown option {}", arg);
        } else {
            output_filepath = arg.as_str();
        }
    }

    info!("--- Start Encoding ---");
    debug!("Header separator: {:?}", separator.as_str());
    let start_time = Instant::now();

    let report = match compress_file(input_filepath, output_filepath, &separator) {
        Ok(report) => report,
        Err(e) => {
            error!("Failed to encode {}: {}", input_filepath, e);
            std::process::exit(1);
        }
    };

    debug!("Encoding finished in {:.2?}.", start_time.elapsed());

    println!(
        "\r\n✅ Encoding successful.\n\
         📂  Input:       {} ({} bytes)\n\
         💾  Output:      {} ({} bytes)\n\
         🔤  Symbols:     {}\n\
         ℹ️  Entropy:     {:.4} bits/symbol\n\
         🗜️  Ratio:       {:.4}%",
        input_filepath,
        report.plain_bytes,
        output_filepath,
        report.packed_bytes,
        report.distinct_symbols,
        report.entropy,
        report.space_saving()
    );

    info!("--- End ---");
}
