//! Restores a file compressed by the companion `compress` binary.
//!
//! Usage: decompress <input> <output>

use std::env;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::process;

use log::{error, info};

use order0::entropy::ari;

fn run(input_path: &str, output_path: &str) -> order0::Result<()> {
    let input = BufReader::new(File::open(input_path)?);
    let output = BufWriter::new(File::create(output_path)?);
    let mut output = ari::decompress(input, output)?;
    output.flush()?;
    info!("{} -> {}", input_path, output_path);
    Ok(())
}

fn main() {
    pretty_env_logger::init();
    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} <input> <output>", args[0]);
        process::exit(1);
    }
    if let Err(e) = run(&args[1], &args[2]) {
        error!("{}", e);
        process::exit(1);
    }
}
