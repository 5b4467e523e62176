use clap::Parser as ClapParser;
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "nodefmt")]
#[command(about = "Pretty-print PostgreSQL node tree debug dumps")]
#[command(version)]
struct Cli {}

fn main() {
    let _cli = Cli::parse();

    if atty::is(atty::Stream::Stdin) {
        eprintln!("No input provided. Pipe a node tree dump to stdin.");
        std::process::exit(1);
    }

    let mut buffer = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut buffer) {
        eprintln!("IO error: {}", e);
        std::process::exit(1);
    }

    match nodefmt::format(&buffer) {
        Ok(output) => println!("{}", output),
        Err(failure) => {
            // Keep whatever rendered before the error; a truncated dump
            // is still worth reading.
            println!("{}", failure.partial);
            eprintln!("{}", failure.error);
            std::process::exit(1);
        }
    }
}
