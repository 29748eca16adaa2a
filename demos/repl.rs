use std::io;

use chain_hash::Cost;
use chain_hash::HashTable;
use chain_hash::command;
use clap::Parser;

#[derive(Parser, Debug)]
struct Args {
    /// Run without the synthetic log-cost surcharge.
    #[arg(long = "no-cost", default_value_t = false)]
    no_cost: bool,
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    let cost = if args.no_cost {
        Cost::Constant
    } else {
        Cost::LogN
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut table: HashTable<String, String> = HashTable::new();
    command::run(&mut table, stdin.lock(), stdout.lock(), cost)
}
