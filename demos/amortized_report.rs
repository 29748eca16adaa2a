use std::fs::File;
use std::io;
use std::io::BufWriter;

use chain_hash::report;
use chain_hash::report::ReportConfig;
use clap::Parser;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

#[derive(Parser, Debug)]
struct Args {
    /// Table sizes to measure.
    #[arg(long, value_delimiter = ',', default_values_t = [100usize, 1_000, 10_000, 100_000])]
    sizes: Vec<usize>,

    /// Timed (and warm-up) insertions per table entry.
    #[arg(long, default_value_t = 2)]
    operations_multiplier: usize,

    /// Path of the CSV report to write.
    #[arg(short, long, default_value = "amortized_report.csv")]
    output: String,
}

fn main() -> io::Result<()> {
    let args = Args::parse();

    let mut rng = SmallRng::from_os_rng();
    let mut keygen = move || format!("{:032x}", rng.random::<u128>());

    let mut rows = Vec::with_capacity(args.sizes.len());
    for &size in &args.sizes {
        eprintln!("measuring n = {size}...");
        let single = ReportConfig {
            sizes: vec![size],
            operations_multiplier: args.operations_multiplier,
        };
        rows.extend(report::run(&single, &mut keygen));
    }

    let file = BufWriter::new(File::create(&args.output)?);
    report::write_csv(&rows, file)?;
    eprintln!("wrote {}", args.output);

    Ok(())
}
