//! Sample a Text File into Training Batches
//!
//! Tokenizes a file byte by byte, cuts it into sliding windows and prints
//! the resulting batches. Parameters come from a JSON config, a preset, or
//! individual flags (flags win).
//!
//! ## Usage
//!
//! ```bash
//! # Defaults: max_length 256, stride 128, batch size 4, shuffled
//! cargo run --release --example sample -- --data shakespeare.txt
//!
//! # Small windows, no shuffling, show every batch
//! cargo run --release --example sample -- --data shakespeare.txt \
//!     --max-length 8 --stride 4 --batch-size 2 --no-shuffle --show 100
//!
//! # Reproduce a saved run
//! cargo run --release --example sample -- --config data/run/dataset.json
//! ```

use clap::Parser;
use yorick::{create_dataloader, ByteTokenizer, DatasetConfig, Tokenizer};

#[derive(Parser)]
#[command(name = "sample", about = "Cut a text file into sliding-window training batches")]
struct Args {
    /// Path to training text file
    #[arg(long, default_value = "shakespeare.txt")]
    data: String,

    /// Load settings from a JSON config
    #[arg(long)]
    config: Option<String>,

    /// Start from a named preset: tiny or small
    #[arg(long)]
    preset: Option<String>,

    /// Window width in tokens
    #[arg(long)]
    max_length: Option<usize>,

    /// Offset step between windows
    #[arg(long)]
    stride: Option<usize>,

    /// Pairs per batch
    #[arg(long)]
    batch_size: Option<usize>,

    /// Keep generation order instead of shuffling
    #[arg(long)]
    no_shuffle: bool,

    /// Keep a short trailing batch
    #[arg(long)]
    keep_last: bool,

    /// Seed for shuffling
    #[arg(long)]
    seed: Option<u64>,

    /// Number of batches to print
    #[arg(long, default_value = "3")]
    show: usize,

    /// Write the effective config to this path
    #[arg(long)]
    save_config: Option<String>,
}

fn resolve_config(args: &Args) -> Result<DatasetConfig, Box<dyn std::error::Error>> {
    let mut config = match (&args.config, args.preset.as_deref()) {
        (Some(path), _) => DatasetConfig::load(path)?,
        (None, Some("tiny")) => DatasetConfig::tiny(),
        (None, Some("small")) => DatasetConfig::small(),
        (None, Some(other)) => return Err(format!("unknown preset: {}", other).into()),
        (None, None) => DatasetConfig::default(),
    };

    if let Some(max_length) = args.max_length {
        config.max_length = max_length;
    }
    if let Some(stride) = args.stride {
        config.stride = stride;
    }
    if let Some(batch_size) = args.batch_size {
        config.batch_size = batch_size;
    }
    if args.no_shuffle {
        config.shuffle = false;
    }
    if args.keep_last {
        config.drop_last = false;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    config.validate()?;
    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();
    let config = resolve_config(&args)?;

    println!("Configuration:");
    println!("  max_length: {}", config.max_length);
    println!("  stride:     {}", config.stride);
    println!("  batch_size: {}", config.batch_size);
    println!("  shuffle:    {}", config.shuffle);
    println!("  drop_last:  {}", config.drop_last);
    println!("  seed:       {:?}\n", config.seed);

    if let Some(path) = &args.save_config {
        config.save(path)?;
        println!("Config saved to {}\n", path);
    }

    let text = std::fs::read_to_string(&args.data)
        .map_err(|e| format!("{}: {} - download from Project Gutenberg", args.data, e))?;

    let tokenizer = ByteTokenizer;
    let mut loader = create_dataloader(&text, &tokenizer, &config)?;

    if loader.is_empty() {
        println!("Text is too short for max_length {}: no samples", config.max_length);
        return Ok(());
    }

    println!(
        "{} pairs in {} batches per epoch\n",
        loader.len(),
        loader.num_batches()
    );

    for index in 0..args.show {
        let Some((inputs, targets)) = loader.next_batch() else {
            break;
        };
        println!("Batch {} ({} pairs)", index + 1, inputs.len());
        for (input, target) in inputs.iter().zip(&targets) {
            println!("  input:  {:?}", tokenizer.decode(input));
            println!("  target: {:?}", tokenizer.decode(target));
        }
    }

    Ok(())
}
