//! Data Loading Demonstration
//!
//! Shows how the pieces fit together before a training loop exists:
//! - Tokenizing a corpus and splitting it into train/validation halves
//! - Sampling each half into window pairs
//! - Batching with and without shuffling
//! - Saving the configuration for reproducibility
//!
//! Output is written to: `data/data_loading_<timestamp>/`
//!
//! Run with: `cargo run --example 02_data_loading -- shakespeare.txt`

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::env;
use std::fs;
use std::fs::File;
use std::time::{SystemTime, UNIX_EPOCH};
use yorick::{
    collate, create_dataloader, train_val_split, ByteTokenizer, DataLoader, DatasetConfig,
    TextDataset, Tokenizer,
};

const FALLBACK_TEXT: &str = "To be, or not to be, that is the question: \
Whether 'tis nobler in the mind to suffer \
The slings and arrows of outrageous fortune, \
Or to take arms against a sea of troubles \
And by opposing end them.";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    println!("=== Data Loading Demonstration ===\n");

    // Create timestamped output directory
    let timestamp = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
    let run_dir = format!("data/data_loading_{}", timestamp);
    fs::create_dir_all(&run_dir)?;
    println!("Output directory: {}\n", run_dir);

    let text = match env::args().nth(1) {
        Some(path) => fs::read_to_string(&path)?,
        None => {
            println!("No corpus given, using a built-in passage\n");
            FALLBACK_TEXT.to_string()
        }
    };
    let text: String = text.chars().take(100_000).collect();
    println!("Loaded {} characters of text\n", text.chars().count());

    let tokenizer = ByteTokenizer;
    let config = DatasetConfig {
        max_length: 16,
        stride: 8,
        batch_size: 4,
        shuffle: true,
        drop_last: true,
        seed: Some(42),
    };

    // ========================================================================
    // 1. Train/Val Split
    // ========================================================================
    println!("{}", "=".repeat(70));
    println!("1. Train/Validation Split");
    println!("{}", "=".repeat(70));

    let all_tokens = tokenizer.encode(&text);
    let (train_tokens, val_tokens) = train_val_split(&all_tokens, 0.1)?;

    println!("\nSplit data:");
    println!("  Total tokens: {}", all_tokens.len());
    println!("  Training tokens: {} (90%)", train_tokens.len());
    println!("  Validation tokens: {} (10%)", val_tokens.len());

    let window = config.window()?;
    let train = TextDataset::from_tokens(train_tokens.to_vec(), window);
    let val = TextDataset::from_tokens(val_tokens.to_vec(), window);
    println!("  Training pairs: {}", train.len());
    println!("  Validation pairs: {}", val.len());

    // ========================================================================
    // 2. Batching
    // ========================================================================
    println!("\n{}", "=".repeat(70));
    println!("2. Batching");
    println!("{}", "=".repeat(70));

    let loader_config = config.loader()?;
    let mut loader = DataLoader::new(train.into_samples(), loader_config, config.rng());

    println!("\nCreated data loader:");
    println!("  Batch size: {}", loader_config.batch_size());
    println!("  Batches per epoch: {}\n", loader.num_batches());

    // Each epoch draws a fresh order from the loader's own RNG
    for epoch in 0..2 {
        if let Some((inputs, targets)) = loader.next_batch() {
            println!("  Epoch {} first batch: {} sequences", epoch + 1, inputs.len());
            println!("    Input:  {:?}", tokenizer.decode(&inputs[0]));
            println!("    Target: {:?}", tokenizer.decode(&targets[0]));
        }
        while loader.next_batch().is_some() {}
    }

    // Same seed, same batches
    let fixed = collate(val.samples(), loader_config, &mut StdRng::seed_from_u64(7));
    let again = collate(val.samples(), loader_config, &mut StdRng::seed_from_u64(7));
    println!(
        "\nValidation batches: {} (reproducible with a fixed seed: {})",
        fixed.len(),
        fixed == again
    );

    // ========================================================================
    // 3. One-Call Loader
    // ========================================================================
    println!("\n{}", "=".repeat(70));
    println!("3. One-Call Loader");
    println!("{}", "=".repeat(70));

    let mut loader = create_dataloader(&text, &tokenizer, &config)?;
    let batches = std::iter::from_fn(|| loader.next_batch()).count();
    println!("\ncreate_dataloader produced {} batches", batches);

    let config_path = format!("{}/dataset.json", run_dir);
    config.save(&config_path)?;
    println!("\n✅ Config written to: {}", config_path);

    let samples_path = format!("{}/validation_samples.json", run_dir);
    serde_json::to_writer_pretty(File::create(&samples_path)?, val.samples())?;
    println!("✅ Validation pairs written to: {}", samples_path);

    Ok(())
}
