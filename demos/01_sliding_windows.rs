//! Sliding Windows, Step by Step
//!
//! Walks through how a token sequence becomes (input, target) training pairs
//! and how the stride changes what the model sees:
//! - Overlapping windows (stride < max_length)
//! - Tiled windows (stride == max_length)
//! - Gapped windows (stride > max_length)
//!
//! Run with: `cargo run --example 01_sliding_windows`

use yorick::{sample, ByteTokenizer, Tokenizer, WindowConfig};

fn show(label: &str, tokens: &[usize], max_length: usize, stride: usize) -> yorick::Result<()> {
    let samples = sample(tokens, max_length, stride)?;

    println!(
        "\n{} (max_length={}, stride={}) → {} pairs",
        label,
        max_length,
        stride,
        samples.len()
    );
    for pair in &samples {
        println!(
            "  offset {:2}: input {:?}  target {:?}",
            pair.offset, pair.input, pair.target
        );
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    println!("=== Sliding-Window Sampling ===");

    // ========================================================================
    // 1. Stride and Overlap
    // ========================================================================
    println!("\n{}", "=".repeat(70));
    println!("1. Stride and Overlap");
    println!("{}", "=".repeat(70));

    let tokens: Vec<usize> = (1..=12).map(|i| i * 10).collect();
    println!("\nTokens: {:?}", tokens);

    show("Overlapping", &tokens, 4, 1)?;
    show("Tiled", &tokens, 4, 4)?;
    show("Gapped", &tokens, 3, 5)?;
    show("Too short", &tokens[..4], 4, 1)?;

    // ========================================================================
    // 2. Prediction Tasks Inside One Pair
    // ========================================================================
    println!("\n{}", "=".repeat(70));
    println!("2. Prediction Tasks Inside One Pair");
    println!("{}", "=".repeat(70));

    let tokenizer = ByteTokenizer;
    let text = "To be, or not to be";
    let ids = tokenizer.encode(text);
    let window = WindowConfig::new(6, 6)?;

    if let Some(first) = window.windows(&ids).next() {
        println!("\nInput window: {:?}", tokenizer.decode(first.input));
        for k in 0..first.input.len() {
            println!(
                "  {:>8} ──▶ {:?}",
                format!("{:?}", tokenizer.decode(&first.input[..=k])),
                tokenizer.decode(&first.target[k..=k])
            );
        }
    }

    // ========================================================================
    // 3. Lazy Iteration
    // ========================================================================
    println!("\n{}", "=".repeat(70));
    println!("3. Lazy Iteration");
    println!("{}", "=".repeat(70));

    let long: Vec<usize> = (0..1_000_000).collect();
    let window = WindowConfig::new(256, 128)?;
    let windows = window.windows(&long);

    println!("\n{} tokens, {} windows, nothing copied yet", long.len(), windows.len());
    let checksum: usize = windows.map(|w| w.target[w.target.len() - 1]).sum();
    println!("Sum of last target token per window: {}", checksum);

    Ok(())
}
