//! tinfer CLI — inspect GGUF models and benchmark the inference engine.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use tinfer_engine::model::Model;
use tinfer_engine::{GgmlType, MmapModel};

#[derive(Parser)]
#[command(name = "tinfer", version, about = "Local LLM inference engine for quantized GGUF models")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print model metadata and the tensor directory summary.
    Inspect {
        /// Path to a .gguf model file.
        model: PathBuf,
        /// Also list every tensor with shape and quant type.
        #[arg(long)]
        tensors: bool,
    },
    /// Load a model and measure raw forward-pass throughput.
    Bench {
        /// Path to a .gguf model file.
        model: PathBuf,
        /// Number of decode steps to time.
        #[arg(long, default_value_t = 32)]
        steps: usize,
        /// Context window to allocate.
        #[arg(long, default_value_t = 512)]
        context: usize,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Inspect { model, tensors } => inspect(&model, tensors),
        Command::Bench {
            model,
            steps,
            context,
        } => bench(&model, steps, context),
    }
}

fn inspect(path: &std::path::Path, list_tensors: bool) -> anyhow::Result<()> {
    let model = MmapModel::load(path).context("loading model")?;
    let gguf = &model.gguf;

    println!("file:         {}", path.display());
    println!("size:         {:.1} MB", model.file_size() as f64 / (1024.0 * 1024.0));
    println!("gguf version: {}", gguf.version);
    println!("architecture: {}", model.architecture());
    if let Some(name) = gguf.get_str("general.name") {
        println!("name:         {name}");
    }
    println!("tensors:      {}", model.tensor_count());
    println!("alignment:    {}", gguf.alignment);

    let arch = model.architecture().to_string();
    for suffix in [
        "embedding_length",
        "block_count",
        "attention.head_count",
        "attention.head_count_kv",
        "feed_forward_length",
        "context_length",
        "expert_count",
        "expert_used_count",
    ] {
        if let Some(v) = gguf.get_u32(&format!("{arch}.{suffix}")) {
            println!("{arch}.{suffix}: {v}");
        }
    }

    // Quant mix across the directory.
    let mut by_type: std::collections::BTreeMap<&'static str, (usize, u64)> = Default::default();
    for t in &gguf.tensors {
        let entry = by_type.entry(t.ggml_type.name()).or_default();
        entry.0 += 1;
        entry.1 += t.size_bytes();
    }
    println!("\nquant mix:");
    for (name, (count, bytes)) in &by_type {
        println!(
            "  {name:8} {count:4} tensors  {:.1} MB",
            *bytes as f64 / (1024.0 * 1024.0)
        );
    }

    if list_tensors {
        println!("\ntensor directory:");
        for t in &gguf.tensors {
            let dims: Vec<String> = t.dims.iter().map(u64::to_string).collect();
            println!(
                "  {:48} {:8} [{}]",
                t.name,
                t.ggml_type.name(),
                dims.join(" x ")
            );
        }
    }

    Ok(())
}

fn bench(path: &std::path::Path, steps: usize, context: usize) -> anyhow::Result<()> {
    let model = Model::load(path, context).context("loading model")?;
    let mut state = model.new_state();

    // Tokenizer-free workload: walk a fixed token id through the context.
    let token = model.config.bos_token_id.unwrap_or(0);

    let warmup = std::time::Instant::now();
    model.forward(&mut state, token, 0);
    println!(
        "first forward (cold mmap): {:.1} ms",
        warmup.elapsed().as_secs_f64() * 1000.0
    );

    let quant = model
        .mmap
        .gguf
        .tensors
        .iter()
        .map(|t| t.ggml_type)
        .find(|t| !matches!(t, GgmlType::F32 | GgmlType::F16 | GgmlType::Bf16));

    let started = std::time::Instant::now();
    let steps = steps.min(model.max_seq_len().saturating_sub(1)).max(1);
    for pos in 1..=steps {
        model.forward(&mut state, token, pos);
    }
    let elapsed = started.elapsed().as_secs_f64();

    println!("engine:  {:?}", model.engine_kind());
    if let Some(q) = quant {
        println!("quant:   {}", q.name());
    }
    println!("steps:   {steps}");
    println!("elapsed: {elapsed:.2} s");
    println!("speed:   {:.2} tok/s", steps as f64 / elapsed);
    println!(
        "state:   {:.1} MB (scratch + KV cache)",
        state.memory_bytes() as f64 / (1024.0 * 1024.0)
    );

    Ok(())
}
