use std::fs::File;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::*;
use memmap::Mmap;
use sm::{hash_chunked, sm3, ChunkConfig, Digest};

mod args;
use args::ChunkOptions;

#[derive(Parser, Debug)]
#[clap(
    name = "sm3_hash",
    version = "0.1",
    author = "Shengqi Chen <i@harrychen.xyz>",
    about = "Compute SM3 digests of texts and files"
)]
pub struct HashOptions {
    plain_text: Vec<String>,
    #[clap(short = 'f', long = "file")]
    files: Vec<String>,
    #[clap(flatten)]
    chunk: ChunkOptions,
}

fn digest(input: &[u8], config: &Option<ChunkConfig>) -> Digest {
    match config {
        Some(config) => hash_chunked(input, config),
        None => sm3(input),
    }
}

fn hash_file(path: &str, config: &Option<ChunkConfig>) -> std::io::Result<Digest> {
    let file = File::open(path)?;
    // empty files cannot be mapped
    if file.metadata()?.len() == 0 {
        return Ok(digest(&[], config));
    }
    // SAFETY: the mapping is only read; a file truncated or rewritten
    // while mapped gives a wrong digest or SIGBUS, never unsound reads here.
    let mapped = unsafe { Mmap::map(&file)? };
    debug!("Mapped {} ({} bytes)", path, mapped.len());
    Ok(digest(&mapped, config))
}

fn main() {
    env_logger::builder().init();
    let opts: HashOptions = HashOptions::parse();
    let config = opts.chunk.to_config();
    if let Some(config) = &config {
        warn!(
            "Chunked hashing above {} bytes with {} partitions does not produce standard SM3 digests",
            config.threshold,
            config.partition_count()
        );
    }

    if opts.plain_text.is_empty() && opts.files.is_empty() {
        eprintln!("Input your text to hash:");
        let mut buffer = String::new();
        loop {
            let bytes = std::io::stdin().read_line(&mut buffer).expect("Failed to read stdin");
            if bytes == 0 {
                let hash = digest(buffer.trim().as_bytes(), &config);
                println!("{}", hash);
                break;
            }
        }
        return;
    }

    for str in &opts.plain_text {
        let hash = digest(str.as_bytes(), &config);
        println!("{}: {}", &str, hash);
    }

    if opts.files.is_empty() {
        return;
    }

    let progress = ProgressBar::new(opts.files.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed}/{eta}] [{bar:50.cyan/blue}] {pos}/{len} ({percent}%)")
            .progress_chars("#>-"),
    );

    let mut failed = false;
    for path in &opts.files {
        match hash_file(path, &config) {
            Ok(hash) => println!("{}: {}", path, hash),
            Err(err) => {
                error!("Cannot hash {}: {}", path, err);
                failed = true;
            }
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    if failed {
        std::process::exit(1);
    }
}
