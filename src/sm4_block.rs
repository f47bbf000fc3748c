use clap::Parser;
use log::*;
use rand::Rng;
use sm::sm4_impl::{process_blocks, Block};
use sm::{select_backend, Direction, Sm4};

mod util;

#[derive(Parser, Debug)]
#[clap(
    name = "sm4_block",
    version = "0.1",
    author = "Shengqi Chen <i@harrychen.xyz>",
    about = "Encrypt or decrypt raw 16-byte blocks with SM4"
)]
pub struct BlockOptions {
    /// 128-bit key in hex
    #[clap(short = 'k', long, required = true)]
    key: String,
    #[clap(short = 'd', long)]
    decrypt: bool,
    /// Encrypt and decrypt this many random blocks and compare
    #[clap(long)]
    self_test: Option<usize>,
    blocks: Vec<String>,
}

fn self_test(cipher: &Sm4, count: usize) -> usize {
    let mut rng = rand::thread_rng();
    let plaintexts: Vec<Block> = (0..count).map(|_| rng.gen()).collect();

    let backend = select_backend();
    info!("Self test of {} blocks on {} backend", count, backend.name());
    let mut blocks = plaintexts.clone();
    process_blocks(backend, &mut blocks, cipher.round_keys(Direction::Encrypt));
    process_blocks(backend, &mut blocks, cipher.round_keys(Direction::Decrypt));

    let mut error_count = 0;
    for (plain, decrypted) in plaintexts.iter().zip(blocks.iter()) {
        if plain != decrypted {
            error_count += 1;
            // print the first mismatch only
            if error_count == 1 {
                error!(
                    "Mismatch: plain text {}, decrypted {}",
                    hex::encode(plain),
                    hex::encode(decrypted)
                );
            }
        }
    }
    error_count
}

fn main() {
    env_logger::builder().init();
    let opts: BlockOptions = BlockOptions::parse();

    let key = match util::decode_hex_array::<16>("key", &opts.key) {
        Ok(key) => key,
        Err(err) => {
            error!("{}", err);
            std::process::exit(1);
        }
    };
    let cipher = Sm4::new(&key);

    if let Some(count) = opts.self_test {
        let errors = self_test(&cipher, count);
        println!("Self test: {}/{} blocks mismatched", errors, count);
        if errors > 0 {
            std::process::exit(2);
        }
        return;
    }

    for input in &opts.blocks {
        let block = match util::decode_hex_array::<16>("block", input) {
            Ok(block) => block,
            Err(err) => {
                error!("{}", err);
                std::process::exit(1);
            }
        };
        let output = if opts.decrypt {
            cipher.decrypt_block(&block)
        } else {
            cipher.encrypt_block(&block)
        };
        println!("{}: {}", input, hex::encode(output));
    }
}
