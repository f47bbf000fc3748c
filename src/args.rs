use clap::Args;
use sm::sm3_chunked::{ChunkConfig, DEFAULT_THRESHOLD};

#[derive(Args, Debug)]
pub struct ChunkOptions {
    /// Hash large inputs in independent partitions (not standard SM3)
    #[clap(long)]
    pub chunked: bool,
    #[clap(short = 't', long, default_value_t = DEFAULT_THRESHOLD)]
    pub threshold: usize,
    #[clap(short = 'p', long)]
    pub partitions: Option<usize>,
}

impl ChunkOptions {
    pub fn to_config(&self) -> Option<ChunkConfig> {
        if self.chunked {
            Some(ChunkConfig {
                threshold: self.threshold,
                partitions: self.partitions,
            })
        } else {
            None
        }
    }
}
