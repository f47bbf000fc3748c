use rand;
use sm;

#[cfg(test)]
mod sm3_tests {

    use super::*;
    use sm::sm3_chunked::{partition_blocks, ChunkConfig};
    use sm::sm3_impl::{compress, padded_len, IV};

    struct Cipher {
        clear: &'static str,
        encrypted: &'static str,
    }

    const TEST_CIPHERS: &'static [Cipher] = &[
        Cipher {
            clear: "",
            encrypted: "1ab21d8355cfa17f8e61194831e81a8f22bec8c728fefb747ed035eb5082aa2b",
        },
        Cipher {
            clear: "616263",
            encrypted: "66c7f0f462eeedd9d1f2d46bdc10e4e24167c4875cf2f7a2297da02b8f4ba8e0",
        },
        Cipher {
            clear: "61626364616263646162636461626364616263646162636461626364616263646162636461626364616263646162636461626364616263646162636461626364",
            encrypted: "debe9ff92275b8a138604889c18e5a4d6fdb70e5387e5765293dcba39c0c5732",
        },
    ];

    const MY_SM3: sm::Hash = sm::SM3;

    fn rand_bytes(len: usize) -> Vec<u8> {
        (0..len).map(|_| rand::random::<u8>()).collect::<Vec<u8>>()
    }

    #[test]
    fn test_my_sm3() {
        for cipher in TEST_CIPHERS.iter() {
            assert_eq!(
                MY_SM3(&hex::decode(cipher.clear).unwrap()).as_ref(),
                hex::decode(cipher.encrypted).unwrap().as_slice()
            )
        }
    }

    #[test]
    fn test_hash_sm3_hex() {
        assert_eq!(
            sm::hash_sm3(b""),
            "1ab21d8355cfa17f8e61194831e81a8f22bec8c728fefb747ed035eb5082aa2b"
        );
        let hex = sm::hash_sm3(b"abc");
        assert_eq!(hex.len(), 64);
        assert_eq!(hex, hex.to_lowercase());
        assert_eq!(hex, sm::sm3(b"abc").to_string());
    }

    #[test]
    fn test_padding() {
        for len in (0..200).chain([1000, 4096, 65535].iter().copied()) {
            let message = rand_bytes(len);
            let padded = sm::pad_message(&message);
            assert_eq!(padded.len() % 64, 0);
            assert_eq!(padded.len(), padded_len(len));
            assert_eq!(&padded[..len], message.as_slice());
            assert_eq!(padded[len], 0x80);
            let tail = padded.len() - 8;
            assert!(padded[len + 1..tail].iter().all(|&b| b == 0));
            // exactly 64 bits left for the length after the marker and zeros
            assert_eq!((tail * 8) % 512, 448);
            let mut length = [0u8; 8];
            length.copy_from_slice(&padded[tail..]);
            assert_eq!(u64::from_be_bytes(length), len as u64 * 8);
        }
    }

    #[test]
    fn test_padding_boundaries() {
        assert_eq!(sm::pad_message(&[]).len(), 64);
        assert_eq!(sm::pad_message(&[0; 55]).len(), 64);
        assert_eq!(sm::pad_message(&[0; 56]).len(), 128);
        assert_eq!(sm::pad_message(&[0; 64]).len(), 128);
    }

    #[test]
    fn test_compress_single_block() {
        let padded = sm::pad_message(b"abc");
        let mut block = [0u8; 64];
        block.copy_from_slice(&padded);
        let mut state = IV;
        compress(&mut state, &block);
        assert_eq!(state[0], 0x66c7f0f4);
        assert_eq!(state[7], 0x8f4ba8e0);
    }

    #[test]
    fn test_partition_blocks() {
        assert_eq!(partition_blocks(10, 3), vec![0..3, 3..6, 6..10]);
        assert_eq!(partition_blocks(2, 4), vec![0..2]);
        assert_eq!(partition_blocks(8, 0), vec![0..8]);
        let ranges = partition_blocks(16385, 7);
        assert_eq!(ranges.first().unwrap().start, 0);
        assert_eq!(ranges.last().unwrap().end, 16385);
        for pair in ranges.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn test_partition_blocks_oversized_count() {
        assert_eq!(partition_blocks(2, usize::MAX), vec![0..2]);
        assert!(partition_blocks(0, usize::MAX).is_empty());
        assert_eq!(partition_blocks(5, 5), vec![0..1, 1..2, 2..3, 3..4, 4..5]);

        let bytes = rand_bytes(300);
        let config = ChunkConfig {
            threshold: 0,
            partitions: Some(usize::MAX),
        };
        assert_eq!(sm::hash_chunked(&bytes, &config), sm::sm3(&bytes));
    }

    #[test]
    fn test_chunked_threshold_boundary() {
        let len = 4096;
        let bytes = rand_bytes(len);
        // a padded length equal to the threshold stays sequential
        let config = ChunkConfig {
            threshold: padded_len(len),
            partitions: Some(2),
        };
        assert_eq!(sm::hash_chunked(&bytes, &config), sm::sm3(&bytes));
        // one byte over is partitioned
        let config = ChunkConfig {
            threshold: padded_len(len) - 1,
            partitions: Some(2),
        };
        assert_ne!(sm::hash_chunked(&bytes, &config), sm::sm3(&bytes));
    }

    #[test]
    fn test_chunked_below_threshold() {
        let config = ChunkConfig {
            threshold: 1024 * 1024,
            partitions: Some(4),
        };
        for _ in 0..20 {
            let len = rand::random::<u16>() as usize;
            let bytes = rand_bytes(len);
            assert_eq!(sm::hash_chunked(&bytes, &config), sm::sm3(&bytes));
        }
        assert_eq!(sm::SM3_CHUNKED(b"abc"), sm::SM3(b"abc"));
    }

    #[test]
    fn test_chunked_single_partition() {
        let bytes = rand_bytes(8192);
        let config = ChunkConfig {
            threshold: 0,
            partitions: Some(1),
        };
        assert_eq!(sm::hash_chunked(&bytes, &config), sm::sm3(&bytes));

        // fewer blocks than partitions: everything lands in the last one
        let config = ChunkConfig {
            threshold: 0,
            partitions: Some(64),
        };
        assert_eq!(sm::hash_chunked(&bytes[..100], &config), sm::sm3(&bytes[..100]));
    }

    #[test]
    fn test_chunked_diverges() {
        let bytes = rand_bytes(64 * 1024);
        let config = ChunkConfig {
            threshold: 0,
            partitions: Some(2),
        };
        let chunked = sm::hash_chunked(&bytes, &config);
        assert_ne!(chunked, sm::sm3(&bytes));

        // each half of the padded message folded from the initial value, XORed
        let padded = sm::pad_message(&bytes);
        let half = padded.len() / 64 / 2 * 64;
        let fold = |blocks: &[u8]| {
            let mut state = IV;
            for chunk in blocks.chunks(64) {
                let mut block = [0u8; 64];
                block.copy_from_slice(chunk);
                compress(&mut state, &block);
            }
            state
        };
        let (first, second) = (fold(&padded[..half]), fold(&padded[half..]));
        let expected: Vec<u8> = first
            .iter()
            .zip(second.iter())
            .flat_map(|(a, b)| (a ^ b).to_be_bytes())
            .collect();
        assert_eq!(chunked.as_ref(), expected.as_slice());
    }

    #[test]
    fn test_chunked_default_threshold() {
        let bytes = rand_bytes(2 * 1024 * 1024);
        let config = ChunkConfig {
            partitions: Some(1),
            ..ChunkConfig::default()
        };
        assert_eq!(sm::hash_chunked(&bytes, &config), sm::sm3(&bytes));
        let config = ChunkConfig {
            partitions: Some(3),
            ..ChunkConfig::default()
        };
        assert_ne!(sm::hash_chunked(&bytes, &config), sm::sm3(&bytes));
    }
}
