//! Block extraction and reconstruction
//!
//! A channel is tiled into non-overlapping 8x8 blocks in row-major block
//! order: block `(bi, bj)` lands at flat index `bj * ceil(w / 8) + bi`.
//! Edge blocks are zero-padded on the right and bottom; reconstruction
//! crops the padding away again, so whatever a transform round-trip leaves
//! in the padded region never reaches the output.

use num_traits::Zero;

/// Samples per block edge.
pub const BLOCK_SIZE: usize = 8;

/// Samples per block.
pub const BLOCK_AREA: usize = BLOCK_SIZE * BLOCK_SIZE;

/// Number of blocks covering a `width` x `height` channel.
pub fn block_count(width: usize, height: usize) -> usize {
    let across = (width + BLOCK_SIZE - 1) / BLOCK_SIZE;
    let down = (height + BLOCK_SIZE - 1) / BLOCK_SIZE;
    across * down
}

/// Split a row-major channel into zero-padded 8x8 blocks.
pub fn extract<T: Copy + Zero>(channel: &[T], width: usize, height: usize) -> Vec<[T; 64]> {
    debug_assert_eq!(channel.len(), width * height);

    let across = (width + BLOCK_SIZE - 1) / BLOCK_SIZE;
    let down = (height + BLOCK_SIZE - 1) / BLOCK_SIZE;

    let mut blocks = Vec::with_capacity(across * down);
    for bj in 0..down {
        for bi in 0..across {
            let mut block = [T::zero(); 64];
            let xs = BLOCK_SIZE.min(width - bi * BLOCK_SIZE);
            let ys = BLOCK_SIZE.min(height - bj * BLOCK_SIZE);
            for y in 0..ys {
                let src = (bj * BLOCK_SIZE + y) * width + bi * BLOCK_SIZE;
                block[y * BLOCK_SIZE..y * BLOCK_SIZE + xs]
                    .copy_from_slice(&channel[src..src + xs]);
            }
            blocks.push(block);
        }
    }
    blocks
}

/// Reassemble a channel from its blocks, dropping the padded samples.
pub fn reconstruct<T: Copy + Zero>(blocks: &[[T; 64]], width: usize, height: usize) -> Vec<T> {
    debug_assert_eq!(blocks.len(), block_count(width, height));

    let across = (width + BLOCK_SIZE - 1) / BLOCK_SIZE;
    let mut channel = vec![T::zero(); width * height];

    for (n, block) in blocks.iter().enumerate() {
        let bi = n % across;
        let bj = n / across;
        let xs = BLOCK_SIZE.min(width - bi * BLOCK_SIZE);
        let ys = BLOCK_SIZE.min(height - bj * BLOCK_SIZE);
        for y in 0..ys {
            let dst = (bj * BLOCK_SIZE + y) * width + bi * BLOCK_SIZE;
            channel[dst..dst + xs].copy_from_slice(&block[y * BLOCK_SIZE..y * BLOCK_SIZE + xs]);
        }
    }
    channel
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts() {
        assert_eq!(block_count(8, 8), 1);
        assert_eq!(block_count(16, 8), 2);
        assert_eq!(block_count(9, 8), 2);
        assert_eq!(block_count(10, 10), 4);
        assert_eq!(block_count(320, 240), 40 * 30);
        assert_eq!(block_count(1, 1), 1);
    }

    #[test]
    fn edge_blocks_are_zero_padded() {
        // 10x10: four blocks, three of them partial
        let channel: Vec<i32> = (0..100).collect();
        let blocks = extract(&channel, 10, 10);
        assert_eq!(blocks.len(), 4);

        // top-left block is fully in bounds
        assert_eq!(blocks[0][0], 0);
        assert_eq!(blocks[0][7], 7);
        assert_eq!(blocks[0][8], 10);

        // top-right block: two columns of data, six of padding
        assert_eq!(blocks[1][0], 8);
        assert_eq!(blocks[1][1], 9);
        assert_eq!(&blocks[1][2..8], &[0; 6]);
        assert_eq!(blocks[1][8], 18);

        // bottom-right block: 2x2 of data in the corner
        assert_eq!(blocks[3][0], 88);
        assert_eq!(blocks[3][1], 89);
        assert_eq!(blocks[3][8], 98);
        assert_eq!(blocks[3][9], 99);
        assert_eq!(blocks[3][10], 0);
        assert_eq!(blocks[3][16], 0);
    }

    #[test]
    fn roundtrip_restores_the_channel() {
        for &(w, h) in &[(8, 8), (16, 8), (10, 10), (17, 5), (1, 1), (3, 20)] {
            let channel: Vec<i32> = (0..(w * h) as i32).map(|v| v * 3 - 100).collect();
            let blocks = extract(&channel, w, h);
            assert_eq!(reconstruct(&blocks, w, h), channel, "{}x{}", w, h);
        }
    }

    #[test]
    fn padded_samples_never_reach_the_output() {
        let channel: Vec<i32> = (0..50).collect(); // 10x5
        let mut blocks = extract(&channel, 10, 5);

        // scribble over every padded position: rows 5.. in both blocks,
        // columns 2.. in the right block
        for block in blocks.iter_mut() {
            for y in 5..8 {
                for x in 0..8 {
                    block[y * 8 + x] = 0x5A5A;
                }
            }
        }
        for y in 0..8 {
            for x in 2..8 {
                blocks[1][y * 8 + x] = -0x5A5A;
            }
        }

        assert_eq!(reconstruct(&blocks, 10, 5), channel);
    }
}
