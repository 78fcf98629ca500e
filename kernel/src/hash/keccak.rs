//! Keccak-256 binding for the certificate kernel.
//!
//! RULE: Keccak-256 (the original Keccak submission's padding, domain byte
//! `0x01`), NOT NIST FIPS 202 SHA3-256 (domain byte `0x06`). The two differ
//! only in the padding suffix but produce completely different digests for
//! the same input — implementations that reach for a generic "sha3" binding
//! and pick the FIPS variant will silently diverge from every root computed
//! here.
//!
//! Implementation: self-contained reference implementation of
//! `keccak-f[1600]` over a 5x5 array of 64-bit lanes, 24 rounds. Zero
//! external cryptographic dependencies.
//!
//! This implementation is intentionally unoptimized. Correctness and
//! cross-platform bit-exact determinism take priority over performance.

/// A Keccak-256 digest: 32 bytes.
pub type Digest = [u8; 32];

const RATE_BYTES: usize = 136; // 1088-bit rate, 512-bit capacity
const LANES: usize = 25;

// Keccak round constants (iota step), 24 rounds.
const RC: [u64; 24] = [
    0x0000000000000001, 0x0000000000008082, 0x800000000000808a, 0x8000000080008000,
    0x000000000000808b, 0x0000000080000001, 0x8000000080008081, 0x8000000000008009,
    0x000000000000008a, 0x0000000000000088, 0x0000000080008009, 0x000000008000000a,
    0x000000008000808b, 0x800000000000008b, 0x8000000000008089, 0x8000000000008003,
    0x8000000000008002, 0x8000000000000080, 0x000000000000800a, 0x800000008000000a,
    0x8000000080008081, 0x8000000000008080, 0x0000000080000001, 0x8000000080008008,
];

// Rotation offsets (rho step), indexed `x + 5*y` for x, y in 0..5.
const ROT: [u32; 25] = [
    0, 1, 62, 28, 27,
    36, 44, 6, 55, 20,
    3, 10, 43, 25, 39,
    41, 45, 15, 21, 8,
    18, 2, 61, 56, 14,
];

fn keccak_f1600(state: &mut [u64; LANES]) {
    for round in 0..24 {
        // Theta
        let mut c = [0u64; 5];
        for x in 0..5 {
            c[x] = state[x] ^ state[x + 5] ^ state[x + 10] ^ state[x + 15] ^ state[x + 20];
        }
        let mut d = [0u64; 5];
        for x in 0..5 {
            d[x] = c[(x + 4) % 5] ^ c[(x + 1) % 5].rotate_left(1);
        }
        for x in 0..5 {
            for y in 0..5 {
                state[x + 5 * y] ^= d[x];
            }
        }

        // Rho + Pi
        let mut b = [0u64; LANES];
        for x in 0..5 {
            for y in 0..5 {
                let new_x = y;
                let new_y = (2 * x + 3 * y) % 5;
                b[new_x + 5 * new_y] = state[x + 5 * y].rotate_left(ROT[x + 5 * y]);
            }
        }

        // Chi
        for x in 0..5 {
            for y in 0..5 {
                state[x + 5 * y] = b[x + 5 * y] ^ ((!b[(x + 1) % 5 + 5 * y]) & b[(x + 2) % 5 + 5 * y]);
            }
        }

        // Iota
        state[0] ^= RC[round];
    }
}

fn absorb_block(state: &mut [u64; LANES], block: &[u8; RATE_BYTES]) {
    for i in 0..RATE_BYTES / 8 {
        let lane = u64::from_le_bytes(block[i * 8..i * 8 + 8].try_into().expect("8-byte slice"));
        state[i] ^= lane;
    }
    keccak_f1600(state);
}

/// Compute the Keccak-256 digest of an arbitrary byte slice.
/// This is the canonical hash function for every commitment in this crate.
pub fn keccak256(input: &[u8]) -> Digest {
    let mut state = [0u64; LANES];

    let mut chunks = input.chunks_exact(RATE_BYTES);
    for block in &mut chunks {
        let block: &[u8; RATE_BYTES] = block.try_into().expect("chunks_exact yields fixed-size slices");
        absorb_block(&mut state, block);
    }
    let rem = chunks.remainder();

    // Keccak multi-rate padding: append 0x01, zero-fill, then OR 0x80 into
    // the final byte of the block. If `rem` already occupies the final byte
    // the two markers land on the same byte (0x01 | 0x80 = 0x81).
    let mut last = [0u8; RATE_BYTES];
    last[..rem.len()].copy_from_slice(rem);
    last[rem.len()] ^= 0x01;
    last[RATE_BYTES - 1] ^= 0x80;
    absorb_block(&mut state, &last);

    // Squeeze: Keccak lanes are little-endian; one squeeze suffices since
    // the 256-bit output fits within the 1088-bit rate.
    let mut out = [0u8; 32];
    for i in 0..4 {
        out[i * 8..i * 8 + 8].copy_from_slice(&state[i].to_le_bytes());
    }
    out
}
