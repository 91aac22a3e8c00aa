//! Keccak-256 as used by the EVM: the original Keccak submission, not NIST
//! SHA-3. The two differ only in the domain-separation suffix (`0x01` here,
//! `0x06` for SHA3-256).
//!
//! Sponge parameters: rate 1088 bits (136 bytes), capacity 512 bits, output
//! 256 bits, 24 rounds of Keccak-f[1600].

/// Bytes absorbed per permutation call.
const RATE: usize = 136;

/// Round constants, iota step.
const RC: [u64; 24] = [
    0x0000000000000001,
    0x0000000000008082,
    0x800000000000808a,
    0x8000000080008000,
    0x000000000000808b,
    0x0000000080000001,
    0x8000000080008081,
    0x8000000000008009,
    0x000000000000008a,
    0x0000000000000088,
    0x0000000080008009,
    0x000000008000000a,
    0x000000008000808b,
    0x800000000000008b,
    0x8000000000008089,
    0x8000000000008003,
    0x8000000000008002,
    0x8000000000000080,
    0x000000000000800a,
    0x800000008000000a,
    0x8000000080008081,
    0x8000000000008080,
    0x0000000080000001,
    0x8000000080008008,
];

/// Rotation amounts for the combined rho/pi step, in pi traversal order.
const RHO: [u32; 24] = [
    1, 3, 6, 10, 15, 21, 28, 36, 45, 55, 2, 14, 27, 41, 56, 8, 25, 43, 62, 18, 39, 61, 20, 44,
];

/// Lane order for the pi permutation cycle starting at lane 1.
const PI: [usize; 24] = [
    10, 7, 11, 17, 18, 3, 5, 16, 8, 21, 24, 4, 15, 23, 19, 13, 12, 2, 20, 14, 22, 9, 6, 1,
];

fn keccak_f(state: &mut [u64; 25]) {
    for &rc in &RC {
        // theta
        let mut parity = [0u64; 5];
        for x in 0..5 {
            parity[x] =
                state[x] ^ state[x + 5] ^ state[x + 10] ^ state[x + 15] ^ state[x + 20];
        }
        for x in 0..5 {
            let d = parity[(x + 4) % 5] ^ parity[(x + 1) % 5].rotate_left(1);
            for y in 0..5 {
                state[x + 5 * y] ^= d;
            }
        }

        // rho and pi, walking the permutation cycle
        let mut carry = state[1];
        for (lane, rot) in PI.iter().zip(RHO) {
            let tmp = state[*lane];
            state[*lane] = carry.rotate_left(rot);
            carry = tmp;
        }

        // chi
        for row in state.chunks_exact_mut(5) {
            let copy = [row[0], row[1], row[2], row[3], row[4]];
            for x in 0..5 {
                row[x] = copy[x] ^ (!copy[(x + 1) % 5] & copy[(x + 2) % 5]);
            }
        }

        // iota
        state[0] ^= rc;
    }
}

fn absorb(state: &mut [u64; 25], block: &[u8]) {
    for (lane, chunk) in state.iter_mut().zip(block.chunks_exact(8)) {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(chunk);
        *lane ^= u64::from_le_bytes(bytes);
    }
    keccak_f(state);
}

/// Keccak-256 digest of `data`.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut state = [0u64; 25];

    let mut blocks = data.chunks_exact(RATE);
    for block in &mut blocks {
        absorb(&mut state, block);
    }

    // pad10*1 with the 0x01 domain suffix; collapses to 0x81 when the
    // remainder fills all but the final byte
    let remainder = blocks.remainder();
    let mut last = [0u8; RATE];
    last[..remainder.len()].copy_from_slice(remainder);
    last[remainder.len()] ^= 0x01;
    last[RATE - 1] ^= 0x80;
    absorb(&mut state, &last);

    let mut digest = [0u8; 32];
    for (chunk, lane) in digest.chunks_exact_mut(8).zip(&state) {
        chunk.copy_from_slice(&lane.to_le_bytes());
    }
    digest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input() {
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn hello_world() {
        assert_eq!(
            hex::encode(keccak256(b"Hello World!")),
            "3ea2f1d0abf3fc66cf29eebb70cbd4e7fe762ef8a09bcc06c8edf641230afec0"
        );
    }

    #[test]
    fn rate_boundary_inputs() {
        // One block minus one, exactly one block, one block plus one: the
        // padding byte placement differs in each case.
        for len in [RATE - 1, RATE, RATE + 1] {
            let digest = keccak256(&vec![0xabu8; len]);
            assert_eq!(digest.len(), 32);
            assert_ne!(digest, keccak256(&vec![0xabu8; len + 1]));
        }
    }

    #[test]
    fn function_selector() {
        // First four digest bytes of an event/function signature, the
        // selector every EVM tool derives.
        let digest = keccak256(b"transfer(address,uint256)");
        assert_eq!(hex::encode(&digest[..4]), "a9059cbb");
    }
}
