//! BLAKE2b helpers.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Blake2b512, Digest};

type Blake2b256 = Blake2b<U32>;

/// BLAKE2b with a 256-bit output; used for file names and url tags.
pub fn blake2b_256(data: impl AsRef<[u8]>) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Blake2b256::digest(data.as_ref()));
    out
}

/// BLAKE2b with a 512-bit output; the content digest hash.
pub fn blake2b_512(data: impl AsRef<[u8]>) -> [u8; 64] {
    let mut out = [0u8; 64];
    out.copy_from_slice(&Blake2b512::digest(data.as_ref()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crev_core::to_base64;

    #[test]
    fn test_blake2b_256_vectors() {
        let pairs = [
            ("", "DldRwCblQ7Loqy6wYJnaodHl30d3j3eH-qtFzfEv46g"),
            (
                "npm-crev: code review for npm",
                "UbnTwKnLvBXCcaLj1ueLm6RjwLBkdxR-JtzI6M4hhNU",
            ),
        ];
        for (input, expected) in pairs {
            assert_eq!(to_base64(blake2b_256(input)), expected);
        }
        assert_eq!(
            to_base64(blake2b_256("a".repeat(1024))),
            "QpqNpLRBhG13qVKxap1L705AxzsQNsj4SjEnnRPsGqo"
        );
    }

    #[test]
    fn test_blake2b_512_vector() {
        assert_eq!(
            hex::encode(blake2b_512("foo")),
            "ca002330e69d3e6b84a46a56a6533fd79d51d97a3bb7cad6c2ff43b354185d6d\
             c1e723fb3db4ae0737e120378424c714bb982d9dc5bbd7a0ab318240ddd18f8d"
        );
    }
}
