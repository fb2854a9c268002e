use rand::Rng;

const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
pub const ID_LEN: usize = 9;

/// Short base-36 identifier for new records.
///
/// Collision resistant in practice, not guaranteed unique.
pub fn short_id() -> String {
    let mut rng = rand::thread_rng();
    (0..ID_LEN)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}
