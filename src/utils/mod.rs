pub mod clock;
pub mod url_validator;

pub use clock::{Clock, ManualClock, SystemClock};

/// Alphabet used for generated short codes (62 symbols)
pub const SHORTCODE_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Length of generated short codes unless configured otherwise
pub const DEFAULT_SHORTCODE_LENGTH: usize = 6;

pub const MIN_SHORTCODE_LENGTH: usize = 4;
pub const MAX_SHORTCODE_LENGTH: usize = 12;

pub fn generate_random_code(length: usize) -> String {
    use std::iter;

    // 随机选择字母和数字
    iter::repeat_with(|| {
        SHORTCODE_ALPHABET[rand::random_range(0..SHORTCODE_ALPHABET.len())] as char
    })
    .take(length)
    .collect()
}

/// Resample until `is_taken` rejects nothing
///
/// There is no retry limit: with 62^6 possible codes a collision loop is not
/// a practical concern for a single-user store.
pub fn generate_unique_code<F>(length: usize, is_taken: F) -> String
where
    F: Fn(&str) -> bool,
{
    loop {
        let code = generate_random_code(length);
        if !is_taken(&code) {
            return code;
        }
    }
}

/// 4 to 12 ASCII letters or digits
pub fn is_valid_short_code(code: &str) -> bool {
    (MIN_SHORTCODE_LENGTH..=MAX_SHORTCODE_LENGTH).contains(&code.len())
        && code.bytes().all(|b| b.is_ascii_alphanumeric())
}
