use std::future::Future;
use std::iter;

/// 62-character alphanumeric alphabet for short codes.
pub const CODE_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Draws `length` characters uniformly at random from [`CODE_ALPHABET`].
///
/// Uniform distribution is what matters here (collision avoidance), not
/// unpredictability.
pub fn random_code(length: usize) -> String {
    iter::repeat_with(|| CODE_ALPHABET[rand::random_range(0..CODE_ALPHABET.len())] as char)
        .take(length)
        .collect()
}

/// Runs `op` up to `max_tries` times. `Ok(Some(_))` is a definitive
/// outcome, `Ok(None)` asks for another try, and `Err` aborts the loop.
/// Returns `Ok(None)` once the budget is spent.
pub async fn attempt<T, E, F, Fut>(max_tries: u32, mut op: F) -> Result<Option<T>, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, E>>,
{
    for _ in 0..max_tries {
        if let Some(value) = op().await? {
            return Ok(Some(value));
        }
    }
    Ok(None)
}
