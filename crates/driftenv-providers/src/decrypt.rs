//! Decryption hook for key paths declared with `decrypt: true`

/// Error returned by a [`Decryptor`]
pub type DecryptError = Box<dyn std::error::Error + Send + Sync>;

/// Turns a stored ciphertext into plaintext
///
/// The providers in this crate never decrypt on their own; callers plug in
/// whatever scheme their values were encrypted with.
pub trait Decryptor: Send + Sync {
    fn decrypt(&self, ciphertext: &str) -> Result<String, DecryptError>;
}

impl<F> Decryptor for F
where
    F: Fn(&str) -> Result<String, DecryptError> + Send + Sync,
{
    fn decrypt(&self, ciphertext: &str) -> Result<String, DecryptError> {
        self(ciphertext)
    }
}
