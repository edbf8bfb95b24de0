use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

/// Newtype for plaintext credentials to prevent accidental logging
#[derive(Clone)]
pub struct Password(String);

impl Password {
    pub fn new(password: String) -> Self {
        Self(password)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Newtype for a PHC-format password digest
#[derive(Debug, Clone)]
pub struct Digest(String);

impl Digest {
    pub fn new(digest: String) -> Self {
        Self(digest)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// One-way hasher for account passwords and client secrets.
///
/// Uses Argon2id. The digest is self-describing (algorithm, version and cost
/// parameters are encoded in the PHC string), so the work factor can be raised
/// later while older digests keep verifying.
#[derive(Clone)]
pub struct Hasher {
    argon2: Argon2<'static>,
}

impl Hasher {
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }

    /// Construct with an explicit work factor (memory KiB, iterations, lanes).
    pub fn with_params(m_cost: u32, t_cost: u32, p_cost: u32) -> Result<Self, anyhow::Error> {
        let params = Params::new(m_cost, t_cost, p_cost, None)
            .map_err(|e| anyhow::anyhow!("Invalid Argon2 parameters: {}", e))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash a plaintext credential with a freshly generated salt.
    pub fn hash(&self, plaintext: &Password) -> Result<Digest, anyhow::Error> {
        let salt = SaltString::generate(&mut OsRng);

        let digest = self
            .argon2
            .hash_password(plaintext.as_str().as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
            .to_string();

        Ok(Digest::new(digest))
    }

    /// Verify a plaintext credential against a stored digest.
    ///
    /// Returns Ok(false) on a mismatch; errors only on a malformed digest,
    /// which indicates store corruption rather than a bad credential. The
    /// comparison is constant-time inside the argon2 crate.
    pub fn verify(&self, plaintext: &Password, digest: &Digest) -> Result<bool, anyhow::Error> {
        let parsed = PasswordHash::new(digest.as_str())
            .map_err(|e| anyhow::anyhow!("Invalid password digest format: {}", e))?;

        match self
            .argon2
            .verify_password(plaintext.as_str().as_bytes(), &parsed)
        {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(anyhow::anyhow!("Password verification error: {}", e)),
        }
    }
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}
