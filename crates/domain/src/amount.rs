//! Wei-denominated token amounts and their ledger wire encoding.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Number of wei in one whole token.
pub const WEI_PER_TOKEN: u128 = 1_000_000_000_000_000_000;

/// Width of the ledger's fixed hex amount encoding (256-bit unsigned).
const HEX_WIDTH: usize = 64;

/// A value amount in the ledger's smallest unit (wei).
///
/// Article prices are required to be whole-token amounts, i.e. exact
/// multiples of 10^18 wei. Amounts are unsigned; the ledger has no
/// concept of a negative transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenAmount(u128);

impl TokenAmount {
    /// Creates an amount from a raw wei value.
    pub fn from_wei(wei: u128) -> Self {
        Self(wei)
    }

    /// Creates an amount from a whole-token count.
    pub fn from_tokens(tokens: u64) -> Self {
        Self(tokens as u128 * WEI_PER_TOKEN)
    }

    /// Returns the raw wei value.
    pub fn wei(&self) -> u128 {
        self.0
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Returns true if the amount is an exact multiple of 10^18 wei.
    pub fn is_whole_tokens(&self) -> bool {
        self.0 % WEI_PER_TOKEN == 0
    }

    /// Returns the 9/10 share paid to the seller.
    ///
    /// Exact for whole-token amounts; the division happens first so the
    /// multiplication cannot overflow for any price the validator accepts.
    pub fn purchase_portion(&self) -> TokenAmount {
        TokenAmount(self.0 / 10 * 9)
    }

    /// Returns the 1/10 share sent to the null address.
    pub fn burn_portion(&self) -> TokenAmount {
        TokenAmount(self.0 / 10)
    }

    /// Encodes the amount as a 64-hex-digit zero-padded unsigned integer,
    /// the ledger gateway's wire format for transfer values.
    pub fn to_hex64(&self) -> String {
        format!("{:0width$x}", self.0, width = HEX_WIDTH)
    }

    /// Decodes a 64-hex-digit amount back into wei.
    ///
    /// Rejects strings of the wrong length, non-hex characters, and values
    /// that do not fit in 128 bits.
    pub fn from_hex64(hex: &str) -> Result<Self, DomainError> {
        if hex.len() != HEX_WIDTH || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(DomainError::InvalidAmountEncoding(hex.to_string()));
        }
        // The upper 128 bits must be zero for the value to be representable.
        let (high, low) = hex.split_at(HEX_WIDTH / 2);
        if high.bytes().any(|b| b != b'0') {
            return Err(DomainError::InvalidAmountEncoding(hex.to_string()));
        }
        let wei = u128::from_str_radix(low, 16)
            .map_err(|_| DomainError::InvalidAmountEncoding(hex.to_string()))?;
        Ok(Self(wei))
    }
}

impl std::fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} wei", self.0)
    }
}
