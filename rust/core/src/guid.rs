// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC GlobalId encoding
//!
//! IFC stores a 128-bit GUID as 22 characters of a 64-symbol alphabet: the
//! first character carries the top 2 bits, the remaining 21 carry 6 bits each.

use crate::error::{Error, Result};
use uuid::Uuid;

const ALPHABET: &[u8; 64] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz_$";

/// Length of a compressed IFC GUID
pub const GUID_LENGTH: usize = 22;

/// Compress a UUID into the 22-character IFC form
pub fn compress_guid(uuid: &Uuid) -> String {
    let n = uuid.as_u128();
    let mut out = String::with_capacity(GUID_LENGTH);
    out.push(ALPHABET[((n >> 126) & 0x3) as usize] as char);
    for i in 1..GUID_LENGTH {
        let shift = 6 * (GUID_LENGTH - 1 - i);
        out.push(ALPHABET[((n >> shift) & 0x3F) as usize] as char);
    }
    out
}

/// Expand a 22-character IFC GUID back into a UUID
pub fn expand_guid(guid: &str) -> Result<Uuid> {
    let bytes = guid.as_bytes();
    if bytes.len() != GUID_LENGTH {
        return Err(Error::InvalidGuid(guid.to_string()));
    }
    let mut n: u128 = 0;
    for (i, b) in bytes.iter().enumerate() {
        let digit = ALPHABET
            .iter()
            .position(|c| c == b)
            .ok_or_else(|| Error::InvalidGuid(guid.to_string()))? as u128;
        if i == 0 && digit > 3 {
            return Err(Error::InvalidGuid(guid.to_string()));
        }
        n = (n << if i == 0 { 0 } else { 6 }) | digit;
    }
    Ok(Uuid::from_u128(n))
}

/// Whether a string is a well-formed IFC GUID
pub fn is_valid_guid(guid: &str) -> bool {
    expand_guid(guid).is_ok()
}

/// Generate a fresh random IFC GUID
pub fn new_guid() -> String {
    compress_guid(&Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_encodings() {
        assert_eq!(compress_guid(&Uuid::nil()), "0000000000000000000000");
        assert_eq!(compress_guid(&Uuid::from_u128(u128::MAX)), "3$$$$$$$$$$$$$$$$$$$$$");
    }

    #[test]
    fn compress_expand_identity() {
        let uuid = Uuid::new_v4();
        let guid = compress_guid(&uuid);
        assert_eq!(guid.len(), GUID_LENGTH);
        assert_eq!(expand_guid(&guid).unwrap(), uuid);
    }

    #[test]
    fn rejects_malformed_guids() {
        assert!(!is_valid_guid("short"));
        assert!(!is_valid_guid("4$$$$$$$$$$$$$$$$$$$$$"));
        assert!(!is_valid_guid("000000000000000000000!"));
        assert!(is_valid_guid(&new_guid()));
    }
}
