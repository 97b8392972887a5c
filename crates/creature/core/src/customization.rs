//! Appearance customization codec.
//!
//! # Wire Format
//!
//! ```text
//! 0x01 <count> [171 <v171> <v172>] (<index> <value>)* 0xFF 0x03 0x00
//! ```
//!
//! - `count` is the number of entries; the torso pair counts as one
//! - a value below 255 is one byte, anything else is two bytes little-endian
//! - the torso pair (slots 171 and 172) is only written for female subjects and
//!   always comes first; a torso value of 0 is sent as 511 and 255 as 767
//!
//! The byte count is computed in a separate pass before encoding and the two
//! passes must agree.
//!
//! Decoding treats a leading `0xFF` as the start of a two-byte value, so a
//! value of 255 or above must have `0xFF` as its low byte (255, 511, 767, ...).
//! [`Customization::set`] refuses anything else, which keeps every encoded
//! stream decodable.

use crate::config::CreatureConfig;
use crate::error::{CoreError, ErrorSeverity};

const HEADER: u8 = 0x01;
const FOOTER: [u8; 3] = [0xFF, 0x03, 0x00];
const TWO_BYTE_MARKER: u8 = 0xFF;

/// First slot of the female torso pair.
pub const TORSO_FIRST: u8 = 171;
/// Second slot of the female torso pair.
pub const TORSO_SECOND: u8 = 172;
/// Highest addressable slot.
pub const MAX_SLOT: u8 = 254;

const TORSO_ZERO_REMAP: u16 = 511;
const TORSO_MAX_REMAP: u16 = 767;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CustomizationError {
    #[error("customization data truncated at byte {offset}")]
    Truncated { offset: usize },

    #[error("unexpected header byte {found:#04x}")]
    BadHeader { found: u8 },

    #[error("slot index {index} is outside 1..=254")]
    InvalidSlot { index: u8 },

    #[error("value {value} for slot {index} has no wire encoding")]
    UnencodableValue { index: u8, value: u16 },

    #[error("malformed footer at byte {offset}")]
    BadFooter { offset: usize },

    #[error("element count mismatch (header: {declared}, decoded: {decoded})")]
    CountMismatch { declared: u8, decoded: u8 },
}

impl CoreError for CustomizationError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        use CustomizationError::*;
        match self {
            Truncated { .. } => "CUSTOMIZATION_TRUNCATED",
            BadHeader { .. } => "CUSTOMIZATION_BAD_HEADER",
            InvalidSlot { .. } => "CUSTOMIZATION_INVALID_SLOT",
            UnencodableValue { .. } => "CUSTOMIZATION_UNENCODABLE_VALUE",
            BadFooter { .. } => "CUSTOMIZATION_BAD_FOOTER",
            CountMismatch { .. } => "CUSTOMIZATION_COUNT_MISMATCH",
        }
    }
}

/// Sparse appearance attributes, slots 1..=254.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Customization {
    slots: [u16; CreatureConfig::CUSTOMIZATION_SLOTS],
}

impl Default for Customization {
    fn default() -> Self {
        Self {
            slots: [0; CreatureConfig::CUSTOMIZATION_SLOTS],
        }
    }
}

/// Result of [`Customization::decode`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedCustomization {
    pub customization: Customization,
    /// True when the torso pair was present, i.e. the subject was female.
    pub female: bool,
}

impl Customization {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a slot.
    ///
    /// # Errors
    ///
    /// `InvalidSlot` for index 0 or 255, `UnencodableValue` for a value above
    /// 255 whose low byte is not `0xFF`. The slot is left unchanged.
    pub fn set(&mut self, index: u8, value: u16) -> Result<(), CustomizationError> {
        if !(1..=MAX_SLOT).contains(&index) {
            return Err(CustomizationError::InvalidSlot { index });
        }
        if value > u8::MAX as u16 && value & 0xFF != TWO_BYTE_MARKER as u16 {
            return Err(CustomizationError::UnencodableValue { index, value });
        }
        self.slots[index as usize] = value;
        Ok(())
    }

    pub fn get(&self, index: u8) -> u16 {
        self.slots[index as usize]
    }

    /// Non-zero slots in index order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u16)> + '_ {
        (1..=MAX_SLOT)
            .map(|index| (index, self.slots[index as usize]))
            .filter(|(_, value)| *value != 0)
    }

    /// Exact size of [`encode`](Self::encode)'s output.
    pub fn encoded_len(&self, female: bool) -> usize {
        let mut len = 2 + FOOTER.len();
        if female {
            len += 1 + self.torso_values().iter().map(|v| value_len(*v)).sum::<usize>();
        }
        for (_, value) in self.regular_slots() {
            len += 1 + value_len(value);
        }
        len
    }

    /// Encodes the slots into the client byte stream.
    pub fn encode(&self, female: bool) -> Vec<u8> {
        let expected = self.encoded_len(female);
        let mut out = Vec::with_capacity(expected);

        let regular = self.regular_slots().count();
        let count = regular + usize::from(female);
        out.push(HEADER);
        out.push(count as u8);

        if female {
            out.push(TORSO_FIRST);
            for value in self.torso_values() {
                push_value(&mut out, value);
            }
        }

        for (index, value) in self.regular_slots() {
            out.push(index);
            push_value(&mut out, value);
        }

        out.extend_from_slice(&FOOTER);
        debug_assert_eq!(out.len(), expected, "customization length passes disagree");
        out
    }

    /// Decodes a byte stream produced by [`encode`](Self::encode).
    pub fn decode(bytes: &[u8]) -> Result<DecodedCustomization, CustomizationError> {
        let mut reader = Reader { bytes, offset: 0 };

        let header = reader.byte()?;
        if header != HEADER {
            return Err(CustomizationError::BadHeader { found: header });
        }
        let declared = reader.byte()?;

        let mut customization = Customization::new();
        let mut female = false;
        let mut decoded: u8 = 0;

        loop {
            let index = reader.byte()?;
            if index == FOOTER[0] {
                break;
            }
            if index == 0 {
                return Err(CustomizationError::InvalidSlot { index });
            }
            if index == TORSO_FIRST {
                female = true;
                customization.set(TORSO_FIRST, reader.value()?)?;
                customization.set(TORSO_SECOND, reader.value()?)?;
            } else {
                customization.set(index, reader.value()?)?;
            }
            decoded = decoded.saturating_add(1);
        }

        let offset = reader.offset;
        if reader.byte()? != FOOTER[1] || reader.byte()? != FOOTER[2] {
            return Err(CustomizationError::BadFooter { offset });
        }
        if decoded != declared {
            return Err(CustomizationError::CountMismatch { declared, decoded });
        }

        Ok(DecodedCustomization {
            customization,
            female,
        })
    }

    fn regular_slots(&self) -> impl Iterator<Item = (u8, u16)> + '_ {
        self.iter()
            .filter(|(index, _)| *index != TORSO_FIRST && *index != TORSO_SECOND)
    }

    fn torso_values(&self) -> [u16; 2] {
        [
            remap_torso(self.get(TORSO_FIRST)),
            remap_torso(self.get(TORSO_SECOND)),
        ]
    }
}

fn remap_torso(value: u16) -> u16 {
    match value {
        0 => TORSO_ZERO_REMAP,
        255 => TORSO_MAX_REMAP,
        other => other,
    }
}

#[inline]
fn value_len(value: u16) -> usize {
    if value < u8::MAX as u16 { 1 } else { 2 }
}

fn push_value(out: &mut Vec<u8>, value: u16) {
    if value < u8::MAX as u16 {
        out.push(value as u8);
    } else {
        out.extend_from_slice(&value.to_le_bytes());
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl Reader<'_> {
    fn byte(&mut self) -> Result<u8, CustomizationError> {
        let byte = *self
            .bytes
            .get(self.offset)
            .ok_or(CustomizationError::Truncated {
                offset: self.offset,
            })?;
        self.offset += 1;
        Ok(byte)
    }

    fn value(&mut self) -> Result<u16, CustomizationError> {
        let low = self.byte()?;
        if low != TWO_BYTE_MARKER {
            return Ok(low as u16);
        }
        let high = self.byte()?;
        Ok(u16::from_le_bytes([low, high]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn female_with_single_slot() {
        let mut custom = Customization::new();
        custom.set(5, 10).unwrap();

        let bytes = custom.encode(true);
        assert_eq!(
            bytes,
            vec![0x01, 2, 171, 0xFF, 0x01, 0xFF, 0x01, 5, 10, 0xFF, 0x03, 0x00]
        );
        assert_eq!(bytes.len(), custom.encoded_len(true));

        let decoded = Customization::decode(&bytes).unwrap();
        assert!(decoded.female);
        assert_eq!(decoded.customization.get(5), 10);
        // Default torso slots come back as the remapped sentinel.
        assert_eq!(decoded.customization.get(TORSO_FIRST), 511);
        assert_eq!(decoded.customization.get(TORSO_SECOND), 511);
    }

    #[test]
    fn male_skips_torso_pair() {
        let mut custom = Customization::new();
        custom.set(TORSO_FIRST, 40).unwrap();
        custom.set(3, 200).unwrap();
        custom.set(17, 255).unwrap();

        let bytes = custom.encode(false);
        assert_eq!(bytes, vec![0x01, 2, 3, 200, 17, 0xFF, 0x00, 0xFF, 0x03, 0x00]);

        let decoded = Customization::decode(&bytes).unwrap();
        assert!(!decoded.female);
        assert_eq!(decoded.customization.get(3), 200);
        assert_eq!(decoded.customization.get(17), 255);
        assert_eq!(decoded.customization.get(TORSO_FIRST), 0);
    }

    #[test]
    fn torso_max_is_remapped_and_small_values_use_one_byte() {
        let mut custom = Customization::new();
        custom.set(TORSO_FIRST, 255).unwrap();
        custom.set(TORSO_SECOND, 12).unwrap();

        let bytes = custom.encode(true);
        assert_eq!(bytes, vec![0x01, 1, 171, 0xFF, 0x02, 12, 0xFF, 0x03, 0x00]);

        let decoded = Customization::decode(&bytes).unwrap();
        assert_eq!(decoded.customization.get(TORSO_FIRST), 767);
        assert_eq!(decoded.customization.get(TORSO_SECOND), 12);
    }

    #[test]
    fn length_pass_matches_encoding_pass() {
        let mut custom = Customization::new();
        for index in (1..=MAX_SLOT).step_by(7) {
            let value = match index % 3 {
                0 => 254,
                1 => 255,
                _ => 0x03FF,
            };
            custom.set(index, value).unwrap();
        }
        for female in [false, true] {
            assert_eq!(custom.encode(female).len(), custom.encoded_len(female));
        }
    }

    #[test]
    fn empty_male_is_header_and_footer() {
        let bytes = Customization::new().encode(false);
        assert_eq!(bytes, vec![0x01, 0, 0xFF, 0x03, 0x00]);
    }

    #[test]
    fn decode_rejects_damaged_input() {
        assert_eq!(
            Customization::decode(&[0x02, 0]),
            Err(CustomizationError::BadHeader { found: 0x02 })
        );
        assert_eq!(
            Customization::decode(&[0x01, 1, 5]),
            Err(CustomizationError::Truncated { offset: 3 })
        );
        assert_eq!(
            Customization::decode(&[0x01, 2, 5, 10, 0xFF, 0x03, 0x00]),
            Err(CustomizationError::CountMismatch {
                declared: 2,
                decoded: 1
            })
        );
        assert!(matches!(
            Customization::decode(&[0x01, 0, 0xFF, 0x04, 0x00]),
            Err(CustomizationError::BadFooter { .. })
        ));
    }

    #[test]
    fn unaddressable_slots_are_rejected() {
        let mut custom = Customization::new();
        assert_eq!(
            custom.set(0, 9),
            Err(CustomizationError::InvalidSlot { index: 0 })
        );
        assert_eq!(
            custom.set(255, 9),
            Err(CustomizationError::InvalidSlot { index: 255 })
        );
        assert_eq!(custom.iter().count(), 0);
    }

    #[test]
    fn values_without_wire_form_are_rejected() {
        let mut custom = Customization::new();
        custom.set(9, 0x02FF).unwrap();
        assert_eq!(
            custom.set(9, 0x0300),
            Err(CustomizationError::UnencodableValue {
                index: 9,
                value: 0x0300
            })
        );
        assert_eq!(
            custom.set(TORSO_FIRST, 256),
            Err(CustomizationError::UnencodableValue {
                index: TORSO_FIRST,
                value: 256
            })
        );
        assert_eq!(custom.get(9), 0x02FF);

        let decoded = Customization::decode(&custom.encode(false)).unwrap();
        assert_eq!(decoded.customization, custom);
    }
}
