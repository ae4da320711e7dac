use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use xmlseed_core::Facets;

use crate::facets::LengthLimits;
use crate::generators::boundary::BoundaryCycle;

const BASE64_PLACEHOLDER: &[u8] = b"sample";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryEncoding {
    Hex,
    Base64,
}

/// `xs:hexBinary` and `xs:base64Binary`. Length facets count octets.
#[derive(Debug, Clone)]
pub struct BinaryGenerator {
    encoding: BinaryEncoding,
    payload: BoundaryCycle<i128>,
    limits: LengthLimits,
}

impl BinaryGenerator {
    pub fn new(encoding: BinaryEncoding, facets: &Facets) -> Self {
        Self {
            encoding,
            payload: BoundaryCycle::bounded(0, 0xFFFF, 1, None, None, 1),
            limits: LengthLimits::from_facets(facets),
        }
    }

    pub fn encoding(&self) -> BinaryEncoding {
        self.encoding
    }

    pub fn next_value(&mut self) -> String {
        match self.encoding {
            BinaryEncoding::Hex => {
                let value = u16::try_from(self.payload.next_value()).unwrap_or_default();
                fit_hex(hex::encode_upper(value.to_be_bytes()), &self.limits)
            }
            BinaryEncoding::Base64 => {
                let size = self.limits.resolve(BASE64_PLACEHOLDER.len());
                let bytes: Vec<u8> = BASE64_PLACEHOLDER.iter().cycle().take(size).copied().collect();
                STANDARD.encode(bytes)
            }
        }
    }
}

/// Pad with leading zero octets or keep the trailing octets.
fn fit_hex(digits: String, limits: &LengthLimits) -> String {
    assert!(digits.len() % 2 == 0, "hex payload must hold whole octets");
    let octets = digits.len() / 2;
    let target = limits.resolve(octets);
    if target >= octets {
        format!("{}{digits}", "00".repeat(target - octets))
    } else {
        digits[(octets - target) * 2..].to_string()
    }
}
