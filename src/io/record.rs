use super::RecordError;

pub const START_CODE: u8 = b':';

/// Header (count, address, type) plus trailing checksum.
const RECORD_OVERHEAD: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RecordType {
    Data = 0x00,
    EndOfFile = 0x01,
    ExtendedSegmentAddress = 0x02,
    StartSegmentAddress = 0x03,
    ExtendedLinearAddress = 0x04,
}

impl TryFrom<u8> for RecordType {
    type Error = RecordError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(Self::Data),
            0x01 => Ok(Self::EndOfFile),
            0x02 => Ok(Self::ExtendedSegmentAddress),
            0x03 => Ok(Self::StartSegmentAddress),
            0x04 => Ok(Self::ExtendedLinearAddress),
            other => Err(RecordError::UnsupportedRecordType(other)),
        }
    }
}

/// One decoded Intel HEX line. The byte count is always `data.len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub record_type: RecordType,
    pub address: u16,
    pub data: Vec<u8>,
}

impl Record {
    pub fn new(record_type: RecordType, address: u16, data: Vec<u8>) -> Self {
        Self {
            record_type,
            address,
            data,
        }
    }

    pub fn data(address: u16, data: &[u8]) -> Self {
        Self::new(RecordType::Data, address, data.to_vec())
    }

    pub fn end_of_file() -> Self {
        Self::new(RecordType::EndOfFile, 0, Vec::new())
    }

    pub fn extended_linear_address(upper: u16) -> Self {
        Self::new(
            RecordType::ExtendedLinearAddress,
            0,
            upper.to_be_bytes().to_vec(),
        )
    }

    /// Decode one trimmed line. The checksum byte is dropped without being checked.
    pub fn decode(line: &str) -> Result<Self, RecordError> {
        let hex_str = line
            .strip_prefix(START_CODE as char)
            .ok_or(RecordError::MissingStartCode)?;
        let bytes = parse_hex_bytes(hex_str)?;
        if bytes.len() < RECORD_OVERHEAD {
            return Err(RecordError::TooShort { len: bytes.len() });
        }

        let declared = bytes[0];
        let address = u16::from_be_bytes([bytes[1], bytes[2]]);
        let type_byte = bytes[3];
        let data = &bytes[4..bytes.len() - 1];
        if data.len() != declared as usize {
            return Err(RecordError::LengthMismatch {
                declared,
                actual: data.len(),
            });
        }

        let record_type = RecordType::try_from(type_byte)?;
        if matches!(
            record_type,
            RecordType::ExtendedSegmentAddress | RecordType::ExtendedLinearAddress
        ) && data.len() != 2
        {
            return Err(RecordError::InvalidAddressRecord {
                record_type: type_byte,
                len: data.len(),
            });
        }

        Ok(Self::new(record_type, address, data.to_vec()))
    }

    /// Payload of an address record (types 02 and 04) as a big-endian value.
    pub fn address_value(&self) -> Result<u16, RecordError> {
        match self.data[..] {
            [hi, lo] => Ok(u16::from_be_bytes([hi, lo])),
            _ => Err(RecordError::InvalidAddressRecord {
                record_type: self.record_type as u8,
                len: self.data.len(),
            }),
        }
    }

    /// Append this record as one `:`-prefixed line, including the newline.
    pub fn encode_into(&self, output: &mut Vec<u8>) -> Result<(), RecordError> {
        write_record(output, self.record_type as u8, self.address, &self.data)
    }

    pub fn encode(&self) -> Result<String, RecordError> {
        let mut output = Vec::with_capacity(2 * (RECORD_OVERHEAD + self.data.len()) + 2);
        self.encode_into(&mut output)?;
        // Only ASCII hex digits, ':' and '\n' are ever written.
        Ok(output.into_iter().map(char::from).collect())
    }
}

pub fn checksum(bytes: &[u8]) -> u8 {
    let sum = bytes.iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
    (!sum).wrapping_add(1)
}

fn write_record(
    output: &mut Vec<u8>,
    record_type: u8,
    address: u16,
    data: &[u8],
) -> Result<(), RecordError> {
    let byte_count =
        u8::try_from(data.len()).map_err(|_| RecordError::DataTooLong { len: data.len() })?;
    let addr_bytes = address.to_be_bytes();
    let header = [byte_count, addr_bytes[0], addr_bytes[1], record_type];
    let sum = checksum(&header).wrapping_add(checksum(data));

    output.push(START_CODE);
    for &b in header.iter().chain(data) {
        write_hex_byte(output, b);
    }
    write_hex_byte(output, sum);
    output.push(b'\n');
    Ok(())
}

fn write_hex_byte(output: &mut Vec<u8>, byte: u8) {
    const HEX_CHARS: &[u8; 16] = b"0123456789ABCDEF";
    output.push(HEX_CHARS[(byte >> 4) as usize]);
    output.push(HEX_CHARS[(byte & 0x0F) as usize]);
}

fn parse_hex_bytes(hex_str: &str) -> Result<Vec<u8>, RecordError> {
    let bytes = hex_str.as_bytes();
    if !bytes.len().is_multiple_of(2) {
        return Err(RecordError::OddDigitCount);
    }

    let mut out = Vec::with_capacity(bytes.len() / 2);
    for chunk in bytes.chunks_exact(2) {
        let high = hex_digit(chunk[0])?;
        let low = hex_digit(chunk[1])?;
        out.push((high << 4) | low);
    }

    Ok(out)
}

fn hex_digit(b: u8) -> Result<u8, RecordError> {
    match b {
        b'0'..=b'9' => Ok(b - b'0'),
        b'A'..=b'F' => Ok(b - b'A' + 10),
        b'a'..=b'f' => Ok(b - b'a' + 10),
        _ => Err(RecordError::InvalidHexDigit(b as char)),
    }
}
