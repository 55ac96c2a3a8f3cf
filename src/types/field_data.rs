//! Typed access to snapshot field bytes

use super::{FIXED_STRING_LEN, FieldDescriptor, FieldKind};
use crate::{LinkError, Result};

/// Types that can be read from and written to a snapshot field.
pub trait FieldData: Sized {
    /// Parse this type from the bytes of one field.
    fn read(data: &[u8], desc: &FieldDescriptor, offset: usize) -> Result<Self>;

    /// Serialize this value into the bytes of one field.
    fn write(&self, data: &mut [u8], desc: &FieldDescriptor, offset: usize) -> Result<()>;
}

fn expect_kind(desc: &FieldDescriptor, expected: FieldKind) -> Result<()> {
    if desc.kind != expected {
        return Err(LinkError::TypeMismatch {
            field: desc.name.clone(),
            expected: expected.label(),
            actual: desc.kind.label(),
        });
    }
    Ok(())
}

fn slot(data: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    data.get(offset..offset + len).ok_or(LinkError::OutOfBounds { offset, len: data.len() })
}

fn slot_mut(data: &mut [u8], offset: usize, len: usize) -> Result<&mut [u8]> {
    let total = data.len();
    data.get_mut(offset..offset + len).ok_or(LinkError::OutOfBounds { offset, len: total })
}

impl FieldData for f64 {
    fn read(data: &[u8], desc: &FieldDescriptor, offset: usize) -> Result<Self> {
        expect_kind(desc, FieldKind::Float64)?;
        let bytes = slot(data, offset, 8)?;
        Ok(f64::from_le_bytes([
            bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
        ]))
    }

    fn write(&self, data: &mut [u8], desc: &FieldDescriptor, offset: usize) -> Result<()> {
        expect_kind(desc, FieldKind::Float64)?;
        slot_mut(data, offset, 8)?.copy_from_slice(&self.to_le_bytes());
        Ok(())
    }
}

// Switch-style fields: any nonzero value is on.
impl FieldData for bool {
    fn read(data: &[u8], desc: &FieldDescriptor, offset: usize) -> Result<Self> {
        f64::read(data, desc, offset).map(|v| v != 0.0)
    }

    fn write(&self, data: &mut [u8], desc: &FieldDescriptor, offset: usize) -> Result<()> {
        (if *self { 1.0f64 } else { 0.0 }).write(data, desc, offset)
    }
}

impl FieldData for String {
    fn read(data: &[u8], desc: &FieldDescriptor, offset: usize) -> Result<Self> {
        expect_kind(desc, FieldKind::FixedString)?;
        let bytes = slot(data, offset, FIXED_STRING_LEN)?;
        let end = bytes.iter().position(|b| *b == 0).unwrap_or(bytes.len());
        Ok(String::from_utf8_lossy(&bytes[..end]).into_owned())
    }

    /// Truncates to 31 bytes on a character boundary so the field stays NUL-terminated.
    fn write(&self, data: &mut [u8], desc: &FieldDescriptor, offset: usize) -> Result<()> {
        expect_kind(desc, FieldKind::FixedString)?;
        let target = slot_mut(data, offset, FIXED_STRING_LEN)?;
        let mut len = self.len().min(FIXED_STRING_LEN - 1);
        while !self.is_char_boundary(len) {
            len -= 1;
        }
        target.fill(0);
        target[..len].copy_from_slice(&self.as_bytes()[..len]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldOrigin;

    fn number() -> FieldDescriptor {
        FieldDescriptor::new("altitude", FieldKind::Float64, FieldOrigin::Host)
    }

    fn text() -> FieldDescriptor {
        FieldDescriptor::new("title", FieldKind::FixedString, FieldOrigin::Host)
    }

    #[test]
    fn float_round_trips_at_offset() {
        let mut data = vec![0u8; 16];
        12_345.5f64.write(&mut data, &number(), 8).unwrap();
        assert_eq!(f64::read(&data, &number(), 8).unwrap(), 12_345.5);
        assert!(data[..8].iter().all(|b| *b == 0));
    }

    #[test]
    fn kind_mismatch_is_rejected() {
        let mut data = vec![0u8; 32];
        assert!(matches!(
            1.0f64.write(&mut data, &text(), 0),
            Err(LinkError::TypeMismatch { expected: "float64", .. })
        ));
        assert!(String::read(&data, &number(), 0).is_err());
    }

    #[test]
    fn out_of_bounds_access_is_rejected() {
        let data = vec![0u8; 4];
        assert!(matches!(f64::read(&data, &number(), 0), Err(LinkError::OutOfBounds { .. })));
    }

    #[test]
    fn long_strings_are_truncated_and_terminated() {
        let mut data = vec![0xffu8; 32];
        let title = "Airbus A310-300 Pratt & Whitney Livery".to_string();
        title.write(&mut data, &text(), 0).unwrap();
        assert_eq!(data[31], 0);
        let read = String::read(&data, &text(), 0).unwrap();
        assert_eq!(read.len(), 31);
        assert!(title.starts_with(&read));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let mut data = vec![0u8; 32];
        let title = format!("{}é", "x".repeat(30));
        title.write(&mut data, &text(), 0).unwrap();
        assert_eq!(String::read(&data, &text(), 0).unwrap(), "x".repeat(30));
    }

    #[test]
    fn bools_are_nonzero_floats() {
        let mut data = vec![0u8; 8];
        true.write(&mut data, &number(), 0).unwrap();
        assert_eq!(f64::read(&data, &number(), 0).unwrap(), 1.0);
        (-2.0f64).write(&mut data, &number(), 0).unwrap();
        assert!(bool::read(&data, &number(), 0).unwrap());
    }
}
