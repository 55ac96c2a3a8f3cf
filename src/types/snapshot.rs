//! Live snapshot buffer

use std::fmt;
use std::sync::Arc;

use super::{ChannelId, FieldData, FieldId, Schema};
use crate::{LinkError, Result};

/// One buffer holding every schema field at its wire offset.
///
/// The engine owns the working snapshot and publishes immutable clones; the
/// server only ever sees published copies, so a snapshot is never read while
/// it is being written.
#[derive(Clone, PartialEq)]
pub struct Snapshot {
    schema: Arc<Schema>,
    data: Vec<u8>,
}

impl Snapshot {
    /// Create a zeroed snapshot for a schema.
    pub fn new(schema: Arc<Schema>) -> Self {
        let data = vec![0u8; schema.total_size()];
        Self { schema, data }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Read a field through a typed accessor.
    pub fn read<T: FieldData>(&self, id: impl Into<FieldId>) -> Result<T> {
        let id = id.into();
        let (desc, offset) = self.schema.field(id).ok_or_else(|| foreign_handle(id))?;
        T::read(&self.data, desc, offset)
    }

    /// Write a field through a typed accessor.
    pub fn write<T: FieldData>(&mut self, id: impl Into<FieldId>, value: T) -> Result<()> {
        let id = id.into();
        let (desc, offset) = self.schema.field(id).ok_or_else(|| foreign_handle(id))?;
        value.write(&mut self.data, desc, offset)
    }

    /// Read a field by name.
    pub fn read_named<T: FieldData>(&self, name: &str) -> Result<T> {
        let id = self.schema.field_id(name)?;
        self.read(id)
    }

    /// Write a field by name.
    pub fn write_named<T: FieldData>(&mut self, name: &str, value: T) -> Result<()> {
        let id = self.schema.field_id(name)?;
        self.write(id, value)
    }

    /// Numeric read for engine-internal use. String fields and foreign handles read as 0.
    pub fn get(&self, id: impl Into<FieldId>) -> f64 {
        self.read::<f64>(id).unwrap_or(0.0)
    }

    /// Numeric write for engine-internal use. String fields and foreign handles are left untouched.
    pub fn set(&mut self, id: impl Into<FieldId>, value: f64) {
        let id = id.into();
        if let Err(e) = self.write(id, value) {
            tracing::debug!(field = id.index(), "Ignored numeric write: {}", e);
        }
    }

    /// Whether a switch-style field is on.
    pub fn is_on(&self, id: impl Into<FieldId>) -> bool {
        self.get(id) != 0.0
    }

    /// Copy a host blob into the host-sourced byte range.
    pub fn load_host_block(&mut self, block: &[u8]) -> Result<()> {
        let range = self.schema.host_range();
        if block.len() != range.len() {
            return Err(LinkError::protocol(format!(
                "host block is {} bytes, schema expects {}",
                block.len(),
                range.len()
            )));
        }
        self.data[range].copy_from_slice(block);
        Ok(())
    }

    /// The host-sourced byte range, laid out the way a telemetry source delivers it.
    pub fn host_block(&self) -> &[u8] {
        &self.data[self.schema.host_range()]
    }

    /// Bytes of a channel prefix.
    pub fn channel_bytes(&self, channel: ChannelId) -> &[u8] {
        &self.data[..self.schema.channel_size(channel)]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Zero every field.
    pub fn reset(&mut self) {
        self.data.fill(0);
    }
}

fn foreign_handle(id: FieldId) -> LinkError {
    LinkError::FieldNotFound { field: format!("#{}", id.index()) }
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("fields", &self.schema.field_count())
            .field("size", &self.data.len())
            .finish()
    }
}
