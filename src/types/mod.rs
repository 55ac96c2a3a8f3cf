//! Core types for the snapshot layout and control path.
//!
//! ## Architecture
//!
//! - [`Schema`] is the ordered field list; offsets and channel sizes derive from it
//! - [`Snapshot`] is one buffer holding every field at its wire offset
//! - [`FieldData`] provides typed, bounds-checked access to field bytes
//! - [`ChannelId`] names the four prefix subscriptions panels can poll
//! - [`ControlWrite`] and [`EventId`] describe panel input headed for the simulator
//!
//! ## Usage Example
//!
//! ```rust
//! use datalink::types::{ChannelId, FieldDescriptor, FieldKind, FieldOrigin, Schema, Snapshot};
//! use std::sync::Arc;
//!
//! let schema = Schema::new(
//!     vec![
//!         FieldDescriptor::new("connected", FieldKind::Float64, FieldOrigin::Link),
//!         FieldDescriptor::new("avionics", FieldKind::Float64, FieldOrigin::Host),
//!         FieldDescriptor::new("beacon", FieldKind::Float64, FieldOrigin::Host),
//!         FieldDescriptor::new("com1", FieldKind::Float64, FieldOrigin::Host),
//!         FieldDescriptor::new("heading_bug", FieldKind::Float64, FieldOrigin::Host),
//!         FieldDescriptor::new("altitude", FieldKind::Float64, FieldOrigin::Host),
//!     ],
//!     &[
//!         (ChannelId::Lights, "beacon"),
//!         (ChannelId::Radio, "com1"),
//!         (ChannelId::Autopilot, "heading_bug"),
//!     ],
//! )?;
//!
//! let mut snapshot = Snapshot::new(Arc::new(schema));
//! snapshot.write_named("altitude", 3500.0f64)?;
//! assert_eq!(snapshot.read_named::<f64>("altitude")?, 3500.0);
//! assert_eq!(snapshot.channel_bytes(ChannelId::Radio).len(), 32);
//! # Ok::<(), datalink::LinkError>(())
//! ```

mod events;
mod field_data;
mod field_kind;
mod schema;
mod snapshot;

pub use events::{ControlWrite, EventId};
pub use field_data::FieldData;
pub use field_kind::{FIXED_STRING_LEN, FieldKind, FieldOrigin};
pub use schema::{ChannelId, FieldDescriptor, FieldId, Schema, WRITE_RECORD_SIZE};
pub use snapshot::Snapshot;
