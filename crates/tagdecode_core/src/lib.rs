//! Public library API for decoding discriminator-tagged JSON documents into polymorphic type families.

/// Type registry, polymorphic decoder, skeleton model, and structural fill.
pub mod unpack;
