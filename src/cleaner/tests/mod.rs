//! Tests for the cleaning pipeline
//!
//! Step-level tests exercise each transform on small hand-built frames;
//! pipeline tests run `clean` end to end on a synthetic station export.
