//! Typed ID definitions for the board's entities.

pub use super::id::Id;

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for Club entities (organizations that own postings).
pub struct Club;

/// Marker type for Posting entities (advertised club roles).
pub struct Posting;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

/// Typed ID for Club entities.
pub type ClubId = Id<Club>;

/// Typed ID for Posting entities.
pub type PostingId = Id<Posting>;
