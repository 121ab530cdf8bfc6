//! Persona Report crate - paginated document rendering.
//!
//! Turns a validated persona into a paginated plain-text document: blocks
//! are measured against the page layout, page breaks are inserted when the
//! remaining vertical space cannot fit the next block, and every page gets
//! a footer with the username and page number. A richer drawing backend is
//! an external collaborator; it would plug in at the block boundary.

pub mod layout;
pub mod render;

pub use layout::{Block, Evidence, Page, PageLayout};
pub use render::render_document;
