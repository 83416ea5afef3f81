//! Arena-backed DOM fixture tree and view-tree types shared by every
//! `webbox-layout` formatting component.

pub mod arena;
pub mod dom;
pub mod fixture;
pub mod view;

pub use arena::{Arena, Node, NodeId};
pub use dom::{Document, NodeKind};
pub use fixture::{FixtureDocument, FixtureNode};
pub use view::{Offsets, Rect, ViewKind, ViewMeta, ViewNode, ViewTree};
