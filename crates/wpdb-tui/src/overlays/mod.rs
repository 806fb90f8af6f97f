//! Modal overlays. While one is open it takes keyboard input first.

pub mod help;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    Help,
}
