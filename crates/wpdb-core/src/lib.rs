//! Client-side sync engine for a remote web-pdb debugger session.
//!
//! Snapshots flow one way: a [`transport::notifier::Notifier`] decides when to
//! fetch, [`reconcile::reconcile`] folds each [`session::Snapshot`] into a
//! [`session::SessionState`], and [`projector`] turns that state into what a
//! view draws. Commands flow the other way through [`dispatch`].

pub mod command;
pub mod config;
pub mod debounce;
pub mod dispatch;
pub mod interrupt;
pub mod logging;
pub mod projector;
pub mod reconcile;
pub mod session;
pub mod transport;
