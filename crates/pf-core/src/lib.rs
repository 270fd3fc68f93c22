//! Host-independent behaviour of the portfolio site.
//!
//! Everything here is plain Rust driven through the [`schedule::Scheduler`]
//! and [`notify::ToastHost`] seams, so the browser frontend supplies real
//! timers and DOM nodes while tests use a virtual clock and in-memory fakes.

pub mod config;
pub mod contact;
pub mod error;
pub mod loading;
pub mod nav;
pub mod notify;
pub mod reveal;
pub mod schedule;
pub mod typing;
pub mod util;

pub use config::SiteConfig;
pub use error::{PortfolioError, Result};
pub use notify::{Notification, NotificationKind, Toast, ToastHost, Toaster};
pub use schedule::{Scheduler, TaskHandle, VirtualScheduler};
