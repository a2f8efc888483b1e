//! Request matching subsystem.
//!
//! # Data Flow
//! ```text
//! Outbound Request (host, full URI)
//!     → registry (walk active registrations, newest first)
//!     → matcher.rs (evaluate the registration's match rule)
//!     → Return: matched Registration or fall through to real transport
//!
//! Rule Compilation (at registration):
//!     host / uri option (string | regex | predicate)
//!     → Resolve to one MatchRule variant
//!     → Freeze inside an immutable Registration
//! ```
//!
//! # Design Decisions
//! - Rules compiled at registration, immutable afterwards
//! - Deterministic: same input always matches the same registration
//! - First match wins (newest registration checked first)

pub mod matcher;
