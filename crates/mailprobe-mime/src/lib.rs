//! # mailprobe-mime
//!
//! MIME message parsing for attachment inspection.
//!
//! ## Features
//!
//! - **Message parsing**: RFC 5322 headers, nested multipart and embedded
//!   message/rfc822 parts
//! - **Defects**: structural anomalies are recorded, not fatal
//! - **Decoding**: Base64, Quoted-Printable, charsets, RFC 2047 encoded
//!   words and RFC 2231 parameters
//! - **Attachments**: filename lookup and decoded content per part
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailprobe_mime::Message;
//!
//! let message = Message::parse(&std::fs::read("sample.eml")?)?;
//! println!("Subject: {}", message.subject().unwrap_or_default());
//!
//! for part in message.walk() {
//!     if let Some(name) = part.filename() {
//!         let content = part.content()?;
//!         println!("{name}: {} bytes", content.len());
//!     }
//! }
//!
//! if !message.defects().is_empty() {
//!     println!("defects: {}", message.defects());
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod content;
mod content_type;
mod defect;
mod error;
mod header;
mod message;

pub mod encoding;

pub use content::{Content, Decoded};
pub use content_type::{ContentDisposition, ContentType};
pub use defect::{Defect, Defects};
pub use error::{Error, Result};
pub use header::Headers;
pub use message::{Message, Part, TransferEncoding, Walk};
