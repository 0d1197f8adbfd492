//! # Image Thumbnailer
//!
//! Generates resized and re-encoded variants of images as they land in object
//! storage. When an object is created under `original/`, its variants are
//! written under `thumbs/`:
//!
//! ```text
//! original/vacation.png  ──▶  thumbs/vacation_original.png     (same size, quality 60)
//!                             thumbs/vacation_thumb_1200.png
//!                             thumbs/vacation_thumb_640.png
//!                             thumbs/vacation_thumb_420.png
//! ```
//!
//! # Architecture
//!
//! ```text
//! event ──▶ SourceReference ──▶ handler ──▶ storage.read
//!                                  │
//!                                  ▼
//!                               pipeline ── keys + plan + imaging (parallel per variant)
//!                                  │
//!                                  ▼
//!                             storage.write ×N (parallel)
//! ```
//!
//! The pipeline itself never touches storage: it maps source bytes to
//! `(destination key, bytes)` pairs. Storage and the image codec are generic
//! parameters of the handler, so tests run against
//! [`storage::MemoryStorage`] and a recording mock backend.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`keys`] | Decode raw object keys, derive source and destination keys |
//! | [`plan`] | Which sizes to produce, at what quality, for which extensions |
//! | [`imaging`] | Decode → resize → encode behind the [`imaging::ImageTransform`] trait |
//! | [`pipeline`] | Extension check and parallel variant generation |
//! | [`storage`] | `read`/`write` collaborator trait with filesystem and in-memory backends |
//! | [`event`] | Object-created notification parsing |
//! | [`handler`] | Read → pipeline → write for one object |
//! | [`config`] | `thumbnailer.toml` loading and validation |
//! | [`output`] | CLI output formatting |
//! | [`types`] | Shared types (`SourceReference`, `VariantResult`) |
//!
//! # Design Decisions
//!
//! ## Skips Are Not Errors
//!
//! Objects without an accepted extension are reported as skipped with a
//! reason such as `Image not processed due to .JPG file extension`. The
//! extension check is case-sensitive and runs before anything is downloaded.
//!
//! ## All or Nothing
//!
//! Any failed transform or write fails the whole object. There are no
//! retries and no partial results; redelivering the event is the way to
//! retry.
//!
//! ## Pure-Rust Imaging
//!
//! Decoding, Lanczos3 resizing and encoding come from the `image` crate, so
//! the binary has no system library dependencies.

pub mod config;
pub mod event;
pub mod handler;
pub mod imaging;
pub mod keys;
pub mod output;
pub mod pipeline;
pub mod plan;
pub mod storage;
pub mod types;
